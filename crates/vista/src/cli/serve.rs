//! The `vista serve` command: run the upload endpoint.

use clap::Args;
use std::sync::Arc;
use tokio::signal;
use vista_core::api::{self, AppState};
use vista_core::{Config, VisionTranslator};

/// Arguments for the `serve` command.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Address to bind (overrides server.host)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides server.port)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Vision annotate endpoint (overrides vision.endpoint)
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Vision API key (overrides vision.api_key)
    #[arg(long, env = "GOOGLE_VISION_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
}

impl ServeArgs {
    /// Fold CLI overrides into the loaded configuration.
    fn apply(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(endpoint) = &self.endpoint {
            config.vision.endpoint = endpoint.clone();
        }
        if let Some(key) = self.api_key.as_ref().filter(|k| !k.is_empty()) {
            config.vision.api_key = key.clone();
        }
    }
}

/// Execute the serve command.
pub async fn execute(args: ServeArgs, mut config: Config) -> anyhow::Result<()> {
    args.apply(&mut config);
    config.validate()?;
    let api_key = config.api_key()?;

    let translator = VisionTranslator::new(&config.vision, &api_key);
    tracing::info!(endpoint = translator.endpoint(), "Vision translator ready");

    let app = api::create_app(AppState::new(Arc::new(translator)), &config.server);
    api::start_server(app, &config.server, shutdown_signal()).await?;
    Ok(())
}

/// Resolve on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_overrides() {
        let args = ServeArgs {
            host: Some("127.0.0.1".to_string()),
            port: Some(9000),
            endpoint: Some("http://localhost:9001/annotate".to_string()),
            api_key: Some("cli-key".to_string()),
        };
        let mut config = Config::default();
        args.apply(&mut config);

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.vision.endpoint, "http://localhost:9001/annotate");
        assert_eq!(config.api_key().unwrap(), "cli-key");
    }

    #[test]
    fn test_no_overrides_keeps_config() {
        let mut config = Config::default();
        config.vision.api_key = "file-key".to_string();
        ServeArgs {
            api_key: Some(String::new()),
            ..ServeArgs::default()
        }
        .apply(&mut config);

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.api_key().unwrap(), "file-key");
    }

    #[tokio::test]
    async fn test_execute_without_api_key_fails() {
        let mut config = Config::default();
        config.vision.api_key = "${VISTA_SERVE_TEST_UNSET_KEY}".to_string();
        let err = execute(ServeArgs::default(), config).await.unwrap_err();
        assert!(err.to_string().contains("vision API key not set"));
    }
}
