//! Vista CLI - describe uploaded images with Cloud Vision labels.
//!
//! Vista runs a small HTTP service with a single endpoint,
//! `POST /ai/images/upload`, that forwards the uploaded image to the Cloud
//! Vision label detector and answers with a readable summary.
//!
//! # Usage
//!
//! ```bash
//! # Run the service
//! GOOGLE_VISION_API_KEY=... vista serve --port 8080
//!
//! # View configuration
//! vista config show
//!
//! # Write a default config file
//! vista config init
//! ```

use clap::{Parser, Subcommand};
use std::path::Path;
use vista_core::Config;

mod cli;
mod logging;

/// Vista - describe uploaded images with Cloud Vision labels.
#[derive(Parser, Debug)]
#[command(name = "vista")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file to use instead of the default location
    #[arg(short, long, global = true, env = "VISTA_CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the image upload endpoint
    Serve(cli::serve::ServeArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let explicit_path = cli.config.as_deref().map(Config::expand_path);
    let config_path = explicit_path.clone().unwrap_or_else(Config::default_path);
    let creating = matches!(
        &cli.command,
        Commands::Config(args) if matches!(args.command, cli::config::ConfigCommand::Init { .. })
    );

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let (config, warning) = load_config(explicit_path.as_deref(), creating);
    if let Some(warning) = warning {
        eprintln!("{warning}");
    }
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Vista v{}", vista_core::VERSION);

    // Dispatch to the appropriate command handler
    match cli.command {
        Commands::Serve(args) => cli::serve::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args, &config, &config_path).await,
    }
}

/// Load the config, falling back to defaults when it is missing or broken.
///
/// Without `--config` the default location is optional. An explicit path that
/// does not exist gets a warning, unless `config init` is about to create it.
fn load_config(explicit: Option<&Path>, creating: bool) -> (Config, Option<String>) {
    let loaded = match explicit {
        None => Config::load(),
        Some(path) if !path.exists() => {
            let warning = (!creating).then(|| {
                format!(
                    "Warning: Config file {} does not exist.\n  \
                     Using default configuration. Create it with `vista config init`.",
                    path.display()
                )
            });
            return (Config::default(), warning);
        }
        Some(path) => Config::load_from(path),
    };

    match loaded {
        Ok(config) => (config, None),
        Err(e) => {
            let path = explicit.map_or_else(Config::default_path, Path::to_path_buf);
            let warning = format!(
                "Warning: Failed to load config from {}: {e}\n  \
                 Using default configuration. Check your config file with `vista config path`.",
                path.display()
            );
            (Config::default(), Some(warning))
        }
    }
}
