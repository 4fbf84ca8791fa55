//! HTTP surface of Vista.
//!
//! A single route, `POST /ai/images/upload`, backed by whatever
//! [`ImageAnalyzer`] the state carries.

pub mod handler;
pub mod response;

pub use handler::{upload_handler, IMAGE_FIELD};
pub use response::{AnalyzeFailure, DescriptionResponse, ERROR_PREFIX};

use axum::{extract::DefaultBodyLimit, routing::post, Router};
use std::future::Future;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::error::Result;
use crate::vision::ImageAnalyzer;

/// Route of the upload endpoint.
pub const UPLOAD_PATH: &str = "/ai/images/upload";

/// Shared, read-only request state.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<dyn ImageAnalyzer>,
}

impl AppState {
    pub fn new(analyzer: Arc<dyn ImageAnalyzer>) -> Self {
        Self { analyzer }
    }
}

/// Build the router.
pub fn create_app(state: AppState, server: &ServerConfig) -> Router {
    Router::new()
        .route(UPLOAD_PATH, post(upload_handler))
        .layer(DefaultBodyLimit::max(server.body_limit_bytes()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Bind `server.host:server.port` and serve until `shutdown` resolves.
pub async fn start_server<F>(app: Router, server: &ServerConfig, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind((server.host.as_str(), server.port)).await?;
    tracing::info!("API server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("API server stopped");
    Ok(())
}
