//! Vista Core - upload-to-description translation over the Cloud Vision API.
//!
//! Vista accepts an image upload, asks the Cloud Vision label detector what it
//! sees, and answers with a short human-readable summary.
//!
//! # Architecture
//!
//! Every request is a stateless linear pipeline:
//!
//! ```text
//! Upload → base64 → images:annotate request → Vision API → labels → text
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use vista_core::{api, Config, VisionTranslator};
//!
//! #[tokio::main]
//! async fn main() -> vista_core::Result<()> {
//!     let config = Config::load()?;
//!     let translator = VisionTranslator::new(&config.vision, &config.api_key()?);
//!     let app = api::create_app(api::AppState::new(Arc::new(translator)), &config.server);
//!     api::start_server(app, &config.server, std::future::pending()).await
//! }
//! ```

// Module declarations
pub mod api;
pub mod config;
pub mod error;
pub mod vision;

// Re-exports for convenient access
pub use config::Config;
pub use error::{AnalyzeError, AnalyzeResult, ConfigError, Result, VistaError};
pub use vision::{Description, ImageAnalyzer, ImageUpload, LabelAnnotation, VisionTranslator};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
