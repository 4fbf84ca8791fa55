//! Image labelling through the Cloud Vision API.
//!
//! Provides the [`ImageAnalyzer`] abstraction the upload endpoint depends on,
//! and [`VisionTranslator`], the implementation backed by `images:annotate`.

pub mod render;
pub mod translator;
pub mod types;

pub use render::{format_confidence, Description, DESCRIPTION_HEADER, NO_LABELS_MESSAGE};
pub use translator::{build_request, encode, parse, VisionTranslator};
pub use types::{AnnotateRequest, ImageUpload, LabelAnnotation, MAX_LABELS};

use crate::error::AnalyzeResult;
use async_trait::async_trait;

/// Something that can turn an uploaded image into a description.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (the router holds an `Arc<dyn ImageAnalyzer>`).
#[async_trait]
pub trait ImageAnalyzer: Send + Sync {
    /// Analyzer name for logging (e.g., "google-vision").
    fn name(&self) -> &str;

    /// Describe the uploaded image.
    async fn analyze(&self, upload: &ImageUpload) -> AnalyzeResult<Description>;
}
