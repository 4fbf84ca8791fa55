//! Upload endpoint handler

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};

use super::response::{AnalyzeFailure, DescriptionResponse};
use super::AppState;
use crate::error::{AnalyzeError, AnalyzeResult};
use crate::vision::ImageUpload;

/// Multipart field carrying the image.
pub const IMAGE_FIELD: &str = "image";

/// POST /ai/images/upload - Describe an uploaded image
///
/// Reads the `image` field and hands its bytes to the analyzer untouched.
/// Requests that are not multipart are answered like any other failure.
pub async fn upload_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<DescriptionResponse>, AnalyzeFailure> {
    let multipart = multipart.map_err(|e| AnalyzeError::UploadRead(e.body_text()))?;
    let upload = read_image_field(multipart).await?;

    tracing::debug!(
        analyzer = state.analyzer.name(),
        file_name = upload.file_name.as_deref().unwrap_or("-"),
        bytes = upload.len(),
        "Image upload received"
    );

    let description = state.analyzer.analyze(&upload).await?;
    Ok(Json(DescriptionResponse::new(description.render())))
}

/// Pull the first `image` field out of the form, skipping any others.
async fn read_image_field(mut multipart: Multipart) -> AnalyzeResult<ImageUpload> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AnalyzeError::UploadRead(e.body_text()))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let content_type = field.content_type().map(str::to_string);
        let file_name = field.file_name().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AnalyzeError::UploadRead(e.body_text()))?;

        return Ok(ImageUpload::new(bytes.to_vec())
            .with_content_type(content_type.as_deref())
            .with_file_name(file_name.as_deref()));
    }

    Err(AnalyzeError::UploadRead(format!(
        "missing multipart field `{IMAGE_FIELD}`"
    )))
}
