//! Response body of the upload endpoint.

use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use serde::{Deserialize, Serialize};

use crate::error::AnalyzeError;

/// Prefix of every failure description.
pub const ERROR_PREFIX: &str = "Erro ao analisar imagem: ";

/// `{"description": ...}`, used for both outcomes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptionResponse {
    pub description: String,
}

impl DescriptionResponse {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }

    pub fn from_error(err: &AnalyzeError) -> Self {
        Self::new(format!("{ERROR_PREFIX}{err}"))
    }
}

/// Error wrapper; every analysis failure is answered with 400.
#[derive(Debug)]
pub struct AnalyzeFailure(pub AnalyzeError);

impl From<AnalyzeError> for AnalyzeFailure {
    fn from(err: AnalyzeError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AnalyzeFailure {
    fn into_response(self) -> Response {
        tracing::warn!(kind = self.0.kind(), error = %self.0, "Image analysis failed");
        (
            StatusCode::BAD_REQUEST,
            Json(DescriptionResponse::from_error(&self.0)),
        )
            .into_response()
    }
}
