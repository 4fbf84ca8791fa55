//! Upload type and the typed wire format of the `images:annotate` call.
//!
//! Only the fields Vista reads or writes are modelled; unknown response fields
//! (`mid`, `topicality`, other annotation kinds) are ignored by serde.

use serde::{Deserialize, Deserializer, Serialize};

/// Maximum number of labels requested per image.
pub const MAX_LABELS: u32 = 5;

/// An uploaded image, alive for a single request.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Raw file bytes, forwarded unmodified
    pub bytes: Vec<u8>,
    /// Content type declared by the client, if any
    pub content_type: Option<String>,
    /// File name declared by the client, if any
    pub file_name: Option<String>,
}

impl ImageUpload {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            content_type: None,
            file_name: None,
        }
    }

    pub fn with_content_type(mut self, content_type: Option<&str>) -> Self {
        self.content_type = content_type.map(str::to_string);
        self
    }

    pub fn with_file_name(mut self, file_name: Option<&str>) -> Self {
        self.file_name = file_name.map(str::to_string);
        self
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

// --- Request types ---

/// Body of `POST /v1/images:annotate`.
#[derive(Debug, Clone, Serialize)]
pub struct AnnotateRequest {
    pub requests: Vec<AnnotateImageRequest>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnnotateImageRequest {
    pub image: ImageContent,
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageContent {
    /// Base64-encoded image bytes
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: FeatureType,
    pub max_results: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeatureType {
    LabelDetection,
}

// --- Response types ---
//
// The remote may send `null` where a list or scalar is expected. A null is
// read the same as an absent field, and a null list item as a default item.

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AnnotateResponse {
    #[serde(deserialize_with = "null_items_as_default")]
    pub responses: Vec<AnnotateImageResponse>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnnotateImageResponse {
    #[serde(deserialize_with = "null_items_as_default")]
    pub label_annotations: Vec<LabelAnnotation>,
    /// Per-image failure, reported with an otherwise successful HTTP status
    pub error: Option<Status>,
}

/// A single label with the remote model's confidence in `[0.0, 1.0]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelAnnotation {
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub score: f32,
}

impl LabelAnnotation {
    pub fn new(description: &str, score: f32) -> Self {
        Self {
            description: description.to_string(),
            score,
        }
    }
}

/// Google RPC status object.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Status {
    #[serde(deserialize_with = "null_as_default")]
    pub code: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub message: String,
}

/// Error body returned alongside non-2xx statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorEnvelope {
    pub error: Status,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_items_as_default<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    let items = Option::<Vec<Option<T>>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(items.into_iter().map(Option::unwrap_or_default).collect())
}
