//! Cloud Vision label-detection translator.
//!
//! Turns an upload into an `images:annotate` request, sends it, and turns the
//! answer into a [`Description`]. One request, one outbound call, no retries.

use super::render::Description;
use super::types::{
    AnnotateImageRequest, AnnotateRequest, AnnotateResponse, ErrorEnvelope, Feature,
    FeatureType, ImageContent, ImageUpload, MAX_LABELS,
};
use super::ImageAnalyzer;
use crate::config::VisionConfig;
use crate::error::{AnalyzeError, AnalyzeResult};
use async_trait::async_trait;
use base64::Engine;
use std::error::Error as StdError;
use std::time::Instant;

/// Standard (padded) base64 of the upload's raw bytes.
pub fn encode(upload: &ImageUpload) -> String {
    base64::engine::general_purpose::STANDARD.encode(&upload.bytes)
}

/// Build a single-image label-detection request.
pub fn build_request(base64_image: String) -> AnnotateRequest {
    AnnotateRequest {
        requests: vec![AnnotateImageRequest {
            image: ImageContent {
                content: base64_image,
            },
            features: vec![Feature {
                kind: FeatureType::LabelDetection,
                max_results: MAX_LABELS,
            }],
        }],
    }
}

/// Parse a raw annotate response body into a description.
///
/// Only the first response entry is read. A missing or empty label list is
/// not an error.
pub fn parse(raw: &str) -> AnalyzeResult<Description> {
    let response: AnnotateResponse =
        serde_json::from_str(raw).map_err(|e| AnalyzeError::Parse(e.to_string()))?;

    let Some(first) = response.responses.into_iter().next() else {
        return Ok(Description::NoLabels);
    };

    if let Some(status) = &first.error {
        tracing::warn!(
            code = status.code,
            message = %status.message,
            "Vision API reported an image-level error"
        );
    }

    Ok(Description::from_labels(first.label_annotations))
}

/// Client for the `images:annotate` endpoint.
pub struct VisionTranslator {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl VisionTranslator {
    /// Create a translator for the configured endpoint with an already
    /// resolved API key.
    pub fn new(config: &VisionConfig, api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.endpoint.trim().to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST the payload and return the raw response body.
    pub async fn call(&self, payload: &AnnotateRequest) -> AnalyzeResult<String> {
        let resp = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .header("Content-Type", "application/json")
            .json(payload)
            .send()
            .await
            .map_err(|e| AnalyzeError::Network(describe_transport_error(e)))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| AnalyzeError::Network(describe_transport_error(e)))?;

        if !status.is_success() {
            return Err(AnalyzeError::Remote {
                status: status.as_u16(),
                message: remote_message(&text, status),
            });
        }

        Ok(text)
    }
}

#[async_trait]
impl ImageAnalyzer for VisionTranslator {
    fn name(&self) -> &str {
        "google-vision"
    }

    async fn analyze(&self, upload: &ImageUpload) -> AnalyzeResult<Description> {
        let start = Instant::now();
        tracing::debug!(
            bytes = upload.len(),
            content_type = upload.content_type.as_deref().unwrap_or("-"),
            "Sending image to Vision API"
        );

        let payload = build_request(encode(upload));
        let raw = self.call(&payload).await?;
        let description = parse(&raw)?;

        tracing::info!(
            labels = description.labels().len(),
            latency_ms = start.elapsed().as_millis() as u64,
            "Vision API labels received"
        );
        Ok(description)
    }
}

/// Flatten a reqwest error and its sources into one line.
///
/// The URL is dropped first: it carries the API key as a query parameter.
fn describe_transport_error(err: reqwest::Error) -> String {
    let err = err.without_url();
    let mut message = err.to_string();
    let mut source = StdError::source(&err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Pick the most useful message out of a non-2xx response body.
fn remote_message(body: &str, status: reqwest::StatusCode) -> String {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        if !envelope.error.message.is_empty() {
            return envelope.error.message;
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        status.canonical_reason().unwrap_or("unknown error").to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vision::render::NO_LABELS_MESSAGE;
    use crate::vision::types::LabelAnnotation;

    #[test]
    fn test_encode_round_trip() {
        let bytes: Vec<u8> = (0..=255u8).chain([0xFF, 0xD8, 0xFF, 0xE0]).collect();
        let upload = ImageUpload::new(bytes.clone());
        let encoded = encode(&upload);
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(&encoded)
            .unwrap();
        assert_eq!(decoded, bytes);
    }

    #[test]
    fn test_encode_is_padded_standard_alphabet() {
        assert_eq!(encode(&ImageUpload::new(vec![0xFBu8, 0xFF])), "+/8=");
        assert_eq!(encode(&ImageUpload::new(Vec::<u8>::new())), "");
    }

    #[test]
    fn test_build_request_caps_labels() {
        let request = build_request("AAAA".to_string());
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["requests"].as_array().unwrap().len(), 1);
        assert_eq!(value["requests"][0]["image"]["content"], "AAAA");
        assert_eq!(value["requests"][0]["features"][0]["type"], "LABEL_DETECTION");
        assert_eq!(value["requests"][0]["features"][0]["maxResults"], 5);
    }

    #[test]
    fn test_parse_empty_labels() {
        let description = parse(r#"{"responses":[{"labelAnnotations":[]}]}"#).unwrap();
        assert_eq!(description.render(), NO_LABELS_MESSAGE);
    }

    #[test]
    fn test_parse_missing_labels_and_responses() {
        assert_eq!(parse(r#"{"responses":[{}]}"#).unwrap(), Description::NoLabels);
        assert_eq!(parse(r#"{"responses":[]}"#).unwrap(), Description::NoLabels);
        assert_eq!(parse("{}").unwrap(), Description::NoLabels);
    }

    #[test]
    fn test_parse_null_labels_and_responses() {
        let no_labels = [
            r#"{"responses":[{"labelAnnotations":null}]}"#,
            r#"{"responses":null}"#,
            r#"{"responses":[null]}"#,
        ];
        for raw in no_labels {
            assert_eq!(parse(raw).unwrap().render(), NO_LABELS_MESSAGE, "{raw}");
        }
    }

    #[test]
    fn test_parse_null_label_fields_render_defaults() {
        let raw = r#"{"responses":[{"labelAnnotations":[
            {"description":"cat","score":null},
            {"description":null,"score":0.5}
        ]}]}"#;
        assert_eq!(
            parse(raw).unwrap().render(),
            "Descrição da imagem:\n- cat (confidence: 0.00%)\n-  (confidence: 50.00%)\n"
        );
    }

    #[test]
    fn test_parse_single_label() {
        let description =
            parse(r#"{"responses":[{"labelAnnotations":[{"description":"cat","score":0.97}]}]}"#)
                .unwrap();
        assert!(description.render().contains("- cat (confidence: 97.00%)"));
    }

    #[test]
    fn test_parse_reads_only_first_response() {
        let raw = r#"{"responses":[
            {"labelAnnotations":[{"description":"dog","score":0.9},{"description":"pet","score":0.8}]},
            {"labelAnnotations":[{"description":"car","score":0.99}]}
        ]}"#;
        let description = parse(raw).unwrap();
        assert_eq!(
            description.labels(),
            &[LabelAnnotation::new("dog", 0.9), LabelAnnotation::new("pet", 0.8)]
        );
    }

    #[test]
    fn test_parse_image_level_error_yields_no_labels() {
        let raw = r#"{"responses":[{"error":{"code":3,"message":"Bad image data."}}]}"#;
        assert_eq!(parse(raw).unwrap(), Description::NoLabels);
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        let err = parse("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, AnalyzeError::Parse(_)));
    }

    #[test]
    fn test_parse_rejects_wrong_shape() {
        let err = parse(r#"{"responses":"nope"}"#).unwrap_err();
        assert!(matches!(err, AnalyzeError::Parse(_)));
    }

    #[test]
    fn test_remote_message_prefers_envelope() {
        let body = r#"{"error":{"code":403,"message":"The request is missing a valid API key.","status":"PERMISSION_DENIED"}}"#;
        assert_eq!(
            remote_message(body, reqwest::StatusCode::FORBIDDEN),
            "The request is missing a valid API key."
        );
        assert_eq!(
            remote_message("  upstream down ", reqwest::StatusCode::BAD_GATEWAY),
            "upstream down"
        );
        assert_eq!(
            remote_message("", reqwest::StatusCode::SERVICE_UNAVAILABLE),
            "Service Unavailable"
        );
    }

    #[test]
    fn test_translator_trims_endpoint() {
        let config = VisionConfig {
            endpoint: " http://localhost:9000/v1/images:annotate ".to_string(),
            api_key: String::new(),
        };
        let translator = VisionTranslator::new(&config, "secret");
        assert_eq!(translator.endpoint(), "http://localhost:9000/v1/images:annotate");
        assert_eq!(translator.name(), "google-vision");
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error_without_key() {
        let config = VisionConfig {
            endpoint: "http://127.0.0.1:59999/v1/images:annotate".to_string(),
            api_key: String::new(),
        };
        let translator = VisionTranslator::new(&config, "super-secret-key");
        let err = translator
            .analyze(&ImageUpload::new(vec![1u8, 2, 3]))
            .await
            .unwrap_err();
        assert!(matches!(err, AnalyzeError::Network(_)));
        assert!(!err.to_string().contains("super-secret-key"));
    }
}
