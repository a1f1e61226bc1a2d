//! Gemini Provider Implementation
//!
//! Calls the Gemini REST `generateContent` operation directly: one text part
//! carrying the instruction, one inline base64 image part, and a response
//! schema that forces a JSON body.
//!
//! Exactly one HTTP request is made per call. Retrying is the caller's choice.
//!
//! # Examples
//!
//! ```no_run
//! use rockscan_llm::{GeminiConfig, GeminiProvider};
//!
//! let provider = GeminiProvider::from_env(GeminiConfig::default()).unwrap();
//! ```

use crate::config::{GeminiConfig, FALLBACK_API_KEY_ENV};
use crate::LlmError;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use reqwest::{Client, StatusCode};
use rockscan_domain::traits::VisionProvider;
use rockscan_domain::EncodedImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Header carrying the API key
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini API provider for multimodal structured generation
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
    api_key: Option<String>,
}

impl GeminiProvider {
    /// Create a new provider with an explicit credential
    ///
    /// A missing or blank key is accepted here; requests then fail with
    /// [`LlmError::Unauthorized`] without touching the network.
    pub fn new(config: GeminiConfig, api_key: Option<String>) -> Result<Self, LlmError> {
        config.validate().map_err(LlmError::InvalidRequest)?;

        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| LlmError::Communication(format!("Failed to build HTTP client: {}", e)))?;

        let api_key = api_key.filter(|key| !key.trim().is_empty());

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    /// Create a provider reading the credential from the environment
    ///
    /// Checks `config.api_key_env` first, then `API_KEY`.
    pub fn from_env(config: GeminiConfig) -> Result<Self, LlmError> {
        let api_key = std::env::var(&config.api_key_env)
            .or_else(|_| std::env::var(FALLBACK_API_KEY_ENV))
            .ok();
        if api_key.is_none() {
            warn!(
                "No API key found in ${} or ${}; analysis requests will be rejected",
                config.api_key_env, FALLBACK_API_KEY_ENV
            );
        }
        Self::new(config, api_key)
    }

    /// Whether a credential is configured
    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// Full URL of the `generateContent` operation for the configured model
    pub fn endpoint_url(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }

    async fn send_request(
        &self,
        api_key: &str,
        body: &GenerateContentRequest,
    ) -> Result<String, LlmError> {
        let url = self.endpoint_url();
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(map_http_error(status, &body_text, &self.config.model));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        extract_text_response(parsed)
    }
}

impl VisionProvider for GeminiProvider {
    type Error = LlmError;

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn generate_structured(
        &self,
        instruction: &str,
        image: &EncodedImage,
        schema: &str,
    ) -> Result<String, Self::Error> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| LlmError::Unauthorized("no API key configured".to_string()))?;

        let request = build_request(instruction, image, schema)?;
        self.send_request(api_key, &request).await
    }
}

/// Assemble the `generateContent` body
fn build_request(
    instruction: &str,
    image: &EncodedImage,
    schema: &str,
) -> Result<GenerateContentRequest, LlmError> {
    if image.is_empty() {
        return Err(LlmError::InvalidRequest("image payload is empty".to_string()));
    }

    let response_schema: serde_json::Value = serde_json::from_str(schema)
        .map_err(|e| LlmError::InvalidRequest(format!("Response schema is not JSON: {}", e)))?;

    Ok(GenerateContentRequest {
        contents: vec![Content {
            role: "user".to_string(),
            parts: vec![
                Part::Text {
                    text: instruction.to_string(),
                },
                Part::InlineData {
                    inline_data: InlineDataPayload {
                        mime_type: image.mime_type.clone(),
                        data: BASE64_STANDARD.encode(&image.bytes),
                    },
                },
            ],
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json".to_string(),
            response_schema,
        },
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineDataPayload,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineDataPayload {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: serde_json::Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

fn extract_text_response(response: GenerateContentResponse) -> Result<String, LlmError> {
    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(LlmError::InvalidResponse(format!(
            "Request blocked by provider: {}",
            reason
        )));
    }

    let text: String = response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(LlmError::InvalidResponse(
            "Response contained no text candidates".to_string(),
        ));
    }
    Ok(text)
}

fn map_http_error(status: StatusCode, body: &str, model: &str) -> LlmError {
    let (status_text, message) = serde_json::from_str::<ErrorWrapper>(body)
        .map(|wrapper| {
            (
                wrapper.error.status.unwrap_or_default(),
                wrapper.error.message.unwrap_or_else(|| body.to_string()),
            )
        })
        .unwrap_or_else(|_| (String::new(), body.to_string()));

    // Gemini reports a bad key as 400 INVALID_ARGUMENT with this marker.
    let bad_key = message.contains("API key not valid") || body.contains("API_KEY_INVALID");

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LlmError::Unauthorized(message),
        StatusCode::BAD_REQUEST if bad_key => LlmError::Unauthorized(message),
        StatusCode::NOT_FOUND => LlmError::ModelNotAvailable(model.to_string()),
        StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimitExceeded,
        _ if status_text.is_empty() => {
            LlmError::Communication(format!("HTTP {}: {}", status, message))
        }
        _ => LlmError::Communication(format!("HTTP {} {}: {}", status, status_text, message)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image() -> EncodedImage {
        EncodedImage::jpeg(vec![0xFF, 0xD8, 0xFF, 0xE0])
    }

    #[test]
    fn test_endpoint_url() {
        let mut config = GeminiConfig::default();
        config.endpoint = "https://example.test/v1beta/models/".to_string();
        config.model = "gemini-test".to_string();
        let provider = GeminiProvider::new(config, Some("k".to_string())).unwrap();
        assert_eq!(
            provider.endpoint_url(),
            "https://example.test/v1beta/models/gemini-test:generateContent"
        );
    }

    #[test]
    fn test_blank_key_is_no_credential() {
        let provider = GeminiProvider::new(GeminiConfig::default(), Some("  ".to_string())).unwrap();
        assert!(!provider.has_credential());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = GeminiConfig::default();
        config.model.clear();
        assert!(matches!(
            GeminiProvider::new(config, None),
            Err(LlmError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_request_body_shape() {
        let request = build_request("Identify this rock", &image(), r#"{"type": "OBJECT"}"#).unwrap();
        let json = serde_json::to_value(&request).unwrap();

        let parts = &json["contents"][0]["parts"];
        assert_eq!(parts[0]["text"], "Identify this rock");
        assert_eq!(parts[1]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(parts[1]["inlineData"]["data"], BASE64_STANDARD.encode([0xFF, 0xD8, 0xFF, 0xE0]));
        assert_eq!(json["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(json["generationConfig"]["responseSchema"]["type"], "OBJECT");
    }

    #[test]
    fn test_request_rejects_bad_schema_and_empty_image() {
        assert!(matches!(
            build_request("x", &image(), "not json"),
            Err(LlmError::InvalidRequest(_))
        ));
        assert!(matches!(
            build_request("x", &EncodedImage::jpeg(Vec::new()), "{}"),
            Err(LlmError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"text": "{\"a\":"}, {"text": "1}"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text_response(response).unwrap(), r#"{"a":1}"#);
    }

    #[test]
    fn test_extract_text_empty_candidates() {
        let response: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert!(matches!(
            extract_text_response(response),
            Err(LlmError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_extract_text_blocked_prompt() {
        let response: GenerateContentResponse =
            serde_json::from_str(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#).unwrap();
        match extract_text_response(response) {
            Err(LlmError::InvalidResponse(msg)) => assert!(msg.contains("SAFETY")),
            other => panic!("Expected InvalidResponse, got {:?}", other),
        }
    }

    #[test]
    fn test_http_error_classification() {
        let bad_key = r#"{"error": {"code": 400, "message": "API key not valid. Please pass a valid API key.", "status": "INVALID_ARGUMENT"}}"#;
        assert!(matches!(
            map_http_error(StatusCode::BAD_REQUEST, bad_key, "m"),
            LlmError::Unauthorized(_)
        ));
        assert!(matches!(
            map_http_error(StatusCode::FORBIDDEN, "denied", "m"),
            LlmError::Unauthorized(_)
        ));
        assert!(matches!(
            map_http_error(StatusCode::NOT_FOUND, "", "gemini-x"),
            LlmError::ModelNotAvailable(m) if m == "gemini-x"
        ));
        assert!(matches!(
            map_http_error(StatusCode::TOO_MANY_REQUESTS, "", "m"),
            LlmError::RateLimitExceeded
        ));

        let unavailable = r#"{"error": {"message": "overloaded", "status": "UNAVAILABLE"}}"#;
        match map_http_error(StatusCode::SERVICE_UNAVAILABLE, unavailable, "m") {
            LlmError::Communication(msg) => {
                assert!(msg.contains("UNAVAILABLE"));
                assert!(msg.contains("overloaded"));
            }
            other => panic!("Expected Communication error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_request() {
        let provider = GeminiProvider::new(GeminiConfig::default(), None).unwrap();
        let result = provider.generate_structured("x", &image(), "{}").await;
        assert!(matches!(result, Err(LlmError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint() {
        let mut config = GeminiConfig::default();
        config.endpoint = "http://127.0.0.1:9/v1beta/models".to_string();
        config.request_timeout_secs = 5;
        let provider = GeminiProvider::new(config, Some("key".to_string())).unwrap();

        let result = provider.generate_structured("x", &image(), "{}").await;
        match result {
            Err(LlmError::Communication(_)) => {} // Expected
            other => panic!("Expected Communication error, got {:?}", other),
        }
    }
}
