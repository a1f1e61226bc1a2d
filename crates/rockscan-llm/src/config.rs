//! Configuration for the Gemini provider

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default API base for `generateContent`
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Default multimodal model
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Environment variable holding the API key
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Secondary environment variable checked when the primary one is unset
pub const FALLBACK_API_KEY_ENV: &str = "API_KEY";

/// Configuration for [`GeminiProvider`](crate::GeminiProvider)
///
/// The credential itself is never part of the configuration; only the name of
/// the environment variable that carries it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// API base URL (without the `/{model}:generateContent` suffix)
    pub endpoint: String,

    /// Model identifier
    pub model: String,

    /// HTTP request timeout (seconds)
    pub request_timeout_secs: u64,

    /// Environment variable to read the API key from
    pub api_key_env: String,
}

impl GeminiConfig {
    /// Get the request timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.endpoint.trim().is_empty() {
            return Err("endpoint must not be empty".to_string());
        }
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(format!("endpoint '{}' must be an http(s) URL", self.endpoint));
        }
        if self.model.trim().is_empty() {
            return Err("model must not be empty".to_string());
        }
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be greater than 0".to_string());
        }
        if self.api_key_env.trim().is_empty() {
            return Err("api_key_env must not be empty".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            request_timeout_secs: 60,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
        }
    }
}
