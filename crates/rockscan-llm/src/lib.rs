//! Rockscan Inference Provider Layer
//!
//! Implementations of the `VisionProvider` trait from `rockscan-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `GeminiProvider`: Hosted Gemini `generateContent` integration
//!
//! # Examples
//!
//! ```
//! use rockscan_llm::MockProvider;
//! use rockscan_domain::traits::VisionProvider;
//! use rockscan_domain::EncodedImage;
//!
//! # async fn example() {
//! let provider = MockProvider::new(r#"{"identification": "Basalt"}"#);
//! let image = EncodedImage::jpeg(vec![0xFF, 0xD8]);
//! let result = provider.generate_structured("describe", &image, "{}").await.unwrap();
//! assert!(result.contains("Basalt"));
//! # }
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod gemini;

use rockscan_domain::traits::VisionProvider;
use rockscan_domain::EncodedImage;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

pub use config::GeminiConfig;
pub use gemini::GeminiProvider;

/// Errors that can occur while talking to an inference provider
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Missing or rejected credential
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The request could not be built
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Invalid response from the provider
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),
}

/// Mock provider for deterministic testing
///
/// Returns queued outcomes in order, then falls back to a fixed response.
/// Never makes network calls.
///
/// # Examples
///
/// ```
/// use rockscan_llm::{LlmError, MockProvider};
///
/// let provider = MockProvider::new("{}");
/// provider.push_error(LlmError::RateLimitExceeded);
/// provider.push_response(r#"{"ok": true}"#);
/// assert_eq!(provider.call_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    model: String,
    default_response: String,
    queued: Arc<Mutex<VecDeque<Result<String, LlmError>>>>,
    call_count: Arc<Mutex<usize>>,
    last_instruction: Arc<Mutex<Option<String>>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all requests
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            model: "mock-vision".to_string(),
            default_response: response.into(),
            queued: Arc::new(Mutex::new(VecDeque::new())),
            call_count: Arc::new(Mutex::new(0)),
            last_instruction: Arc::new(Mutex::new(None)),
        }
    }

    /// Queue a response for the next request
    pub fn push_response(&self, response: impl Into<String>) {
        lock(&self.queued).push_back(Ok(response.into()));
    }

    /// Queue an error for the next request
    pub fn push_error(&self, error: LlmError) {
        lock(&self.queued).push_back(Err(error));
    }

    /// Get the number of times the provider was called
    pub fn call_count(&self) -> usize {
        *lock(&self.call_count)
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        *lock(&self.call_count) = 0;
    }

    /// Instruction text of the most recent request
    pub fn last_instruction(&self) -> Option<String> {
        lock(&self.last_instruction).clone()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("{}")
    }
}

impl VisionProvider for MockProvider {
    type Error = LlmError;

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate_structured(
        &self,
        instruction: &str,
        _image: &EncodedImage,
        _schema: &str,
    ) -> Result<String, Self::Error> {
        *lock(&self.call_count) += 1;
        *lock(&self.last_instruction) = Some(instruction.to_string());

        match lock(&self.queued).pop_front() {
            Some(outcome) => outcome,
            None => Ok(self.default_response.clone()),
        }
    }
}

// Poisoning only happens if a test panicked mid-call; the data is still usable.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
