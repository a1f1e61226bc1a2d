//! Error types for the Analysis Client

use rockscan_llm::LlmError;
use thiserror::Error;

/// Errors that can occur during analysis
///
/// None of these are fatal to a session; callers offer a retry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Endpoint unreachable, timed out, or refused the request
    #[error("Transport error: {0}")]
    TransportError(String),

    /// Response did not match the result schema
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Missing or rejected credential
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

impl AnalysisError {
    /// Short machine-readable name of the variant
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::TransportError(_) => "TransportError",
            AnalysisError::MalformedResponse(_) => "MalformedResponse",
            AnalysisError::Unauthorized(_) => "Unauthorized",
        }
    }
}

impl From<LlmError> for AnalysisError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::Unauthorized(msg) => AnalysisError::Unauthorized(msg),
            LlmError::InvalidResponse(msg) => AnalysisError::MalformedResponse(msg),
            LlmError::InvalidRequest(msg) => {
                AnalysisError::TransportError(format!("request rejected: {}", msg))
            }
            LlmError::Communication(msg) => AnalysisError::TransportError(msg),
            LlmError::RateLimitExceeded => {
                AnalysisError::TransportError("rate limit exceeded".to_string())
            }
            LlmError::ModelNotAvailable(model) => {
                AnalysisError::TransportError(format!("model not available: {}", model))
            }
        }
    }
}

impl From<serde_json::Error> for AnalysisError {
    fn from(e: serde_json::Error) -> Self {
        AnalysisError::MalformedResponse(format!("JSON parse error: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_llm_error_mapping() {
        assert_eq!(
            AnalysisError::from(LlmError::Unauthorized("no key".into())).kind(),
            "Unauthorized"
        );
        assert_eq!(
            AnalysisError::from(LlmError::InvalidResponse("empty".into())).kind(),
            "MalformedResponse"
        );
        assert_eq!(
            AnalysisError::from(LlmError::Communication("refused".into())).kind(),
            "TransportError"
        );
        assert_eq!(
            AnalysisError::from(LlmError::RateLimitExceeded).kind(),
            "TransportError"
        );
        assert_eq!(
            AnalysisError::from(LlmError::ModelNotAvailable("m".into())).kind(),
            "TransportError"
        );
    }
}
