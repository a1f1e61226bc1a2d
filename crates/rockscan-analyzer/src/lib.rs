//! Rockscan Analysis Client
//!
//! Sends a captured still to a hosted multimodal model and validates the
//! structured reply into an [`AnalysisResult`](rockscan_domain::AnalysisResult).
//!
//! # Architecture
//!
//! ```text
//! EncodedImage + mode/tier/basin → PromptBuilder ─┐
//!                                  response_schema ┴→ VisionProvider → parse → AnalysisResult
//! ```
//!
//! # Failure Model
//!
//! - `TransportError`: endpoint unreachable, rate limited, or timed out
//! - `MalformedResponse`: empty body, invalid JSON, missing field, wrong
//!   type, or score outside [0, 1]
//! - `Unauthorized`: missing or rejected credential
//!
//! No partial result is ever returned.
//!
//! # Example Usage
//!
//! ```no_run
//! use rockscan_analyzer::{Analyzer, AnalyzerConfig};
//! use rockscan_domain::{AccessTier, BasinId, EncodedImage, OperatingMode};
//! use rockscan_llm::{GeminiConfig, GeminiProvider};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = GeminiProvider::from_env(GeminiConfig::default())?;
//! let analyzer = Analyzer::new(provider, AnalyzerConfig::default());
//!
//! let still = EncodedImage::jpeg(std::fs::read("sample.jpg")?);
//! let result = analyzer
//!     .analyze(&still, OperatingMode::Field, AccessTier::Student, BasinId::Swat.basin())
//!     .await?;
//!
//! println!("{} ({:.0}%)", result.identification, result.confidence.percent());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod analyzer;
mod config;
mod error;
mod parser;
mod prompt;
mod schema;

#[cfg(test)]
mod tests;

pub use analyzer::Analyzer;
pub use config::AnalyzerConfig;
pub use error::AnalysisError;
pub use parser::parse_analysis_response;
pub use prompt::{PromptBuilder, GRAIN_SIZE_CLASSES, MOHS_SCALE};
pub use schema::{response_schema, REQUIRED_FIELDS};
