//! Core Analyzer implementation

use crate::config::AnalyzerConfig;
use crate::error::AnalysisError;
use crate::parser::parse_analysis_response;
use crate::prompt::PromptBuilder;
use crate::schema::response_schema;
use rockscan_domain::traits::VisionProvider;
use rockscan_domain::{AccessTier, AnalysisResult, Basin, EncodedImage, OperatingMode};
use rockscan_llm::LlmError;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// The Analyzer turns a captured still into a validated geological report
///
/// Each call is a single round trip: one request, no retry, no caching.
/// Submitting the same still twice makes two independent requests.
pub struct Analyzer<P>
where
    P: VisionProvider<Error = LlmError>,
{
    provider: Arc<P>,
    config: AnalyzerConfig,
    schema: String,
}

impl<P> Clone for Analyzer<P>
where
    P: VisionProvider<Error = LlmError>,
{
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            config: self.config.clone(),
            schema: self.schema.clone(),
        }
    }
}

impl<P> Analyzer<P>
where
    P: VisionProvider<Error = LlmError> + Send + Sync,
{
    /// Create a new Analyzer
    pub fn new(provider: P, config: AnalyzerConfig) -> Self {
        Self {
            provider: Arc::new(provider),
            config,
            schema: response_schema().to_string(),
        }
    }

    /// Configuration in use
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Model identifier of the underlying provider
    pub fn model(&self) -> &str {
        self.provider.model()
    }

    /// Analyze a still under the given session parameters
    pub async fn analyze(
        &self,
        image: &EncodedImage,
        mode: OperatingMode,
        tier: AccessTier,
        basin: &Basin,
    ) -> Result<AnalysisResult, AnalysisError> {
        if image.is_empty() {
            return Err(AnalysisError::TransportError(
                "image rejected before sending: empty payload".to_string(),
            ));
        }
        if image.len() > self.config.max_image_bytes {
            return Err(AnalysisError::TransportError(format!(
                "image rejected before sending: {} bytes (max: {})",
                image.len(),
                self.config.max_image_bytes
            )));
        }

        info!(
            "Analyzing {} byte still (mode {}, tier {}, basin {}) with {}",
            image.len(),
            mode,
            tier,
            basin.id,
            self.provider.model()
        );

        let instruction = PromptBuilder::new(mode, tier, basin).build();
        debug!("Instruction length: {} chars", instruction.len());

        let start = Instant::now();
        let response = timeout(
            self.config.timeout(),
            self.provider
                .generate_structured(&instruction, image, &self.schema),
        )
        .await
        .map_err(|_| {
            warn!(
                "Analysis timed out after {}s",
                self.config.timeout().as_secs()
            );
            AnalysisError::TransportError(format!(
                "no response within {}s",
                self.config.timeout().as_secs()
            ))
        })?
        .map_err(|e| {
            warn!("Analysis request failed: {}", e);
            AnalysisError::from(e)
        })?;

        debug!(
            "Response: {} chars in {}ms",
            response.len(),
            start.elapsed().as_millis()
        );

        let result = parse_analysis_response(&response)?;

        info!(
            "Identified '{}' ({}, confidence {:.2})",
            result.identification,
            result.rock_type,
            result.confidence.value()
        );

        Ok(result)
    }
}
