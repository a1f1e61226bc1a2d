//! Integration tests for the Analyzer

#[cfg(test)]
mod tests {
    use crate::parser::fixtures::LIMESTONE;
    use crate::{AnalysisError, Analyzer, AnalyzerConfig};
    use rockscan_domain::traits::VisionProvider;
    use rockscan_domain::{AccessTier, Basin, BasinId, EncodedImage, OperatingMode};
    use rockscan_llm::{LlmError, MockProvider};

    fn still() -> EncodedImage {
        EncodedImage::jpeg(vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10])
    }

    /// Provider that never answers
    struct StalledProvider;

    impl VisionProvider for StalledProvider {
        type Error = LlmError;

        fn model(&self) -> &str {
            "stalled"
        }

        async fn generate_structured(
            &self,
            _instruction: &str,
            _image: &EncodedImage,
            _schema: &str,
        ) -> Result<String, LlmError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_full_analysis_flow() {
        let llm = MockProvider::new(LIMESTONE);
        let analyzer = Analyzer::new(llm.clone(), AnalyzerConfig::default());

        let result = analyzer
            .analyze(
                &still(),
                OperatingMode::Field,
                AccessTier::Researcher,
                BasinId::Islot.basin(),
            )
            .await
            .unwrap();

        assert_eq!(result.identification, "Nummulitic Limestone");
        assert_eq!(llm.call_count(), 1);

        let instruction = llm.last_instruction().unwrap();
        assert!(instruction.contains("Islamabad/Potwar"));
        assert!(instruction.contains("RESEARCHER"));
    }

    #[tokio::test]
    async fn test_required_fields_independent_of_tier() {
        for tier in [AccessTier::Student, AccessTier::Researcher] {
            let analyzer = Analyzer::new(MockProvider::new(LIMESTONE), AnalyzerConfig::default());
            let result = analyzer
                .analyze(&still(), OperatingMode::Lab, tier, Basin::global())
                .await
                .unwrap();

            assert!(!result.identification.is_empty());
            assert!(!result.mineralogy.is_empty());
            assert!((0.0..=1.0).contains(&result.confidence.value()));
        }
    }

    #[tokio::test]
    async fn test_missing_mineralogy_is_malformed() {
        let mut value: serde_json::Value = serde_json::from_str(LIMESTONE).unwrap();
        value.as_object_mut().unwrap().remove("mineralogy");

        let analyzer = Analyzer::new(MockProvider::new(value.to_string()), AnalyzerConfig::default());
        let result = analyzer
            .analyze(&still(), OperatingMode::Field, AccessTier::Student, Basin::global())
            .await;

        assert!(matches!(result, Err(AnalysisError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn test_empty_body_is_malformed() {
        let analyzer = Analyzer::new(MockProvider::new(""), AnalyzerConfig::default());
        let result = analyzer
            .analyze(&still(), OperatingMode::Field, AccessTier::Student, Basin::global())
            .await;

        assert!(matches!(result, Err(AnalysisError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn test_provider_errors_are_mapped() {
        let llm = MockProvider::new(LIMESTONE);
        llm.push_error(LlmError::Unauthorized("API key not valid".to_string()));
        llm.push_error(LlmError::Communication("connection refused".to_string()));
        let analyzer = Analyzer::new(llm.clone(), AnalyzerConfig::default());

        let first = analyzer
            .analyze(&still(), OperatingMode::Field, AccessTier::Student, Basin::global())
            .await;
        assert!(matches!(first, Err(AnalysisError::Unauthorized(_))));

        let second = analyzer
            .analyze(&still(), OperatingMode::Field, AccessTier::Student, Basin::global())
            .await;
        assert!(matches!(second, Err(AnalysisError::TransportError(_))));

        // Failure leaves nothing behind; the next call starts fresh
        let third = analyzer
            .analyze(&still(), OperatingMode::Field, AccessTier::Student, Basin::global())
            .await;
        assert!(third.is_ok());
        assert_eq!(llm.call_count(), 3);
    }

    #[tokio::test]
    async fn test_identical_stills_make_independent_requests() {
        let llm = MockProvider::new(LIMESTONE);
        let analyzer = Analyzer::new(llm.clone(), AnalyzerConfig::default());
        let image = still();

        for _ in 0..2 {
            analyzer
                .analyze(&image, OperatingMode::Field, AccessTier::Student, Basin::global())
                .await
                .unwrap();
        }
        assert_eq!(llm.call_count(), 2);
    }

    #[tokio::test]
    async fn test_empty_image_never_sent() {
        let llm = MockProvider::new(LIMESTONE);
        let analyzer = Analyzer::new(llm.clone(), AnalyzerConfig::default());

        let result = analyzer
            .analyze(
                &EncodedImage::jpeg(Vec::new()),
                OperatingMode::Field,
                AccessTier::Student,
                Basin::global(),
            )
            .await;

        match result {
            Err(AnalysisError::TransportError(msg)) => {
                assert!(msg.contains("rejected before sending"))
            }
            other => panic!("expected TransportError, got {:?}", other),
        }
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_timeout_is_transport_error() {
        let config = AnalyzerConfig {
            timeout_secs: 1,
            ..AnalyzerConfig::default()
        };
        let analyzer = Analyzer::new(StalledProvider, config);

        let result = analyzer
            .analyze(&still(), OperatingMode::Field, AccessTier::Student, Basin::global())
            .await;

        match result {
            Err(AnalysisError::TransportError(msg)) => assert!(msg.contains("1s")),
            other => panic!("expected TransportError, got {:?}", other),
        }
    }
}
