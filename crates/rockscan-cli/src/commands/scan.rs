//! Scan command implementation.

use crate::cli::ScanArgs;
use crate::commands::build_analyzer;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use rockscan_analyzer::Analyzer;
use rockscan_domain::traits::VisionProvider;
use rockscan_domain::{AnalysisResult, EncodedImage};
use rockscan_llm::LlmError;
use rockscan_session::{ScanSettings, SessionFailure, SessionState};
use std::fs;
use std::path::Path;
use tracing::info;

/// Execute the scan command.
pub async fn execute_scan(args: ScanArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let settings = resolve_settings(&args, config)?;
    let analyzer = build_analyzer(config)?;

    let result = match run_scan(&args.image, settings, &analyzer).await {
        Ok(result) => result,
        Err(CliError::Analysis(e)) => {
            eprintln!(
                "{}",
                formatter.format_status(&SessionState::Failed(SessionFailure::Analysis(e.clone())))
            );
            return Err(CliError::Analysis(e));
        }
        Err(e) => return Err(e),
    };

    println!("{}", formatter.format_report(&result, settings.tier)?);
    Ok(())
}

/// Config defaults overridden by any flags given.
pub fn resolve_settings(args: &ScanArgs, config: &Config) -> Result<ScanSettings> {
    let mut settings = config.defaults.scan_settings()?;
    if let Some(mode) = args.mode {
        settings.mode = mode.into();
    }
    if let Some(tier) = args.tier {
        settings.tier = tier.into();
    }
    if let Some(basin) = args.basin {
        settings.basin = basin;
    }
    Ok(settings)
}

/// Load `image` and analyze it once.
pub async fn run_scan<P>(
    image: &Path,
    settings: ScanSettings,
    analyzer: &Analyzer<P>,
) -> Result<AnalysisResult>
where
    P: VisionProvider<Error = LlmError> + Send + Sync,
{
    let still = load_image(image)?;
    info!(
        "Scanning {} ({} bytes) with {}",
        image.display(),
        still.len(),
        analyzer.model()
    );

    let result = analyzer
        .analyze(
            &still,
            settings.mode,
            settings.tier,
            settings.basin.basin(),
        )
        .await?;
    Ok(result)
}

/// Read an image file, typed by its extension.
pub fn load_image(path: &Path) -> Result<EncodedImage> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let mime_type = match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        _ => {
            return Err(CliError::InvalidInput(format!(
                "Unsupported image type: {} (expected jpg, png or webp)",
                path.display()
            )))
        }
    };

    let bytes = fs::read(path)?;
    Ok(EncodedImage {
        mime_type: mime_type.to_string(),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{ModeArg, TierArg};
    use rockscan_analyzer::{AnalysisError, AnalyzerConfig};
    use rockscan_capture::encode_jpeg;
    use rockscan_domain::{AccessTier, BasinId, Frame, OperatingMode};
    use rockscan_llm::MockProvider;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const GRANITE: &str = r#"{
        "identification": "Pink Granite",
        "confidence": 0.88,
        "rockType": "Igneous",
        "mineralogy": ["Orthoclase", "Quartz", "Biotite"],
        "texture": "Phaneritic",
        "physicalProperties": {"hardness": "6.0-7.0", "specificGravity": "2.65", "grainSize": "Coarse"},
        "geologicalAge": "Precambrian",
        "isFossil": false
    }"#;

    fn write_jpeg(dir: &TempDir) -> PathBuf {
        let frame = Frame::new(4, 4, vec![96; 48]).unwrap();
        let still = encode_jpeg(&frame, 85).unwrap();
        let path = dir.path().join("sample.jpg");
        fs::write(&path, &still.bytes).unwrap();
        path
    }

    fn args(image: PathBuf) -> ScanArgs {
        ScanArgs {
            image,
            mode: None,
            tier: None,
            basin: None,
        }
    }

    #[test]
    fn test_settings_from_defaults() {
        let settings = resolve_settings(&args(PathBuf::from("x.jpg")), &Config::default()).unwrap();
        assert_eq!(settings, ScanSettings::default());
    }

    #[test]
    fn test_flags_override_defaults() {
        let mut config = Config::default();
        config.defaults.basin = "hunza".to_string();

        let mut scan = args(PathBuf::from("x.jpg"));
        scan.mode = Some(ModeArg::Lab);
        scan.tier = Some(TierArg::Researcher);

        let settings = resolve_settings(&scan, &config).unwrap();
        assert_eq!(settings.mode, OperatingMode::Lab);
        assert_eq!(settings.tier, AccessTier::Researcher);
        assert_eq!(settings.basin, BasinId::Hunza);
    }

    #[test]
    fn test_load_image_types() {
        let dir = TempDir::new().unwrap();
        let path = write_jpeg(&dir);
        let still = load_image(&path).unwrap();
        assert_eq!(still.mime_type, "image/jpeg");
        assert!(!still.is_empty());

        let png = dir.path().join("sample.PNG");
        fs::write(&png, b"not really a png").unwrap();
        assert_eq!(load_image(&png).unwrap().mime_type, "image/png");

        let text = dir.path().join("notes.txt");
        fs::write(&text, b"hello").unwrap();
        assert!(matches!(load_image(&text), Err(CliError::InvalidInput(_))));

        assert!(matches!(
            load_image(&dir.path().join("missing.jpg")),
            Err(CliError::Io(_))
        ));
    }

    #[tokio::test]
    async fn test_run_scan() {
        let dir = TempDir::new().unwrap();
        let path = write_jpeg(&dir);
        let provider = MockProvider::new(GRANITE);
        let analyzer = Analyzer::new(provider.clone(), AnalyzerConfig::default());

        let settings = ScanSettings {
            mode: OperatingMode::Lab,
            tier: AccessTier::Researcher,
            basin: BasinId::Swat,
        };
        let result = run_scan(&path, settings, &analyzer).await.unwrap();

        assert_eq!(result.identification, "Pink Granite");
        assert_eq!(provider.call_count(), 1);
        let instruction = provider.last_instruction().unwrap();
        assert!(instruction.contains("SWAT"));
        assert!(instruction.contains("RESEARCHER"));
    }

    #[tokio::test]
    async fn test_run_scan_rejected_response() {
        let dir = TempDir::new().unwrap();
        let path = write_jpeg(&dir);
        let provider = MockProvider::new("not json at all");
        let analyzer = Analyzer::new(provider, AnalyzerConfig::default());

        let err = run_scan(&path, ScanSettings::default(), &analyzer)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CliError::Analysis(AnalysisError::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_file_never_sent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.jpg");
        fs::write(&path, b"").unwrap();
        let provider = MockProvider::new(GRANITE);
        let analyzer = Analyzer::new(provider.clone(), AnalyzerConfig::default());

        let err = run_scan(&path, ScanSettings::default(), &analyzer)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CliError::Analysis(AnalysisError::TransportError(_))
        ));
        assert_eq!(provider.call_count(), 0);
    }
}
