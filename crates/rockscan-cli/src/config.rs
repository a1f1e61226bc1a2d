//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use rockscan_analyzer::AnalyzerConfig;
use rockscan_domain::{AccessTier, BasinId, CaptureConstraints, Facing, OperatingMode};
use rockscan_llm::GeminiConfig;
use rockscan_session::ScanSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Defaults for new sessions
    #[serde(default)]
    pub defaults: Defaults,

    /// Remote model
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Analysis client
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Camera
    #[serde(default)]
    pub capture: CaptureSettings,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// Command history size
    #[serde(default = "default_history_size")]
    pub history_size: usize,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Rendered report and tables
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

/// Session defaults, by name (e.g. `mode = "lab"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Defaults {
    /// Imaging mode
    #[serde(default = "default_mode")]
    pub mode: String,

    /// Access tier
    #[serde(default = "default_tier")]
    pub tier: String,

    /// Basin id
    #[serde(default = "default_basin")]
    pub basin: String,
}

/// Camera settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureSettings {
    /// Image file or directory used as the camera in the REPL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<PathBuf>,

    /// Preferred facing ("environment" or "user")
    #[serde(default = "default_facing")]
    pub facing: String,

    /// Ideal frame width
    #[serde(default = "default_width")]
    pub ideal_width: u32,

    /// Ideal frame height
    #[serde(default = "default_height")]
    pub ideal_height: u32,

    /// JPEG quality (1-100)
    #[serde(default = "default_quality")]
    pub jpeg_quality: u8,
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        Ok(base_dir()?.join("config.toml"))
    }

    /// Load configuration from the default path, creating it on first run.
    pub fn load() -> Result<Self> {
        Self::load_or_create(&Self::path()?)
    }

    /// Load configuration from `path`, or defaults if absent.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `path`, writing defaults there first if absent.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            match config.save_to(path) {
                Ok(()) => info!("Wrote default configuration to {}", path.display()),
                Err(e) => warn!("Could not write {}: {}", path.display(), e),
            }
            return Ok(config);
        }
        Self::load_from(path)
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Check every section.
    pub fn validate(&self) -> Result<()> {
        self.gemini
            .validate()
            .map_err(|e| CliError::Config(format!("[gemini] {}", e)))?;
        self.analyzer
            .validate()
            .map_err(|e| CliError::Config(format!("[analyzer] {}", e)))?;
        self.capture.constraints()?;
        self.defaults.scan_settings()?;
        Ok(())
    }
}

impl Defaults {
    /// Parse into session settings.
    pub fn scan_settings(&self) -> Result<ScanSettings> {
        let mode = OperatingMode::parse(&self.mode)
            .ok_or_else(|| CliError::Config(format!("[defaults] unknown mode '{}'", self.mode)))?;
        let tier = AccessTier::parse(&self.tier)
            .ok_or_else(|| CliError::Config(format!("[defaults] unknown tier '{}'", self.tier)))?;
        let basin = BasinId::parse(&self.basin).ok_or_else(|| {
            CliError::Config(format!("[defaults] unknown basin '{}'", self.basin))
        })?;
        Ok(ScanSettings { mode, tier, basin })
    }
}

impl CaptureSettings {
    /// Parse into capture constraints.
    pub fn constraints(&self) -> Result<CaptureConstraints> {
        let facing = Facing::parse(&self.facing).ok_or_else(|| {
            CliError::Config(format!("[capture] unknown facing '{}'", self.facing))
        })?;
        let constraints = CaptureConstraints {
            facing,
            ideal_width: self.ideal_width,
            ideal_height: self.ideal_height,
            jpeg_quality: self.jpeg_quality,
        };
        constraints
            .validate()
            .map_err(|e| CliError::Config(format!("[capture] {}", e)))?;
        Ok(constraints)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
            history_size: 1000,
        }
    }
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            tier: default_tier(),
            basin: default_basin(),
        }
    }
}

impl Default for CaptureSettings {
    fn default() -> Self {
        let constraints = CaptureConstraints::default();
        Self {
            device: None,
            facing: constraints.facing.as_str().to_string(),
            ideal_width: constraints.ideal_width,
            ideal_height: constraints.ideal_height,
            jpeg_quality: constraints.jpeg_quality,
        }
    }
}

/// `~/.rockscan`
pub fn base_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
    Ok(home.join(".rockscan"))
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_history_size() -> usize {
    1000
}

fn default_mode() -> String {
    OperatingMode::default().as_str().to_lowercase()
}

fn default_tier() -> String {
    AccessTier::default().as_str().to_lowercase()
}

fn default_basin() -> String {
    BasinId::default().as_str().to_string()
}

fn default_facing() -> String {
    Facing::default().as_str().to_string()
}

fn default_width() -> u32 {
    CaptureConstraints::default().ideal_width
}

fn default_height() -> u32 {
    CaptureConstraints::default().ideal_height
}

fn default_quality() -> u8 {
    CaptureConstraints::default().jpeg_quality
}
