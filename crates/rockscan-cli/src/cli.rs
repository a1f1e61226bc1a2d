//! CLI command definitions and argument parsing.

use clap::{ArgAction, Parser, Subcommand};
use rockscan_domain::{AccessTier, BasinId, OperatingMode};
use std::path::PathBuf;

/// Rockscan - identify rock samples from a camera still.
#[derive(Debug, Parser)]
#[command(name = "rockscan")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "ROCKSCAN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Rendered report (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (identification only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze a single image file
    Scan(ScanArgs),

    /// Enter an interactive scanning session
    Repl(ReplArgs),

    /// List the regional basin catalog
    Basins,

    /// Print the response schema sent to the model
    Schema,
}

/// Arguments for the scan command.
#[derive(Debug, Parser)]
pub struct ScanArgs {
    /// Image file to analyze
    pub image: PathBuf,

    /// Imaging mode
    #[arg(short, long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Access tier
    #[arg(short, long, value_enum)]
    pub tier: Option<TierArg>,

    /// Regional basin context (e.g. SWAT)
    #[arg(short, long, value_parser = parse_basin)]
    pub basin: Option<BasinId>,
}

/// Arguments for the repl command.
#[derive(Debug, Default, Parser)]
pub struct ReplArgs {
    /// Image file or directory of frames to use as the camera
    #[arg(short, long)]
    pub device: Option<PathBuf>,
}

/// Imaging mode argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ModeArg {
    /// Macro view in the field
    Field,
    /// Thin section in the lab
    Lab,
}

/// Access tier argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum TierArg {
    /// Educational depth
    Student,
    /// Professional depth
    Researcher,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<ModeArg> for OperatingMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Field => OperatingMode::Field,
            ModeArg::Lab => OperatingMode::Lab,
        }
    }
}

impl From<TierArg> for AccessTier {
    fn from(tier: TierArg) -> Self {
        match tier {
            TierArg::Student => AccessTier::Student,
            TierArg::Researcher => AccessTier::Researcher,
        }
    }
}

fn parse_basin(s: &str) -> Result<BasinId, String> {
    BasinId::parse(s).ok_or_else(|| {
        format!(
            "unknown basin '{}' (run 'rockscan basins' for the catalog)",
            s
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand() {
        let cli = Cli::parse_from(["rockscan"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_scan_command() {
        let cli = Cli::parse_from([
            "rockscan", "scan", "sample.jpg", "--mode", "lab", "--tier", "researcher", "-b",
            "hunza",
        ]);
        match cli.command {
            Some(Command::Scan(args)) => {
                assert_eq!(args.image, PathBuf::from("sample.jpg"));
                assert!(matches!(args.mode, Some(ModeArg::Lab)));
                assert!(matches!(args.tier, Some(TierArg::Researcher)));
                assert_eq!(args.basin, Some(BasinId::Hunza));
            }
            _ => panic!("Expected Scan command"),
        }
    }

    #[test]
    fn test_unknown_basin_rejected() {
        let result = Cli::try_parse_from(["rockscan", "scan", "x.jpg", "--basin", "atlantis"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["rockscan", "repl", "--device", "frames/", "-vv", "--no-color"]);
        assert_eq!(cli.verbose, 2);
        assert!(cli.no_color);
        match cli.command {
            Some(Command::Repl(args)) => assert_eq!(args.device, Some(PathBuf::from("frames/"))),
            _ => panic!("Expected Repl command"),
        }
    }

    #[test]
    fn test_mode_conversion() {
        let mode: OperatingMode = ModeArg::Lab.into();
        assert_eq!(mode, OperatingMode::Lab);
        let tier: AccessTier = TierArg::Researcher.into();
        assert_eq!(tier, AccessTier::Researcher);
    }
}
