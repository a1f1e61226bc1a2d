//! Rockscan CLI - identify rock samples from a camera still.

use clap::Parser;
use rockscan_cli::commands;
use rockscan_cli::repl;
use rockscan_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> rockscan_cli::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        None => repl::run_repl(Default::default(), &config, &formatter).await?,
        Some(Command::Repl(args)) => repl::run_repl(args, &config, &formatter).await?,
        Some(Command::Scan(args)) => commands::execute_scan(args, &config, &formatter).await?,
        Some(Command::Basins) => commands::execute_basins(&config, &formatter)?,
        Some(Command::Schema) => commands::execute_schema(&formatter)?,
    }

    Ok(())
}

/// Log to stderr so reports on stdout stay clean.
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}
