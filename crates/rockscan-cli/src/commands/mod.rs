//! Command implementations.

pub mod basins;
pub mod scan;
pub mod schema;

pub use self::basins::execute_basins;
pub use self::scan::execute_scan;
pub use self::schema::execute_schema;

use crate::config::Config;
use crate::error::Result;
use rockscan_analyzer::Analyzer;
use rockscan_llm::GeminiProvider;

/// Build the analysis client from configuration and the environment.
pub fn build_analyzer(config: &Config) -> Result<Analyzer<GeminiProvider>> {
    let provider = GeminiProvider::from_env(config.gemini.clone())?;
    Ok(Analyzer::new(provider, config.analyzer.clone()))
}
