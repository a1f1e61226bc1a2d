//! Basins command implementation.

use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use rockscan_domain::BASINS;

/// Execute the basins command.
pub fn execute_basins(config: &Config, formatter: &Formatter) -> Result<()> {
    let selected = config.defaults.scan_settings()?.basin;
    println!("{}", formatter.format_basins(&BASINS, Some(selected))?);
    Ok(())
}
