//! Schema command implementation.

use crate::error::Result;
use crate::output::Formatter;
use rockscan_analyzer::response_schema;

/// Execute the schema command.
pub fn execute_schema(formatter: &Formatter) -> Result<()> {
    println!("{}", formatter.format_json(&response_schema())?);
    Ok(())
}
