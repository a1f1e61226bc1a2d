//! Rockscan CLI library.
//!
//! Argument parsing, configuration, report rendering and the interactive
//! session behind the `rockscan` binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod repl;
pub mod view;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
