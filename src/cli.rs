//! Command-line interface.
//!
//! One positional argument, the endpoint file. Wrong argument counts are
//! reported with [`USAGE`] and exit code 1.

use std::path::PathBuf;

use clap::Parser;
use clap::error::ErrorKind;

/// Usage line printed for a missing or extra argument.
pub const USAGE: &str = "Usage: vigil <config_file_path>";

/// Vigil - HTTP availability monitor
#[derive(Parser, Debug)]
#[command(name = "vigil", version, about, long_about = None)]
pub struct Cli {
    /// Path to the YAML endpoint file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,
}

/// What to do with a parse failure.
#[derive(Debug)]
pub enum CliExit {
    /// `--help` or `--version`: let clap print and exit 0.
    Clap(clap::Error),
    /// Wrong arguments: print [`USAGE`] and exit 1.
    Usage,
}

impl Cli {
    /// Parse `args` (including the program name).
    pub fn parse_args<I, T>(args: I) -> Result<Self, CliExit>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::try_parse_from(args).map_err(|e| match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => CliExit::Clap(e),
            _ => CliExit::Usage,
        })
    }
}
