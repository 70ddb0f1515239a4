//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Flags
//!
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--skip-tests`: Use existing reports instead of running the tests
//! - `--env-file <path>`: Read overrides from this file instead of `.env`
//! - `--cwd <path>`: Run as if in that directory
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::Parser;
use std::path::PathBuf;

/// Faultline - run the test suite and file an issue for every failure
#[derive(Parser, Debug)]
#[command(name = "faultline")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Skip the test command and report on existing results
    #[arg(long)]
    pub skip_tests: bool,

    /// Environment override file (default: .env in the project root)
    #[arg(long, value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    /// Run as if faultline was started in this directory
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}
