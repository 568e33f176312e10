//! CLI module for weapp-cli
//!
//! This module provides the command-line interface for scaffolding, testing and packaging weapps.
//!
//! ## Commands
//!
//! - `init` - Create a new weapp project with a generated test fixture
//! - `test` - Run the weapp against its fixture and show what it printed
//! - `package` - Zip the project for upload, leaving out local-only files
//! - `download-extra` - Install the extended dataset into the data home
//!
//! ## Modules
//!
//! - `commands` - Command implementations
//! - `output` - Console styling
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;
pub mod output;

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use weapp_core::conventions::{DEFAULT_PROJECT_NAME, is_valid_project_name};
use weapp_core::lang::languages::{self, LanguageId};
use weapp_core::lang::toggles;

use crate::config::{DEFAULT_EXTRA_URL, DEFAULT_TIMEOUT_SECS};
use crate::version::WEAPP_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }

    /// A precondition failure, printed as a red `Aborted. ...` line.
    pub fn aborted(reason: &str) -> Self {
        Self::failure(output::aborted(reason))
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// A yes/no option value (`y/n`, `yes/no`, `1/0`, `true/false`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toggle(pub bool);

impl Toggle {
    pub fn enabled(self) -> bool {
        self.0
    }
}

fn parse_toggle(value: &str) -> Result<Toggle, String> {
    toggles::parse(value)
        .map(Toggle)
        .ok_or_else(|| format!("expected y or n, got `{value}`"))
}

fn parse_project_name(value: &str) -> Result<String, String> {
    if is_valid_project_name(value) {
        Ok(value.to_string())
    } else {
        Err(format!("`{value}` is not a folder name (no path separators, `.` or `..`)"))
    }
}

fn parse_language(value: &str) -> Result<LanguageId, String> {
    languages::from_str(value).ok_or_else(|| {
        format!(
            "unsupported language `{value}` (expected one of: {})",
            languages::canonical_spellings().join(", ")
        )
    })
}

/// Scaffold, test and package WeGene weapps
#[derive(Parser, Debug)]
#[command(name = "weapp-cli")]
#[command(version = WEAPP_VERSION)]
#[command(about = "Scaffold, test and package WeGene weapps", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new weapp project in the current directory
    Init(InitArgs),

    /// Run the weapp in the current directory against its test data
    Test {
        /// Seconds to wait for the weapp before killing it
        #[arg(long, value_name = "SECS", env = "WEAPP_TEST_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS)]
        timeout: u64,
    },

    /// Archive the weapp in the current directory for upload
    Package,

    /// Download the extended sample data
    DownloadExtra {
        /// Dataset location
        #[arg(long, value_name = "URL", env = "WEAPP_EXTRA_URL", default_value = DEFAULT_EXTRA_URL)]
        url: String,
    },
}

/// Options for `init`.
#[derive(Args, Debug, Clone)]
pub struct InitArgs {
    /// Project (and folder) name
    #[arg(long, value_name = "NAME", value_parser = parse_project_name, default_value = DEFAULT_PROJECT_NAME)]
    pub project: String,

    /// Language of the weapp
    #[arg(long, value_name = "LANG", value_parser = parse_language, default_value = languages::DEFAULT_SPELLING)]
    pub language: LanguageId,

    /// Include sex in the test data
    #[arg(long, value_name = "y|n", value_parser = parse_toggle, default_value = "y")]
    pub sex: Toggle,

    /// Include age in the test data
    #[arg(long, value_name = "y|n", value_parser = parse_toggle, default_value = "y")]
    pub age: Toggle,

    /// Include ancestry composition in the test data
    #[arg(long, value_name = "y|n", value_parser = parse_toggle, default_value = "y")]
    pub ancestry: Toggle,

    /// Include haplogroups in the test data
    #[arg(long, value_name = "y|n", value_parser = parse_toggle, default_value = "y")]
    pub haplogroup: Toggle,

    /// Include the whole genome in the test data
    #[arg(long, value_name = "y|n", value_parser = parse_toggle, default_value = "y")]
    pub genome: Toggle,

    /// File listing the SNPs (one RSID per line) to include
    #[arg(long = "rsid-file", visible_alias = "rsid_file", value_name = "PATH")]
    pub rsid_file: Option<PathBuf>,

    /// Render weapp output as Markdown into an HTML report
    #[arg(long, value_name = "y|n", value_parser = parse_toggle, default_value = "y")]
    pub markdown: Toggle,
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    let cwd = env::current_dir()
        .map_err(|e| CliError::failure(format!("Error: cannot determine the current directory: {e}")))?;
    tracing::debug!(cwd = %cwd.display(), command = ?cli.command, "executing");

    match cli.command {
        Command::Init(args) => commands::init(&cwd, &args, &crate::config::data_home()),
        Command::Test { timeout } => commands::test(&cwd, timeout),
        Command::Package => commands::package(&cwd),
        Command::DownloadExtra { url } => commands::download_extra(&url, &crate::config::data_home()),
    }
}

// ============================================================================
// Tests
// ============================================================================
