// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `pycify`.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "pycify",
    version,
    about = "Replace Python sources with their compiled .pyc files.",
    long_about = None
)]
pub struct CliArgs {
    /// Folder to convert .py files in.
    #[arg(value_name = "DIRECTORY")]
    pub directory: PathBuf,

    /// Folder to output .pyc files to.
    ///
    /// Defaults to replacing the existing `.py` files.
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Version of Python to compile your project with (e.g. `3.12`).
    #[arg(long, value_name = "VERSION")]
    pub python_version: Option<String>,

    /// List of file patterns to ignore when compiling.
    ///
    /// Default: `setup.py`.
    #[arg(long, num_args = 1.., value_name = "PATTERN")]
    pub ignore_file_patterns: Option<Vec<String>>,

    /// Interpreter to use when no version is pinned.
    ///
    /// Falls back to `[runtime].python`, then `PYCIFY_PYTHON`, then `python3`.
    #[arg(long, value_name = "PATH")]
    pub python: Option<PathBuf>,

    /// Delete `__pycache__` folders even if unrelated files remain in them.
    #[arg(long)]
    pub force_remove_cache: bool,

    /// Never download standalone interpreters.
    #[arg(long)]
    pub no_download: bool,

    /// Path to a config file (TOML).
    ///
    /// Default: `pycify.toml` in DIRECTORY, if it exists.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PYCIFY_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print the resolved settings without compiling or moving anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
