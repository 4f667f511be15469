//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// napwatch -- turn NGINX App Protect syslog lines into security violation events.
///
/// Use `napwatch <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "napwatch", version, about, long_about = None)]
pub struct Cli {
    /// Path to the napwatch.toml configuration file.
    #[arg(short, long, default_value = "napwatch.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Report format for config commands and the processing summary.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported report formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

/// Event encodings accepted by `--output-format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EventEncoding {
    /// Binary protobuf body.
    Protobuf,
    /// JSON text body.
    Json,
}

impl EventEncoding {
    /// Name used in `napwatch.toml`.
    pub fn as_config_value(&self) -> &'static str {
        match self {
            Self::Protobuf => "protobuf",
            Self::Json => "json",
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Process syslog lines and write the resulting records to stdout.
    Process(ProcessArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- process ----

/// Read syslog lines, run them through the processor in batches, print records.
#[derive(Args, Debug)]
pub struct ProcessArgs {
    /// Input file with one syslog line per line (default: stdin).
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Override the event encoding from the config file.
    #[arg(long)]
    pub output_format: Option<EventEncoding>,

    /// Override the number of lines per batch.
    #[arg(long)]
    pub batch_size: Option<usize>,
}

// ---- config ----

/// Manage napwatch configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, processor).
        #[arg(long)]
        section: Option<String>,
    },
}
