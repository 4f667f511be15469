//! CLI-specific error types and exit code mapping

use napwatch_core::error::NapwatchError;
use napwatch_violations_processor::ProcessorError;

/// CLI-specific error type.
///
/// The `exit_code()` method maps errors to standard Unix exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// Some input records could not be turned into events.
    #[error("{failed} of {total} records failed to process")]
    RecordsFailed { failed: usize, total: usize },

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from napwatch-core.
    #[error("{0}")]
    Core(#[from] NapwatchError),

    /// Processor setup error.
    #[error("processor error: {0}")]
    Processor(#[from] ProcessorError),

    /// Logging initialisation failure.
    #[error("logging error: {0}")]
    Logging(#[from] anyhow::Error),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                         |
    /// |------|---------------------------------|
    /// | 0    | Success                         |
    /// | 1    | General / command error         |
    /// | 2    | Configuration error             |
    /// | 3    | Some records failed to process  |
    /// | 10   | IO error                        |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Processor(ProcessorError::Config { .. }) => 2,
            Self::Core(NapwatchError::Config(_)) => 2,
            Self::RecordsFailed { .. } => 3,
            Self::Io(_) => 10,
            Self::Core(NapwatchError::Io(_)) => 10,
            Self::Command(_)
            | Self::JsonSerialize(_)
            | Self::Core(_)
            | Self::Processor(_)
            | Self::Logging(_) => 1,
        }
    }
}
