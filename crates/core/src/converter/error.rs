//! Error types for the converter module.

use thiserror::Error;

/// Errors that can occur during conversion.
#[derive(Debug, Error)]
pub enum ConverterError {
    /// No input file, stream or image was configured.
    #[error("Undefined input")]
    UndefinedInput,

    /// No output file or stream was configured.
    #[error("Undefined output")]
    UndefinedOutput,

    /// Launching or running gif2webp failed.
    ///
    /// The message joins the failure description with whatever the process
    /// wrote to stderr.
    #[error("{reason}. {stderr}")]
    ExecutionFailed { reason: String, stderr: String },

    /// The in-memory animation could not be decoded or re-encoded.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Reading the input stream failed before the process was started.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// `gif2webp -version` printed nothing usable.
    #[error("Failed to parse gif2webp version from output: {output:?}")]
    VersionParse { output: String },
}

impl ConverterError {
    /// Creates an execution failure with the captured stderr text.
    pub fn execution_failed(reason: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::ExecutionFailed {
            reason: reason.into(),
            stderr: stderr.into(),
        }
    }

    /// Whether this error was raised before any process was spawned
    /// because the converter was not fully configured.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::UndefinedInput | Self::UndefinedOutput)
    }

    /// Captured stderr of the failed process, if any.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Self::ExecutionFailed { stderr, .. } => Some(stderr),
            _ => None,
        }
    }
}
