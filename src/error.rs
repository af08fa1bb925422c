//! Error handling for Sonify
//!
//! Every failure in the pipeline is fatal for the current render: nothing is
//! retried and no partial audio file is ever written.

use thiserror::Error;

/// Result type alias for Sonify operations
pub type Result<T> = std::result::Result<T, SonifyError>;

/// Main error type for Sonify operations
#[derive(Error, Debug)]
pub enum SonifyError {
    // Input Errors
    #[error("Cannot read image {path}: {source}")]
    ImageRead {
        path: String,
        #[source]
        source: image::ImageError,
    },

    // Parameter Errors
    #[error("Invalid parameter '{param}': {value} (expected {expected})")]
    InvalidParameter {
        param: String,
        value: String,
        expected: String,
    },

    #[error("Invalid configuration: {reason}")]
    Config { reason: String },

    // Signal Errors
    #[error("Composite signal is silent: nothing to normalize")]
    EmptySignal,

    // Audio I/O Errors
    #[error("Cannot write audio to {path}: {source}")]
    AudioWrite {
        path: String,
        #[source]
        source: hound::Error,
    },

    #[error("Cannot read audio from {path}: {source}")]
    AudioRead {
        path: String,
        #[source]
        source: hound::Error,
    },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SonifyError {
    /// Shorthand for building an `InvalidParameter` error
    pub fn invalid_parameter(
        param: impl Into<String>,
        value: impl ToString,
        expected: impl Into<String>,
    ) -> Self {
        SonifyError::InvalidParameter {
            param: param.into(),
            value: value.to_string(),
            expected: expected.into(),
        }
    }

    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            SonifyError::ImageRead { .. } => "IMAGE_READ",
            SonifyError::InvalidParameter { .. } => "INVALID_PARAMETER",
            SonifyError::Config { .. } => "INVALID_CONFIG",
            SonifyError::EmptySignal => "EMPTY_SIGNAL",
            SonifyError::AudioWrite { .. } => "AUDIO_WRITE",
            SonifyError::AudioRead { .. } => "AUDIO_READ",
            SonifyError::Io(_) => "IO_ERROR",
            SonifyError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            SonifyError::ImageRead { .. } => vec![
                "Check the image path is correct",
                "Make sure the download step finished writing the file",
                "Convert the image to PNG or JPEG",
            ],
            SonifyError::InvalidParameter { .. } => vec![
                "Frequencies, durations and sample rates must be positive",
                "Run 'sonify init-config' to see valid defaults",
            ],
            SonifyError::Config { .. } => vec![
                "Regenerate the file with 'sonify init-config'",
                "The 'strategy' field must be 'palette' or 'column_scan'",
            ],
            SonifyError::EmptySignal => vec![
                "The image produced no audible tones",
                "Disable the high-pass threshold or the contrast curve",
                "Try a longer output duration",
            ],
            SonifyError::AudioWrite { .. } => vec![
                "Check the output directory exists and is writable",
                "Free up disk space",
            ],
            _ => vec![],
        }
    }
}
