//! Error handling for wavebuf
//!
//! Every fallible operation returns [`WavebufError`]. Errors are reported at
//! the call that triggers them and never leave a buffer half-written.

use thiserror::Error;

/// Result type alias for wavebuf operations
pub type Result<T> = std::result::Result<T, WavebufError>;

/// Main error type for wavebuf operations
#[derive(Error, Debug)]
pub enum WavebufError {
    // Access Errors
    #[error("Sample index {index} out of range (buffer holds {len} samples)")]
    IndexOutOfRange { index: usize, len: usize },

    // Construction Errors
    #[error("Invalid PCM data: {reason}")]
    Format { reason: String },

    #[error("Invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    // Container Errors
    #[error("Failed to decode {path}: {reason}")]
    Decode {
        path: String,
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Failed to encode {path}: {reason}")]
    Encode {
        path: String,
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // Payload Errors
    #[error("Payload too large: needs {needed} samples, {available} available")]
    PayloadTooLarge { needed: usize, available: usize },

    #[error("Corrupt payload: {reason}")]
    CorruptPayload { reason: String },

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl WavebufError {
    pub(crate) fn format(reason: impl Into<String>) -> Self {
        WavebufError::Format {
            reason: reason.into(),
        }
    }

    pub(crate) fn config(reason: impl Into<String>) -> Self {
        WavebufError::InvalidConfiguration {
            reason: reason.into(),
        }
    }

    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            WavebufError::IndexOutOfRange { .. } => "INDEX_OUT_OF_RANGE",
            WavebufError::Format { .. } => "FORMAT_ERROR",
            WavebufError::InvalidConfiguration { .. } => "INVALID_CONFIGURATION",
            WavebufError::Decode { .. } => "DECODE_ERROR",
            WavebufError::Encode { .. } => "ENCODE_ERROR",
            WavebufError::PayloadTooLarge { .. } => "PAYLOAD_TOO_LARGE",
            WavebufError::CorruptPayload { .. } => "CORRUPT_PAYLOAD",
            WavebufError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if the caller can retry with corrected input
    ///
    /// Container errors come from the external codec and are passed through
    /// as-is; wavebuf never retries them itself.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            WavebufError::IndexOutOfRange { .. }
                | WavebufError::InvalidConfiguration { .. }
                | WavebufError::PayloadTooLarge { .. }
        )
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            WavebufError::IndexOutOfRange { .. } => vec![
                "Flat sample indices run from 0 to sample_count() - 1",
                "Remember that channels are interleaved: frame f, channel c is f * channels + c",
            ],
            WavebufError::Format { .. } => vec![
                "The byte length must be a whole number of frames",
                "Check the channel count and bits per sample against the data",
            ],
            WavebufError::InvalidConfiguration { .. } => vec![
                "Supported widths: 8, 16, 24, 32 and 64 bits",
                "Building from i32 samples needs a sample size of at least 4 bytes",
                "The sample rate must be positive",
            ],
            WavebufError::Decode { .. } => vec![
                "Check the file is an uncompressed integer PCM WAVE file",
                "The file may be corrupted - try re-exporting from source",
            ],
            WavebufError::Encode { .. } => vec![
                "Check the output directory exists and is writable",
                "WAVE files need an integer sample rate and at most 32 bits per sample",
            ],
            WavebufError::PayloadTooLarge { .. } => vec![
                "Use a longer carrier or a smaller payload",
                "Start embedding at a lower sample offset",
            ],
            WavebufError::CorruptPayload { .. } => vec![
                "Extract from the same offset used when embedding",
                "The carrier may have been re-encoded since embedding",
            ],
            _ => vec![],
        }
    }
}
