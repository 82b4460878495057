//! Error taxonomy for the capture pipeline.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CaptureError>;

/// Fatal conditions of a capture run.
///
/// An interrupted acquisition is not an error; see `AcquisitionStatus`.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Serial source '{port}' unavailable: {source}")]
    SourceUnavailable {
        port: String,
        #[source]
        source: io::Error,
    },

    #[error("Read from serial source failed: {0}")]
    ReadFailure(#[source] io::Error),

    #[error("No samples were acquired, nothing to condition")]
    EmptyBuffer,

    #[error("All {samples} samples are identical, peak is zero after DC removal")]
    ZeroPeak { samples: usize },

    #[error("Failed to encode '{}': {source}", .path.display())]
    EncodeFailure {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },
}

impl CaptureError {
    /// Process exit code for this kind of failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            CaptureError::SourceUnavailable { .. } => 2,
            CaptureError::ReadFailure(_) => 3,
            CaptureError::EmptyBuffer => 4,
            CaptureError::ZeroPeak { .. } => 5,
            CaptureError::EncodeFailure { .. } => 6,
        }
    }
}
