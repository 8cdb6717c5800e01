//! Error types for the probe module.
//!
//! Probe failures are never fatal to a run; each variant exists so the
//! engine can log a distinct reason before treating the file as needing
//! conversion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while probing a media file.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// FFprobe binary not found.
    #[error("ffprobe not found at path: {path}")]
    FfprobeNotFound { path: PathBuf },

    /// The probe tool exited with a non-zero status.
    #[error("ffprobe exited with code {code:?}")]
    NonZeroExit { code: Option<i32> },

    /// The probe tool produced output that did not parse as the expected JSON.
    #[error("malformed probe output: {reason}")]
    MalformedOutput { reason: String },

    /// The file has no audio stream.
    #[error("no audio stream found")]
    NoAudioStream,

    /// The probe ran past its bound and was killed.
    #[error("probe timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// I/O error while spawning or waiting on the probe tool.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProbeError {
    /// Creates a malformed output error.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedOutput {
            reason: reason.into(),
        }
    }
}
