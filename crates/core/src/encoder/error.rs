//! Error types for the encoder module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while running the external encoder.
#[derive(Debug, Error)]
pub enum EncoderError {
    /// FFmpeg binary not found.
    #[error("ffmpeg not found at path: {path}")]
    FfmpegNotFound { path: PathBuf },

    /// The encoder exited with a non-zero status.
    #[error("encode failed: {reason}")]
    EncodeFailed {
        reason: String,
        stderr: Option<String>,
    },

    /// The encoder ran past the configured timeout and was killed.
    #[error("encode timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// I/O error while spawning or waiting on the encoder.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EncoderError {
    /// Creates a new encode failed error with captured stderr.
    pub fn encode_failed(reason: impl Into<String>, stderr: Option<String>) -> Self {
        Self::EncodeFailed {
            reason: reason.into(),
            stderr,
        }
    }

    /// Diagnostic text suitable for the run summary.
    pub fn diagnostic(&self) -> String {
        match self {
            Self::EncodeFailed {
                reason,
                stderr: Some(stderr),
            } if !stderr.trim().is_empty() => format!("{}: {}", reason, stderr.trim()),
            other => other.to_string(),
        }
    }
}
