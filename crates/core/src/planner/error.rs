//! Error types for the path planner.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while planning a target location.
#[derive(Debug, Error)]
pub enum PlannerError {
    /// Source path has no parent or no file stem.
    #[error("source path has no usable name: {path}")]
    InvalidSource { path: PathBuf },

    /// Source path does not live under the input root.
    #[error("source path {path} is outside input root {input_root}")]
    OutsideInputRoot { path: PathBuf, input_root: PathBuf },

    /// Failed to create the target directory.
    #[error("failed to create directory: {path}")]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
