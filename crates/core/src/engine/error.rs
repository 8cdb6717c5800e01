//! Error types for the conversion engine.
//!
//! Only pre-flight problems surface here; per-file failures are isolated
//! into the run summary.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors that abort a run before any file is touched.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Input root is missing or not a directory.
    #[error("input root is not a directory: {path}")]
    InputRootInvalid { path: PathBuf },

    /// Replace mode requires the output root to equal the input root.
    #[error("replace mode requires output root to equal input root ({input} != {output})")]
    RootMismatch { input: PathBuf, output: PathBuf },
}
