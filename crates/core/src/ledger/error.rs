//! Error types for the ledger module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while persisting the ledger snapshot.
///
/// Load-side problems are not errors by contract: a missing or corrupt
/// snapshot reads as an empty ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Failed to serialize the ledger to JSON.
    #[error("failed to serialize ledger: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Failed to write the temporary snapshot file.
    #[error("failed to write ledger snapshot at {path}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to rename the temporary snapshot over the target.
    #[error("failed to replace ledger snapshot at {path}")]
    ReplaceFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
