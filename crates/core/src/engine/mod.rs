//! Conversion engine: the idempotent per-file decision pipeline.
//!
//! For every discovered file the engine classifies by extension, then for
//! audio files decides skip/convert via the ledger and a live probe,
//! executes the conversion through the encoder (with atomic in-place
//! replacement in replace mode), and records outcomes in a run summary and
//! the persistent ledger. Repeated runs over an unchanged tree converge to
//! zero conversions.

mod error;
mod runner;
mod types;

pub use error::EngineError;
pub use runner::ConversionEngine;
pub use types::{
    FailedFile, FileCategory, RunRequest, RunSummary, AUDIO_EXTENSIONS, SIDECAR_EXTENSIONS,
};
