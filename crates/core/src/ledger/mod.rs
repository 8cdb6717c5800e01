//! Conversion ledger: durable record of prior conversion outcomes.
//!
//! The ledger maps absolute source paths to the format/bitrate they were
//! last brought to, so repeated runs over the same tree skip completed work.
//! It is loaded once at run start, mutated in memory, and written back once
//! as a whole-file snapshot (temp file + rename). One run owns the ledger
//! exclusively; concurrent runs over the same tree are unsupported.

mod error;
mod store;
mod types;

pub use error::LedgerError;
pub use store::JsonLedgerStore;
pub use types::{Ledger, LedgerEntry, LedgerStatus};
