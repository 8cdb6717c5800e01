//! Probe module for querying a media file's format and bitrate.
//!
//! A probe is read-only: it never decodes content, it asks ffprobe for the
//! container format and the first audio stream's bitrate. Probe failures are
//! non-fatal by contract; the engine treats an unprobeable file as needing
//! conversion.

mod config;
mod error;
mod ffprobe;
mod traits;
mod types;

pub use config::ProbeConfig;
pub use error::ProbeError;
pub use ffprobe::FfprobeClient;
pub use traits::MediaProbe;
pub use types::AudioSignature;
