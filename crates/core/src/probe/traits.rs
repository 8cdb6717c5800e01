//! Trait definitions for the probe module.

use async_trait::async_trait;
use std::path::Path;

use super::error::ProbeError;
use super::types::AudioSignature;

/// A read-only query of a media file's container format and bitrate.
#[async_trait]
pub trait MediaProbe: Send + Sync {
    /// Returns the name of this probe implementation.
    fn name(&self) -> &str;

    /// Probes a media file. Callers treat any error as "unknown" and
    /// fail open toward converting the file.
    async fn probe(&self, path: &Path) -> Result<AudioSignature, ProbeError>;

    /// Validates that the probe tool is available and ready.
    async fn validate(&self) -> Result<(), ProbeError>;
}
