//! Trait definitions for the encoder module.

use async_trait::async_trait;

use super::error::EncoderError;
use super::types::EncodeJob;

/// An encoder that can transcode a single audio file.
///
/// Implementations must preserve all source metadata tags in the output.
#[async_trait]
pub trait Encoder: Send + Sync {
    /// Returns the name of this encoder implementation.
    fn name(&self) -> &str;

    /// Encodes one file according to the job. Success means the output file
    /// exists at exactly `job.output_path`.
    async fn encode(&self, job: EncodeJob) -> Result<(), EncoderError>;

    /// Validates that the encoder is available and ready.
    async fn validate(&self) -> Result<(), EncoderError>;
}
