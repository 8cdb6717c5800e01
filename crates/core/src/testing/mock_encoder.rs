//! Mock encoder for testing.

use async_trait::async_trait;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::encoder::{EncodeJob, Encoder, EncoderError};

/// Mock implementation of the Encoder trait.
///
/// Records every submitted job and writes a small placeholder file to the
/// job's output path, so tests can assert on both the invocations and the
/// resulting tree. Paths registered via `fail_for` fail instead.
#[derive(Debug, Clone, Default)]
pub struct MockEncoder {
    /// Recorded encode jobs, in submission order.
    jobs: Arc<RwLock<Vec<EncodeJob>>>,
    /// Input paths whose encode should fail.
    failing_inputs: Arc<RwLock<HashSet<PathBuf>>>,
}

impl MockEncoder {
    /// Create a new mock encoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded encode jobs.
    pub async fn recorded_jobs(&self) -> Vec<EncodeJob> {
        self.jobs.read().await.clone()
    }

    /// Get the number of encodes performed (including failed ones).
    pub async fn encode_count(&self) -> usize {
        self.jobs.read().await.len()
    }

    /// Make encodes of the given input path fail.
    pub async fn fail_for(&self, input: impl AsRef<Path>) {
        self.failing_inputs
            .write()
            .await
            .insert(input.as_ref().to_path_buf());
    }
}

#[async_trait]
impl Encoder for MockEncoder {
    fn name(&self) -> &str {
        "mock"
    }

    async fn encode(&self, job: EncodeJob) -> Result<(), EncoderError> {
        self.jobs.write().await.push(job.clone());

        if self.failing_inputs.read().await.contains(&job.input_path) {
            return Err(EncoderError::encode_failed(
                "mock encode failure",
                Some("simulated ffmpeg stderr".to_string()),
            ));
        }

        tokio::fs::write(&job.output_path, b"mock encoded audio")
            .await
            .map_err(EncoderError::Io)?;
        Ok(())
    }

    async fn validate(&self) -> Result<(), EncoderError> {
        Ok(())
    }
}
