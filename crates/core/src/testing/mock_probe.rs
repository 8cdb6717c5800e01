//! Mock media probe for testing.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::probe::{AudioSignature, MediaProbe, ProbeError};

/// Mock implementation of the MediaProbe trait.
///
/// Returns pre-configured signatures per path; unknown paths probe as fully
/// unknown. Paths registered via `fail_for` return a probe error, which the
/// engine must treat as "needs conversion".
#[derive(Debug, Clone, Default)]
pub struct MockProbe {
    signatures: Arc<RwLock<HashMap<PathBuf, AudioSignature>>>,
    failing_paths: Arc<RwLock<HashSet<PathBuf>>>,
    probed: Arc<RwLock<Vec<PathBuf>>>,
}

impl MockProbe {
    /// Create a new mock probe.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the signature returned for a path.
    pub async fn set_signature(&self, path: impl AsRef<Path>, signature: AudioSignature) {
        self.signatures
            .write()
            .await
            .insert(path.as_ref().to_path_buf(), signature);
    }

    /// Make probes of the given path fail.
    pub async fn fail_for(&self, path: impl AsRef<Path>) {
        self.failing_paths
            .write()
            .await
            .insert(path.as_ref().to_path_buf());
    }

    /// Paths probed so far, in order.
    pub async fn probed_paths(&self) -> Vec<PathBuf> {
        self.probed.read().await.clone()
    }

    /// Number of probe invocations.
    pub async fn probe_count(&self) -> usize {
        self.probed.read().await.len()
    }
}

#[async_trait]
impl MediaProbe for MockProbe {
    fn name(&self) -> &str {
        "mock"
    }

    async fn probe(&self, path: &Path) -> Result<AudioSignature, ProbeError> {
        self.probed.write().await.push(path.to_path_buf());

        if self.failing_paths.read().await.contains(path) {
            return Err(ProbeError::malformed("simulated probe failure"));
        }

        Ok(self
            .signatures
            .read()
            .await
            .get(path)
            .cloned()
            .unwrap_or_else(AudioSignature::unknown))
    }

    async fn validate(&self) -> Result<(), ProbeError> {
        Ok(())
    }
}
