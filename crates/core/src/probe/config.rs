//! Configuration for the probe module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the ffprobe-based media probe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Path to ffprobe binary.
    #[serde(default = "default_ffprobe_path")]
    pub ffprobe_path: PathBuf,

    /// Timeout for a single probe in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_ffprobe_path() -> PathBuf {
    PathBuf::from("ffprobe")
}

fn default_timeout() -> u64 {
    10
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            ffprobe_path: default_ffprobe_path(),
            timeout_secs: default_timeout(),
        }
    }
}

impl ProbeConfig {
    /// Sets the ffprobe binary path.
    pub fn with_ffprobe_path(mut self, path: PathBuf) -> Self {
        self.ffprobe_path = path;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ProbeConfig::default();
        assert_eq!(config.ffprobe_path, PathBuf::from("ffprobe"));
        assert_eq!(config.timeout_secs, 10);
    }
}
