//! FFprobe-based media probe implementation.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tokio::time::{timeout, Duration};

use super::config::ProbeConfig;
use super::error::ProbeError;
use super::traits::MediaProbe;
use super::types::AudioSignature;

/// FFprobe-based probe implementation.
pub struct FfprobeClient {
    config: ProbeConfig,
}

impl FfprobeClient {
    /// Creates a new ffprobe client with the given configuration.
    pub fn new(config: ProbeConfig) -> Self {
        Self { config }
    }

    /// Creates a client with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ProbeConfig::default())
    }

    /// Parses ffprobe JSON output into an `AudioSignature`.
    ///
    /// Only the first stream with `codec_type == "audio"` is consulted.
    fn parse_probe_output(output: &str) -> Result<AudioSignature, ProbeError> {
        #[derive(Deserialize)]
        struct ProbeOutput {
            format: ProbeFormat,
            #[serde(default)]
            streams: Vec<ProbeStream>,
        }

        #[derive(Deserialize)]
        struct ProbeFormat {
            format_name: String,
        }

        #[derive(Deserialize)]
        struct ProbeStream {
            codec_type: String,
            bit_rate: Option<String>,
        }

        let probe: ProbeOutput = serde_json::from_str(output)
            .map_err(|e| ProbeError::malformed(format!("failed to parse ffprobe output: {}", e)))?;

        let audio_stream = probe
            .streams
            .iter()
            .find(|s| s.codec_type == "audio")
            .ok_or(ProbeError::NoAudioStream)?;

        let format = probe
            .format
            .format_name
            .split(',')
            .next()
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string());

        let bitrate = audio_stream
            .bit_rate
            .as_ref()
            .and_then(|b| b.parse::<u64>().ok())
            .map(|b| format!("{}k", b / 1000));

        Ok(AudioSignature { format, bitrate })
    }
}

#[async_trait]
impl MediaProbe for FfprobeClient {
    fn name(&self) -> &str {
        "ffprobe"
    }

    async fn probe(&self, path: &Path) -> Result<AudioSignature, ProbeError> {
        let child = Command::new(&self.config.ffprobe_path)
            .args([
                "-v",
                "quiet",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
            ])
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ProbeError::FfprobeNotFound {
                        path: self.config.ffprobe_path.clone(),
                    }
                } else {
                    ProbeError::Io(e)
                }
            })?;

        let timeout_duration = Duration::from_secs(self.config.timeout_secs);
        let output = match timeout(timeout_duration, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(ProbeError::Io(e)),
            Err(_) => {
                return Err(ProbeError::Timeout {
                    timeout_secs: self.config.timeout_secs,
                })
            }
        };

        if !output.status.success() {
            return Err(ProbeError::NonZeroExit {
                code: output.status.code(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Self::parse_probe_output(&stdout)
    }

    async fn validate(&self) -> Result<(), ProbeError> {
        let result = Command::new(&self.config.ffprobe_path)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ProbeError::FfprobeNotFound {
                    path: self.config.ffprobe_path.clone(),
                })
            }
            Err(e) => Err(ProbeError::Io(e)),
        }
    }
}
