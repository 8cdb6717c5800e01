//! FFmpeg-based encoder implementation.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tokio::time::{timeout, Duration};
use tracing::debug;

use super::config::EncoderConfig;
use super::error::EncoderError;
use super::traits::Encoder;
use super::types::{Bitrate, EncodeJob};

/// How much captured stderr to keep in failure diagnostics.
const STDERR_EXCERPT_LIMIT: usize = 2048;

/// FFmpeg-based encoder implementation.
pub struct FfmpegEncoder {
    config: EncoderConfig,
}

impl FfmpegEncoder {
    /// Creates a new FFmpeg encoder with the given configuration.
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }

    /// Creates an encoder with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(EncoderConfig::default())
    }

    /// Builds the ffmpeg argument list for one encode.
    ///
    /// `-map_metadata 0` carries every source tag across; `-id3v2_version 3`
    /// keeps the tags readable by older players.
    fn build_args(&self, input: &Path, output: &Path, bitrate: Bitrate) -> Vec<String> {
        let mut args = vec![
            "-y".to_string(), // Overwrite output
            "-i".to_string(),
            input.to_string_lossy().to_string(),
            "-b:a".to_string(),
            bitrate.as_str().to_string(),
            "-map_metadata".to_string(),
            "0".to_string(),
            "-id3v2_version".to_string(),
            "3".to_string(),
            "-loglevel".to_string(),
            self.config.ffmpeg_log_level.clone(),
        ];

        args.extend(self.config.extra_ffmpeg_args.iter().cloned());
        args.push(output.to_string_lossy().to_string());
        args
    }
}

#[async_trait]
impl Encoder for FfmpegEncoder {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn encode(&self, job: EncodeJob) -> Result<(), EncoderError> {
        let args = self.build_args(&job.input_path, &job.output_path, job.bitrate);
        debug!(input = %job.input_path.display(), "running ffmpeg {}", args.join(" "));

        let child = Command::new(&self.config.ffmpeg_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    EncoderError::FfmpegNotFound {
                        path: self.config.ffmpeg_path.clone(),
                    }
                } else {
                    EncoderError::Io(e)
                }
            })?;

        let timeout_duration = Duration::from_secs(self.config.timeout_secs);
        let output = match timeout(timeout_duration, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(EncoderError::Io(e)),
            // Dropping the wait future drops the child; kill_on_drop reaps it.
            Err(_) => {
                return Err(EncoderError::Timeout {
                    timeout_secs: self.config.timeout_secs,
                })
            }
        };

        if !output.status.success() {
            let mut stderr = String::from_utf8_lossy(&output.stderr).to_string();
            if stderr.len() > STDERR_EXCERPT_LIMIT {
                stderr.truncate(STDERR_EXCERPT_LIMIT);
            }
            return Err(EncoderError::encode_failed(
                format!("ffmpeg exited with code {:?}", output.status.code()),
                if stderr.trim().is_empty() {
                    None
                } else {
                    Some(stderr)
                },
            ));
        }

        // ffmpeg can exit zero without producing output for some arg mistakes
        if !job.output_path.exists() {
            return Err(EncoderError::encode_failed("output file not created", None));
        }

        Ok(())
    }

    async fn validate(&self) -> Result<(), EncoderError> {
        let result = Command::new(&self.config.ffmpeg_path)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(EncoderError::FfmpegNotFound {
                    path: self.config.ffmpeg_path.clone(),
                })
            }
            Err(e) => Err(EncoderError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_build_args_shape() {
        let encoder = FfmpegEncoder::with_defaults();
        let args = encoder.build_args(
            Path::new("/music/a.flac"),
            Path::new("/out/a.mp3"),
            Bitrate::Kbps192,
        );

        assert_eq!(args[0], "-y");
        assert!(args.contains(&"-b:a".to_string()));
        assert!(args.contains(&"192k".to_string()));
        assert!(args.contains(&"-map_metadata".to_string()));
        assert!(args.contains(&"-id3v2_version".to_string()));
        assert!(args.contains(&"3".to_string()));
        assert_eq!(args.last().unwrap(), "/out/a.mp3");

        // input comes right after -i and before the output
        let i_pos = args.iter().position(|a| a == "-i").unwrap();
        assert_eq!(args[i_pos + 1], "/music/a.flac");
    }

    #[test]
    fn test_build_args_extra_args_before_output() {
        let config = EncoderConfig {
            extra_ffmpeg_args: vec!["-threads".to_string(), "2".to_string()],
            ..Default::default()
        };
        let encoder = FfmpegEncoder::new(config);
        let args = encoder.build_args(
            Path::new("in.wav"),
            Path::new("out.ogg"),
            Bitrate::Kbps128,
        );

        let threads_pos = args.iter().position(|a| a == "-threads").unwrap();
        assert!(threads_pos < args.len() - 1);
        assert_eq!(args.last().unwrap(), "out.ogg");
    }

    #[tokio::test]
    async fn test_validate_missing_binary() {
        let encoder = FfmpegEncoder::new(
            EncoderConfig::default()
                .with_ffmpeg_path(PathBuf::from("/nonexistent/ffmpeg-binary")),
        );
        let result = encoder.validate().await;
        assert!(matches!(result, Err(EncoderError::FfmpegNotFound { .. })));
    }

    #[tokio::test]
    async fn test_encode_missing_binary() {
        let encoder = FfmpegEncoder::new(
            EncoderConfig::default()
                .with_ffmpeg_path(PathBuf::from("/nonexistent/ffmpeg-binary")),
        );
        let job = EncodeJob {
            input_path: PathBuf::from("/tmp/in.flac"),
            output_path: PathBuf::from("/tmp/out.mp3"),
            bitrate: Bitrate::Kbps192,
        };
        let result = encoder.encode(job).await;
        assert!(matches!(result, Err(EncoderError::FfmpegNotFound { .. })));
    }
}
