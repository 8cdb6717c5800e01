//! Pre-flight dependency check for the external tools.
//!
//! Missing tools are fatal before any file is touched. Installation is the
//! operator's job; the error text only points the way.

use std::path::PathBuf;
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

use crate::config::Config;

/// A required external tool is unavailable.
#[derive(Debug, Error)]
pub enum DepsError {
    #[error("ffmpeg not found at '{path}'; install ffmpeg or set encoder.ffmpeg_path")]
    FfmpegMissing { path: PathBuf },

    #[error("ffprobe not found at '{path}'; install ffmpeg (ffprobe ships with it) or set probe.ffprobe_path")]
    FfprobeMissing { path: PathBuf },
}

/// Verifies ffmpeg and ffprobe respond to `-version`.
pub async fn ensure_dependencies(config: &Config) -> Result<(), DepsError> {
    check_tool(&config.encoder.ffmpeg_path)
        .await
        .map_err(|_| DepsError::FfmpegMissing {
            path: config.encoder.ffmpeg_path.clone(),
        })?;
    check_tool(&config.probe.ffprobe_path)
        .await
        .map_err(|_| DepsError::FfprobeMissing {
            path: config.probe.ffprobe_path.clone(),
        })?;
    debug!("external tool check passed");
    Ok(())
}

async fn check_tool(path: &PathBuf) -> Result<(), std::io::Error> {
    Command::new(path)
        .arg("-version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map(|_| ())
}
