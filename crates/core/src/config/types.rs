use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::encoder::EncoderConfig;
use crate::probe::ProbeConfig;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub encoder: EncoderConfig,
    #[serde(default)]
    pub probe: ProbeConfig,
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Ledger snapshot location
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LedgerConfig {
    #[serde(default = "default_ledger_path")]
    pub path: PathBuf,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            path: default_ledger_path(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Directory receiving per-run log files.
    #[serde(default = "default_log_dir")]
    pub dir: PathBuf,
    /// Default filter when TUNEPRESS_LOG is unset.
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
            filter: default_filter(),
        }
    }
}

/// Directory containing the running executable, falling back to the current
/// directory. The ledger and log defaults live next to the program, like the
/// program's own files rather than the music tree's.
fn exe_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn default_ledger_path() -> PathBuf {
    exe_dir().join("tunepress-ledger.json")
}

fn default_log_dir() -> PathBuf {
    exe_dir().join("logs")
}

fn default_filter() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_all_sections() {
        let config = Config::default();
        assert_eq!(config.encoder.ffmpeg_path, PathBuf::from("ffmpeg"));
        assert_eq!(config.probe.timeout_secs, 10);
        assert!(config
            .ledger
            .path
            .to_string_lossy()
            .ends_with("tunepress-ledger.json"));
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.encoder.timeout_secs, config.encoder.timeout_secs);
        assert_eq!(parsed.ledger.path, config.ledger.path);
    }
}
