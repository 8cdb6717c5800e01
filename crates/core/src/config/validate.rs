use super::{types::Config, ConfigError};

/// Validate a loaded configuration before the run starts.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.encoder.ffmpeg_path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "encoder.ffmpeg_path must not be empty".to_string(),
        ));
    }
    if config.probe.ffprobe_path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "probe.ffprobe_path must not be empty".to_string(),
        ));
    }
    if config.encoder.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "encoder.timeout_secs must be greater than zero".to_string(),
        ));
    }
    if config.probe.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "probe.timeout_secs must be greater than zero".to_string(),
        ));
    }
    if config.ledger.path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "ledger.path must not be empty".to_string(),
        ));
    }
    Ok(())
}
