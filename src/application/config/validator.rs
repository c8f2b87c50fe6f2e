use crate::application::config::models::Config;
use crate::common::error::{MuxError, Result};

/// Validate configuration for correctness and consistency
pub fn validate_config(config: &Config) -> Result<()> {
    if config.level().is_none() {
        return Err(MuxError::Config(format!(
            "Unknown log_level '{}'",
            config.log_level
        )));
    }

    if config.max_descriptors == Some(0) {
        return Err(MuxError::Config(
            "max_descriptors must be greater than 0".to_string(),
        ));
    }

    if config.poll_timeout_ms < -1 {
        return Err(MuxError::Config(
            "poll_timeout_ms must be -1 or greater".to_string(),
        ));
    }

    if config.event_capacity == 0 {
        return Err(MuxError::Config(
            "event_capacity must be greater than 0".to_string(),
        ));
    }

    if !config.backend.is_supported() {
        return Err(MuxError::Config(format!(
            "Backend {:?} is not available on this platform",
            config.backend
        )));
    }

    Ok(())
}
