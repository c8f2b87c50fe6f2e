use crate::application::config::models::Config;
use crate::application::config::parser::{parse_config, parse_config_file};
use crate::application::config::validator::validate_config;
use crate::common::error::Result;
use crate::common::logger::Logger;

/// Load and validate configuration from file
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file path
    pub fn load(path: &str) -> Result<Config> {
        let config = parse_config_file(path)?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from string (useful for testing)
    pub fn load_from_str(content: &str) -> Result<Config> {
        let config = parse_config(content)?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Set the global log level from a validated configuration.
    pub fn apply_logging(config: &Config) {
        if let Some(level) = config.level() {
            Logger::set_level(level);
        }
    }
}
