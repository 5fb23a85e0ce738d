use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};

/// Shape of each JSON document written to stdout.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `{"temperature_3": 27.2, ...}`
    #[default]
    Flat,
    /// `{"fields": [{"channel": 3, "type": 103, ...}]}`
    Fields,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DecoderConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Output envelope (flat, fields)
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Exit at the first payload that fails to decode
    #[serde(default)]
    pub fail_fast: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl DecoderConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(Environment::with_prefix("LPP"))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure tests run serially and don't interfere with each other
    static TEST_LOCK: Mutex<()> = Mutex::new(());

    fn clear_env() {
        // SAFETY: callers hold TEST_LOCK
        unsafe {
            std::env::remove_var("LPP_LOG_LEVEL");
            std::env::remove_var("LPP_OUTPUT_FORMAT");
            std::env::remove_var("LPP_FAIL_FAST");
        }
    }

    #[test]
    fn test_default_config() {
        let _lock = TEST_LOCK.lock().unwrap();
        clear_env();

        let config = DecoderConfig::from_env().unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.output_format, OutputFormat::Flat);
        assert!(!config.fail_fast);
    }

    #[test]
    fn test_custom_config() {
        let _lock = TEST_LOCK.lock().unwrap();

        // SAFETY: Test runs with mutex lock to prevent concurrent env access
        unsafe {
            std::env::set_var("LPP_LOG_LEVEL", "debug");
            std::env::set_var("LPP_OUTPUT_FORMAT", "fields");
            std::env::set_var("LPP_FAIL_FAST", "true");
        }

        let config = DecoderConfig::from_env().unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.output_format, OutputFormat::Fields);
        assert!(config.fail_fast);

        clear_env();
    }

    #[test]
    fn test_invalid_output_format() {
        let _lock = TEST_LOCK.lock().unwrap();

        // SAFETY: Test runs with mutex lock to prevent concurrent env access
        unsafe {
            std::env::set_var("LPP_OUTPUT_FORMAT", "xml");
        }

        assert!(DecoderConfig::from_env().is_err());

        clear_env();
    }
}
