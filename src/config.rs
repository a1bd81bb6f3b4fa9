//! Bridge configuration
//!
//! Values arrive either as JSON across the FFI boundary or, with the
//! `config-file` feature, from an optional file layered under `LESCAN_*`
//! environment variables.

use crate::BridgeError;
use serde::{Deserialize, Serialize};

/// Version 1 of the configuration schema
pub const CONFIG_VERSION: u32 = 1;

/// Default logcat tag
pub const DEFAULT_LOG_TAG: &str = "LK8000";

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable prefix for `BridgeConfig::load`
pub const ENV_PREFIX: &str = "LESCAN";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub version: u32,
    pub enable_logging: bool,
    pub log_level: Option<String>,
    pub log_tag: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            enable_logging: true,
            log_level: Some(DEFAULT_LOG_LEVEL.to_string()),
            log_tag: DEFAULT_LOG_TAG.to_string(),
        }
    }
}

impl BridgeConfig {
    /// Parse a configuration passed as JSON bytes (missing fields take defaults)
    pub fn from_json(bytes: &[u8]) -> Result<Self, BridgeError> {
        let config: BridgeConfig = serde_json::from_slice(bytes)?;
        config.validate()?;
        Ok(config)
    }

    /// Load defaults, then `path` if given, then `LESCAN_*` environment variables
    #[cfg(feature = "config-file")]
    pub fn load(path: Option<&std::path::Path>) -> Result<Self, BridgeError> {
        let defaults = BridgeConfig::default();
        let mut builder = ::config::Config::builder()
            .set_default("version", i64::from(defaults.version))
            .and_then(|b| b.set_default("enable_logging", defaults.enable_logging))
            .and_then(|b| b.set_default("log_level", DEFAULT_LOG_LEVEL))
            .and_then(|b| b.set_default("log_tag", defaults.log_tag.clone()))
            .map_err(|e| BridgeError::Configuration(e.to_string()))?;

        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path).required(false));
        }

        let config: BridgeConfig = builder
            .add_source(::config::Environment::with_prefix(ENV_PREFIX))
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| BridgeError::Configuration(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), BridgeError> {
        if self.version != CONFIG_VERSION {
            return Err(BridgeError::Configuration(format!(
                "Unsupported config version {} (expected {})",
                self.version, CONFIG_VERSION
            )));
        }
        if self.log_tag.is_empty() {
            return Err(BridgeError::Configuration("log_tag must not be empty".to_string()));
        }
        Ok(())
    }
}
