//! Service configuration
//!
//! Layered from built-in defaults, an optional settings file, and
//! `SCREENING__*` environment variables (e.g. `SCREENING__MODEL__PATH`).

use ::config::{Config, ConfigError, Environment, File};
use feature_encoder::ValidationConfig;
use serde::Deserialize;

use crate::rate_limit::RateLimitConfig;

/// Default settings file, relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "config/default";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub logging: LoggingConfig,
    pub rate_limit: RateLimitConfig,
    /// Accepted answer ranges; defaults match the questionnaire widgets
    #[serde(default)]
    pub validation: ValidationConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    pub addr: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Classifier artifact, `.json` or `.onnx`
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Max level: trace, debug, info, warn or error
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl AppConfig {
    /// Load from the default settings file and environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load from a specific settings file (may be absent) and environment
    pub fn load_from(file: &str) -> Result<Self, ConfigError> {
        let defaults = RateLimitConfig::default();

        Config::builder()
            .set_default("server.addr", "0.0.0.0:8080")?
            .set_default("model.path", "models/diabetes.json")?
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            .set_default("rate_limit.enabled", defaults.enabled)?
            .set_default("rate_limit.per_second", defaults.per_second)?
            .set_default("rate_limit.burst_size", u64::from(defaults.burst_size))?
            .add_source(File::with_name(file).required(false))
            .add_source(
                Environment::with_prefix("SCREENING")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
