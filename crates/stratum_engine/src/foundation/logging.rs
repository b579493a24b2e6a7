//! Logging utilities and structured logging support

use serde::{Deserialize, Serialize};
use std::sync::Once;

pub use log::{debug, error, info, trace, warn};

/// Logger settings carried in the engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `env_logger` filter directives, e.g. `"info,stratum_engine::physics=trace"`.
    /// When absent, `RUST_LOG` is consulted and `info` is the fallback.
    pub filter: Option<String>,
    /// Prefix records with a timestamp
    pub timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: None,
            timestamps: true,
        }
    }
}

static INIT: Once = Once::new();

/// Initialize the logging system with default settings
pub fn init() {
    init_with(&LoggingConfig::default());
}

/// Initialize the logging system.
///
/// Only the first call in a process has any effect.
pub fn init_with(config: &LoggingConfig) {
    INIT.call_once(|| {
        let mut builder =
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
        if let Some(filter) = &config.filter {
            builder.parse_filters(filter);
        }
        if !config.timestamps {
            builder.format_timestamp(None);
        }
        if builder.try_init().is_err() {
            log::debug!("Logger already installed, keeping the existing one");
        }
    });
}
