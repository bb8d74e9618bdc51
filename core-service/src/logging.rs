//! Logging bootstrap.
//!
//! Configures `tracing-subscriber` for the gateway. Tokens and household
//! identifiers never reach the log stream: credential types redact their
//! `Debug` output and household ids are logged as a short hash.

use tracing_subscriber::{filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{Result, ServiceError};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable pretty format
    Pretty,
    /// Structured JSON format for machine parsing
    Json,
    /// Compact format for production
    Compact,
}

impl Default for LogFormat {
    fn default() -> Self {
        #[cfg(debug_assertions)]
        return Self::Pretty;

        #[cfg(not(debug_assertions))]
        return Self::Json;
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Base level applied to the gateway's own crates
    pub level: tracing::Level,
    /// Custom filter string (e.g. `core_auth=trace,provider_onedrive=debug`)
    pub filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: tracing::Level::INFO,
            filter: None,
        }
    }
}

impl LoggingConfig {
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_level(mut self, level: tracing::Level) -> Self {
        self.level = level;
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }
}

/// Initialize the logging system.
///
/// Call once during startup; a second call fails because the global
/// subscriber is already set.
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let filter = build_filter(&config)?;
    let registry = tracing_subscriber::registry().with(filter);

    let init_result = match config.format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().flatten_event(true))
            .try_init(),
        LogFormat::Compact => registry
            .with(tracing_subscriber::fmt::layer().compact())
            .try_init(),
    };

    init_result.map_err(|e| ServiceError::Config(format!("Failed to initialize logging: {e}")))
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    let filter_string = if let Some(custom_filter) = &config.filter {
        custom_filter.clone()
    } else {
        // Gateway crates at the configured level, HTTP internals at warn
        let level = config.level.to_string().to_lowercase();
        format!(
            "core_service={level},core_auth={level},provider_onedrive={level},\
             bridge_reqwest={level},hyper=warn,reqwest=warn"
        )
    };

    EnvFilter::try_new(filter_string)
        .map_err(|e| ServiceError::Config(format!("Invalid log filter: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_config_builder() {
        let config = LoggingConfig::default()
            .with_format(LogFormat::Json)
            .with_level(tracing::Level::DEBUG)
            .with_filter("core_auth=trace");

        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.level, tracing::Level::DEBUG);
        assert_eq!(config.filter, Some("core_auth=trace".to_string()));
    }

    #[test]
    fn test_build_default_filter() {
        let config = LoggingConfig::default().with_level(tracing::Level::DEBUG);
        let filter = build_filter(&config).unwrap();
        assert!(filter.to_string().contains("provider_onedrive=debug"));
    }

    #[test]
    fn test_build_filter_rejects_garbage() {
        let config = LoggingConfig::default().with_filter("core_auth=notalevel");
        assert!(build_filter(&config).is_err());
    }
}
