//! Tracing Subscriber Initialization
//!
//! Sets up `tracing-subscriber` with an `EnvFilter` and either JSON output
//! (production) or human-readable output (local development).

use std::str::FromStr;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{ApiError, ApiResult};

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl FromStr for LogFormat {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" | "text" => Ok(Self::Pretty),
            other => Err(ApiError::configuration_error(format!(
                "Invalid MEETUP_LOG_FORMAT: {}",
                other
            ))),
        }
    }
}

/// Telemetry configuration from environment variables.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name attached to startup logs
    pub service_name: String,
    /// Service version
    pub service_version: String,
    /// Environment (production, staging, development)
    pub environment: String,
    /// Log line format
    pub log_format: LogFormat,
    /// Enable metrics collection
    pub metrics_enabled: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: std::env::var("MEETUP_SERVICE_NAME")
                .unwrap_or_else(|_| "meetup-api".to_string()),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            environment: std::env::var("MEETUP_ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
            log_format: std::env::var("MEETUP_LOG_FORMAT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(LogFormat::Json),
            metrics_enabled: std::env::var("MEETUP_METRICS_ENABLED")
                .map(|s| s == "true" || s == "1")
                .unwrap_or(true),
        }
    }
}

/// Initialize the global tracing subscriber.
///
/// Must be called once at startup before any tracing occurs.
pub fn init_tracing(config: &TelemetryConfig) -> ApiResult<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("meetup_api=debug,meetup_storage=debug,tower_http=debug,info")
    });

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).try_init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer().pretty()).try_init(),
    };
    result.map_err(|e| ApiError::internal_error(format!("Failed to init subscriber: {}", e)))?;

    tracing::info!(
        service_name = config.service_name,
        service_version = config.service_version,
        environment = config.environment,
        metrics_enabled = config.metrics_enabled,
        "Telemetry initialized"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EnvVarGuard {
        key: &'static str,
        original: Option<String>,
    }

    impl EnvVarGuard {
        fn set(key: &'static str, value: Option<&str>) -> Self {
            let original = std::env::var(key).ok();
            match value {
                Some(v) => std::env::set_var(key, v),
                None => std::env::remove_var(key),
            }
            Self { key, original }
        }
    }

    impl Drop for EnvVarGuard {
        fn drop(&mut self) {
            match self.original.as_deref() {
                Some(v) => std::env::set_var(self.key, v),
                None => std::env::remove_var(self.key),
            }
        }
    }

    #[test]
    fn test_telemetry_config_default() {
        let _name = EnvVarGuard::set("MEETUP_SERVICE_NAME", None);
        let _metrics = EnvVarGuard::set("MEETUP_METRICS_ENABLED", None);
        let config = TelemetryConfig::default();
        assert_eq!(config.service_name, "meetup-api");
        assert!(config.metrics_enabled);
    }

    #[test]
    fn test_log_format_from_env() {
        let _guard = EnvVarGuard::set("MEETUP_LOG_FORMAT", Some("pretty"));
        let config = TelemetryConfig::default();
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!("JSON".parse::<LogFormat>().ok(), Some(LogFormat::Json));
        assert_eq!("text".parse::<LogFormat>().ok(), Some(LogFormat::Pretty));
        assert!("xml".parse::<LogFormat>().is_err());
    }
}
