//! API Configuration Module
//!
//! Server, CORS and page cache settings. Configuration is loaded from
//! environment variables with defaults suitable for development. Values that
//! are present but unparsable are rejected rather than silently replaced.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use meetup_core::ConfigError;
use meetup_storage::{FallbackPolicy, PageConfig, DEFAULT_MAX_STALENESS};

// ============================================================================
// API CONFIGURATION
// ============================================================================

/// API configuration for the HTTP server and the page cache.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    // ========================================================================
    // Server
    // ========================================================================
    /// Interface to bind to.
    pub bind_host: String,

    /// Port to listen on.
    pub port: u16,

    // ========================================================================
    // CORS Configuration
    // ========================================================================
    /// Allowed CORS origins (comma-separated in env var).
    /// Empty means allow all origins (dev mode).
    pub cors_origins: Vec<String>,

    /// Max age for CORS preflight cache in seconds.
    pub cors_max_age_secs: u64,

    // ========================================================================
    // Page Cache
    // ========================================================================
    /// Age after which the list page is rebuilt in the background.
    pub revalidate_after: Duration,

    /// What the detail route does for ids outside the pre-rendered set.
    pub fallback: FallbackPolicy,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_host: "0.0.0.0".to_string(),
            port: 3000,
            cors_origins: Vec::new(), // Empty = allow all
            cors_max_age_secs: 86400, // 24 hours
            revalidate_after: DEFAULT_MAX_STALENESS,
            fallback: FallbackPolicy::Blocking,
        }
    }
}

impl ApiConfig {
    /// Create ApiConfig from environment variables.
    ///
    /// Environment variables:
    /// - `MEETUP_API_BIND`: Interface to bind (default: 0.0.0.0)
    /// - `PORT` or `MEETUP_API_PORT`: Listen port (default: 3000)
    /// - `MEETUP_CORS_ORIGINS`: Comma-separated allowed origins (empty = allow all)
    /// - `MEETUP_CORS_MAX_AGE_SECS`: Preflight cache duration (default: 86400)
    /// - `MEETUP_REVALIDATE_SECS`: List page staleness window (default: 1)
    /// - `MEETUP_FALLBACK`: `blocking` or `strict` (default: blocking)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let bind_host = lookup("MEETUP_API_BIND").unwrap_or(defaults.bind_host);

        let port = match lookup("PORT").or_else(|| lookup("MEETUP_API_PORT")) {
            Some(raw) => parse_value("PORT", &raw)?,
            None => defaults.port,
        };

        let cors_origins = lookup("MEETUP_CORS_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let cors_max_age_secs = match lookup("MEETUP_CORS_MAX_AGE_SECS") {
            Some(raw) => parse_value("MEETUP_CORS_MAX_AGE_SECS", &raw)?,
            None => defaults.cors_max_age_secs,
        };

        let revalidate_after = match lookup("MEETUP_REVALIDATE_SECS") {
            Some(raw) => Duration::from_secs(parse_value("MEETUP_REVALIDATE_SECS", &raw)?),
            None => defaults.revalidate_after,
        };

        let fallback = match lookup("MEETUP_FALLBACK") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                field: "MEETUP_FALLBACK".to_string(),
                value: raw.clone(),
                reason: "expected one of: strict, blocking".to_string(),
            })?,
            None => defaults.fallback,
        };

        Ok(Self {
            bind_host,
            port,
            cors_origins,
            cors_max_age_secs,
            revalidate_after,
            fallback,
        })
    }

    /// Socket address to listen on.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.bind_host, self.port);
        addr.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue {
                field: "MEETUP_API_BIND".to_string(),
                value: addr.clone(),
                reason: e.to_string(),
            })
    }

    /// Page cache settings for the site.
    pub fn page_config(&self) -> PageConfig {
        PageConfig::new()
            .with_max_staleness(self.revalidate_after)
            .with_fallback(self.fallback)
    }

    /// Check if a given origin is allowed.
    pub fn is_origin_allowed(&self, origin: &str) -> bool {
        if self.cors_origins.is_empty() {
            // Dev mode: allow all
            return true;
        }

        self.cors_origins.iter().any(|allowed| {
            if allowed == origin {
                return true;
            }
            // Wildcard subdomains: *.meetups.run
            if let Some(pattern) = allowed.strip_prefix("*.") {
                if let Some(origin_domain) = origin.strip_prefix("https://") {
                    return origin_domain.ends_with(&format!(".{}", pattern));
                }
            }
            false
        })
    }
}

pub(crate) fn parse_value<T>(field: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        field: field.to_string(),
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() -> Result<(), ConfigError> {
        let config = ApiConfig::from_lookup(lookup(&[]))?;
        assert_eq!(config.port, 3000);
        assert!(config.cors_origins.is_empty());
        assert_eq!(config.cors_max_age_secs, 86400);
        assert_eq!(config.revalidate_after, Duration::from_secs(1));
        assert_eq!(config.fallback, FallbackPolicy::Blocking);
        assert_eq!(config.bind_addr()?.to_string(), "0.0.0.0:3000");
        Ok(())
    }

    #[test]
    fn test_overrides() -> Result<(), ConfigError> {
        let config = ApiConfig::from_lookup(lookup(&[
            ("MEETUP_API_BIND", "127.0.0.1"),
            ("MEETUP_API_PORT", "8080"),
            ("MEETUP_CORS_ORIGINS", "https://meetups.run, https://app.meetups.run,"),
            ("MEETUP_REVALIDATE_SECS", "30"),
            ("MEETUP_FALLBACK", "false"),
        ]))?;
        assert_eq!(config.bind_addr()?.to_string(), "127.0.0.1:8080");
        assert_eq!(config.cors_origins.len(), 2);
        assert_eq!(config.fallback, FallbackPolicy::Strict);

        let pages = config.page_config();
        assert_eq!(pages.max_staleness, Duration::from_secs(30));
        assert_eq!(pages.fallback, FallbackPolicy::Strict);
        Ok(())
    }

    #[test]
    fn test_port_takes_precedence() -> Result<(), ConfigError> {
        let config = ApiConfig::from_lookup(lookup(&[
            ("PORT", "9000"),
            ("MEETUP_API_PORT", "8080"),
        ]))?;
        assert_eq!(config.port, 9000);
        Ok(())
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = ApiConfig::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "PORT"));

        let err = ApiConfig::from_lookup(lookup(&[("MEETUP_FALLBACK", "maybe")])).unwrap_err();
        assert!(err.to_string().contains("MEETUP_FALLBACK"));

        let config = ApiConfig::from_lookup(lookup(&[("MEETUP_API_BIND", "not a host")]))
            .expect("host is checked at bind time");
        assert!(config.bind_addr().is_err());
    }

    #[test]
    fn test_origin_allowed() {
        let mut config = ApiConfig::default();
        assert!(config.is_origin_allowed("http://localhost:3000"));

        config.cors_origins = vec![
            "https://meetups.run".to_string(),
            "*.meetups.run".to_string(),
        ];
        assert!(config.is_origin_allowed("https://meetups.run"));
        assert!(config.is_origin_allowed("https://app.meetups.run"));
        assert!(!config.is_origin_allowed("https://evil.com"));
        assert!(!config.is_origin_allowed("https://notmeetups.run"));
    }
}
