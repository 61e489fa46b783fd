use std::env;
use std::time::Duration;

use crate::cache::KeyPolicy;
use crate::error::GatewayError;
use crate::extractor::FetchPolicy;

/// Default HTTP port, shared with the healthcheck probe.
pub const DEFAULT_HTTP_PORT: u16 = 5012;
const DEFAULT_HTTP_HOST: &str = "0.0.0.0";
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 600;

/// Maximum number of canonical articles held in memory.
pub const CACHE_CAPACITY: usize = 10_000;
/// Time-to-live of a canonical article.
pub const CACHE_TTL: Duration = Duration::from_secs(12 * 60 * 60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub http_host: String,
    pub http_port: u16,
    pub key_policy: KeyPolicy,
    /// How often expired entries are reclaimed in the background
    pub sweep_interval: Duration,
    pub cache_capacity: usize,
    pub cache_ttl: Duration,
    pub fetch_policy: FetchPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            http_host: DEFAULT_HTTP_HOST.to_string(),
            http_port: DEFAULT_HTTP_PORT,
            key_policy: KeyPolicy::default(),
            sweep_interval: Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS),
            cache_capacity: CACHE_CAPACITY,
            cache_ttl: CACHE_TTL,
            fetch_policy: FetchPolicy::default(),
        }
    }
}

impl Settings {
    /// Build settings from `lookup`, falling back to defaults for unset keys.
    ///
    /// # Errors
    /// Returns [`GatewayError::Config`] for unparsable or invalid values.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, GatewayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(host) = lookup("HTTP_HOST") {
            settings.http_host = host;
        }
        if let Some(port) = lookup("HTTP_PORT") {
            settings.http_port = port
                .trim()
                .parse::<u16>()
                .map_err(|e| GatewayError::Config(format!("Invalid HTTP_PORT {port:?}: {e}")))?;
        }
        if let Some(policy) = lookup("APP_CACHE_KEY_POLICY") {
            settings.key_policy = policy.parse().map_err(GatewayError::Config)?;
        }
        if let Some(secs) = lookup("APP_CACHE_SWEEP_INTERVAL_SECS") {
            let secs = secs.trim().parse::<u64>().map_err(|e| {
                GatewayError::Config(format!("Invalid APP_CACHE_SWEEP_INTERVAL_SECS {secs:?}: {e}"))
            })?;
            settings.sweep_interval = Duration::from_secs(secs);
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Validates the settings and returns an error if invalid.
    pub fn validate(&self) -> Result<(), GatewayError> {
        validate_host(&self.http_host)?;
        validate_port(self.http_port)?;
        if self.cache_capacity == 0 {
            return Err(GatewayError::Config("Cache capacity cannot be 0".into()));
        }
        if self.sweep_interval.is_zero() {
            return Err(GatewayError::Config("Sweep interval cannot be 0".into()));
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}

/// Validates that the host is not empty or whitespace-only.
fn validate_host(host: &str) -> Result<(), GatewayError> {
    if host.trim().is_empty() {
        return Err(GatewayError::Config("Host cannot be empty".into()));
    }
    Ok(())
}

/// Validates that the port is in valid range (1-65535).
fn validate_port(port: u16) -> Result<(), GatewayError> {
    if port == 0 {
        return Err(GatewayError::Config("Port cannot be 0".into()));
    }
    Ok(())
}

pub fn get_configuration() -> Result<Settings, GatewayError> {
    Settings::from_lookup(|key| env::var(key).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let settings = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.bind_address(), "0.0.0.0:5012");
        assert_eq!(settings.cache_capacity, 10_000);
        assert_eq!(settings.cache_ttl, Duration::from_secs(43_200));
        assert_eq!(settings.fetch_policy.timeout, Duration::from_millis(3000));
        assert_eq!(settings.fetch_policy.max_redirects, 3);
        assert_eq!(settings.key_policy, KeyPolicy::Literal);
    }

    #[test]
    fn test_reads_overrides() {
        let settings = Settings::from_lookup(lookup(&[
            ("HTTP_HOST", "127.0.0.1"),
            ("HTTP_PORT", "8080"),
            ("APP_CACHE_KEY_POLICY", "normalized"),
            ("APP_CACHE_SWEEP_INTERVAL_SECS", "30"),
        ]))
        .unwrap();

        assert_eq!(settings.bind_address(), "127.0.0.1:8080");
        assert_eq!(settings.key_policy, KeyPolicy::Normalized);
        assert_eq!(settings.sweep_interval, Duration::from_secs(30));
    }

    #[test]
    fn test_invalid_port_fails() {
        let err = Settings::from_lookup(lookup(&[("HTTP_PORT", "not-a-port")])).unwrap_err();
        assert!(err.to_string().contains("Invalid HTTP_PORT"));
    }

    #[test]
    fn test_zero_port_fails() {
        let err = Settings::from_lookup(lookup(&[("HTTP_PORT", "0")])).unwrap_err();
        assert!(err.to_string().contains("Port cannot be 0"));
    }

    #[test]
    fn test_unknown_key_policy_fails() {
        assert!(Settings::from_lookup(lookup(&[("APP_CACHE_KEY_POLICY", "fuzzy")])).is_err());
    }

    #[test]
    fn test_zero_sweep_interval_fails() {
        let err =
            Settings::from_lookup(lookup(&[("APP_CACHE_SWEEP_INTERVAL_SECS", "0")])).unwrap_err();
        assert!(err.to_string().contains("Sweep interval cannot be 0"));
    }

    #[test]
    fn test_validate_host_whitespace_fails() {
        let result = validate_host("   ");
        assert!(result.unwrap_err().to_string().contains("Host cannot be empty"));
    }

    #[test]
    fn test_settings_validate_zero_capacity_fails() {
        let settings = Settings {
            cache_capacity: 0,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }
}
