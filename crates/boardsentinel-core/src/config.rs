//! Runtime configuration, read from the environment with CLI overrides.

use std::time::Duration;

use crate::error::{Error, Result};
use crate::history::{DEFAULT_HISTORY_CAPACITY, MAX_HISTORY_CAPACITY};

/// Environment variable holding the remote API credential.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const MODEL_ENV: &str = "BOARDSENTINEL_MODEL";
pub const ENDPOINT_ENV: &str = "BOARDSENTINEL_ENDPOINT";
pub const HISTORY_ENV: &str = "BOARDSENTINEL_HISTORY";
pub const INTERVAL_ENV: &str = "BOARDSENTINEL_INTERVAL_MS";

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(1000);
const MIN_TICK_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Clone)]
pub struct SentinelConfig {
    /// Remote model identifier.
    pub model: String,
    /// Base URL of the generative-language API.
    pub endpoint: String,
    /// Credential for the remote API. `None` runs diagnostics offline.
    pub api_key: Option<String>,
    /// Rolling window size kept by hosts.
    pub history_capacity: usize,
    /// Interval between generated readings.
    pub tick_interval: Duration,
}

impl Default for SentinelConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }
}

// The credential must never end up in logs.
impl std::fmt::Debug for SentinelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentinelConfig")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("history_capacity", &self.history_capacity)
            .field("tick_interval", &self.tick_interval)
            .finish()
    }
}

impl SentinelConfig {
    /// Build from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(model) = get(MODEL_ENV) {
            config.model = model.trim().to_string();
        }
        if let Some(endpoint) = get(ENDPOINT_ENV) {
            config.endpoint = endpoint.trim().trim_end_matches('/').to_string();
        }
        config.api_key = get(API_KEY_ENV).map(|k| k.trim().to_string());

        if let Some(raw) = get(HISTORY_ENV) {
            config.history_capacity = raw
                .trim()
                .parse()
                .map_err(|_| Error::InvalidConfig(format!("{HISTORY_ENV}={raw} is not a count")))?;
        }
        if let Some(raw) = get(INTERVAL_ENV) {
            let ms: u64 = raw.trim().parse().map_err(|_| {
                Error::InvalidConfig(format!("{INTERVAL_ENV}={raw} is not a millisecond value"))
            })?;
            config.tick_interval = Duration::from_millis(ms);
        }

        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.model.is_empty() {
            return Err(Error::InvalidConfig("model must not be empty".into()));
        }
        if self.history_capacity == 0 {
            return Err(Error::InvalidConfig("history capacity must be at least 1".into()));
        }
        if self.history_capacity > MAX_HISTORY_CAPACITY {
            return Err(Error::InvalidConfig(format!(
                "history capacity must be at most {MAX_HISTORY_CAPACITY}"
            )));
        }
        if self.tick_interval < MIN_TICK_INTERVAL {
            return Err(Error::InvalidConfig(format!(
                "tick interval must be at least {}ms",
                MIN_TICK_INTERVAL.as_millis()
            )));
        }
        Ok(())
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_env() {
        let config = SentinelConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.history_capacity, 50);
        assert_eq!(config.tick_interval, Duration::from_secs(1));
        assert!(!config.has_credential());
    }

    #[test]
    fn reads_overrides() {
        let config = SentinelConfig::from_lookup(lookup(&[
            (API_KEY_ENV, "secret"),
            (MODEL_ENV, "gemini-2.5-pro"),
            (ENDPOINT_ENV, "http://localhost:9000/"),
            (HISTORY_ENV, "120"),
            (INTERVAL_ENV, "250"),
        ]))
        .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.model, "gemini-2.5-pro");
        assert_eq!(config.endpoint, "http://localhost:9000");
        assert_eq!(config.history_capacity, 120);
        assert_eq!(config.tick_interval, Duration::from_millis(250));
    }

    #[test]
    fn blank_key_counts_as_unset() {
        let config = SentinelConfig::from_lookup(lookup(&[(API_KEY_ENV, "  ")])).unwrap();
        assert!(config.api_key.is_none());
    }

    #[test]
    fn rejects_bad_numbers() {
        assert!(SentinelConfig::from_lookup(lookup(&[(HISTORY_ENV, "lots")])).is_err());
        assert!(SentinelConfig::from_lookup(lookup(&[(HISTORY_ENV, "0")])).is_err());
        assert!(SentinelConfig::from_lookup(lookup(&[(INTERVAL_ENV, "5")])).is_err());
        assert!(SentinelConfig::from_lookup(lookup(&[(INTERVAL_ENV, "-1")])).is_err());
    }

    #[test]
    fn rejects_oversized_history() {
        let err = SentinelConfig::from_lookup(lookup(&[(HISTORY_ENV, "18446744073709551615")]))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
        assert!(SentinelConfig::from_lookup(lookup(&[(HISTORY_ENV, "100001")])).is_err());

        let config = SentinelConfig::from_lookup(lookup(&[(HISTORY_ENV, "100000")])).unwrap();
        assert_eq!(config.history_capacity, MAX_HISTORY_CAPACITY);
    }

    #[test]
    fn debug_redacts_key() {
        let config = SentinelConfig {
            api_key: Some("top-secret-value".into()),
            ..Default::default()
        };
        let dbg = format!("{config:?}");
        assert!(!dbg.contains("top-secret-value"));
        assert!(dbg.contains("<redacted>"));
    }
}
