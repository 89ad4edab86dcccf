//! Client configuration loaded from the environment.

use std::time::Duration;

use serde::Deserialize;

use crate::client::{ApiKey, DEFAULT_BASE_URL, DEFAULT_USER_AGENT};
use crate::error::ConfigError;
use crate::transport::DEFAULT_TIMEOUT_SECS;

pub const ENV_API_KEY: &str = "VULTR_API_KEY";
pub const ENV_BASE_URL: &str = "VULTR_BASE_URL";
pub const ENV_USER_AGENT: &str = "VULTR_USER_AGENT";
pub const ENV_TIMEOUT_SECS: &str = "VULTR_TIMEOUT_SECS";

/// Settings for `Client::from_config`.
///
/// Deserializable so it can be embedded in an application's own config file.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    pub api_key: ApiKey,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl ClientConfig {
    pub fn new(api_key: impl Into<ApiKey>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Read `VULTR_API_KEY`, `VULTR_BASE_URL`, `VULTR_USER_AGENT` and
    /// `VULTR_TIMEOUT_SECS` from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as `from_env` with a caller-supplied variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(ENV_API_KEY)
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;
        let mut config = Self::new(api_key);

        if let Some(base_url) = lookup(ENV_BASE_URL) {
            config.base_url = base_url;
        }
        if let Some(user_agent) = lookup(ENV_USER_AGENT) {
            config.user_agent = user_agent;
        }
        if let Some(value) = lookup(ENV_TIMEOUT_SECS) {
            config.timeout_secs = value
                .parse()
                .map_err(|source| ConfigError::InvalidTimeout { value, source })?;
        }

        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_only_key_is_set() {
        let config = ClientConfig::from_lookup(lookup(&[("VULTR_API_KEY", "abc")])).unwrap();
        assert_eq!(config.base_url, "https://api.vultr.com");
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn overrides_are_read() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("VULTR_API_KEY", "abc"),
            ("VULTR_BASE_URL", "http://127.0.0.1:3000"),
            ("VULTR_USER_AGENT", "ops-bot/1"),
            ("VULTR_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:3000");
        assert_eq!(config.user_agent, "ops-bot/1");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn missing_key_is_rejected() {
        let err = ClientConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));

        let err = ClientConfig::from_lookup(lookup(&[("VULTR_API_KEY", "")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));
    }

    #[test]
    fn bad_timeout_is_rejected() {
        let err = ClientConfig::from_lookup(lookup(&[
            ("VULTR_API_KEY", "abc"),
            ("VULTR_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTimeout { ref value, .. } if value == "soon"));
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: ClientConfig = serde_json::from_str(r#"{"api_key":"abc"}"#).unwrap();
        assert_eq!(config.base_url, "https://api.vultr.com");
        assert_eq!(config.timeout_secs, 30);
        assert!(!format!("{config:?}").contains("abc"));
    }
}
