//! Client configuration loaded from environment variables.
//!
//! Every setting has a default, so the client starts against a local
//! backend with no configuration at all.

use std::path::PathBuf;
use std::time::Duration;

use agora_shared::constants::{DEFAULT_API_URL, DEFAULT_HTTP_TIMEOUT_SECS};

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the Q&A backend.
    /// Env: `AGORA_API_URL`
    /// Default: `http://localhost:3004`
    pub api_url: String,

    /// Location of the session database.
    /// Env: `AGORA_SESSION_DB`
    /// Default: `None`, meaning the platform data directory.
    pub session_db_path: Option<PathBuf>,

    /// Per-request timeout. A request that exceeds it counts as "no
    /// response".
    /// Env: `AGORA_HTTP_TIMEOUT_SECS`
    /// Default: 10 seconds
    pub http_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            session_db_path: None,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Load configuration from the process environment, falling back to
    /// defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup("AGORA_API_URL") {
            let url = url.trim();
            if url.is_empty() {
                tracing::warn!("Empty AGORA_API_URL, using default");
            } else {
                config.api_url = url.to_string();
            }
        }

        if let Some(path) = lookup("AGORA_SESSION_DB") {
            if !path.trim().is_empty() {
                config.session_db_path = Some(PathBuf::from(path));
            }
        }

        if let Some(val) = lookup("AGORA_HTTP_TIMEOUT_SECS") {
            match val.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.http_timeout = Duration::from_secs(secs),
                _ => {
                    tracing::warn!(
                        value = %val,
                        "Invalid AGORA_HTTP_TIMEOUT_SECS, using default"
                    );
                }
            }
        }

        config
    }
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
    fn test_default_config() {
        let config = ClientConfig::from_lookup(lookup(&[]));
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.api_url, "http://localhost:3004");
        assert_eq!(config.http_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_overrides() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("AGORA_API_URL", "https://forum.example.edu/api"),
            ("AGORA_SESSION_DB", "/tmp/agora/session.db"),
            ("AGORA_HTTP_TIMEOUT_SECS", "3"),
        ]));
        assert_eq!(config.api_url, "https://forum.example.edu/api");
        assert_eq!(
            config.session_db_path,
            Some(PathBuf::from("/tmp/agora/session.db"))
        );
        assert_eq!(config.http_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("AGORA_API_URL", "   "),
            ("AGORA_HTTP_TIMEOUT_SECS", "soon"),
        ]));
        assert_eq!(config, ClientConfig::default());

        let config = ClientConfig::from_lookup(lookup(&[("AGORA_HTTP_TIMEOUT_SECS", "0")]));
        assert_eq!(config.http_timeout, Duration::from_secs(10));
    }
}
