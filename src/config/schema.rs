//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Root configuration for the asset relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration.
    pub listener: ListenerConfig,

    /// Deployment environment; gates caching and error verbosity.
    pub environment: Environment,

    /// Upstream endpoints.
    pub upstream: UpstreamConfig,

    /// Font response cache settings.
    pub cache: CacheConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Deployment environment descriptor.
///
/// `production` and `staging` enable the cache gate. Any other name is kept
/// verbatim and treated as a development context.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum Environment {
    Production,
    Staging,
    Other(String),
}

impl Environment {
    /// Whether font responses should go through the cache store.
    pub fn caches_responses(&self) -> bool {
        matches!(self, Environment::Production | Environment::Staging)
    }

    /// Whether error details must be hidden from clients.
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Environment::Production => "production",
            Environment::Staging => "staging",
            Environment::Other(name) => name,
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::Other("development".to_string())
    }
}

impl From<String> for Environment {
    fn from(value: String) -> Self {
        match value.trim() {
            "production" => Environment::Production,
            "staging" => Environment::Staging,
            other => Environment::Other(other.to_string()),
        }
    }
}

impl From<&str> for Environment {
    fn from(value: &str) -> Self {
        Environment::from(value.to_string())
    }
}

impl From<Environment> for String {
    fn from(value: Environment) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8787").
    pub bind_address: String,

    /// Host names (without port) that identify a local development runtime.
    pub local_hosts: Vec<String>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8787".to_string(),
            local_hosts: vec![
                "localhost".to_string(),
                "127.0.0.1".to_string(),
                "[::1]".to_string(),
                "0.0.0.0".to_string(),
            ],
        }
    }
}

/// Upstream endpoints the relay fetches from.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Google Fonts CSS API endpoint.
    pub font_css_url: String,

    /// User-Agent presented to the CSS API. Must look like a legacy browser
    /// so the CSS references TrueType/OpenType files instead of WOFF2.
    pub user_agent: String,

    /// Base of the raw file host, without the branch segment.
    pub raw_content_base: String,

    /// Branch used when the request carries no `branch` query parameter.
    pub default_branch: String,

    /// Source of `/favicon.ico`.
    pub favicon_url: String,

    /// Target of the `/view-source` redirect.
    pub source_url: String,

    /// Optional token sent to the raw file host.
    pub github_token: Option<String>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            font_css_url: "https://fonts.googleapis.com/css2".to_string(),
            user_agent: "Mozilla/5.0 (Macintosh; U; Intel Mac OS X 10_6_8; de-at) AppleWebKit/533.21.1 (KHTML, like Gecko) Version/5.0.5 Safari/533.21.1".to_string(),
            raw_content_base: "https://raw.githubusercontent.com/luxass/assets".to_string(),
            default_branch: "main".to_string(),
            favicon_url: "https://image.luxass.dev/api/image/emoji".to_string(),
            source_url: "https://github.com/luxass/assets".to_string(),
            github_token: None,
        }
    }
}

/// Font response cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache namespace opened for font responses.
    pub namespace: String,

    /// Freshness window advertised through `Cache-Control: max-age`.
    pub max_age_secs: u64,

    /// Largest body the store accepts.
    pub max_entry_bytes: usize,

    /// Most entries a namespace holds before the soonest-expiring is evicted.
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            namespace: "fonts".to_string(),
            max_age_secs: 3600,
            max_entry_bytes: 10 * 1024 * 1024, // 10MiB
            max_entries: 1024,
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upstream connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Per-fetch timeout (total time for one upstream request/response) in seconds.
    pub request_secs: u64,

    /// Deadline for answering one inbound request, across every upstream hop.
    pub deadline_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 30,
            deadline_secs: 60,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_gating() {
        assert!(Environment::from("production").caches_responses());
        assert!(Environment::from("staging").caches_responses());
        assert!(!Environment::from("development").caches_responses());
        assert!(!Environment::from("preview").caches_responses());

        assert!(Environment::Production.is_production());
        assert!(!Environment::Staging.is_production());
    }

    #[test]
    fn test_environment_keeps_unknown_names() {
        let env = Environment::from("preview");
        assert_eq!(env.as_str(), "preview");
        assert_eq!(env.to_string(), "preview");
    }

    #[test]
    fn test_environment_name_is_trimmed() {
        assert_eq!(Environment::from(" staging\n"), Environment::Staging);

        let env = Environment::from("  preview ");
        assert_eq!(env, Environment::Other("preview".to_string()));
        assert_eq!(env.as_str(), "preview");
    }
}
