//! Configuration for the Open Food Facts API client
//!
//! Supports environment-based configuration with sensible defaults.

use crate::error::{TransportError, TransportResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Public production server
pub const PRODUCTION_URL: &str = "https://world.openfoodfacts.org";

/// Development server; writes there need `off:off` basic auth
pub const DEVELOPMENT_URL: &str = "https://world.openfoodfacts.dev";

const DEFAULT_USER_AGENT: &str = concat!("openfood-api-client/", env!("CARGO_PKG_VERSION"));
const DEFAULT_COMMENT: &str = concat!("openfood-api-client ", env!("CARGO_PKG_VERSION"));

/// Environment types
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// `world.openfoodfacts.dev`
    Development,
    /// `world.openfoodfacts.org`
    #[default]
    Production,
}

impl Environment {
    /// Parse from environment variable
    pub fn from_env() -> Self {
        match env::var("OPENFOOD_ENV")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "development" | "dev" | "test" => Self::Development,
            _ => Self::Production,
        }
    }

    /// Server base URL for this environment
    #[must_use]
    pub fn base_url(self) -> &'static str {
        match self {
            Self::Development => DEVELOPMENT_URL,
            Self::Production => PRODUCTION_URL,
        }
    }
}

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Server base URL
    pub base_url: String,
    /// Request timeout; `None` waits indefinitely
    #[serde(default, with = "optional_secs")]
    pub timeout: Option<Duration>,
    /// User-agent tag used when a caller does not pass one
    pub user_agent: String,
    /// Comment attached to submissions when a caller does not pass one
    pub comment: String,
    /// Current environment
    pub environment: Environment,
}

mod optional_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(
        duration: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        duration.map(|d| d.as_secs()).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        let secs = Option::<u64>::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::production()
    }
}

impl ClientConfig {
    /// Create configuration from environment variables
    ///
    /// Reads the following environment variables:
    /// - `OPENFOOD_ENV`: Environment (development/production)
    /// - `OPENFOOD_API_URL`: Base URL override
    /// - `OPENFOOD_TIMEOUT_SECS`: Request timeout in seconds (unset means no timeout)
    /// - `OPENFOOD_USER_AGENT`: Default user-agent tag
    /// - `OPENFOOD_COMMENT`: Default submission comment
    pub fn from_env() -> TransportResult<Self> {
        let environment = Environment::from_env();

        let base_url =
            env::var("OPENFOOD_API_URL").unwrap_or_else(|_| environment.base_url().to_string());

        let timeout = match env::var("OPENFOOD_TIMEOUT_SECS") {
            Ok(raw) => Some(Duration::from_secs(raw.trim().parse().map_err(|_| {
                TransportError::config(format!("OPENFOOD_TIMEOUT_SECS is not a number: {raw}"))
            })?)),
            Err(_) => None,
        };

        let user_agent =
            env::var("OPENFOOD_USER_AGENT").unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string());
        let comment = env::var("OPENFOOD_COMMENT").unwrap_or_else(|_| DEFAULT_COMMENT.to_string());

        Ok(Self {
            base_url,
            timeout,
            user_agent,
            comment,
            environment,
        })
    }

    /// Create development configuration
    #[must_use]
    pub fn development() -> Self {
        Self {
            base_url: DEVELOPMENT_URL.to_string(),
            timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            comment: DEFAULT_COMMENT.to_string(),
            environment: Environment::Development,
        }
    }

    /// Create production configuration
    #[must_use]
    pub fn production() -> Self {
        Self {
            base_url: PRODUCTION_URL.to_string(),
            timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            comment: DEFAULT_COMMENT.to_string(),
            environment: Environment::Production,
        }
    }

    /// Builder-style method to set base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Builder-style method to set timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builder-style method to set the default user-agent tag
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Builder-style method to set the default submission comment
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> TransportResult<()> {
        if self.base_url.is_empty() {
            return Err(TransportError::config("base_url cannot be empty"));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(TransportError::config(
                "base_url must start with http:// or https://",
            ));
        }

        if self.timeout.is_some_and(|t| t.is_zero()) {
            return Err(TransportError::config("timeout cannot be zero"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, PRODUCTION_URL);
        assert_eq!(config.environment, Environment::Production);
        assert!(config.timeout.is_none());
    }

    #[test]
    fn test_development_config() {
        let config = ClientConfig::development();
        assert!(config.base_url.ends_with(".dev"));
        assert_eq!(config.environment, Environment::Development);
    }

    #[test]
    fn test_builder_pattern() {
        let config = ClientConfig::default()
            .with_base_url("http://localhost:8080")
            .with_timeout(Duration::from_secs(60))
            .with_user_agent("tests");

        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeout, Some(Duration::from_secs(60)));
        assert_eq!(config.user_agent, "tests");
    }

    #[test]
    fn test_validation() {
        assert!(ClientConfig::default().validate().is_ok());
        assert!(ClientConfig::default().with_base_url("").validate().is_err());
        assert!(ClientConfig::default()
            .with_base_url("ftp://example.com")
            .validate()
            .is_err());
        assert!(ClientConfig::default()
            .with_timeout(Duration::ZERO)
            .validate()
            .is_err());
    }

    #[test]
    fn test_serde_timeout_as_seconds() {
        let config = ClientConfig::default().with_timeout(Duration::from_secs(5));
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["timeout"], 5);
        assert_eq!(json["environment"], "production");

        let back: ClientConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back.timeout, Some(Duration::from_secs(5)));
    }
}
