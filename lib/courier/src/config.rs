//! Client configuration types.

use crate::middleware::LogLevel;

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost/";

/// Configuration for [`Client`](crate::Client).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL every relative path is joined onto.
    pub base_url: String,
    /// Value of the `Authorization` header, sent verbatim.
    pub token: Option<String>,
    /// Transport logging, off when `None`.
    pub logging: Option<LogLevel>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            logging: None,
        }
    }
}

impl ClientConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug, Clone, Default)]
pub struct ClientConfigBuilder {
    base_url: Option<String>,
    token: Option<String>,
    logging: Option<LogLevel>,
}

impl ClientConfigBuilder {
    /// Set the base URL.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the authorization token.
    #[must_use]
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Enable transport logging at the given level.
    #[must_use]
    pub const fn logging(mut self, level: LogLevel) -> Self {
        self.logging = Some(level);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> ClientConfig {
        let defaults = ClientConfig::default();
        ClientConfig {
            base_url: self.base_url.unwrap_or(defaults.base_url),
            token: self.token.or(defaults.token),
            logging: self.logging.or(defaults.logging),
        }
    }
}
