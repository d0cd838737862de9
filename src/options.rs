//! Client configuration.

use std::collections::HashMap;
use std::time::Duration;

use crate::client::ClientError;

/// Official MiMo API entry point.
pub const DEFAULT_BASE_URL: &str = "https://api.xiaomimimo.com/v1";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "MIMO_API_KEY";

/// Environment variable overriding the base URL.
pub const BASE_URL_ENV: &str = "MIMO_BASE_URL";

/// A secret string type for sensitive data like API keys.
/// Prevents accidental logging or display of secrets.
#[derive(Clone)]
pub struct SecretString(String);

impl SecretString {
    /// Create a new secret string.
    pub fn new(s: String) -> Self {
        Self(s)
    }

    /// Get the underlying secret value.
    pub fn expose_secret(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretString([REDACTED])")
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self::new(s.to_string())
    }
}

/// Immutable configuration handed to [`MimoClient`](crate::providers::MimoClient).
///
/// # Example
/// ```rust
/// use mimo::options::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::new("sk-...")
///     .with_base_url("https://mimo.internal/v1".to_string())
///     .with_timeout(Duration::from_secs(60));
///
/// assert_eq!(config.chat_completions_url(), "https://mimo.internal/v1/chat/completions");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL for API endpoints
    pub base_url: String,

    /// Pre-shared key sent in the `api-key` header
    pub api_key: SecretString,

    /// Request timeout
    pub timeout: Option<Duration>,

    /// HTTP proxy URL
    pub proxy: Option<String>,

    /// Additional HTTP headers to include in requests
    pub extra_headers: Option<HashMap<String, String>>,
}

impl ClientConfig {
    /// Create a configuration pointing at the default endpoint.
    pub fn new(api_key: impl Into<SecretString>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            timeout: None,
            proxy: None,
            extra_headers: None,
        }
    }

    /// Build a configuration from `MIMO_API_KEY` and, if set, `MIMO_BASE_URL`.
    pub fn from_env() -> Result<Self, ClientError> {
        let api_key = std::env::var(API_KEY_ENV)
            .map_err(|_| ClientError::Config(format!("{API_KEY_ENV} must be set")))?;

        let mut config = Self::new(api_key);
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            config.base_url = base_url;
        }
        Ok(config)
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the proxy URL.
    pub fn with_proxy(mut self, proxy: String) -> Self {
        self.proxy = Some(proxy);
        self
    }

    /// Add a single extra header.
    pub fn with_header(mut self, key: String, value: String) -> Self {
        self.extra_headers
            .get_or_insert_with(HashMap::new)
            .insert(key, value);
        self
    }

    /// Full URL of the chat completions endpoint.
    pub fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::new("key");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api_key.expose_secret(), "key");
        assert!(config.timeout.is_none());
        assert!(config.extra_headers.is_none());
        assert_eq!(
            config.chat_completions_url(),
            "https://api.xiaomimimo.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = ClientConfig::new("key").with_base_url("http://localhost:1234/v1/".to_string());
        assert_eq!(
            config.chat_completions_url(),
            "http://localhost:1234/v1/chat/completions"
        );
    }

    #[test]
    fn test_secret_redacted() {
        let config = ClientConfig::new("super-secret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_with_header() {
        let config = ClientConfig::new("key")
            .with_header("x-trace".to_string(), "1".to_string())
            .with_header("x-team".to_string(), "infra".to_string());
        let headers = config.extra_headers.unwrap();
        assert_eq!(headers.len(), 2);
        assert_eq!(headers["x-team"], "infra");
    }
}
