//! Console configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ATENDE_API_URL` - Base URL of the backend (http or https)
//! - `ATENDE_API_TOKEN` - The agent's API token
//!
//! ## Optional
//! - `ATENDE_REQUEST_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! - `ATENDE_LOG_FORMAT` - `text` or `json` (default: text)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Fragments that show up in copied example values, never in real tokens.
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "your_",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "insert",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// How the CLI renders log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Console configuration.
///
/// Implements `Debug` manually to redact the API token.
#[derive(Clone)]
pub struct ConsoleConfig {
    /// Backend base URL
    pub api_url: Url,
    /// Agent API token
    pub api_token: SecretString,
    /// Timeout applied to every backend request
    pub request_timeout: Duration,
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
}

impl std::fmt::Debug for ConsoleConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleConfig")
            .field("api_url", &self.api_url.as_str())
            .field("api_token", &"[REDACTED]")
            .field("request_timeout", &self.request_timeout)
            .field("log_format", &self.log_format)
            .field("sentry_dsn", &self.sentry_dsn)
            .field("sentry_environment", &self.sentry_environment)
            .finish()
    }
}

impl ConsoleConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid,
    /// or if the token looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`ConsoleConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_url = required(&lookup, "ATENDE_API_URL")?;
        let api_url = parse_api_url(&raw_url)?;

        let api_token = SecretString::from(required(&lookup, "ATENDE_API_TOKEN")?);
        validate_token(&api_token, "ATENDE_API_TOKEN")?;

        let timeout_secs = match lookup("ATENDE_REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|e| {
                ConfigError::InvalidEnvVar("ATENDE_REQUEST_TIMEOUT_SECS".to_string(), e.to_string())
            })?,
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        let log_format = match lookup("ATENDE_LOG_FORMAT").as_deref() {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::InvalidEnvVar(
                    "ATENDE_LOG_FORMAT".to_string(),
                    format!("expected 'text' or 'json', got '{other}'"),
                ));
            }
        };

        Ok(Self {
            api_url,
            api_token,
            request_timeout: Duration::from_secs(timeout_secs),
            log_format,
            sentry_dsn: lookup("SENTRY_DSN").filter(|dsn| !dsn.is_empty()),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
        })
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Get a required, non-empty variable.
fn required(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String, ConfigError> {
    lookup(key)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Parse the backend URL, accepting only http(s).
fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw)
        .map_err(|e| ConfigError::InvalidEnvVar("ATENDE_API_URL".to_string(), e.to_string()))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidEnvVar(
            "ATENDE_API_URL".to_string(),
            format!("unsupported scheme '{other}'"),
        )),
    }
}

/// Reject tokens that were obviously copied from an example file.
fn validate_token(token: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let lower = token.expose_secret().to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<ConsoleConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ConsoleConfig::from_lookup(|key| map.get(key).cloned())
    }

    const BASE: &[(&str, &str)] = &[
        ("ATENDE_API_URL", "https://support.acme.io"),
        ("ATENDE_API_TOKEN", "SFMyNTY.g2gDbQAAACQ"),
    ];

    #[test]
    fn test_defaults() {
        let config = load(BASE).unwrap();
        assert_eq!(config.api_url.as_str(), "https://support.acme.io/");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.log_format, LogFormat::Text);
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_missing_url() {
        let err = load(&[("ATENDE_API_TOKEN", "SFMyNTY.g2gDbQAAACQ")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref key) if key == "ATENDE_API_URL"));
    }

    #[test]
    fn test_blank_token_is_missing() {
        let err = load(&[
            ("ATENDE_API_URL", "https://support.acme.io"),
            ("ATENDE_API_TOKEN", "  "),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(_)));
    }

    #[test]
    fn test_placeholder_token_rejected() {
        let err = load(&[
            ("ATENDE_API_URL", "https://support.acme.io"),
            ("ATENDE_API_TOKEN", "your-api-token-here"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_non_http_url_rejected() {
        let err = load(&[
            ("ATENDE_API_URL", "ftp://support.acme.io"),
            ("ATENDE_API_TOKEN", "SFMyNTY.g2gDbQAAACQ"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_optional_overrides() {
        let mut vars = BASE.to_vec();
        vars.push(("ATENDE_REQUEST_TIMEOUT_SECS", "5"));
        vars.push(("ATENDE_LOG_FORMAT", "json"));
        vars.push(("SENTRY_DSN", "https://key@o0.ingest.sentry.io/1"));
        let config = load(&vars).unwrap();
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(config.sentry_dsn.is_some());
    }

    #[test]
    fn test_bad_timeout_and_format() {
        let mut vars = BASE.to_vec();
        vars.push(("ATENDE_REQUEST_TIMEOUT_SECS", "soon"));
        assert!(matches!(load(&vars), Err(ConfigError::InvalidEnvVar(_, _))));

        let mut vars = BASE.to_vec();
        vars.push(("ATENDE_LOG_FORMAT", "xml"));
        assert!(matches!(load(&vars), Err(ConfigError::InvalidEnvVar(_, _))));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = load(BASE).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("SFMyNTY"));
        assert!(debug.contains("[REDACTED]"));
    }
}
