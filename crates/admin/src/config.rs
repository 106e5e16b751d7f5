//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `TUNENEST_API_BASE_URL` - Origin of the TuneNest backend API
//! - `ADMIN_BASE_URL` - Public URL for the admin panel
//!
//! ## Optional
//! - `ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `ADMIN_PORT` - Listen port (default: 3001)
//! - `TUNENEST_API_TIMEOUT_SECS` - Backend request timeout (default: 15)
//! - `JAMENDO_BASE_URL` - Music-metadata API (default: <https://api.jamendo.com/v3.0>)
//! - `JAMENDO_CLIENT_ID` - Public Jamendo client id (default: 3e2494c0)
//! - `ADMIN_SHOW_SAMPLE_DATA` - Show placeholder datasets (default: true)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT`, `SENTRY_SAMPLE_RATE`, `SENTRY_TRACES_SAMPLE_RATE`
//!
//! ## Optional (TLS)
//! - `ADMIN_TLS_CERT` - PEM-encoded certificate chain
//! - `ADMIN_TLS_KEY` - PEM-encoded private key

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_JAMENDO_BASE_URL: &str = "https://api.jamendo.com/v3.0";
const DEFAULT_JAMENDO_CLIENT_ID: &str = "3e2494c0";
const DEFAULT_API_TIMEOUT_SECS: &str = "15";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the admin panel
    pub base_url: String,
    /// TuneNest backend API
    pub api: BackendConfig,
    /// Jamendo public API
    pub jamendo: JamendoConfig,
    /// Whether placeholder datasets are rendered (always labelled as samples)
    pub show_sample_data: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
    /// TLS configuration for HTTPS (optional)
    pub tls: Option<TlsConfig>,
}

/// TuneNest backend connection settings.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Origin every API path is joined onto (no trailing slash).
    pub base_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
}

/// Jamendo API settings.
#[derive(Debug, Clone)]
pub struct JamendoConfig {
    pub base_url: Url,
    pub client_id: String,
}

/// TLS configuration for HTTPS.
#[derive(Clone)]
pub struct TlsConfig {
    /// PEM-encoded certificate chain
    pub cert_pem: String,
    /// PEM-encoded private key
    pub key_pem: SecretString,
}

impl std::fmt::Debug for TlsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsConfig")
            .field("cert_pem", &"[CERTIFICATE]")
            .field("key_pem", &"[REDACTED]")
            .finish()
    }
}

impl TlsConfig {
    fn from_env(env: &Env<'_>) -> Result<Option<Self>, ConfigError> {
        let cert_pem = env.optional("ADMIN_TLS_CERT");
        let key_pem = env.optional("ADMIN_TLS_KEY");

        match (cert_pem, key_pem) {
            (Some(cert), Some(key)) => Ok(Some(Self {
                cert_pem: cert,
                key_pem: SecretString::from(key),
            })),
            (None, None) => Ok(None),
            _ => Err(ConfigError::InvalidEnvVar(
                "ADMIN_TLS_*".to_string(),
                "Both ADMIN_TLS_CERT and ADMIN_TLS_KEY must be set together".to_string(),
            )),
        }
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(&|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(lookup);

        let host = env
            .or_default("ADMIN_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_HOST".to_string(), e.to_string()))?;

        let port = env
            .or_default("ADMIN_PORT", "3001")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_PORT".to_string(), e.to_string()))?;

        let base_url = env.required("ADMIN_BASE_URL")?;

        let timeout_secs = env
            .or_default("TUNENEST_API_TIMEOUT_SECS", DEFAULT_API_TIMEOUT_SECS)
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("TUNENEST_API_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        let api = BackendConfig {
            base_url: parse_base_url("TUNENEST_API_BASE_URL", &env.required("TUNENEST_API_BASE_URL")?)?,
            timeout: Duration::from_secs(timeout_secs),
        };

        let jamendo = JamendoConfig {
            base_url: parse_base_url(
                "JAMENDO_BASE_URL",
                &env.or_default("JAMENDO_BASE_URL", DEFAULT_JAMENDO_BASE_URL),
            )?,
            client_id: env.or_default("JAMENDO_CLIENT_ID", DEFAULT_JAMENDO_CLIENT_ID),
        };

        let show_sample_data = parse_bool(
            "ADMIN_SHOW_SAMPLE_DATA",
            &env.or_default("ADMIN_SHOW_SAMPLE_DATA", "true"),
        )?;

        let sentry_dsn = env.optional("SENTRY_DSN");
        let sentry_environment = env.optional("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = env
            .optional("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = env
            .optional("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        let tls = TlsConfig::from_env(&env)?;

        Ok(Self {
            host,
            port,
            base_url,
            api,
            jamendo,
            show_sample_data,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
            tls,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies must carry the `Secure` attribute.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable lookup used while building the configuration.
struct Env<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Env<'_> {
    /// Get a required variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get an optional variable; blank values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }
}

/// Parse an http(s) origin, dropping any trailing slash so paths join cleanly.
fn parse_base_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value.trim_end_matches('/'))
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    Ok(url)
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<AdminConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        AdminConfig::from_lookup(&|key| map.get(key).cloned())
    }

    const MINIMAL: &[(&str, &str)] = &[
        ("TUNENEST_API_BASE_URL", "https://api.tunenest.app/"),
        ("ADMIN_BASE_URL", "http://localhost:3001"),
    ];

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = load(MINIMAL).unwrap();
        assert_eq!(config.port, 3001);
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3001");
        assert_eq!(config.api.base_url.as_str(), "https://api.tunenest.app/");
        assert_eq!(config.api.timeout, Duration::from_secs(15));
        assert_eq!(config.jamendo.client_id, "3e2494c0");
        assert!(config.show_sample_data);
        assert!(config.tls.is_none());
        assert!(!config.is_secure());
    }

    #[test]
    fn test_missing_api_base_url() {
        let err = load(&[("ADMIN_BASE_URL", "http://localhost:3001")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(key) if key == "TUNENEST_API_BASE_URL"));
    }

    #[test]
    fn test_invalid_api_scheme() {
        let err = load(&[
            ("TUNENEST_API_BASE_URL", "ftp://files.tunenest.app"),
            ("ADMIN_BASE_URL", "http://localhost:3001"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_sample_data_flag() {
        let mut vars = MINIMAL.to_vec();
        vars.push(("ADMIN_SHOW_SAMPLE_DATA", "false"));
        assert!(!load(&vars).unwrap().show_sample_data);

        let mut vars = MINIMAL.to_vec();
        vars.push(("ADMIN_SHOW_SAMPLE_DATA", "maybe"));
        assert!(load(&vars).is_err());
    }

    #[test]
    fn test_tls_requires_both_halves() {
        let mut vars = MINIMAL.to_vec();
        vars.push(("ADMIN_TLS_CERT", "-----BEGIN CERTIFICATE-----"));
        assert!(load(&vars).is_err());
    }

    #[test]
    fn test_tls_debug_redacts_key() {
        let tls = TlsConfig {
            cert_pem: "cert".to_string(),
            key_pem: SecretString::from("super-secret-key"),
        };
        let debug = format!("{tls:?}");
        assert!(!debug.contains("super-secret-key"));
        assert!(debug.contains("[REDACTED]"));
    }
}
