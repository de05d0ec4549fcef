//! Configuration handling for the relay.
//!
//! Everything is read once at startup by [`Config::from_env`] and then shared
//! read-only (behind an `Arc`) with every component that needs it. The four
//! upstream credentials are mandatory: the process refuses to start without
//! them. Everything else falls back to production defaults.

use std::env;
use std::fmt::{Debug, Formatter};
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Environment variable names. Public so tests and deployment tooling can
/// refer to them.
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_MEDIUM_TOKEN: &str = "MEDIUM_TOKEN";
pub const ENV_IMGUR_CLIENT_ID: &str = "IMGUR_CLIENT_ID";
pub const ENV_DEVTO_TOKEN: &str = "DEVTO_TOKEN";
pub const ENV_BIND_ADDR: &str = "BIND_ADDR";
pub const ENV_OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
pub const ENV_MEDIUM_BASE_URL: &str = "MEDIUM_BASE_URL";
pub const ENV_IMGUR_BASE_URL: &str = "IMGUR_BASE_URL";
pub const ENV_DEVTO_BASE_URL: &str = "DEVTO_BASE_URL";
pub const ENV_OPENAI_TEXT_MODEL: &str = "OPENAI_TEXT_MODEL";
pub const ENV_OPENAI_IMAGE_MODEL: &str = "OPENAI_IMAGE_MODEL";
pub const ENV_SOURCE_BRAND: &str = "SOURCE_BRAND";
pub const ENV_UPSTREAM_TIMEOUT_SECS: &str = "UPSTREAM_TIMEOUT_SECS";
/// Read by the binary before the config is built, to pick the log format.
pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:10000";
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_MEDIUM_BASE_URL: &str = "https://api.medium.com";
const DEFAULT_IMGUR_BASE_URL: &str = "https://api.imgur.com";
const DEFAULT_DEVTO_BASE_URL: &str = "https://dev.to";
const DEFAULT_TEXT_MODEL: &str = "gpt-4";
const DEFAULT_IMAGE_MODEL: &str = "dall-e-3";
const DEFAULT_SOURCE_BRAND: &str = "Replanta";
// Long generations can take close to two minutes.
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 120;

/// Secrets issued by the external services.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub openai_api_key: String,
    pub medium_token: String,
    pub imgur_client_id: String,
    pub devto_token: String,
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("openai_api_key", &"***")
            .field("medium_token", &"***")
            .field("imgur_client_id", &"***")
            .field("devto_token", &"***")
            .finish()
    }
}

/// Base URLs of the upstream APIs, without a trailing slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub openai: String,
    pub medium: String,
    pub imgur: String,
    pub devto: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            openai: DEFAULT_OPENAI_BASE_URL.to_string(),
            medium: DEFAULT_MEDIUM_BASE_URL.to_string(),
            imgur: DEFAULT_IMGUR_BASE_URL.to_string(),
            devto: DEFAULT_DEVTO_BASE_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// Point every upstream at the same base URL. Handy for a single mock server.
    pub fn all(base: impl Into<String>) -> Self {
        let base = trim_base(base.into());
        Self {
            openai: base.clone(),
            medium: base.clone(),
            imgur: base.clone(),
            devto: base,
        }
    }
}

/// Application runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    credentials: Credentials,
    endpoints: Endpoints,
    bind_addr: String,
    text_model: String,
    image_model: String,
    source_brand: String,
    upstream_timeout: Duration,
}

impl Config {
    /// Create a config from explicit credentials with every other value at its
    /// default.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            endpoints: Endpoints::default(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            source_brand: DEFAULT_SOURCE_BRAND.to_string(),
            upstream_timeout: Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
        }
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn with_upstream_timeout(mut self, timeout: Duration) -> Self {
        self.upstream_timeout = timeout;
        self
    }

    /// Load from environment variables.
    ///
    /// Fails if a credential is missing or empty, or if a base URL or the
    /// timeout cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let credentials = Credentials {
            openai_api_key: required(ENV_OPENAI_API_KEY)?,
            medium_token: required(ENV_MEDIUM_TOKEN)?,
            imgur_client_id: required(ENV_IMGUR_CLIENT_ID)?,
            devto_token: required(ENV_DEVTO_TOKEN)?,
        };

        let endpoints = Endpoints {
            openai: base_url(ENV_OPENAI_BASE_URL, DEFAULT_OPENAI_BASE_URL)?,
            medium: base_url(ENV_MEDIUM_BASE_URL, DEFAULT_MEDIUM_BASE_URL)?,
            imgur: base_url(ENV_IMGUR_BASE_URL, DEFAULT_IMGUR_BASE_URL)?,
            devto: base_url(ENV_DEVTO_BASE_URL, DEFAULT_DEVTO_BASE_URL)?,
        };

        let upstream_timeout = match optional(ENV_UPSTREAM_TIMEOUT_SECS) {
            Some(raw) => {
                let secs = raw.parse::<u64>().map_err(|e| ConfigError::InvalidValue {
                    field: ENV_UPSTREAM_TIMEOUT_SECS,
                    reason: e.to_string(),
                })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
        };

        Ok(Self {
            credentials,
            endpoints,
            bind_addr: optional(ENV_BIND_ADDR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            text_model: optional(ENV_OPENAI_TEXT_MODEL)
                .unwrap_or_else(|| DEFAULT_TEXT_MODEL.to_string()),
            image_model: optional(ENV_OPENAI_IMAGE_MODEL)
                .unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string()),
            source_brand: optional(ENV_SOURCE_BRAND)
                .unwrap_or_else(|| DEFAULT_SOURCE_BRAND.to_string()),
            upstream_timeout,
        })
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }
    /// TCP bind address (host:port) for the HTTP server.
    pub fn bind_addr(&self) -> &str {
        &self.bind_addr
    }
    /// Chat model used for rewriting.
    pub fn text_model(&self) -> &str {
        &self.text_model
    }
    /// Image model used when an article arrives without a picture.
    pub fn image_model(&self) -> &str {
        &self.image_model
    }
    /// Brand of the source blog, which the rewritten text must not name.
    pub fn source_brand(&self) -> &str {
        &self.source_brand
    }
    pub fn upstream_timeout(&self) -> Duration {
        self.upstream_timeout
    }
}

/// Errors that can occur while building a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable '{0}'")]
    Missing(&'static str),

    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

fn optional(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    optional(key).ok_or(ConfigError::Missing(key))
}

fn base_url(key: &'static str, default: &str) -> Result<String, ConfigError> {
    let raw = optional(key).unwrap_or_else(|| default.to_string());
    Url::parse(&raw).map_err(|e| ConfigError::InvalidValue {
        field: key,
        reason: e.to_string(),
    })?;
    Ok(trim_base(raw))
}

fn trim_base(base: String) -> String {
    base.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Ensure environment-variable manipulating tests run serially.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const ALL_KEYS: [&str; 13] = [
        ENV_OPENAI_API_KEY,
        ENV_MEDIUM_TOKEN,
        ENV_IMGUR_CLIENT_ID,
        ENV_DEVTO_TOKEN,
        ENV_BIND_ADDR,
        ENV_OPENAI_BASE_URL,
        ENV_MEDIUM_BASE_URL,
        ENV_IMGUR_BASE_URL,
        ENV_DEVTO_BASE_URL,
        ENV_OPENAI_TEXT_MODEL,
        ENV_OPENAI_IMAGE_MODEL,
        ENV_SOURCE_BRAND,
        ENV_UPSTREAM_TIMEOUT_SECS,
    ];

    fn clear_env() {
        for key in ALL_KEYS {
            unsafe {
                env::remove_var(key);
            }
        }
    }

    fn set_secrets() {
        unsafe {
            env::set_var(ENV_OPENAI_API_KEY, "sk-test");
            env::set_var(ENV_MEDIUM_TOKEN, "medium-test");
            env::set_var(ENV_IMGUR_CLIENT_ID, "imgur-test");
            env::set_var(ENV_DEVTO_TOKEN, "devto-test");
        }
    }

    #[test]
    fn defaults_when_only_secrets_present() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        set_secrets();
        let cfg = Config::from_env().unwrap();
        assert_eq!(cfg.credentials().openai_api_key, "sk-test");
        assert_eq!(cfg.bind_addr(), DEFAULT_BIND_ADDR);
        assert_eq!(cfg.text_model(), "gpt-4");
        assert_eq!(cfg.image_model(), "dall-e-3");
        assert_eq!(cfg.source_brand(), "Replanta");
        assert_eq!(cfg.endpoints(), &Endpoints::default());
        assert_eq!(cfg.upstream_timeout(), Duration::from_secs(120));
    }

    #[test]
    fn refuses_to_load_without_a_secret() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        set_secrets();
        unsafe {
            env::remove_var(ENV_IMGUR_CLIENT_ID);
        }
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::Missing(ENV_IMGUR_CLIENT_ID)));
    }

    #[test]
    fn empty_secret_counts_as_missing() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        set_secrets();
        unsafe {
            env::set_var(ENV_DEVTO_TOKEN, "   ");
        }
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::Missing(ENV_DEVTO_TOKEN)));
    }

    #[test]
    fn overrides_when_env_present() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        set_secrets();
        unsafe {
            env::set_var(ENV_BIND_ADDR, "127.0.0.1:9000");
            env::set_var(ENV_MEDIUM_BASE_URL, "http://localhost:4000/");
            env::set_var(ENV_UPSTREAM_TIMEOUT_SECS, "30");
            env::set_var(ENV_SOURCE_BRAND, "Acme");
        }
        let cfg = Config::from_env().unwrap();
        assert_eq!(cfg.bind_addr(), "127.0.0.1:9000");
        assert_eq!(cfg.endpoints().medium, "http://localhost:4000");
        assert_eq!(cfg.upstream_timeout(), Duration::from_secs(30));
        assert_eq!(cfg.source_brand(), "Acme");
    }

    #[test]
    fn rejects_unparseable_base_url() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        set_secrets();
        unsafe {
            env::set_var(ENV_DEVTO_BASE_URL, "not a url");
        }
        let err = Config::from_env().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                field: ENV_DEVTO_BASE_URL,
                ..
            }
        ));
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let cfg = Config::new(Credentials {
            openai_api_key: "sk-very-secret".into(),
            medium_token: "m".into(),
            imgur_client_id: "i".into(),
            devto_token: "d".into(),
        });
        let rendered = format!("{:?}", cfg);
        assert!(!rendered.contains("sk-very-secret"));
        assert!(rendered.contains("***"));
    }
}
