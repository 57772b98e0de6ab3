//! Client configuration
//!
//! `MoloniConfig` is loaded from a YAML (or JSON) file and can be
//! overridden from `MOLONI_*` environment variables.

use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::types::{BackoffType, Id, OptionStringExt};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Production API host
pub const DEFAULT_BASE_URL: &str = "https://api.moloni.pt";

/// Current API version
pub const DEFAULT_API_VERSION: &str = "v1";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete client configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct MoloniConfig {
    /// API host, without the version segment
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Version substituted into every endpoint template
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Developer id issued by Moloni
    #[serde(default)]
    pub client_id: String,

    /// Developer secret issued by Moloni
    #[serde(default)]
    pub client_secret: String,

    /// How to obtain an access token
    #[serde(default)]
    pub auth: AuthGrant,

    /// Default company for commands that need one
    #[serde(default)]
    pub company_id: Option<Id>,

    /// Ask the API for readable error descriptions
    #[serde(default = "default_true")]
    pub human_errors: bool,

    /// Transport settings
    #[serde(default)]
    pub http: HttpSettings,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for MoloniConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_version: default_api_version(),
            client_id: String::new(),
            client_secret: String::new(),
            auth: AuthGrant::default(),
            company_id: None,
            human_errors: true,
            http: HttpSettings::default(),
        }
    }
}

impl fmt::Debug for MoloniConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MoloniConfig")
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("auth", &self.auth)
            .field("company_id", &self.company_id)
            .field("human_errors", &self.human_errors)
            .field("http", &self.http)
            .finish()
    }
}

// ============================================================================
// Auth Grant
// ============================================================================

/// Token acquisition strategy
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthGrant {
    /// No grant configured yet
    #[default]
    None,

    /// Resource-owner password grant
    Password { username: String, password: String },

    /// Authorization code returned to the application's redirect URI
    AuthorizationCode { code: String, redirect_uri: String },

    /// Previously issued refresh token
    RefreshToken { refresh_token: String },

    /// Pre-issued access token, used as-is
    AccessToken { access_token: String },
}

impl AuthGrant {
    /// Grant type name as sent to the API
    pub fn grant_type(&self) -> &'static str {
        match self {
            AuthGrant::None => "none",
            AuthGrant::Password { .. } => "password",
            AuthGrant::AuthorizationCode { .. } => "authorization_code",
            AuthGrant::RefreshToken { .. } => "refresh_token",
            AuthGrant::AccessToken { .. } => "access_token",
        }
    }
}

impl fmt::Debug for AuthGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthGrant::None => f.write_str("None"),
            AuthGrant::Password { username, .. } => f
                .debug_struct("Password")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            AuthGrant::AuthorizationCode { redirect_uri, .. } => f
                .debug_struct("AuthorizationCode")
                .field("code", &"<redacted>")
                .field("redirect_uri", redirect_uri)
                .finish(),
            AuthGrant::RefreshToken { .. } => f
                .debug_struct("RefreshToken")
                .field("refresh_token", &"<redacted>")
                .finish(),
            AuthGrant::AccessToken { .. } => f
                .debug_struct("AccessToken")
                .field("access_token", &"<redacted>")
                .finish(),
        }
    }
}

// ============================================================================
// HTTP Settings
// ============================================================================

/// Transport settings as they appear in the config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpSettings {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default)]
    pub backoff: BackoffType,

    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,

    /// 0 disables client-side rate limiting
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,

    #[serde(default = "default_requests_per_second")]
    pub burst_size: u32,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_backoff_ms() -> u64 {
    250
}

fn default_max_backoff_ms() -> u64 {
    10_000
}

fn default_requests_per_second() -> u32 {
    5
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            backoff: BackoffType::default(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            requests_per_second: default_requests_per_second(),
            burst_size: default_requests_per_second(),
        }
    }
}

impl HttpSettings {
    /// Build the transport config rooted at `base_url`
    pub fn to_client_config(&self, base_url: &str) -> HttpClientConfig {
        let rate_limit = (self.requests_per_second > 0).then(|| {
            RateLimiterConfig::new(self.requests_per_second, self.burst_size.max(1))
        });

        HttpClientConfig {
            base_url: base_url.to_string(),
            timeout: Duration::from_secs(self.timeout_secs),
            max_retries: self.max_retries,
            initial_backoff: Duration::from_millis(self.initial_backoff_ms),
            max_backoff: Duration::from_millis(self.max_backoff_ms),
            backoff_type: self.backoff,
            rate_limit,
            ..HttpClientConfig::default()
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

impl MoloniConfig {
    /// Config with developer credentials and a password grant
    pub fn with_password(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            auth: AuthGrant::Password {
                username: username.into(),
                password: password.into(),
            },
            ..Self::default()
        }
    }

    /// Load a config file (YAML or JSON)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                Error::config(format!(
                    "Failed to read config file '{}': {e}",
                    path.display()
                ))
            }
        })?;
        Self::from_str(&content)
    }

    /// Parse a config document (YAML or JSON)
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        let config: MoloniConfig = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Config built from defaults plus the process environment
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Override fields from `MOLONI_*` environment variables
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Override fields using the given variable lookup
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).none_if_empty();

        if let Some(v) = get("MOLONI_BASE_URL") {
            self.base_url = v;
        }
        if let Some(v) = get("MOLONI_API_VERSION") {
            self.api_version = v;
        }
        if let Some(v) = get("MOLONI_CLIENT_ID") {
            self.client_id = v;
        }
        if let Some(v) = get("MOLONI_CLIENT_SECRET") {
            self.client_secret = v;
        }
        if let Some(v) = get("MOLONI_COMPANY_ID") {
            match v.parse() {
                Ok(id) => self.company_id = Some(id),
                Err(_) => tracing::warn!("Ignoring non-numeric MOLONI_COMPANY_ID"),
            }
        }

        if let Some(token) = get("MOLONI_ACCESS_TOKEN") {
            self.auth = AuthGrant::AccessToken {
                access_token: token,
            };
        } else if let (Some(username), Some(password)) =
            (get("MOLONI_USERNAME"), get("MOLONI_PASSWORD"))
        {
            self.auth = AuthGrant::Password { username, password };
        }
    }

    /// Check the config is usable before any request is made
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(Error::missing_field("base_url"));
        }
        url::Url::parse(&self.base_url)
            .map_err(|e| Error::invalid_value("base_url", e.to_string()))?;

        if self.api_version.trim().is_empty() {
            return Err(Error::missing_field("api_version"));
        }
        if self.api_version.contains('/') {
            return Err(Error::invalid_value(
                "api_version",
                "must be a single path segment",
            ));
        }

        match &self.auth {
            AuthGrant::None => return Err(Error::missing_field("auth")),
            AuthGrant::AccessToken { access_token } => {
                require("auth.access_token", access_token)?;
                return Ok(());
            }
            AuthGrant::Password { username, password } => {
                require("auth.username", username)?;
                require("auth.password", password)?;
            }
            AuthGrant::AuthorizationCode { code, redirect_uri } => {
                require("auth.code", code)?;
                require("auth.redirect_uri", redirect_uri)?;
            }
            AuthGrant::RefreshToken { refresh_token } => {
                require("auth.refresh_token", refresh_token)?;
            }
        }

        // Every grant other than a static token goes through the grant endpoint
        require("client_id", &self.client_id)?;
        require("client_secret", &self.client_secret)?;

        Ok(())
    }

    /// `{base_url}/{api_version}/grant/`
    pub fn grant_url(&self) -> String {
        format!(
            "{}/{}/grant/",
            self.base_url.trim_end_matches('/'),
            self.api_version
        )
    }
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(Error::missing_field(field))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = MoloniConfig::default();
        assert_eq!(config.base_url, "https://api.moloni.pt");
        assert_eq!(config.api_version, "v1");
        assert!(config.human_errors);
        assert_eq!(config.http.max_retries, 3);
        assert_eq!(config.auth, AuthGrant::None);
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r"
client_id: dev
client_secret: s3cret
company_id: 5
auth:
  type: password
  username: me@example.com
  password: pw
http:
  timeout_secs: 10
  requests_per_second: 0
";
        let config = MoloniConfig::from_str(yaml).unwrap();
        assert_eq!(config.client_id, "dev");
        assert_eq!(config.company_id, Some(5));
        assert_eq!(
            config.auth,
            AuthGrant::Password {
                username: "me@example.com".to_string(),
                password: "pw".to_string()
            }
        );
        assert_eq!(config.http.timeout_secs, 10);
        assert_eq!(config.http.max_retries, 3);
        assert!(config.validate().is_ok());

        let http = config.http.to_client_config(&config.base_url);
        assert!(http.rate_limit.is_none());
        assert_eq!(http.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_parse_json() {
        let json = r#"{"client_id":"a","client_secret":"b","auth":{"type":"access_token","access_token":"tok"}}"#;
        let config = MoloniConfig::from_str(json).unwrap();
        assert!(matches!(config.auth, AuthGrant::AccessToken { .. }));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "client_id: x\nclient_secret: y\nauth:\n  type: refresh_token\n  refresh_token: r"
        )
        .unwrap();

        let config = MoloniConfig::from_file(file.path()).unwrap();
        assert_eq!(config.auth.grant_type(), "refresh_token");
    }

    #[test]
    fn test_from_missing_file() {
        let err = MoloniConfig::from_file("/nonexistent/moloni.yaml").unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[test]
    fn test_validate_missing_grant() {
        let config = MoloniConfig::default();
        assert!(matches!(
            config.validate(),
            Err(Error::MissingConfigField { ref field }) if field == "auth"
        ));
    }

    #[test]
    fn test_validate_missing_secret() {
        let mut config = MoloniConfig::with_password("id", "secret", "u", "p");
        assert!(config.validate().is_ok());

        config.client_secret = String::new();
        assert!(matches!(
            config.validate(),
            Err(Error::MissingConfigField { ref field }) if field == "client_secret"
        ));
    }

    #[test]
    fn test_validate_bad_version() {
        let mut config = MoloniConfig::with_password("id", "secret", "u", "p");
        config.api_version = "v1/extra".to_string();
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfigValue { .. })
        ));
    }

    #[test]
    fn test_apply_env() {
        let vars: HashMap<&str, &str> = [
            ("MOLONI_CLIENT_ID", "env-id"),
            ("MOLONI_CLIENT_SECRET", "env-secret"),
            ("MOLONI_USERNAME", "user@example.com"),
            ("MOLONI_PASSWORD", "pw"),
            ("MOLONI_COMPANY_ID", "77"),
            ("MOLONI_API_VERSION", ""),
        ]
        .into_iter()
        .collect();

        let mut config = MoloniConfig::default();
        config.apply_env_with(|key| vars.get(key).map(|v| (*v).to_string()));

        assert_eq!(config.client_id, "env-id");
        assert_eq!(config.company_id, Some(77));
        assert_eq!(config.api_version, "v1");
        assert_eq!(config.auth.grant_type(), "password");
    }

    #[test]
    fn test_access_token_env_wins() {
        let mut config = MoloniConfig::default();
        config.apply_env_with(|key| match key {
            "MOLONI_ACCESS_TOKEN" => Some("tok".to_string()),
            "MOLONI_USERNAME" | "MOLONI_PASSWORD" => Some("x".to_string()),
            _ => None,
        });
        assert_eq!(config.auth.grant_type(), "access_token");
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = MoloniConfig::with_password("id", "topsecret", "user", "hunter2");
        let debug = format!("{config:?}");
        assert!(!debug.contains("topsecret"));
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("user"));
    }

    #[test]
    fn test_grant_url() {
        let mut config = MoloniConfig::default();
        config.base_url = "http://localhost:9000/".to_string();
        assert_eq!(config.grant_url(), "http://localhost:9000/v1/grant/");
    }
}
