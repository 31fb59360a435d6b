//! Configuration system (layered: code > env > config file).

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, UhomeError};

pub const DEFAULT_OAUTH_BASE_URL: &str = "https://oauth.u-tec.com";
pub const DEFAULT_API_BASE_URL: &str = "https://api.u-tec.com";
pub const AUTHORIZE_ENDPOINT: &str = "https://oauth.u-tec.com/authorize";
pub const TOKEN_ENDPOINT: &str = "https://oauth.u-tec.com/token";
pub const ACTION_ENDPOINT: &str = "https://api.u-tec.com/action";
pub const API_SCOPE: &str = "openapi";
pub const DEFAULT_PAYLOAD_VERSION: &str = "1";

const ENV_MAPPINGS: [(&str, Field); 6] = [
    ("UHOME_CLIENT_ID", Field::ClientId),
    ("UHOME_CLIENT_SECRET", Field::ClientSecret),
    ("UHOME_REDIRECT_URI", Field::RedirectUri),
    ("UHOME_OAUTH_BASE_URL", Field::OauthBaseUrl),
    ("UHOME_API_BASE_URL", Field::ApiBaseUrl),
    ("UHOME_PAYLOAD_VERSION", Field::PayloadVersion),
];

#[derive(Debug, Clone, Copy)]
enum Field {
    ClientId,
    ClientSecret,
    RedirectUri,
    OauthBaseUrl,
    ApiBaseUrl,
    PayloadVersion,
}

/// Client credentials and endpoint settings.
///
/// Resolution order (highest first):
/// 1. Values set in code (`set_*` / struct fields)
/// 2. Environment variables (`UHOME_*`, `.env` honoured)
/// 3. `config.toml` in the user config directory
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UhomeConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_uri: Option<String>,
    pub oauth_base_url: Option<String>,
    pub api_base_url: Option<String>,
    pub payload_version: Option<String>,
}

impl UhomeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from `UHOME_*` environment variables.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        let mut config = Self::new();
        for (env_var, field) in ENV_MAPPINGS {
            if let Ok(value) = std::env::var(env_var) {
                if !value.is_empty() {
                    *config.slot(field) = Some(value);
                }
            }
        }
        config
    }

    /// Parse a TOML config file. A missing file yields an empty config.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = match std::fs::read_to_string(path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Self::new()),
            Err(err) => return Err(err.into()),
        };
        toml::from_str(&raw).map_err(|e| {
            UhomeError::Configuration(format!("invalid config file {}: {e}", path.display()))
        })
    }

    /// Default config file path (`<config dir>/uhome/config.toml`).
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "u-tec", "uhome")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Environment layered over the default config file.
    pub fn load() -> Result<Self> {
        let file = match Self::default_path() {
            Some(path) => Self::from_file(&path)?,
            None => Self::new(),
        };
        Ok(Self::from_env().merge(file))
    }

    /// Fill unset values from `fallback`.
    pub fn merge(mut self, fallback: UhomeConfig) -> Self {
        self.client_id = self.client_id.or(fallback.client_id);
        self.client_secret = self.client_secret.or(fallback.client_secret);
        self.redirect_uri = self.redirect_uri.or(fallback.redirect_uri);
        self.oauth_base_url = self.oauth_base_url.or(fallback.oauth_base_url);
        self.api_base_url = self.api_base_url.or(fallback.api_base_url);
        self.payload_version = self.payload_version.or(fallback.payload_version);
        self
    }

    pub fn set_client_id(&mut self, value: impl Into<String>) {
        self.client_id = Some(value.into());
    }

    pub fn set_client_secret(&mut self, value: impl Into<String>) {
        self.client_secret = Some(value.into());
    }

    pub fn set_redirect_uri(&mut self, value: impl Into<String>) {
        self.redirect_uri = Some(value.into());
    }

    pub fn require_client_id(&self) -> Result<&str> {
        self.client_id
            .as_deref()
            .ok_or_else(|| UhomeError::Configuration("client id is not set".to_string()))
    }

    pub fn authorize_url(&self) -> String {
        match &self.oauth_base_url {
            Some(base) => join(base, "authorize"),
            None => AUTHORIZE_ENDPOINT.to_string(),
        }
    }

    pub fn token_url(&self) -> String {
        match &self.oauth_base_url {
            Some(base) => join(base, "token"),
            None => TOKEN_ENDPOINT.to_string(),
        }
    }

    pub fn action_url(&self) -> String {
        match &self.api_base_url {
            Some(base) => join(base, "action"),
            None => ACTION_ENDPOINT.to_string(),
        }
    }

    pub fn payload_version(&self) -> &str {
        self.payload_version
            .as_deref()
            .unwrap_or(DEFAULT_PAYLOAD_VERSION)
    }

    fn slot(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::ClientId => &mut self.client_id,
            Field::ClientSecret => &mut self.client_secret,
            Field::RedirectUri => &mut self.redirect_uri,
            Field::OauthBaseUrl => &mut self.oauth_base_url,
            Field::ApiBaseUrl => &mut self.api_base_url,
            Field::PayloadVersion => &mut self.payload_version,
        }
    }
}

fn join(base: &str, path: &str) -> String {
    format!("{}/{path}", base.trim_end_matches('/'))
}
