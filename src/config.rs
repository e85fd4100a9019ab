//! Auth configuration: endpoints, cookie names, base URL handling.
//!
//! DESIGN
//! ======
//! The config is read-only at runtime. It deserializes from JSON with every
//! field defaulted, and [`AuthConfig::from_env`] layers environment variables
//! over either a JSON file (`AUTH_CONFIG_FILE`) or the defaults.
//!
//! Inside an explicit `endpoints` object, an omitted endpoint means "not
//! configured". Omitting `endpoints` entirely gives [`Endpoints::standard`].

use serde::{Deserialize, Serialize};

use crate::error::AuthError;

pub const DEFAULT_BASE_URL: &str = "/api/auth";
pub const DEFAULT_ORIGIN_ENV_KEY: &str = "AUTH_ORIGIN";
pub const DEFAULT_SESSION_COOKIE: &str = "session";
pub const DEFAULT_CSRF_COOKIE: &str = "XSRF-TOKEN";
pub const DEFAULT_CSRF_HEADER: &str = "X-XSRF-TOKEN";
pub const DEFAULT_REDIRECT_FALLBACK_MS: u64 = 1000;

/// HTTP method of a configured endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    #[must_use]
    pub fn as_method(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Patch => reqwest::Method::PATCH,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

/// One backend endpoint: a path (or absolute URL) and its method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub path: String,
    #[serde(default)]
    pub method: HttpMethod,
}

impl Endpoint {
    #[must_use]
    pub fn new(path: impl Into<String>, method: HttpMethod) -> Self {
        Self { path: path.into(), method }
    }
}

/// Logical operation name → endpoint. `None` means the backend has no such route.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub sign_in: Option<Endpoint>,
    pub sign_out: Option<Endpoint>,
    pub sign_up: Option<Endpoint>,
    pub get_session: Option<Endpoint>,
    pub csrf: Option<Endpoint>,
}

impl Endpoints {
    /// The endpoint layout used when no `endpoints` section is given.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            sign_in: Some(Endpoint::new("/login", HttpMethod::Post)),
            sign_out: Some(Endpoint::new("/logout", HttpMethod::Post)),
            sign_up: Some(Endpoint::new("/register", HttpMethod::Post)),
            get_session: Some(Endpoint::new("/session", HttpMethod::Get)),
            csrf: Some(Endpoint::new("/csrf", HttpMethod::Get)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionCookieConfig {
    pub name: String,
}

impl Default for SessionCookieConfig {
    fn default() -> Self {
        Self { name: DEFAULT_SESSION_COOKIE.to_owned() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsrfConfig {
    /// Cookie the backend sets when the CSRF endpoint is called.
    pub cookie_name: String,
    /// Request header that echoes the cookie value on mutating requests.
    pub header_name: String,
}

impl Default for CsrfConfig {
    fn default() -> Self {
        Self { cookie_name: DEFAULT_CSRF_COOKIE.to_owned(), header_name: DEFAULT_CSRF_HEADER.to_owned() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedirectConfig {
    /// Fallback target after sign-out when neither an explicit callback nor a
    /// `redirect` query parameter is present. `None` keeps the current URL.
    pub sign_out: Option<String>,
    /// How long a browser location change may take before the router fallback.
    pub fallback_ms: u64,
}

impl Default for RedirectConfig {
    fn default() -> Self {
        Self { sign_out: None, fallback_ms: DEFAULT_REDIRECT_FALLBACK_MS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Base URL (or path) the endpoint paths are joined onto.
    pub base_url: String,
    /// When set, URLs keep their full origin instead of being reduced to a path.
    pub disable_internal_routing: bool,
    /// Env var that overrides `base_url` in the server context.
    pub origin_env_key: Option<String>,
    #[serde(default = "Endpoints::standard")]
    pub endpoints: Endpoints,
    pub cookie: SessionCookieConfig,
    pub csrf: CsrfConfig,
    pub redirect: RedirectConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            disable_internal_routing: false,
            origin_env_key: Some(DEFAULT_ORIGIN_ENV_KEY.to_owned()),
            endpoints: Endpoints::standard(),
            cookie: SessionCookieConfig::default(),
            csrf: CsrfConfig::default(),
            redirect: RedirectConfig::default(),
        }
    }
}

impl AuthConfig {
    /// Parse a JSON config document.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Config`] if the document is not valid JSON or has
    /// fields of the wrong type.
    pub fn from_json(raw: &str) -> Result<Self, AuthError> {
        serde_json::from_str(raw).map_err(|e| AuthError::Config(e.to_string()))
    }

    /// Read and parse a JSON config file.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Config`] if the file cannot be read or parsed.
    pub fn from_file(path: &str) -> Result<Self, AuthError> {
        let raw = std::fs::read_to_string(path).map_err(|e| AuthError::Config(format!("{path}: {e}")))?;
        Self::from_json(&raw)
    }

    /// Build config from environment variables.
    ///
    /// - `AUTH_CONFIG_FILE`: JSON file used as the starting point
    /// - `AUTH_BASE_URL`: overrides `base_url`
    /// - `AUTH_DISABLE_INTERNAL_ROUTING`: boolean (`1/true/yes/on`, `0/false/no/off`)
    /// - `AUTH_ORIGIN_ENV_KEY`: overrides `origin_env_key`; empty disables the override
    /// - `AUTH_SESSION_COOKIE`, `AUTH_CSRF_COOKIE`: cookie names
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Config`] if `AUTH_CONFIG_FILE` is set but unreadable.
    pub fn from_env() -> Result<Self, AuthError> {
        let mut config = match std::env::var("AUTH_CONFIG_FILE") {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };

        if let Ok(base_url) = std::env::var("AUTH_BASE_URL") {
            config.base_url = base_url;
        }
        if let Some(disable) = env_bool("AUTH_DISABLE_INTERNAL_ROUTING") {
            config.disable_internal_routing = disable;
        }
        if let Ok(key) = std::env::var("AUTH_ORIGIN_ENV_KEY") {
            config.origin_env_key = (!key.trim().is_empty()).then(|| key.trim().to_owned());
        }
        if let Ok(name) = std::env::var("AUTH_SESSION_COOKIE") {
            config.cookie.name = name;
        }
        if let Ok(name) = std::env::var("AUTH_CSRF_COOKIE") {
            config.csrf.cookie_name = name;
        }

        Ok(config)
    }
}

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
