//! Host configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5012";
pub const DEFAULT_BACKEND_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_BACKEND_CONNECT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_PROXY_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Errors produced while reading host configuration.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid PORT: {0}")]
    InvalidPort(String),
    #[error("invalid BACKEND_URL '{0}' (expected http:// or https://)")]
    InvalidBackendUrl(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    pub port: u16,
    /// Origin of the storefront REST backend, without a trailing `/`.
    pub backend_url: String,
    pub timeouts: BackendTimeouts,
    /// Largest request body forwarded to the backend.
    pub max_body_bytes: usize,
}

impl HostConfig {
    /// Build typed host config from environment variables.
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `BACKEND_URL`: default `http://localhost:5012`
    /// - `BACKEND_REQUEST_TIMEOUT_SECS`: default 30
    /// - `BACKEND_CONNECT_TIMEOUT_SECS`: default 5
    /// - `PROXY_MAX_BODY_BYTES`: default 10 MiB
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for an unparseable port or a backend URL
    /// without an http(s) scheme.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`HostConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = parse_port(lookup("PORT").as_deref())?;
        let backend_url = parse_backend_url(lookup("BACKEND_URL").as_deref())?;
        let timeouts = BackendTimeouts {
            request_secs: parse_or(lookup("BACKEND_REQUEST_TIMEOUT_SECS"), DEFAULT_BACKEND_REQUEST_TIMEOUT_SECS),
            connect_secs: parse_or(lookup("BACKEND_CONNECT_TIMEOUT_SECS"), DEFAULT_BACKEND_CONNECT_TIMEOUT_SECS),
        };
        let max_body_bytes = parse_or(lookup("PROXY_MAX_BODY_BYTES"), DEFAULT_PROXY_MAX_BODY_BYTES);
        Ok(Self { port, backend_url, timeouts, max_body_bytes })
    }
}

fn parse_port(raw: Option<&str>) -> Result<u16, ConfigError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(DEFAULT_PORT),
        Some(value) => value.parse().map_err(|_| ConfigError::InvalidPort(value.to_owned())),
    }
}

fn parse_backend_url(raw: Option<&str>) -> Result<String, ConfigError> {
    let url = match raw.map(str::trim) {
        None | Some("") => DEFAULT_BACKEND_URL,
        Some(value) => value,
    };
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::InvalidBackendUrl(url.to_owned()));
    }
    Ok(url.trim_end_matches('/').to_owned())
}

fn parse_or<T: std::str::FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}
