//! Shared host state.
//!
//! DESIGN
//! ======
//! `HostState` is injected into Axum handlers via the `State` extractor. It
//! holds the pooled HTTP client used to reach the backend and the limits the
//! proxy enforces. It is cheap to clone.

use std::sync::Arc;
use std::time::Duration;

use crate::config::HostConfig;

#[derive(Clone)]
pub struct HostState {
    pub http: reqwest::Client,
    pub backend_url: Arc<str>,
    pub max_body_bytes: usize,
}

impl HostState {
    /// Build the backend client from config. Redirects are returned to the
    /// browser rather than followed.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &HostConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self { http, backend_url: Arc::from(config.backend_url.as_str()), max_body_bytes: config.max_body_bytes })
    }
}
