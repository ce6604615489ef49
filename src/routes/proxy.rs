//! Same-origin reverse proxy for `/api/*`.
//!
//! SYSTEM CONTEXT
//! ==============
//! The browser bundle calls `/api/...` on the origin it was served from. This
//! handler forwards each call to `BACKEND_URL` unchanged apart from
//! hop-by-hop headers, so the backend's session cookie is set and returned on
//! the storefront origin.

#[cfg(test)]
#[path = "proxy_test.rs"]
mod tests;

use axum::body::{Body, Bytes};
use axum::extract::rejection::{BytesRejection, FailedToBufferBody};
use axum::extract::{FromRequest, Request, State};
use axum::http::header::{self, HeaderMap, HeaderName};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::state::HostState;

/// Errors produced while forwarding a request.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("request body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },
    #[error("could not read request body: {0}")]
    BodyUnreadable(String),
    #[error("backend request failed: {0}")]
    Upstream(#[from] reqwest::Error),
    #[error("invalid backend response: {0}")]
    Response(#[from] axum::http::Error),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::BodyTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::BodyUnreadable(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(_) | Self::Response(_) => StatusCode::BAD_GATEWAY,
        };
        tracing::warn!(error = %self, %status, "proxy request failed");
        (status, axum::Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

/// Headers that describe a single connection and must not be forwarded.
static HOP_BY_HOP: [HeaderName; 8] = [
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

pub(crate) fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP.contains(name)
}

/// Copy end-to-end headers. `Host` and `Content-Length` are dropped from
/// requests; the client recomputes both.
pub(crate) fn forwardable_request_headers(headers: &HeaderMap) -> HeaderMap {
    headers
        .iter()
        .filter(|(name, _)| !is_hop_by_hop(name) && *name != header::HOST && *name != header::CONTENT_LENGTH)
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

/// Backend URL for an incoming path and query.
pub(crate) fn upstream_url(backend_url: &str, path_and_query: &str) -> String {
    format!("{backend_url}{path_and_query}")
}

/// Only the length limit maps to 413; any other buffering failure is the
/// client's stream breaking.
pub(crate) fn body_error(rejection: BytesRejection, limit: usize) -> ProxyError {
    match rejection {
        BytesRejection::FailedToBufferBody(FailedToBufferBody::LengthLimitError(_)) => {
            ProxyError::BodyTooLarge { limit }
        }
        other => ProxyError::BodyUnreadable(other.body_text()),
    }
}

/// Forward the request to the backend and relay its response.
///
/// # Errors
///
/// Returns [`ProxyError`] when the body is over the limit or unreadable, the
/// backend is unreachable, or its response cannot be relayed.
pub async fn forward(State(state): State<HostState>, request: Request) -> Result<Response, ProxyError> {
    let method = request.method().clone();
    let uri = request.uri();
    let path_and_query = uri.path_and_query().map_or_else(|| uri.path(), |pq| pq.as_str());
    let url = upstream_url(&state.backend_url, path_and_query);
    let headers = forwardable_request_headers(request.headers());
    let body = Bytes::from_request(request, &state)
        .await
        .map_err(|rejection| body_error(rejection, state.max_body_bytes))?;

    tracing::debug!(%method, %url, "proxying");
    let upstream = state
        .http
        .request(method, &url)
        .headers(headers)
        .body(body)
        .send()
        .await?;

    let status = upstream.status();
    let headers = upstream.headers().clone();
    let bytes = upstream.bytes().await?;

    let mut response = Response::builder().status(status);
    for (name, value) in headers.iter().filter(|(name, _)| !is_hop_by_hop(name)) {
        response = response.header(name, value);
    }
    Ok(response.body(Body::from(bytes))?)
}
