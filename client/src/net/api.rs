//! REST API helpers for communicating with the storefront backend.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`, always with
//! `credentials: include` so the backend's session cookie rides along.
//! Server-side (SSR): stubs returning [`ApiError::Unavailable`] since these
//! endpoints are only meaningful in the browser.
//!
//! ERROR HANDLING
//! ==============
//! Every call returns `Result<_, ApiError>` instead of panicking so pages can
//! render the failure inline and the session store can fold it into state.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use super::types::{
    Friend, FriendRequest, Game, GameInput, IncomingFriendRequest, LoginRequest, MeResponse,
    OutgoingFriendRequest, OwnedGame,
};

/// Errors surfaced by REST calls.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (offline, DNS, CORS, ...).
    #[error("network error: {0}")]
    Network(String),
    /// The backend answered with a non-2xx status.
    #[error("request failed: {status}")]
    Status {
        status: u16,
        /// `error` or `message` field of the reply body, when present.
        message: Option<String>,
    },
    /// A 2xx body did not match the expected shape.
    #[error("malformed response: {0}")]
    Decode(String),
    /// Called from a build without a browser transport.
    #[error("not available on server")]
    Unavailable,
}

impl ApiError {
    /// HTTP status for [`ApiError::Status`], `None` otherwise.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Backend-supplied message when present, otherwise `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Status { message: Some(message), .. } if !message.trim().is_empty() => message.clone(),
            _ => fallback.to_owned(),
        }
    }
}

/// Prefix prepended to every API path and backend asset path.
///
/// Empty (same-origin) unless the bundle was built with
/// `STOREFRONT_API_BASE` set.
#[must_use]
pub fn api_base() -> &'static str {
    option_env!("STOREFRONT_API_BASE").unwrap_or("").trim_end_matches('/')
}

/// Resolve a backend-relative asset path (e.g. `headerImageUrl`) to a URL the
/// browser can load. Absolute URLs pass through.
#[must_use]
pub fn asset_url(path: &str) -> String {
    join_base(api_base(), path)
}

fn join_base(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") || path.starts_with("data:") {
        return path.to_owned();
    }
    if path.starts_with('/') { format!("{base}{path}") } else { format!("{base}/{path}") }
}

#[cfg(any(test, feature = "hydrate"))]
fn game_endpoint(game_id: i64) -> String {
    format!("/api/games/{game_id}")
}

/// Friend actions keyed by username (`add`, `remove`) or request id
/// (`accept`, `reject`).
#[cfg(any(test, feature = "hydrate"))]
fn friend_action_endpoint(action: &str, target: &str) -> String {
    format!("/api/friends/{action}/{}", urlencoding::encode(target))
}

// =============================================================================
// AUTH
// =============================================================================

/// Backend operations the session store depends on.
///
/// [`HttpApi`] is the browser implementation; tests substitute scripted
/// in-memory implementations.
#[allow(async_fn_in_trait)]
pub trait AuthApi {
    /// `POST /api/auth/login`. `Ok` means the backend accepted the credentials
    /// and set its session cookie; the response body is not inspected.
    ///
    /// # Errors
    ///
    /// [`ApiError::Status`] when the credentials are rejected, other variants
    /// on transport failure.
    async fn login(&self, request: &LoginRequest) -> Result<(), ApiError>;

    /// `POST /api/auth/logout`.
    ///
    /// # Errors
    ///
    /// Any transport or status failure; callers treat it as best effort.
    async fn logout(&self) -> Result<(), ApiError>;

    /// `GET /api/auth/me` using the ambient session cookie.
    ///
    /// # Errors
    ///
    /// [`ApiError::Status`] (typically 401) when no valid session exists.
    async fn me(&self) -> Result<MeResponse, ApiError>;
}

/// Cookie-credentialed HTTP transport backed by `gloo-net`.
#[derive(Clone, Copy, Debug, Default)]
pub struct HttpApi;

impl AuthApi for HttpApi {
    async fn login(&self, request: &LoginRequest) -> Result<(), ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let resp = http::send(http::post("/api/auth/login").json(request).map_err(http::network)?).await?;
            http::ensure_ok(resp).await.map(|_| ())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = request;
            Err(ApiError::Unavailable)
        }
    }

    async fn logout(&self) -> Result<(), ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let resp = http::send(http::post("/api/auth/logout").build().map_err(http::network)?).await?;
            http::ensure_ok(resp).await.map(|_| ())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Err(ApiError::Unavailable)
        }
    }

    async fn me(&self) -> Result<MeResponse, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            http::get_json("/api/auth/me").await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Err(ApiError::Unavailable)
        }
    }
}

// =============================================================================
// CATALOG
// =============================================================================

/// Fetch every listing from `GET /api/games`.
///
/// # Errors
///
/// Returns an [`ApiError`] on transport, status or decode failure.
pub async fn fetch_games() -> Result<Vec<Game>, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        http::get_json("/api/games").await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Err(ApiError::Unavailable)
    }
}

/// Fetch one listing from `GET /api/games/{id}`.
///
/// # Errors
///
/// Returns [`ApiError::Status`] with 404 for unknown ids.
pub async fn fetch_game(game_id: i64) -> Result<Game, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        http::get_json(&game_endpoint(game_id)).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = game_id;
        Err(ApiError::Unavailable)
    }
}

/// Multipart part name for the header image.
pub const HEADER_IMAGE_PART: &str = "headerImage";
/// Multipart part name for the page background image.
pub const BACKGROUND_IMAGE_PART: &str = "backgroundImage";
/// Multipart part name for carousel screenshots; repeated once per file.
pub const GAME_IMAGES_PART: &str = "gameImages";

/// Image files picked in the listing form, tagged with their part names.
#[derive(Clone, Debug, Default)]
pub struct ImageUploads {
    #[cfg(feature = "hydrate")]
    files: Vec<(&'static str, web_sys::File)>,
}

impl ImageUploads {
    /// True when no file was picked; the listing then goes out as JSON.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        #[cfg(feature = "hydrate")]
        {
            self.files.is_empty()
        }
        #[cfg(not(feature = "hydrate"))]
        {
            true
        }
    }

    #[cfg(feature = "hydrate")]
    pub fn push(&mut self, part: &'static str, file: web_sys::File) {
        self.files.push((part, file));
    }
}

/// Create a listing via `POST /api/games`, as JSON or, when images are
/// attached, as multipart form data.
///
/// # Errors
///
/// Returns an [`ApiError`] if the backend rejects the listing.
pub async fn create_game(input: &GameInput, uploads: &ImageUploads) -> Result<(), ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let request = http::post("/api/games");
        let request = if uploads.is_empty() {
            request.json(input).map_err(http::network)?
        } else {
            request.body(http::multipart(input, uploads)?).map_err(http::network)?
        };
        let resp = http::send(request).await?;
        http::ensure_ok(resp).await.map(|_| ())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (input, uploads);
        Err(ApiError::Unavailable)
    }
}

/// Replace a listing via `PUT /api/games/{id}`, encoded like
/// [`create_game`].
///
/// # Errors
///
/// Returns an [`ApiError`] if the backend rejects the update.
pub async fn update_game(game_id: i64, input: &GameInput, uploads: &ImageUploads) -> Result<(), ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let request = http::put(&game_endpoint(game_id));
        let request = if uploads.is_empty() {
            request.json(input).map_err(http::network)?
        } else {
            request.body(http::multipart(input, uploads)?).map_err(http::network)?
        };
        let resp = http::send(request).await?;
        http::ensure_ok(resp).await.map(|_| ())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (game_id, input, uploads);
        Err(ApiError::Unavailable)
    }
}

/// Remove a listing via `DELETE /api/games/{id}`.
///
/// # Errors
///
/// Returns an [`ApiError`] if the backend refuses the delete.
pub async fn delete_game(game_id: i64) -> Result<(), ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let resp = http::send(http::delete(&game_endpoint(game_id)).build().map_err(http::network)?).await?;
        http::ensure_ok(resp).await.map(|_| ())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = game_id;
        Err(ApiError::Unavailable)
    }
}

// =============================================================================
// LIBRARY
// =============================================================================

/// Outcome of `POST /api/profile/add`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddToLibraryOutcome {
    Added,
    /// The backend answered 501.
    NotImplemented,
    /// Any other non-error status.
    Unexpected(u16),
}

#[cfg(any(test, feature = "hydrate"))]
fn classify_add_status(status: u16) -> AddToLibraryOutcome {
    match status {
        200 | 201 => AddToLibraryOutcome::Added,
        501 => AddToLibraryOutcome::NotImplemented,
        other => AddToLibraryOutcome::Unexpected(other),
    }
}

/// Fetch the signed-in user's library from `GET /api/users/me/games`.
///
/// # Errors
///
/// Returns an [`ApiError`] on failure (401 when signed out).
pub async fn fetch_owned_games() -> Result<Vec<OwnedGame>, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        http::get_json("/api/users/me/games").await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Err(ApiError::Unavailable)
    }
}

/// Add a game to the signed-in user's library.
///
/// # Errors
///
/// Returns an [`ApiError`] for transport failures and 4xx/5xx statuses
/// other than 501.
pub async fn add_to_library(game_id: i64) -> Result<AddToLibraryOutcome, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let body = super::types::AddToLibraryRequest { game_id };
        let resp = http::send(http::post("/api/profile/add").json(&body).map_err(http::network)?).await?;
        let outcome = classify_add_status(resp.status());
        if outcome == AddToLibraryOutcome::NotImplemented || resp.ok() {
            return Ok(outcome);
        }
        http::ensure_ok(resp).await.map(|_| outcome)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = game_id;
        Err(ApiError::Unavailable)
    }
}

// =============================================================================
// FRIENDS
// =============================================================================

/// Accepted friends, incoming and outgoing requests, fetched together.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FriendsOverview {
    pub friends: Vec<Friend>,
    pub incoming: Vec<FriendRequest>,
    pub outgoing: Vec<FriendRequest>,
}

impl FriendsOverview {
    /// Assemble the overview, dropping requests the backend sent without ids.
    #[must_use]
    pub fn from_parts(
        friends: Vec<Friend>,
        incoming: Vec<IncomingFriendRequest>,
        outgoing: Vec<OutgoingFriendRequest>,
    ) -> Self {
        Self {
            friends,
            incoming: incoming.into_iter().filter_map(IncomingFriendRequest::normalize).collect(),
            outgoing: outgoing.into_iter().filter_map(OutgoingFriendRequest::normalize).collect(),
        }
    }
}

/// Fetch `/api/friends`, `/api/friends/pending` and `/api/friends/sent`
/// concurrently.
///
/// # Errors
///
/// Returns the first [`ApiError`] among the three calls.
pub async fn fetch_friends_overview() -> Result<FriendsOverview, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let (friends, incoming, outgoing) = futures::future::try_join3(
            http::get_json::<Vec<Friend>>("/api/friends"),
            http::get_json::<Vec<IncomingFriendRequest>>("/api/friends/pending"),
            http::get_json::<Vec<OutgoingFriendRequest>>("/api/friends/sent"),
        )
        .await?;
        Ok(FriendsOverview::from_parts(friends, incoming, outgoing))
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Err(ApiError::Unavailable)
    }
}

/// Fetch only the accepted friends list.
///
/// # Errors
///
/// Returns an [`ApiError`] on failure.
pub async fn fetch_friends() -> Result<Vec<Friend>, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        http::get_json("/api/friends").await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Err(ApiError::Unavailable)
    }
}

/// Send a friend request to `username`.
///
/// # Errors
///
/// Returns an [`ApiError`] carrying the backend's `error` text when present.
pub async fn send_friend_request(username: &str) -> Result<(), ApiError> {
    friend_action("add", username).await.map(|_| ())
}

/// Accept an incoming request.
///
/// # Errors
///
/// Returns an [`ApiError`] on failure.
pub async fn accept_friend_request(request_id: i64) -> Result<(), ApiError> {
    friend_action("accept", &request_id.to_string()).await.map(|_| ())
}

/// Decline an incoming request or cancel an outgoing one. Returns the
/// backend's confirmation message, if any.
///
/// # Errors
///
/// Returns an [`ApiError`] on failure.
pub async fn reject_friend_request(request_id: i64) -> Result<Option<String>, ApiError> {
    friend_action("reject", &request_id.to_string()).await
}

/// Remove `username` from the friends list.
///
/// # Errors
///
/// Returns an [`ApiError`] carrying the backend's `error` text when present.
pub async fn remove_friend(username: &str) -> Result<(), ApiError> {
    friend_action("remove", username).await.map(|_| ())
}

async fn friend_action(action: &str, target: &str) -> Result<Option<String>, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let url = friend_action_endpoint(action, target);
        let resp = http::send(http::post(&url).build().map_err(http::network)?).await?;
        let resp = http::ensure_ok(resp).await?;
        let body = resp.json::<super::types::MessageBody>().await.unwrap_or_default();
        Ok(body.message)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (action, target);
        Err(ApiError::Unavailable)
    }
}

// =============================================================================
// TRANSPORT
// =============================================================================

#[cfg(feature = "hydrate")]
mod http {
    use gloo_net::http::{Request, RequestBuilder, Response};
    use serde::de::DeserializeOwned;
    use wasm_bindgen::JsValue;
    use web_sys::{FormData, RequestCredentials};

    use super::{ApiError, ImageUploads, api_base};
    use crate::net::types::{GameInput, MessageBody};

    fn url(path: &str) -> String {
        format!("{}{path}", api_base())
    }

    pub(super) fn get(path: &str) -> RequestBuilder {
        Request::get(&url(path)).credentials(RequestCredentials::Include)
    }

    pub(super) fn post(path: &str) -> RequestBuilder {
        Request::post(&url(path)).credentials(RequestCredentials::Include)
    }

    pub(super) fn put(path: &str) -> RequestBuilder {
        Request::put(&url(path)).credentials(RequestCredentials::Include)
    }

    pub(super) fn delete(path: &str) -> RequestBuilder {
        Request::delete(&url(path)).credentials(RequestCredentials::Include)
    }

    pub(super) fn network(err: gloo_net::Error) -> ApiError {
        ApiError::Network(err.to_string())
    }

    pub(super) async fn send(request: Request) -> Result<Response, ApiError> {
        request.send().await.map_err(network)
    }

    /// Pass 2xx responses through; turn anything else into
    /// [`ApiError::Status`] carrying the body's `error`/`message` text.
    pub(super) async fn ensure_ok(resp: Response) -> Result<Response, ApiError> {
        if resp.ok() {
            return Ok(resp);
        }
        let status = resp.status();
        let message = resp.json::<MessageBody>().await.ok().and_then(|body| body.error.or(body.message));
        Err(ApiError::Status { status, message })
    }

    /// Text fields plus picked files. The browser supplies the multipart
    /// boundary, so no `Content-Type` is set here.
    pub(super) fn multipart(input: &GameInput, uploads: &ImageUploads) -> Result<FormData, ApiError> {
        let form = FormData::new().map_err(script_error)?;
        for (key, value) in input.form_fields() {
            form.append_with_str(key, &value).map_err(script_error)?;
        }
        for (part, file) in &uploads.files {
            form.append_with_blob_and_filename(part, file, &file.name()).map_err(script_error)?;
        }
        Ok(form)
    }

    fn script_error(err: JsValue) -> ApiError {
        ApiError::Network(format!("{err:?}"))
    }

    pub(super) async fn get_json<T: DeserializeOwned>(path: &str) -> Result<T, ApiError> {
        let resp = send(get(path).build().map_err(network)?).await?;
        let resp = ensure_ok(resp).await?;
        resp.json::<T>().await.map_err(|e| ApiError::Decode(e.to_string()))
    }
}
