//! Client-side session store: who, if anyone, this browser is signed in as.
//!
//! SYSTEM CONTEXT
//! ==============
//! The store is created once by `App`, handed to the tree through Leptos
//! context, and read by the bootstrap gate, route guards and the layout. It is
//! the only writer of [`SessionState`]; everyone else holds a read-only signal.
//!
//! DESIGN
//! ======
//! The backend owns session validity through an HTTP-only cookie, so the store
//! never sees a token. `login` only performs the credential exchange and then
//! delegates to `check_auth`, which is the single path that writes identity.
//!
//! Every operation draws a ticket from a monotonically increasing counter when
//! it starts. A response is applied only while its ticket is still the newest
//! one issued, so a slow probe cannot overwrite the outcome of a later login or
//! logout (last-issued-wins rather than last-resolved-wins).
//!
//! ERROR HANDLING
//! ==============
//! Nothing here returns an error. Login failures land in `last_error`; probe
//! and logout failures fold into "signed out" and are only logged.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use leptos::prelude::*;

use crate::net::api::{ApiError, AuthApi, HttpApi};
use crate::net::types::{LoginRequest, MeResponse};

/// Message shown when the backend rejects a credential exchange.
pub const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Privilege level attached to an identity.
///
/// Ordered: a higher capability satisfies every lower requirement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Capability {
    Standard,
    Admin,
}

impl Capability {
    /// Parse a backend role name, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn parse(role: &str) -> Option<Self> {
        match role.trim().to_ascii_lowercase().as_str() {
            "standard" | "user" => Some(Self::Standard),
            "admin" | "administrator" => Some(Self::Admin),
            _ => None,
        }
    }

    /// Map a role name to a capability, falling back to least privilege.
    #[must_use]
    pub fn from_role(role: &str) -> Self {
        Self::parse(role).unwrap_or_else(|| {
            log::warn!("unrecognized role {role:?}; treating as Standard");
            Self::Standard
        })
    }

    /// Whether this capability grants access to a region requiring `required`.
    #[must_use]
    pub fn satisfies(self, required: Self) -> bool {
        self >= required
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::Admin => "Admin",
        }
    }
}

/// The signed-in user as reported by the identity probe.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub capability: Capability,
}

impl From<MeResponse> for Identity {
    fn from(me: MeResponse) -> Self {
        Self { capability: Capability::from_role(&me.role), name: me.username }
    }
}

/// Snapshot of the client's authentication state.
///
/// There is no separate "authenticated" flag: the session is authenticated
/// exactly when `identity` is present.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    pub identity: Option<Identity>,
    /// Set once the first identity probe settles; never cleared.
    pub initialized: bool,
    /// A login, logout or probe is in flight.
    pub pending: bool,
    /// Failure text from the most recent login attempt.
    pub last_error: Option<String>,
}

impl SessionState {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    #[must_use]
    pub fn capability(&self) -> Option<Capability> {
        self.identity.as_ref().map(|identity| identity.capability)
    }

    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.identity.as_ref().map(|identity| identity.name.as_str())
    }
}

/// Session store over an [`AuthApi`] transport.
pub struct SessionStore<A> {
    api: Arc<A>,
    state: ArcRwSignal<SessionState>,
    issued: Arc<AtomicU64>,
    in_flight: Arc<AtomicUsize>,
}

/// The store as wired into the running application.
pub type AppSession = SessionStore<HttpApi>;

impl<A> Clone for SessionStore<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            state: self.state.clone(),
            issued: Arc::clone(&self.issued),
            in_flight: Arc::clone(&self.in_flight),
        }
    }
}

impl<A: AuthApi> SessionStore<A> {
    #[must_use]
    pub fn new(api: A) -> Self {
        Self {
            api: Arc::new(api),
            state: ArcRwSignal::new(SessionState::default()),
            issued: Arc::new(AtomicU64::new(0)),
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    #[must_use]
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Read-only reactive handle for components and guards.
    #[must_use]
    pub fn state(&self) -> ArcReadSignal<SessionState> {
        self.state.read_only()
    }

    /// Current state without subscribing.
    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.state.get_untracked()
    }

    /// Exchange credentials for a session cookie, then probe identity.
    pub async fn login(&self, username: &str, password: &str) {
        let ticket = self.issue();
        let _pending = PendingGuard::enter(&self.in_flight, &self.state);
        self.state.update(|s| s.last_error = None);

        let request = LoginRequest { username: username.to_owned(), password: password.to_owned() };
        match self.api.login(&request).await {
            Ok(()) if self.is_current(ticket) => self.check_auth().await,
            Ok(()) => log::debug!("login {ticket} superseded; skipping identity probe"),
            Err(err) if self.is_current(ticket) => {
                log::info!("login rejected for {username:?}: {err}");
                let message = login_error_message(&err);
                self.state.update(|s| s.last_error = Some(message));
            }
            Err(err) => log::debug!("login {ticket} superseded; dropping failure: {err}"),
        }
    }

    /// End the session. Local state is signed out whether or not the backend
    /// call succeeds.
    pub async fn logout(&self) {
        let ticket = self.issue();
        let _pending = PendingGuard::enter(&self.in_flight, &self.state);

        if let Err(err) = self.api.logout().await {
            log::warn!("logout request failed: {err}");
        }
        if self.is_current(ticket) {
            self.state.update(|s| s.identity = None);
        } else {
            log::debug!("logout {ticket} superseded by a newer session operation");
        }
    }

    /// Ask the backend who the ambient cookie belongs to. Always leaves
    /// `initialized` set, whatever the outcome.
    pub async fn check_auth(&self) {
        let ticket = self.issue();
        let _pending = PendingGuard::enter(&self.in_flight, &self.state);

        let identity = match self.api.me().await {
            Ok(me) => Some(Identity::from(me)),
            Err(err) => {
                log::debug!("identity probe failed; treating as signed out: {err}");
                None
            }
        };
        let current = self.is_current(ticket);
        if !current {
            log::debug!("identity probe {ticket} superseded; keeping newer state");
        }
        self.state.update(|s| {
            if current {
                s.identity = identity;
            }
            s.initialized = true;
        });
    }

    fn issue(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.issued.load(Ordering::SeqCst) == ticket
    }
}

fn login_error_message(err: &ApiError) -> String {
    match err {
        ApiError::Status { .. } => INVALID_CREDENTIALS.to_owned(),
        other => format!("Sign-in failed: {other}"),
    }
}

/// Keeps `pending` raised while at least one operation is in flight and
/// lowers it on every exit path, including early returns and unwinding.
struct PendingGuard {
    in_flight: Arc<AtomicUsize>,
    state: ArcRwSignal<SessionState>,
}

impl PendingGuard {
    fn enter(in_flight: &Arc<AtomicUsize>, state: &ArcRwSignal<SessionState>) -> Self {
        in_flight.fetch_add(1, Ordering::SeqCst);
        state.update(|s| s.pending = true);
        Self { in_flight: Arc::clone(in_flight), state: state.clone() }
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        if self.in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.state.update(|s| s.pending = false);
        }
    }
}
