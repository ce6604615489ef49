use std::sync::Mutex;

use futures::channel::oneshot;
use futures::executor::{LocalPool, block_on};
use futures::task::LocalSpawnExt;

use super::*;

// =============================================================
// Helpers
// =============================================================

fn me(username: &str, role: &str) -> MeResponse {
    MeResponse { username: username.to_owned(), role: role.to_owned() }
}

fn unauthorized() -> ApiError {
    ApiError::Status { status: 401, message: None }
}

/// In-memory backend that checks credentials and tracks a fake session cookie.
struct StubBackend {
    accounts: Vec<(&'static str, &'static str, &'static str)>,
    session: Mutex<Option<MeResponse>>,
    logout_reachable: bool,
    probe_override: Option<ApiError>,
}

impl StubBackend {
    fn new() -> Self {
        Self {
            accounts: vec![("alice", "correct-pw", "Standard"), ("root", "admin-pw", "Admin")],
            session: Mutex::new(None),
            logout_reachable: true,
            probe_override: None,
        }
    }

    fn signed_in_as(self, username: &str, role: &str) -> Self {
        *self.session.lock().unwrap() = Some(me(username, role));
        self
    }
}

impl AuthApi for StubBackend {
    async fn login(&self, request: &LoginRequest) -> Result<(), ApiError> {
        let account = self
            .accounts
            .iter()
            .find(|(user, pass, _)| *user == request.username && *pass == request.password);
        match account {
            Some((user, _, role)) => {
                *self.session.lock().unwrap() = Some(me(user, role));
                Ok(())
            }
            None => Err(unauthorized()),
        }
    }

    async fn logout(&self) -> Result<(), ApiError> {
        if !self.logout_reachable {
            return Err(ApiError::Network("connection reset".to_owned()));
        }
        *self.session.lock().unwrap() = None;
        Ok(())
    }

    async fn me(&self) -> Result<MeResponse, ApiError> {
        if let Some(err) = &self.probe_override {
            return Err(err.clone());
        }
        self.session.lock().unwrap().clone().ok_or_else(unauthorized)
    }
}

/// Backend whose responses are released one at a time by the test, so the
/// order in which calls resolve can be chosen independently of issue order.
#[derive(Default)]
struct GatedBackend {
    logins: Mutex<Vec<Option<oneshot::Sender<Result<(), ApiError>>>>>,
    logouts: Mutex<Vec<Option<oneshot::Sender<Result<(), ApiError>>>>>,
    probes: Mutex<Vec<Option<oneshot::Sender<Result<MeResponse, ApiError>>>>>,
}

impl GatedBackend {
    fn resolve_login(&self, index: usize, result: Result<(), ApiError>) {
        let tx = self.logins.lock().unwrap()[index].take().expect("login already resolved");
        let _ = tx.send(result);
    }

    fn resolve_logout(&self, index: usize, result: Result<(), ApiError>) {
        let tx = self.logouts.lock().unwrap()[index].take().expect("logout already resolved");
        let _ = tx.send(result);
    }

    fn resolve_probe(&self, index: usize, result: Result<MeResponse, ApiError>) {
        let tx = self.probes.lock().unwrap()[index].take().expect("probe already resolved");
        let _ = tx.send(result);
    }

    fn probe_count(&self) -> usize {
        self.probes.lock().unwrap().len()
    }
}

fn dropped() -> ApiError {
    ApiError::Network("dropped".to_owned())
}

impl AuthApi for GatedBackend {
    async fn login(&self, _request: &LoginRequest) -> Result<(), ApiError> {
        let (tx, rx) = oneshot::channel();
        self.logins.lock().unwrap().push(Some(tx));
        rx.await.unwrap_or_else(|_| Err(dropped()))
    }

    async fn logout(&self) -> Result<(), ApiError> {
        let (tx, rx) = oneshot::channel();
        self.logouts.lock().unwrap().push(Some(tx));
        rx.await.unwrap_or_else(|_| Err(dropped()))
    }

    async fn me(&self) -> Result<MeResponse, ApiError> {
        let (tx, rx) = oneshot::channel();
        self.probes.lock().unwrap().push(Some(tx));
        rx.await.unwrap_or_else(|_| Err(dropped()))
    }
}

fn spawn<F>(pool: &LocalPool, fut: F)
where
    F: std::future::Future<Output = ()> + 'static,
{
    pool.spawner().spawn_local(fut).unwrap();
}

fn alice() -> Identity {
    Identity { name: "alice".to_owned(), capability: Capability::Standard }
}

// =============================================================
// Capability
// =============================================================

#[test]
fn capability_parse_ignores_case_and_whitespace() {
    assert_eq!(Capability::parse("Admin"), Some(Capability::Admin));
    assert_eq!(Capability::parse("  ADMIN "), Some(Capability::Admin));
    assert_eq!(Capability::parse("standard"), Some(Capability::Standard));
    assert_eq!(Capability::parse("superuser"), None);
}

#[test]
fn capability_from_unknown_role_is_least_privilege() {
    assert_eq!(Capability::from_role("moderator"), Capability::Standard);
    assert_eq!(Capability::from_role(""), Capability::Standard);
}

#[test]
fn capability_order_lets_admin_satisfy_standard() {
    assert!(Capability::Admin.satisfies(Capability::Standard));
    assert!(Capability::Admin.satisfies(Capability::Admin));
    assert!(Capability::Standard.satisfies(Capability::Standard));
    assert!(!Capability::Standard.satisfies(Capability::Admin));
}

#[test]
fn identity_from_me_response_maps_role() {
    let identity = Identity::from(me("root", "admin"));
    assert_eq!(identity, Identity { name: "root".to_owned(), capability: Capability::Admin });
}

// =============================================================
// Initial state
// =============================================================

#[test]
fn new_store_starts_signed_out_and_uninitialized() {
    let store = SessionStore::new(StubBackend::new());
    assert_eq!(store.snapshot(), SessionState::default());
    let state = store.snapshot();
    assert!(!state.is_authenticated());
    assert!(!state.initialized);
    assert!(!state.pending);
    assert_eq!(state.last_error, None);
}

// =============================================================
// check_auth
// =============================================================

#[test]
fn check_auth_without_cookie_settles_signed_out() {
    let store = SessionStore::new(StubBackend::new());
    block_on(store.check_auth());
    let state = store.snapshot();
    assert!(!state.is_authenticated());
    assert_eq!(state.identity, None);
    assert!(state.initialized);
    assert!(!state.pending);
}

#[test]
fn check_auth_with_cookie_populates_identity() {
    let store = SessionStore::new(StubBackend::new().signed_in_as("root", "Admin"));
    block_on(store.check_auth());
    let state = store.snapshot();
    assert_eq!(state.capability(), Some(Capability::Admin));
    assert_eq!(state.display_name(), Some("root"));
    assert!(state.initialized);
}

#[test]
fn check_auth_folds_transport_and_decode_failures_into_signed_out() {
    for failure in [ApiError::Network("offline".to_owned()), ApiError::Decode("expected string".to_owned())] {
        let mut backend = StubBackend::new().signed_in_as("alice", "Standard");
        backend.probe_override = Some(failure);
        let store = SessionStore::new(backend);
        block_on(store.check_auth());
        let state = store.snapshot();
        assert!(!state.is_authenticated());
        assert!(state.initialized);
        assert_eq!(state.last_error, None);
    }
}

// =============================================================
// login
// =============================================================

#[test]
fn login_with_valid_credentials_authenticates_via_probe() {
    let store = SessionStore::new(StubBackend::new());
    block_on(store.login("alice", "correct-pw"));
    assert_eq!(
        store.snapshot(),
        SessionState { identity: Some(alice()), initialized: true, pending: false, last_error: None }
    );
}

#[test]
fn login_with_invalid_credentials_sets_last_error() {
    let store = SessionStore::new(StubBackend::new());
    block_on(store.login("alice", "wrong-pw"));
    let state = store.snapshot();
    assert!(!state.is_authenticated());
    assert_eq!(state.identity, None);
    assert_eq!(state.last_error.as_deref(), Some(INVALID_CREDENTIALS));
    assert!(!state.pending);
}

#[test]
fn login_transport_failure_reports_error_text() {
    let store = SessionStore::new(GatedBackend::default());
    let mut pool = LocalPool::new();
    let s = store.clone();
    spawn(&pool, async move { s.login("alice", "correct-pw").await });
    pool.run_until_stalled();
    store.api().resolve_login(0, Err(ApiError::Network("offline".to_owned())));
    pool.run_until_stalled();
    let state = store.snapshot();
    assert_eq!(state.last_error.as_deref(), Some("Sign-in failed: network error: offline"));
    assert!(!state.is_authenticated());
}

#[test]
fn next_login_clears_previous_error_when_it_starts() {
    let store = SessionStore::new(GatedBackend::default());
    let mut pool = LocalPool::new();

    let s = store.clone();
    spawn(&pool, async move { s.login("alice", "wrong-pw").await });
    pool.run_until_stalled();
    store.api().resolve_login(0, Err(unauthorized()));
    pool.run_until_stalled();
    assert_eq!(store.snapshot().last_error.as_deref(), Some(INVALID_CREDENTIALS));

    let s = store.clone();
    spawn(&pool, async move { s.login("alice", "correct-pw").await });
    pool.run_until_stalled();
    assert_eq!(store.snapshot().last_error, None);
    assert!(store.snapshot().pending);
}

#[test]
fn login_probes_identity_only_after_credentials_are_accepted() {
    let store = SessionStore::new(GatedBackend::default());
    let mut pool = LocalPool::new();
    let s = store.clone();
    spawn(&pool, async move { s.login("alice", "correct-pw").await });
    pool.run_until_stalled();
    assert_eq!(store.api().probe_count(), 0);

    store.api().resolve_login(0, Ok(()));
    pool.run_until_stalled();
    assert_eq!(store.api().probe_count(), 1);
    assert!(store.snapshot().pending);

    store.api().resolve_probe(0, Ok(me("alice", "Standard")));
    pool.run_until_stalled();
    let state = store.snapshot();
    assert_eq!(state.identity, Some(alice()));
    assert!(!state.pending);
}

#[test]
fn accepted_login_with_failing_probe_stays_signed_out_without_error() {
    let mut backend = StubBackend::new();
    backend.probe_override = Some(ApiError::Network("offline".to_owned()));
    let store = SessionStore::new(backend);
    block_on(store.login("alice", "correct-pw"));
    let state = store.snapshot();
    assert!(!state.is_authenticated());
    assert!(state.initialized);
    assert_eq!(state.last_error, None);
}

// =============================================================
// logout
// =============================================================

#[test]
fn logout_signs_out_when_backend_succeeds() {
    let store = SessionStore::new(StubBackend::new().signed_in_as("alice", "Standard"));
    block_on(store.check_auth());
    assert!(store.snapshot().is_authenticated());

    block_on(store.logout());
    let state = store.snapshot();
    assert!(!state.is_authenticated());
    assert_eq!(state.identity, None);
    assert!(state.initialized);
}

#[test]
fn logout_signs_out_even_when_backend_is_unreachable() {
    let mut backend = StubBackend::new().signed_in_as("alice", "Standard");
    backend.logout_reachable = false;
    let store = SessionStore::new(backend);
    block_on(store.check_auth());
    assert!(store.snapshot().is_authenticated());

    block_on(store.logout());
    let state = store.snapshot();
    assert!(!state.is_authenticated());
    assert_eq!(state.identity, None);
    assert!(!state.pending);
}

#[test]
fn logout_before_any_probe_leaves_initialized_unset() {
    let store = SessionStore::new(StubBackend::new());
    block_on(store.logout());
    let state = store.snapshot();
    assert!(!state.is_authenticated());
    assert!(!state.initialized);
}

// =============================================================
// pending
// =============================================================

#[test]
fn pending_tracks_in_flight_probe() {
    let store = SessionStore::new(GatedBackend::default());
    let mut pool = LocalPool::new();
    let s = store.clone();
    spawn(&pool, async move { s.check_auth().await });
    pool.run_until_stalled();
    assert!(store.snapshot().pending);
    assert!(!store.snapshot().initialized);

    store.api().resolve_probe(0, Err(unauthorized()));
    pool.run_until_stalled();
    assert!(!store.snapshot().pending);
    assert!(store.snapshot().initialized);
}

#[test]
fn pending_stays_raised_until_last_overlapping_call_settles() {
    let store = SessionStore::new(GatedBackend::default());
    let mut pool = LocalPool::new();
    let s = store.clone();
    spawn(&pool, async move { s.check_auth().await });
    pool.run_until_stalled();
    let s = store.clone();
    spawn(&pool, async move { s.logout().await });
    pool.run_until_stalled();

    store.api().resolve_logout(0, Ok(()));
    pool.run_until_stalled();
    assert!(store.snapshot().pending);

    store.api().resolve_probe(0, Err(unauthorized()));
    pool.run_until_stalled();
    assert!(!store.snapshot().pending);
}

// =============================================================
// Overlapping operations (last-issued-wins)
// =============================================================

#[test]
fn stale_bootstrap_probe_cannot_undo_later_login() {
    let store = SessionStore::new(GatedBackend::default());
    let mut pool = LocalPool::new();

    let s = store.clone();
    spawn(&pool, async move { s.check_auth().await });
    pool.run_until_stalled();
    let s = store.clone();
    spawn(&pool, async move { s.login("alice", "correct-pw").await });
    pool.run_until_stalled();

    store.api().resolve_login(0, Ok(()));
    pool.run_until_stalled();
    store.api().resolve_probe(1, Ok(me("alice", "Standard")));
    pool.run_until_stalled();
    assert_eq!(store.snapshot().identity, Some(alice()));

    // The bootstrap probe went out before the cookie existed.
    store.api().resolve_probe(0, Err(unauthorized()));
    pool.run_until_stalled();
    let state = store.snapshot();
    assert_eq!(state.identity, Some(alice()));
    assert!(state.initialized);
    assert!(!state.pending);
}

#[test]
fn stale_probe_still_marks_initialized_without_touching_identity() {
    let store = SessionStore::new(GatedBackend::default());
    let mut pool = LocalPool::new();

    let s = store.clone();
    spawn(&pool, async move { s.check_auth().await });
    pool.run_until_stalled();
    let s = store.clone();
    spawn(&pool, async move { s.logout().await });
    pool.run_until_stalled();

    store.api().resolve_logout(0, Ok(()));
    pool.run_until_stalled();
    assert!(!store.snapshot().initialized);

    store.api().resolve_probe(0, Ok(me("alice", "Standard")));
    pool.run_until_stalled();
    let state = store.snapshot();
    assert!(state.initialized);
    assert!(!state.is_authenticated());
}

#[test]
fn logout_resolving_after_newer_login_is_discarded() {
    let store = SessionStore::new(GatedBackend::default());
    let mut pool = LocalPool::new();

    let s = store.clone();
    spawn(&pool, async move { s.logout().await });
    pool.run_until_stalled();
    let s = store.clone();
    spawn(&pool, async move { s.login("alice", "correct-pw").await });
    pool.run_until_stalled();

    store.api().resolve_login(0, Ok(()));
    pool.run_until_stalled();
    store.api().resolve_probe(0, Ok(me("alice", "Standard")));
    pool.run_until_stalled();

    store.api().resolve_logout(0, Err(dropped()));
    pool.run_until_stalled();
    assert_eq!(store.snapshot().identity, Some(alice()));
}

#[test]
fn superseded_login_failure_does_not_set_error() {
    let store = SessionStore::new(GatedBackend::default());
    let mut pool = LocalPool::new();

    let s = store.clone();
    spawn(&pool, async move { s.login("alice", "wrong-pw").await });
    pool.run_until_stalled();
    let s = store.clone();
    spawn(&pool, async move { s.check_auth().await });
    pool.run_until_stalled();

    store.api().resolve_login(0, Err(unauthorized()));
    pool.run_until_stalled();
    assert_eq!(store.snapshot().last_error, None);
}

// =============================================================
// Properties across operation sequences
// =============================================================

#[test]
fn initialized_never_reverts_and_identity_tracks_authentication() {
    let store = SessionStore::new(StubBackend::new());
    let mut seen_initialized = false;
    let mut check = |state: SessionState| {
        assert_eq!(state.is_authenticated(), state.identity.is_some());
        assert_eq!(state.is_authenticated(), state.capability().is_some());
        if seen_initialized {
            assert!(state.initialized, "initialized reverted");
        }
        seen_initialized |= state.initialized;
    };

    block_on(store.check_auth());
    check(store.snapshot());
    block_on(store.login("alice", "wrong-pw"));
    check(store.snapshot());
    block_on(store.login("alice", "correct-pw"));
    check(store.snapshot());
    block_on(store.logout());
    check(store.snapshot());
    block_on(store.login("root", "admin-pw"));
    check(store.snapshot());
    block_on(store.check_auth());
    check(store.snapshot());
    assert_eq!(store.snapshot().capability(), Some(Capability::Admin));
}

#[test]
fn clones_share_one_session() {
    let store = SessionStore::new(StubBackend::new());
    let reader = store.clone();
    block_on(store.login("alice", "correct-pw"));
    assert_eq!(reader.snapshot().identity, Some(alice()));
    assert_eq!(reader.state().get_untracked().identity, Some(alice()));
}
