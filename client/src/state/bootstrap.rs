//! One-shot startup probe of the session cookie.
//!
//! SYSTEM CONTEXT
//! ==============
//! `App` builds a [`Bootstrap`] next to the session store and launches it on
//! mount. The routed UI stays behind `SessionGate` until the probe settles, so
//! no route ever sees the pre-probe "signed out" default.

#[cfg(test)]
#[path = "bootstrap_test.rs"]
mod bootstrap_test;

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::net::api::AuthApi;
use crate::state::session::SessionStore;

/// Runs the initial `check_auth` at most once per application instance.
pub struct Bootstrap<A> {
    session: SessionStore<A>,
    started: Arc<AtomicBool>,
}

impl<A> Clone for Bootstrap<A> {
    fn clone(&self) -> Self {
        Self { session: self.session.clone(), started: Arc::clone(&self.started) }
    }
}

impl<A: AuthApi + 'static> Bootstrap<A> {
    #[must_use]
    pub fn new(session: &SessionStore<A>) -> Self {
        Self { session: session.clone(), started: Arc::new(AtomicBool::new(false)) }
    }

    /// Whether the startup probe has been handed out.
    #[must_use]
    pub fn started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    /// The startup probe on the first call, `None` on every later call
    /// (including calls through clones).
    pub fn start(&self) -> Option<impl Future<Output = ()> + use<A>> {
        if self.started.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst).is_err() {
            return None;
        }
        let session = self.session.clone();
        Some(async move { session.check_auth().await })
    }

    /// Spawn the startup probe on the browser event loop. A no-op during SSR,
    /// where the shell always renders the pre-probe placeholder.
    pub fn launch(&self) {
        #[cfg(feature = "hydrate")]
        if let Some(probe) = self.start() {
            log::debug!("bootstrap: probing session");
            leptos::task::spawn_local(probe);
        }
    }
}
