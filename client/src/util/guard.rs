//! Route gating decisions shared by every protected region.
//!
//! SYSTEM CONTEXT
//! ==============
//! `components::protected` renders these decisions; the decision itself is a
//! pure function of the current session snapshot so it can run on every
//! render without side effects.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use crate::state::session::{Capability, SessionState};

/// Sign-in entry point.
pub const LOGIN_ROUTE: &str = "/login";
/// Default landing route, also the target for insufficient capability.
pub const HOME_ROUTE: &str = "/home";

/// What a guarded region should do for the current session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// The startup probe has not settled; render nothing and stay put.
    Suspend,
    /// Nobody is signed in.
    RedirectLogin,
    /// Signed in, but without the required capability.
    RedirectHome,
    Render,
}

impl GuardDecision {
    #[must_use]
    pub fn redirect_target(self) -> Option<&'static str> {
        match self {
            Self::RedirectLogin => Some(LOGIN_ROUTE),
            Self::RedirectHome => Some(HOME_ROUTE),
            Self::Suspend | Self::Render => None,
        }
    }
}

/// Decide whether a region requiring `required` (or just a signed-in user,
/// when `None`) may render.
#[must_use]
pub fn evaluate(state: &SessionState, required: Option<Capability>) -> GuardDecision {
    if !state.initialized {
        return GuardDecision::Suspend;
    }
    let Some(capability) = state.capability() else {
        return GuardDecision::RedirectLogin;
    };
    match required {
        Some(required) if !capability.satisfies(required) => GuardDecision::RedirectHome,
        _ => GuardDecision::Render,
    }
}

/// Inverse gate for the sign-in page: signed-in visitors are sent home.
#[must_use]
pub fn evaluate_login_route(state: &SessionState) -> GuardDecision {
    if !state.initialized {
        GuardDecision::Suspend
    } else if state.is_authenticated() {
        GuardDecision::RedirectHome
    } else {
        GuardDecision::Render
    }
}
