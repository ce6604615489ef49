//! Route guard components wrapping routed regions.
//!
//! SYSTEM CONTEXT
//! ==============
//! Both wrappers re-evaluate `util::guard` against the shared session signal
//! on every change and either render their children, render nothing, or
//! replace the current history entry with a redirect.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::components::Redirect;

use crate::state::session::{AppSession, Capability};
use crate::util::guard::{GuardDecision, evaluate, evaluate_login_route};

/// Render `children` only for a signed-in user holding `requires`
/// (any signed-in user when omitted).
#[component]
pub fn Protected(#[prop(optional)] requires: Option<Capability>, children: ChildrenFn) -> impl IntoView {
    let state = expect_context::<AppSession>().state();
    let decision = Memo::new(move |_| state.with(|s| evaluate(s, requires)));
    render_decision(decision, children)
}

/// Render `children` only for signed-out visitors; used by the sign-in page.
#[component]
pub fn GuestOnly(children: ChildrenFn) -> impl IntoView {
    let state = expect_context::<AppSession>().state();
    let decision = Memo::new(move |_| state.with(evaluate_login_route));
    render_decision(decision, children)
}

fn render_decision(decision: Memo<GuardDecision>, children: ChildrenFn) -> impl IntoView {
    move || {
        let decision = decision.get();
        match decision.redirect_target() {
            Some(path) => {
                log::debug!("guard: {decision:?} -> {path}");
                view! { <Redirect path=path options=NavigateOptions { replace: true, ..NavigateOptions::default() } /> }
                    .into_any()
            }
            None if decision == GuardDecision::Render => children().into_any(),
            None => ().into_any(),
        }
    }
}
