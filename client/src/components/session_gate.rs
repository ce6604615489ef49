//! Blocking placeholder shown until the startup identity probe settles.

use leptos::prelude::*;

use crate::state::session::AppSession;

/// Render `children` once the session is initialized, and a
/// "Checking authentication..." placeholder before that.
#[component]
pub fn SessionGate(children: ChildrenFn) -> impl IntoView {
    let state = expect_context::<AppSession>().state();
    let initialized = Memo::new(move |_| state.with(|s| s.initialized));

    view! {
        <Show
            when=move || initialized.get()
            fallback=|| {
                view! {
                    <div class="session-gate">
                        <p class="session-gate__message">"Checking authentication..."</p>
                    </div>
                }
            }
        >
            {children()}
        </Show>
    }
}
