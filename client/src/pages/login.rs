//! Username + password sign-in page.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;

use crate::state::session::AppSession;

/// Require both fields to be non-blank. The username is trimmed; the
/// password is passed through as typed.
///
/// # Errors
///
/// Returns the form hint for the first missing field.
pub fn validate_login_input(username: &str, password: &str) -> Result<(String, String), &'static str> {
    let username = username.trim();
    if username.is_empty() {
        return Err("Please input your username!");
    }
    if password.trim().is_empty() {
        return Err("Please input your password!");
    }
    Ok((username.to_owned(), password.to_owned()))
}

/// Sign-in form. Redirection after a successful sign-in is left to the
/// `GuestOnly` wrapper around this page.
#[component]
pub fn LoginPage() -> impl IntoView {
    let session = expect_context::<AppSession>();
    let state = session.state();
    let username = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let hint = RwSignal::new(None::<&'static str>);

    let pending = Memo::new({
        let state = state.clone();
        move |_| state.with(|s| s.pending)
    });
    let last_error = Memo::new(move |_| state.with(|s| s.last_error.clone()));

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if pending.get_untracked() {
            return;
        }
        match validate_login_input(&username.get_untracked(), &password.get_untracked()) {
            Ok((user, pass)) => {
                hint.set(None);
                let session = session.clone();
                leptos::task::spawn_local(async move {
                    session.login(&user, &pass).await;
                });
            }
            Err(message) => hint.set(Some(message)),
        }
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Welcome Back"</h1>
                <p class="login-card__subtitle">"Sign in to your account"</p>
                <Show when=move || last_error.get().is_some()>
                    <p class="login-message login-message--error" role="alert">
                        {move || last_error.get().unwrap_or_default()}
                    </p>
                </Show>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="text"
                        autocomplete="username"
                        placeholder="Username"
                        prop:value=move || username.get()
                        on:input=move |ev| username.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        autocomplete="current-password"
                        placeholder="Password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <Show when=move || hint.get().is_some()>
                        <p class="login-message">{move || hint.get().unwrap_or_default()}</p>
                    </Show>
                    <button class="login-button" type="submit" disabled=move || pending.get()>
                        {move || if pending.get() { "Signing in..." } else { "Sign In" }}
                    </button>
                </form>
            </div>
        </div>
    }
}
