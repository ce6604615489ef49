//! Application chrome: collapsible sidebar, header with user menu, content
//! outlet.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every route except `/login` renders inside this layout. It reads the
//! session for the header identity and owns the logout flow.

#[cfg(test)]
#[path = "main_layout_test.rs"]
mod main_layout_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::components::{A, Outlet};
use leptos_router::hooks::{use_location, use_navigate};

use crate::state::session::AppSession;
use crate::util::guard::{HOME_ROUTE, LOGIN_ROUTE};

/// Sidebar entries as `(path, label)`.
pub const NAV_ITEMS: [(&str, &str); 4] =
    [("/home", "Home"), ("/dashboard", "Dashboard"), ("/profile", "Profile"), ("/friends", "Friends")];

/// Header title for a route path: its first segment, capitalized.
#[must_use]
pub fn page_title(path: &str) -> String {
    let segment = path.trim_start_matches('/').split('/').next().unwrap_or_default();
    let segment = if segment.is_empty() { "home" } else { segment };
    let mut chars = segment.chars();
    chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}

/// Whether the sidebar entry for `item` should be highlighted at `path`.
#[must_use]
pub fn is_active(item: &str, path: &str) -> bool {
    let path = if path == "/" { HOME_ROUTE } else { path };
    path == item || path.strip_prefix(item).is_some_and(|rest| rest.starts_with('/'))
}

#[component]
pub fn MainLayout() -> impl IntoView {
    let session = expect_context::<AppSession>();
    let state = session.state();
    let location = use_location();
    let navigate = use_navigate();
    let collapsed = RwSignal::new(false);
    let menu_open = RwSignal::new(false);

    let pathname = location.pathname;
    let title = move || page_title(&pathname.get());
    let display_name = {
        let state = state.clone();
        move || state.with(|s| s.display_name().unwrap_or("Guest").to_owned())
    };
    let signed_in = Memo::new(move |_| state.with(|s| s.is_authenticated()));

    // Stored so the handler is `Copy` inside the nested menu views.
    let logout = StoredValue::new_local(move || {
        menu_open.set(false);
        let session = session.clone();
        let navigate = navigate.clone();
        leptos::task::spawn_local(async move {
            session.logout().await;
            navigate(LOGIN_ROUTE, NavigateOptions::default());
        });
    });

    view! {
        <div class="main-layout" class:main-layout--collapsed=move || collapsed.get()>
            <nav class="main-layout__sidebar">
                <div class="main-layout__brand">
                    <Show when=move || !collapsed.get() fallback=|| view! { <span class="main-layout__logo"></span> }>
                        <h3>"Storefront"</h3>
                    </Show>
                </div>
                <ul class="main-layout__nav">
                    {NAV_ITEMS
                        .into_iter()
                        .map(|(href, label)| {
                            view! {
                                <li
                                    class="main-layout__nav-item"
                                    class:main-layout__nav-item--active=move || is_active(href, &pathname.get())
                                >
                                    <A href=href>{label}</A>
                                </li>
                            }
                        })
                        .collect_view()}
                </ul>
                <button
                    class="btn main-layout__collapse"
                    title="Toggle sidebar"
                    on:click=move |_| collapsed.update(|c| *c = !*c)
                >
                    {move || if collapsed.get() { "»" } else { "«" }}
                </button>
            </nav>

            <div class="main-layout__body">
                <header class="main-layout__header">
                    <h2>{title}</h2>
                    <div class="main-layout__user">
                        <button class="btn main-layout__user-toggle" on:click=move |_| menu_open.update(|o| *o = !*o)>
                            <span class="main-layout__avatar" aria-hidden="true"></span>
                            <span class="main-layout__user-name">{display_name}</span>
                        </button>
                        <Show when=move || menu_open.get()>
                            <div class="main-layout__user-menu">
                                <Show
                                    when=move || signed_in.get()
                                    fallback=|| view! { <A href=LOGIN_ROUTE>"Sign in"</A> }
                                >
                                    <a href="/profile" on:click=move |_| menu_open.set(false)>
                                        "Profile"
                                    </a>
                                    <button
                                        class="btn main-layout__logout"
                                        on:click=move |_| logout.with_value(|run| run())
                                    >
                                        "Logout"
                                    </button>
                                </Show>
                            </div>
                        </Show>
                    </div>
                </header>

                <main class="main-layout__content">
                    <Outlet />
                </main>

                <footer class="main-layout__footer">"Storefront"</footer>
            </div>
        </div>
    }
}
