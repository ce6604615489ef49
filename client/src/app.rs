//! Root application component with routing and context providers.
//!
//! SYSTEM CONTEXT
//! ==============
//! `App` creates the one `AppSession`, provides it through context and
//! launches the startup probe on mount. The whole route tree sits under a
//! `SessionGate` parent route, so no page renders until that probe settles.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    NavigateOptions, ParamSegment, StaticSegment,
    components::{Outlet, ParentRoute, Redirect, Route, Router, Routes},
};

use crate::components::main_layout::MainLayout;
use crate::components::protected::{GuestOnly, Protected};
use crate::components::session_gate::SessionGate;
use crate::net::api::HttpApi;
use crate::pages::{
    dashboard::DashboardPage, friends::FriendsPage, game::GamePage, home::HomePage, login::LoginPage,
    profile::ProfilePage,
};
use crate::state::bootstrap::Bootstrap;
use crate::state::session::{AppSession, Capability};
use crate::util::guard::HOME_ROUTE;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let session = AppSession::new(HttpApi);
    let bootstrap = Bootstrap::new(&session);
    provide_context(session);

    // Effects only run in the browser, after mount.
    Effect::new(move || bootstrap.launch());

    view! {
        <Stylesheet id="leptos" href="/pkg/storefront.css"/>
        <Title text="Storefront"/>

        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <ParentRoute path=StaticSegment("") view=GatedOutlet>
                    <Route path=StaticSegment("login") view=LoginRoute/>
                    <ParentRoute path=StaticSegment("") view=MainLayout>
                        <Route path=StaticSegment("") view=RedirectHome/>
                        <Route path=StaticSegment("home") view=HomePage/>
                        <Route path=(StaticSegment("game"), ParamSegment("id")) view=GamePage/>
                        <Route path=StaticSegment("dashboard") view=DashboardRoute/>
                        <Route path=StaticSegment("profile") view=ProfileRoute/>
                        <Route path=StaticSegment("friends") view=FriendsRoute/>
                    </ParentRoute>
                </ParentRoute>
            </Routes>
        </Router>
    }
}

#[component]
fn GatedOutlet() -> impl IntoView {
    view! {
        <SessionGate>
            <Outlet/>
        </SessionGate>
    }
}

#[component]
fn RedirectHome() -> impl IntoView {
    view! { <Redirect path=HOME_ROUTE options=NavigateOptions { replace: true, ..NavigateOptions::default() }/> }
}

#[component]
fn LoginRoute() -> impl IntoView {
    view! {
        <GuestOnly>
            <LoginPage/>
        </GuestOnly>
    }
}

#[component]
fn DashboardRoute() -> impl IntoView {
    view! {
        <Protected requires=Capability::Admin>
            <DashboardPage/>
        </Protected>
    }
}

#[component]
fn ProfileRoute() -> impl IntoView {
    view! {
        <Protected>
            <ProfilePage/>
        </Protected>
    }
}

#[component]
fn FriendsRoute() -> impl IntoView {
    view! {
        <Protected>
            <FriendsPage/>
        </Protected>
    }
}
