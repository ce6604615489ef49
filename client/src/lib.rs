//! # storefront-client
//!
//! Leptos + WASM frontend for the game storefront: catalog browsing, game
//! detail pages, an admin dashboard, and friends/profile pages behind a
//! cookie-backed session.
//!
//! This crate contains pages, components, the session store and bootstrap
//! sequencer, route guards, and the REST client. The `ssr` build is linked
//! into the host binary for server rendering; the `hydrate` build is the
//! browser bundle.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// Browser entry point: install logging and hydrate the server-rendered body.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    // Fails only if a logger is already installed.
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(app::App);
}
