//! Networking modules for the storefront REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` owns every HTTP call (auth, catalog, library, friends) and `types`
//! defines the JSON wire schema those calls exchange.

pub mod api;
pub mod types;
