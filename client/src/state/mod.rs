//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! `session` is the single authority on authentication; `bootstrap` owns the
//! one-time startup probe that feeds it. Page-local data (catalog, friends)
//! lives in each page's own signals.

pub mod bootstrap;
pub mod session;
