//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped loading and actions and delegates shared
//! rendering to `components`. Gating happens in `app.rs`, not here.

pub mod dashboard;
pub mod friends;
pub mod game;
pub mod home;
pub mod login;
pub mod profile;
