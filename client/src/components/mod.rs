//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render shared chrome and gating around routed pages, reading
//! session state from Leptos context.

pub mod game_card;
pub mod main_layout;
pub mod notice;
pub mod protected;
pub mod session_gate;
