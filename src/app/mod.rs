//! App layer - owns the session and the mounted library view
//!
//! The App actor receives UI events and view resolutions, updates state,
//! and emits resolve commands and render snapshots.

pub mod state;
pub mod actor;
pub mod commands;

pub use state::AppState;
pub use actor::AppActor;
