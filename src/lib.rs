//! # Music Dashboard
//!
//! A terminal shell that signs a user in against a mock session store and
//! mounts a music library component resolved at runtime.
//!
//! ## Features
//! - Demo accounts with admin and user roles
//! - Persisted mock session token, restored on startup
//! - Library component fetched from a separately run remote (or bundled)
//! - Search, sort and grouping of the catalog
//! - Admin-only add and delete
//! - Fallback panel with retry when the remote is unavailable
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine)
//! - Network Layer (Tokio runtime)

pub mod constants;
pub mod config;
pub mod models;
pub mod storage;
pub mod auth;
pub mod library;
pub mod remote;
pub mod ui;
pub mod messages;
pub mod app;
pub mod network;

// Re-export commonly used types
pub use models::{Role, Song, User};
pub use auth::{AuthError, SessionContext};
pub use library::{LibraryProps, LibraryView};
pub use remote::{LibraryModule, ProvidedView, RemoteLoadError, ViewProvider};
pub use messages::{UiEvent, NetworkCommand, NetworkResponse, RenderState};
pub use app::{AppState, AppActor};
pub use network::NetworkActor;
