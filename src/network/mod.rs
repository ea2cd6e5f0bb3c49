//! Network layer - resolves the library component off the app actor
//!
//! The Network actor owns the view provider and reports each resolution back.

pub mod actor;

pub use actor::NetworkActor;
