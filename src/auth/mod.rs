//! Mock authentication: static demo accounts, decorative session tokens
//! and the session context threaded through the shell.

pub mod session;
pub mod token;
pub mod users;

use thiserror::Error;

pub use session::{AuthSettings, LoginOutcome, Session, SessionContext};
pub use token::{TokenClaims, TokenError};

/// Failures surfaced to the login form
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,
}
