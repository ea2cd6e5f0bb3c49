//! Decorative JWT-shaped session tokens.
//!
//! A token is `base64(header).base64(payload).base64(signature)`. The
//! signature is `mock_signature_<username>` and is never checked: only the
//! shape and the expiry decide validity.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Role, User};

#[derive(Debug, Serialize, Deserialize)]
struct TokenHeader {
    alg: String,
    typ: String,
}

/// Payload carried by a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenClaims {
    pub user_id: u64,
    pub username: String,
    pub role: Role,
    /// Expiry, Unix seconds
    pub exp: i64,
    /// Issued at, Unix seconds
    pub iat: i64,
}

impl TokenClaims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.exp <= now.timestamp()
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token has {0} parts, expected 3")]
    WrongPartCount(usize),
    #[error("token payload is not base64: {0}")]
    Encoding(#[from] base64::DecodeError),
    #[error("token payload is not valid claims: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("token expired at {exp}")]
    Expired { exp: i64 },
}

/// Claims for a token issued to `user` at `issued_at`, valid for `ttl`
pub fn claims_for(user: &User, issued_at: DateTime<Utc>, ttl: Duration) -> TokenClaims {
    TokenClaims {
        user_id: user.id,
        username: user.username.to_string(),
        role: user.role,
        exp: issued_at
            .checked_add_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
            .timestamp(),
        iat: issued_at.timestamp(),
    }
}

/// Encode `claims` into the three-part token string
pub fn encode(claims: &TokenClaims) -> String {
    let header = TokenHeader {
        alg: String::from("HS256"),
        typ: String::from("JWT"),
    };

    // Plain structs with string and integer fields always serialize
    let header_json = serde_json::to_vec(&header).unwrap_or_default();
    let claims_json = serde_json::to_vec(claims).unwrap_or_default();
    let signature = format!("mock_signature_{}", claims.username);

    format!(
        "{}.{}.{}",
        STANDARD.encode(header_json),
        STANDARD.encode(claims_json),
        STANDARD.encode(signature)
    )
}

/// Issue a token for `user`, valid for `ttl` from `issued_at`
pub fn issue(user: &User, issued_at: DateTime<Utc>, ttl: Duration) -> String {
    encode(&claims_for(user, issued_at, ttl))
}

/// Decode `token` and check it has not expired at `now`.
///
/// The header and signature parts are not inspected.
pub fn decode(token: &str, now: DateTime<Utc>) -> Result<TokenClaims, TokenError> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(TokenError::WrongPartCount(parts.len()));
    }

    let payload = STANDARD.decode(parts[1])?;
    let claims: TokenClaims = serde_json::from_slice(&payload)?;

    if claims.is_expired_at(now) {
        return Err(TokenError::Expired { exp: claims.exp });
    }

    Ok(claims)
}
