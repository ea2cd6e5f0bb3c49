//! Session context - the signed-in user and their token
//!
//! Created once at startup and passed explicitly to whoever needs it.
//! Logging out or running past the token's expiry tears the session down.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::auth::token::{self, TokenClaims};
use crate::auth::users;
use crate::auth::AuthError;
use crate::config::AuthConfig;
use crate::constants::DEFAULT_TOKEN_TTL_HOURS;
use crate::models::{Role, User};
use crate::storage::Storage;

/// Timing knobs for the mock login
#[derive(Clone, Debug)]
pub struct AuthSettings {
    /// Simulated network latency of a login attempt
    pub login_delay: Duration,
    /// Informational token lifetime
    pub token_ttl: chrono::Duration,
}

impl From<&AuthConfig> for AuthSettings {
    fn from(config: &AuthConfig) -> Self {
        AuthSettings {
            login_delay: Duration::from_millis(config.login_delay_ms),
            token_ttl: chrono::TimeDelta::try_hours(config.token_ttl_hours)
                .unwrap_or_else(|| chrono::TimeDelta::hours(DEFAULT_TOKEN_TTL_HOURS)),
        }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        AuthSettings::from(&AuthConfig::default())
    }
}

/// An authenticated user together with their token
#[derive(Clone, Debug)]
pub struct Session {
    pub user: User,
    pub token: String,
    pub claims: TokenClaims,
}

/// Result of a successful login
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoginOutcome {
    pub user: User,
    pub token: String,
}

pub struct SessionContext {
    storage: Storage,
    settings: AuthSettings,
    current: Option<Session>,
}

impl SessionContext {
    pub fn new(storage: Storage, settings: AuthSettings) -> Self {
        SessionContext {
            storage,
            settings,
            current: None,
        }
    }

    /// Pick up a persisted session, if one is still valid.
    ///
    /// Anything unusable (malformed, expired, unknown user) is removed from
    /// storage and the context stays signed out.
    pub fn restore_session(&mut self) -> Option<&Session> {
        self.restore_session_at(Utc::now())
    }

    pub fn restore_session_at(&mut self, now: DateTime<Utc>) -> Option<&Session> {
        let stored = self.storage.load_token()?;

        let restored = match token::decode(&stored, now) {
            Ok(claims) => match users::find_by_id(claims.user_id) {
                Some(user) => Some(Session {
                    user: *user,
                    token: stored,
                    claims,
                }),
                None => {
                    tracing::debug!(user_id = claims.user_id, "Stored token names an unknown user");
                    None
                }
            },
            Err(e) => {
                tracing::debug!(error = %e, "Discarding stored token");
                None
            }
        };

        match restored {
            Some(session) => {
                tracing::info!(
                    username = session.user.username,
                    expires = ?session.claims.expires_at(),
                    "Session restored"
                );
                self.current = Some(session);
            }
            None => self.clear_stored_token(),
        }

        self.current.as_ref()
    }

    /// Check credentials against the demo accounts and open a session
    pub async fn login(&mut self, username: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        tokio::time::sleep(self.settings.login_delay).await;

        let Some(user) = users::find_by_credentials(username, password) else {
            tracing::info!(username, "Login rejected");
            return Err(AuthError::InvalidCredentials);
        };

        let claims = token::claims_for(user, Utc::now(), self.settings.token_ttl);
        let token = token::encode(&claims);

        if let Err(e) = self.storage.save_token(&token) {
            tracing::warn!(error = %e, "Could not persist session token");
        }

        tracing::info!(username, role = user.role.as_str(), "Login succeeded");
        self.current = Some(Session {
            user: *user,
            token: token.clone(),
            claims,
        });

        Ok(LoginOutcome { user: *user, token })
    }

    pub fn logout(&mut self) {
        if let Some(session) = self.current.take() {
            tracing::info!(username = session.user.username, "Signed out");
        }
        self.clear_stored_token();
    }

    /// Tear the session down if its token expired before `now`.
    /// Returns true when a session was dropped.
    pub fn expire_if_stale(&mut self, now: DateTime<Utc>) -> bool {
        let stale = self
            .current
            .as_ref()
            .is_some_and(|s| s.claims.is_expired_at(now));
        if stale {
            tracing::info!("Session expired");
            self.current = None;
            self.clear_stored_token();
        }
        stale
    }

    pub fn is_authenticated(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|s| !s.token.is_empty())
    }

    pub fn session(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn user(&self) -> Option<&User> {
        self.current.as_ref().map(|s| &s.user)
    }

    pub fn token(&self) -> Option<&str> {
        self.current.as_ref().map(|s| s.token.as_str())
    }

    pub fn claims(&self) -> Option<&TokenClaims> {
        self.current.as_ref().map(|s| &s.claims)
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.user().is_some_and(|u| u.role == role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    fn clear_stored_token(&self) {
        if let Err(e) = self.storage.clear_token() {
            tracing::warn!(error = %e, "Could not remove stored token");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::users::DEMO_USERS;
    use tempfile::tempdir;

    fn instant_settings() -> AuthSettings {
        AuthSettings {
            login_delay: Duration::ZERO,
            token_ttl: chrono::Duration::hours(24),
        }
    }

    fn context(dir: &std::path::Path) -> SessionContext {
        SessionContext::new(Storage::at(dir), instant_settings())
    }

    #[test]
    fn test_settings_fall_back_when_ttl_is_unrepresentable() {
        let config = AuthConfig {
            login_delay_ms: 0,
            token_ttl_hours: 9_000_000_000_000,
        };
        let settings = AuthSettings::from(&config);
        assert_eq!(settings.token_ttl, chrono::Duration::hours(DEFAULT_TOKEN_TTL_HOURS));

        let config = AuthConfig {
            login_delay_ms: 0,
            token_ttl_hours: 48,
        };
        assert_eq!(AuthSettings::from(&config).token_ttl, chrono::Duration::hours(48));
    }

    #[tokio::test]
    async fn test_login_succeeds_for_every_demo_user() {
        for user in DEMO_USERS.iter() {
            let dir = tempdir().unwrap();
            let mut ctx = context(dir.path());

            let outcome = ctx.login(user.username, user.password).await.unwrap();
            assert_eq!(outcome.user.role, user.role);
            assert!(ctx.is_authenticated());
            assert!(ctx.has_role(user.role));
            assert_eq!(ctx.is_admin(), user.role == Role::Admin);
            assert_eq!(ctx.storage().load_token(), Some(outcome.token));
        }
    }

    #[tokio::test]
    async fn test_login_rejects_other_pairs() {
        let dir = tempdir().unwrap();
        let mut ctx = context(dir.path());

        for (username, password) in [("admin", "user123"), ("user", "admin123"), ("nobody", ""), ("", "")] {
            let err = ctx.login(username, password).await.unwrap_err();
            assert_eq!(err, AuthError::InvalidCredentials);
            assert_eq!(err.to_string(), "Invalid username or password");
        }
        assert!(!ctx.is_authenticated());
        assert!(!ctx.is_admin());
        assert_eq!(ctx.storage().load_token(), None);
    }

    #[tokio::test]
    async fn test_logout_clears_memory_and_storage() {
        let dir = tempdir().unwrap();
        let mut ctx = context(dir.path());
        ctx.login("user", "user123").await.unwrap();

        ctx.logout();
        assert!(!ctx.is_authenticated());
        assert!(ctx.user().is_none());
        assert_eq!(ctx.storage().load_token(), None);
    }

    #[tokio::test]
    async fn test_restore_valid_session() {
        let dir = tempdir().unwrap();
        let mut first = context(dir.path());
        first.login("admin", "admin123").await.unwrap();

        let mut second = context(dir.path());
        let restored = second.restore_session().map(|s| s.user.id);
        assert_eq!(restored, Some(1));
        assert!(second.is_admin());
    }

    #[test]
    fn test_restore_expired_session_clears_token() {
        let dir = tempdir().unwrap();
        let storage = Storage::at(dir.path());
        let issued = Utc::now() - chrono::Duration::hours(48);
        storage
            .save_token(&token::issue(&DEMO_USERS[0], issued, chrono::Duration::hours(24)))
            .unwrap();

        let mut ctx = context(dir.path());
        assert!(ctx.restore_session().is_none());
        assert!(!ctx.is_authenticated());
        assert_eq!(ctx.storage().load_token(), None);
    }

    #[test]
    fn test_restore_malformed_or_unknown_user_clears_token() {
        let dir = tempdir().unwrap();
        let storage = Storage::at(dir.path());

        storage.save_token("not-a-token").unwrap();
        let mut ctx = context(dir.path());
        assert!(ctx.restore_session().is_none());
        assert_eq!(storage.load_token(), None);

        let ghost = User {
            id: 99,
            username: "ghost",
            password: "",
            role: Role::Admin,
            display_name: "Ghost",
        };
        storage
            .save_token(&token::issue(&ghost, Utc::now(), chrono::Duration::hours(1)))
            .unwrap();
        assert!(ctx.restore_session().is_none());
        assert_eq!(storage.load_token(), None);
    }

    #[test]
    fn test_restore_without_token_is_signed_out() {
        let dir = tempdir().unwrap();
        let mut ctx = context(dir.path());
        assert!(ctx.restore_session().is_none());
        assert!(!ctx.has_role(Role::User));
    }

    #[tokio::test]
    async fn test_expire_if_stale() {
        let dir = tempdir().unwrap();
        let mut ctx = context(dir.path());
        ctx.login("admin", "admin123").await.unwrap();

        assert!(!ctx.expire_if_stale(Utc::now()));
        assert!(ctx.is_authenticated());

        assert!(ctx.expire_if_stale(Utc::now() + chrono::Duration::hours(25)));
        assert!(!ctx.is_authenticated());
        assert_eq!(ctx.storage().load_token(), None);
    }
}
