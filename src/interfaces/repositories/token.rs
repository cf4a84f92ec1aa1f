use async_trait::async_trait;

use crate::{
    entities::{token::{IssuedSession, SessionClaims}, user::User},
    errors::AuthError,
};

pub trait TokenServiceRepository: Send + Sync {
    /// Signs a session for the user; `remember` selects the long lifetime.
    fn issue_session(&self, user: &User, remember: bool) -> Result<IssuedSession, AuthError>;

    /// Verifies a session token and returns its claims
    fn decode_session(&self, token: &str) -> Result<SessionClaims, AuthError>;
}

/// Deny-list of logged-out sessions, keyed by token id.
#[async_trait]
pub trait SessionRevocationRepository: Send + Sync {
    async fn revoke(&self, session_id: &str, ttl_seconds: u64) -> Result<(), AuthError>;
    async fn is_revoked(&self, session_id: &str) -> Result<bool, AuthError>;
    async fn ping(&self) -> Result<(), AuthError>;
}
