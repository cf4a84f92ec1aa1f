use serde::Serialize;

use crate::errors::AuthError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthenticatedPrincipal {
    pub id: i64,
    pub username: String,
    pub is_admin: bool,
    /// Token id, used to revoke the session on logout.
    #[serde(skip)]
    pub session_id: String,
    /// Expiry of the session token (unix seconds).
    #[serde(skip)]
    pub expires_at: usize,
}

/// Identity attached to the current request by the session middleware.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Principal {
    #[default]
    Anonymous,
    Authenticated(AuthenticatedPrincipal),
}

impl Principal {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Principal::Authenticated(_))
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Principal::Authenticated(p) if p.is_admin)
    }

    pub fn id(&self) -> Option<i64> {
        match self {
            Principal::Authenticated(p) => Some(p.id),
            Principal::Anonymous => None,
        }
    }

    pub fn as_authenticated(&self) -> Option<&AuthenticatedPrincipal> {
        match self {
            Principal::Authenticated(p) => Some(p),
            Principal::Anonymous => None,
        }
    }

    /// Guard for operations that need any logged-in user.
    pub fn require_authenticated(&self) -> Result<AuthenticatedPrincipal, AuthError> {
        self.as_authenticated()
            .cloned()
            .ok_or(AuthError::LoginRequired)
    }

    /// Guard for administration. Anonymous callers are forbidden too.
    pub fn require_admin(&self) -> Result<AuthenticatedPrincipal, AuthError> {
        match self {
            Principal::Authenticated(p) if p.is_admin => Ok(p.clone()),
            _ => Err(AuthError::Forbidden("Admin access required".into())),
        }
    }
}
