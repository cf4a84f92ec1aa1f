use serde::{Deserialize, Serialize};

/// Claims carried by the session cookie.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionClaims {
    pub sub: String,
    pub username: String,
    pub admin: bool,
    pub jti: String,
    pub exp: usize,
    pub iat: usize,
}

/// A freshly signed session plus the cookie lifetime it should be stored with.
#[derive(Debug)]
pub struct IssuedSession {
    pub token: String,
    /// `None` means a browser-session cookie.
    pub persistent_for: Option<chrono::Duration>,
}
