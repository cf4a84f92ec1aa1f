use jsonwebtoken::{encode, Header, decode, Validation, Algorithm};
use chrono::{Utc, Duration};
use uuid::Uuid;
use crate::entities::token::{IssuedSession, SessionClaims};
use crate::entities::user::User;
use crate::repositories::token::TokenServiceRepository;
use crate::settings::{AppConfig, SessionKeys};
use crate::errors::AuthError;

const JWT_ALGORITHM: Algorithm = Algorithm::HS512;

#[derive(Clone)]
pub struct JwtService {
    keys: SessionKeys,
    session_expiration: Duration,
    remember_expiration: Duration,
}

impl JwtService {
    pub fn new(config: &AppConfig) -> Self {
        JwtService {
            keys: SessionKeys::from(config),
            session_expiration: Duration::minutes(config.session_expiration_minutes),
            remember_expiration: Duration::days(config.remember_me_days),
        }
    }

    pub fn create_session_jwt(&self, user: &User, lifetime: Duration) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = (now + lifetime).timestamp() as usize;

        let claims = SessionClaims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            admin: user.is_admin,
            jti: Uuid::new_v4().to_string(),
            exp,
            iat: now.timestamp() as usize,
        };

        encode(&Header::new(JWT_ALGORITHM), &claims, &self.keys.encoding).map_err(|e| {
            tracing::warn!("Failed to sign session: {}", e);
            AuthError::SessionCreation
        })
    }

    pub fn decode_session_jwt(&self, token: &str) -> Result<SessionClaims, AuthError> {
        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.validate_exp = true;

        decode::<SessionClaims>(token, &self.keys.decoding, &validation)
            .map(|data| data.claims)
            .map_err(AuthError::from)
    }
}

impl TokenServiceRepository for JwtService {
    fn issue_session(&self, user: &User, remember: bool) -> Result<IssuedSession, AuthError> {
        let lifetime = if remember { self.remember_expiration } else { self.session_expiration };
        let token = self.create_session_jwt(user, lifetime)?;

        Ok(IssuedSession {
            token,
            persistent_for: remember.then_some(lifetime),
        })
    }

    fn decode_session(&self, token: &str) -> Result<SessionClaims, AuthError> {
        self.decode_session_jwt(token)
    }
}
