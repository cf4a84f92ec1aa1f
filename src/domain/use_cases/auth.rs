use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use validator::Validate;

use crate::auth::password::{hash_password, verify_password, verify_unknown_account};
use crate::entities::principal::{AuthenticatedPrincipal, Principal};
use crate::entities::token::IssuedSession;
use crate::entities::user::{LoginForm, RegisterForm, UserInsert};
use crate::errors::{AppError, AuthError, FieldError};
use crate::repositories::token::{SessionRevocationRepository, TokenServiceRepository};
use crate::repositories::user::UserRepository;

pub const BOOTSTRAP_ADMIN_USERNAME: &str = "admin";
pub const BOOTSTRAP_ADMIN_EMAIL: &str = "admin@localhost";

#[derive(Debug)]
pub struct LoginSuccess {
    pub user_id: i64,
    pub username: String,
    pub session: IssuedSession,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct BootstrapOutcome {
    pub created: bool,
    pub message: String,
}

#[derive(Clone)]
pub struct AuthHandler {
    pub user_repo: Arc<dyn UserRepository>,
    pub token_service: Arc<dyn TokenServiceRepository>,
    pub revocations: Option<Arc<dyn SessionRevocationRepository>>,
}

impl AuthHandler {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        token_service: Arc<dyn TokenServiceRepository>,
        revocations: Option<Arc<dyn SessionRevocationRepository>>,
    ) -> Self {
        AuthHandler {
            user_repo,
            token_service,
            revocations,
        }
    }

    /// Registers a new member account. Returns the new user id.
    ///
    /// Taken usernames and emails are reported as field errors next to the
    /// form's own rule failures; nothing is inserted unless all of them pass.
    pub async fn register(&self, form: RegisterForm) -> Result<i64, AppError> {
        let mut field_errors = match form.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => match AppError::from(errors) {
                AppError::ValidationError(fields) => fields,
                other => return Err(other),
            },
        };
        let has_error = |errors: &[FieldError], field: &str| errors.iter().any(|e| e.field == field);

        if !has_error(&field_errors, "username") && self.user_repo.username_exists(&form.username).await? {
            field_errors.push(FieldError {
                field: "username".into(),
                message: "Username is already taken".into(),
            });
        }
        if !has_error(&field_errors, "email") && self.user_repo.email_exists(&form.email).await? {
            field_errors.push(FieldError {
                field: "email".into(),
                message: "Email is already in use".into(),
            });
        }

        if !field_errors.is_empty() {
            field_errors.sort_by(|a, b| a.field.cmp(&b.field));
            return Err(AppError::ValidationError(field_errors));
        }

        let password_hash = hash_password(&form.password)?;
        let user_id = self.user_repo.create_user(&form.prepare_for_insert(password_hash)).await?;

        tracing::info!(user_id, username = %form.username, "New user registered");
        Ok(user_id)
    }

    /// Checks credentials and signs a session. Every credential failure
    /// yields the same `WrongCredentials` error.
    pub async fn login(&self, form: LoginForm) -> Result<LoginSuccess, AuthError> {
        form.validate()?;

        let user = self
            .user_repo
            .get_user_by_username(&form.username)
            .await
            .map_err(|e| {
                tracing::error!("User lookup failed during login: {}", e);
                AuthError::SessionStore(e.to_string())
            })?;
        let Some(user) = user else {
            verify_unknown_account(&form.password);
            tracing::info!(username = %form.username, "Rejected login attempt");
            return Err(AuthError::WrongCredentials);
        };

        let is_password_valid = verify_password(&form.password, &user.password_hash)
            .map_err(|_| AuthError::WrongCredentials)?;
        if !is_password_valid {
            tracing::info!(username = %form.username, "Rejected login attempt");
            return Err(AuthError::WrongCredentials);
        }

        let session = self.token_service.issue_session(&user, form.remember_me)?;

        tracing::info!(user_id = user.id, remember_me = form.remember_me, "User logged in");
        Ok(LoginSuccess {
            user_id: user.id,
            username: user.username,
            session,
        })
    }

    /// Revokes the session token for the rest of its lifetime when a
    /// deny-list is configured. Clearing the cookie is the caller's job.
    pub async fn logout(&self, principal: &AuthenticatedPrincipal) -> Result<(), AuthError> {
        if let Some(revocations) = &self.revocations {
            let now = Utc::now().timestamp().max(0) as u64;
            let ttl = (principal.expires_at as u64).saturating_sub(now);
            revocations.revoke(&principal.session_id, ttl).await?;
        }

        tracing::info!(user_id = principal.id, "User logged out");
        Ok(())
    }

    /// Turns a session cookie value into the request principal.
    ///
    /// The user row is reloaded so deleted accounts lose their sessions and
    /// admin rights follow the stored flag rather than the token.
    pub async fn resolve_principal(&self, token: &str) -> Result<Principal, AuthError> {
        let claims = self.token_service.decode_session(token)?;
        let user_id: i64 = claims.sub.parse().map_err(|_| AuthError::InvalidSession)?;

        if let Some(revocations) = &self.revocations {
            match revocations.is_revoked(&claims.jti).await {
                Ok(true) => return Err(AuthError::SessionRevoked),
                Ok(false) => {}
                Err(e) => tracing::warn!("Session deny-list unavailable: {}", e),
            }
        }

        let user = self
            .user_repo
            .get_user_by_id(user_id)
            .await
            .map_err(|e| AuthError::SessionStore(e.to_string()))?
            .ok_or(AuthError::InvalidSession)?;

        Ok(Principal::Authenticated(AuthenticatedPrincipal {
            id: user.id,
            username: user.username,
            is_admin: user.is_admin,
            session_id: claims.jti,
            expires_at: claims.exp,
        }))
    }

    /// One-time creation of the first administrator account.
    pub async fn bootstrap_admin(
        &self,
        production: bool,
        password: Option<&str>,
    ) -> Result<BootstrapOutcome, AppError> {
        if production {
            return Err(AppError::NotFound("Page not found".into()));
        }

        if self.user_repo.admin_exists().await? {
            return Ok(BootstrapOutcome {
                created: false,
                message: "Admin user already exists.".into(),
            });
        }

        let Some(password) = password.filter(|p| !p.trim().is_empty()) else {
            tracing::warn!("Admin bootstrap requested without a configured password");
            return Ok(BootstrapOutcome {
                created: false,
                message: "Set APP_BOOTSTRAP_ADMIN_PASSWORD to create the admin account.".into(),
            });
        };

        let admin = UserInsert {
            username: BOOTSTRAP_ADMIN_USERNAME.into(),
            email: BOOTSTRAP_ADMIN_EMAIL.into(),
            password_hash: hash_password(password)?,
            full_name: "Administrator".into(),
            is_admin: true,
        };
        let id = self.user_repo.create_user(&admin).await?;

        tracing::warn!(user_id = id, "Bootstrap admin account created");
        Ok(BootstrapOutcome {
            created: true,
            message: format!("Admin user created. Username: {BOOTSTRAP_ADMIN_USERNAME}"),
        })
    }
}
