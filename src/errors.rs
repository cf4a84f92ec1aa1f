use std::borrow::Cow;
use std::fmt;

use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse
};
use jsonwebtoken::errors::{ErrorKind, Error as JwtError};
use derive_more::Display;
use serde::Serialize;
use validator::ValidationErrors;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Debug)]
pub enum AppError {
    ValidationError(Vec<FieldError>),
    NotFound(String),
    Conflict(String),
    UnauthorizedAccess,
    ForbiddenAccess,
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ValidationError(errors) => {
                let messages = errors.iter()
                    .map(|e| format!("{}:{}", e.field, e.message))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "validation error: {}", messages)
            }
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::UnauthorizedAccess => write!(f, "Unauthorized access"),
            AppError::ForbiddenAccess => write!(f, "Forbidden access"),
            AppError::InternalError(msg) => write!(f, "Internal server error: {}", msg)
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::ValidationError(errors) => {
                serde_json::json!({
                    "error": "Validation failed",
                    "details": errors
                })
            }
            AppError::InternalError(cause) => {
                tracing::error!("Internal error: {}", cause);
                serde_json::json!({"error": "Internal server error"})
            }
            _ => {
                serde_json::json!({"error": self.to_string()})
            }
        };
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::UnauthorizedAccess => StatusCode::UNAUTHORIZED,
            AppError::ForbiddenAccess => StatusCode::FORBIDDEN,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl AppError {
    /// Single-field validation failure.
    pub fn invalid_field(field: &str, message: &str) -> Self {
        AppError::ValidationError(vec![FieldError {
            field: field.to_string(),
            message: message.to_string(),
        }])
    }

    /// Messages suitable for flashing back to the submitter.
    pub fn user_messages(&self) -> Vec<String> {
        match self {
            AppError::ValidationError(errors) => errors.iter().map(|e| e.message.clone()).collect(),
            AppError::NotFound(msg) | AppError::Conflict(msg) => vec![msg.clone()],
            AppError::UnauthorizedAccess => vec!["Please log in to continue.".to_string()],
            AppError::ForbiddenAccess => vec!["Access denied.".to_string()],
            AppError::InternalError(_) => vec!["Something went wrong. Please try again.".to_string()],
        }
    }
}

/// Keeps one failure per field: a missing value wins over any other rule,
/// otherwise the first reported failure. Fields are ordered by name.
impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut field_errors: Vec<FieldError> = errors
            .field_errors()
            .iter()
            .filter_map(|(field, errors)| {
                errors
                    .iter()
                    .find(|e| e.code == "required")
                    .or_else(|| errors.first())
                    .map(|e| FieldError {
                        field: field.to_string(),
                        message: e
                            .message
                            .as_ref()
                            .map(|s| s.to_string())
                            .unwrap_or_else(|| "Invalid value".to_string()),
                    })
            })
            .collect();

        field_errors.sort_by(|a, b| a.field.cmp(&b.field));
        AppError::ValidationError(field_errors)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            sqlx::Error::Database(e) if e.code() == Some(Cow::Borrowed(UNIQUE_VIOLATION)) => {
                AppError::Conflict("Database conflict occurred".into())
            }
            sqlx::Error::Database(e) if e.code() == Some(Cow::Borrowed(FOREIGN_KEY_VIOLATION)) => {
                AppError::Conflict("Foreign key violation".into())
            }
            _ => AppError::InternalError(format!("Database error: {}", err))
        }
    }
}

impl From<PasswordError> for AppError {
    fn from(err: PasswordError) -> Self {
        AppError::InternalError(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(format!("IO error: {}", err))
    }
}

/// True when the database rejected a write because of a unique constraint.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(e) if e.code() == Some(Cow::Borrowed(UNIQUE_VIOLATION)))
}

#[derive(Debug, Display, PartialEq)]
pub enum AuthError {
    #[display("Invalid session")]
    InvalidSession,

    #[display("Invalid username or password")]
    WrongCredentials,

    #[display("Session creation error")]
    SessionCreation,

    #[display("Session expired")]
    SessionExpired,

    #[display("Login required")]
    LoginRequired,

    #[display("Forbidden: {_0}")]
    Forbidden(String),

    #[display("Session revoked")]
    SessionRevoked,

    #[display("Session store error: {_0}")]
    SessionStore(String),

    #[display("Invalid input")]
    InvalidInput(Vec<FieldError>),
}

impl AuthError {
    /// Messages suitable for flashing back to the submitter.
    pub fn user_messages(&self) -> Vec<String> {
        match self {
            AuthError::InvalidInput(errors) => errors.iter().map(|e| e.message.clone()).collect(),
            AuthError::SessionStore(_) | AuthError::SessionCreation => {
                vec!["Something went wrong. Please try again.".to_string()]
            }
            other => vec![other.to_string()],
        }
    }
}

impl ResponseError for AuthError {
    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AuthError::LoginRequired => serde_json::json!({
                "error": self.to_string(),
                "login_url": "/login"
            }),
            AuthError::SessionStore(cause) => {
                tracing::error!("Session store failure: {}", cause);
                serde_json::json!({"error": "Internal server error"})
            }
            AuthError::InvalidInput(errors) => serde_json::json!({
                "error": "Validation failed",
                "details": errors
            }),
            _ => serde_json::json!({"error": self.to_string()}),
        };
        HttpResponse::build(self.status_code())
            .json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidSession => StatusCode::UNAUTHORIZED,
            AuthError::WrongCredentials => StatusCode::UNAUTHORIZED,
            AuthError::SessionCreation => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::SessionExpired => StatusCode::UNAUTHORIZED,
            AuthError::LoginRequired => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden(_) => StatusCode::FORBIDDEN,
            AuthError::SessionRevoked => StatusCode::UNAUTHORIZED,
            AuthError::SessionStore(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<JwtError> for AuthError {
    fn from(e: JwtError) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::SessionExpired,
            _ => AuthError::InvalidSession,
        }
    }
}

impl From<ValidationErrors> for AuthError {
    fn from(errors: ValidationErrors) -> Self {
        match AppError::from(errors) {
            AppError::ValidationError(fields) => AuthError::InvalidInput(fields),
            _ => AuthError::InvalidInput(Vec::new()),
        }
    }
}

impl From<redis::RedisError> for AuthError {
    fn from(e: redis::RedisError) -> Self {
        AuthError::SessionStore(e.to_string())
    }
}

impl From<deadpool_redis::PoolError> for AuthError {
    fn from(e: deadpool_redis::PoolError) -> Self {
        AuthError::SessionStore(e.to_string())
    }
}

#[derive(Debug, Display)]
pub enum PasswordError {
    #[display("Invalid password parameters: {_0}")]
    InvalidParameters(String),

    #[display("Password hashing failed: {_0}")]
    HashingError(String),

    #[display("Invalid password hash format: {_0}")]
    InvalidHashFormat(String),

    #[display("Password verification failed: {_0}")]
    VerificationError(String),
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::ValidationError;

    #[test]
    fn only_first_error_per_field_is_kept() {
        let mut errors = ValidationErrors::new();
        let mut required = ValidationError::new("required");
        required.message = Some("Name is required".into());
        let mut length = ValidationError::new("length");
        length.message = Some("Name must be between 2 and 100 characters".into());
        errors.add("name", length);
        errors.add("name", required);

        match AppError::from(errors) {
            AppError::ValidationError(fields) => {
                assert_eq!(fields.len(), 1);
                assert_eq!(fields[0].message, "Name is required");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn internal_errors_hide_their_cause() {
        let response = AppError::InternalError("connection refused".into()).error_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            AppError::InternalError("x".into()).user_messages(),
            vec!["Something went wrong. Please try again.".to_string()]
        );
    }

    #[test]
    fn missing_row_maps_to_not_found() {
        assert!(matches!(AppError::from(sqlx::Error::RowNotFound), AppError::NotFound(_)));
    }
}
