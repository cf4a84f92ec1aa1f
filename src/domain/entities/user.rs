use serde::{Serialize, Deserialize};
use chrono::{DateTime, Utc};
use validator::Validate;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::domain::form_rules::{checkbox, empty_string_as_none, not_blank};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct UserInsert {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub is_admin: bool,
}

#[derive(Deserialize, Validate, Zeroize, ZeroizeOnDrop)]
pub struct RegisterForm {
    #[validate(
        custom(function = "not_blank", message = "Full name is required"),
        length(min = 2, max = 100, message = "Name must be between 2 and 100 characters")
    )]
    #[serde(default)]
    pub full_name: String,

    #[validate(
        custom(function = "not_blank", message = "Username is required"),
        length(min = 3, max = 80, message = "Username must be between 3 and 80 characters")
    )]
    #[serde(default)]
    pub username: String,

    #[validate(
        custom(function = "not_blank", message = "Email is required"),
        email(message = "Invalid email address"),
        length(max = 120, message = "Email is too long")
    )]
    #[serde(default)]
    pub email: String,

    #[validate(
        custom(function = "not_blank", message = "Password is required"),
        length(min = 6, max = 128, message = "Password must be between 6 and 128 characters")
    )]
    #[serde(default)]
    pub password: String,

    #[validate(
        custom(function = "not_blank", message = "Password confirmation is required"),
        must_match(other = "password", message = "Passwords must match")
    )]
    #[serde(default)]
    pub password2: String,
}

impl RegisterForm {
    pub fn prepare_for_insert(&self, password_hash: String) -> UserInsert {
        UserInsert {
            username: self.username.clone(),
            email: self.email.clone(),
            password_hash,
            full_name: self.full_name.clone(),
            is_admin: false,
        }
    }
}

#[derive(Deserialize, Validate, Zeroize, ZeroizeOnDrop)]
pub struct LoginForm {
    #[validate(
        custom(function = "not_blank", message = "Username is required"),
        length(min = 3, max = 80, message = "Username must be between 3 and 80 characters")
    )]
    #[serde(default)]
    pub username: String,

    #[validate(custom(function = "not_blank", message = "Password is required"))]
    #[serde(default)]
    pub password: String,

    #[serde(default, deserialize_with = "checkbox")]
    pub remember_me: bool,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub next: Option<String>,
}

/// User as exposed to administrators and to the session owner.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        PublicUser {
            id: user.id,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            is_admin: user.is_admin,
            created_at: user.created_at,
        }
    }
}
