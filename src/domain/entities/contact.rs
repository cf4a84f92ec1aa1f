use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::form_rules::not_blank;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ContactForm {
    #[validate(
        custom(function = "not_blank", message = "Name is required"),
        length(min = 2, max = 100, message = "Name must be between 2 and 100 characters")
    )]
    #[serde(default)]
    pub name: String,

    #[validate(
        custom(function = "not_blank", message = "Email is required"),
        email(message = "Invalid email address"),
        length(max = 120, message = "Email is too long")
    )]
    #[serde(default)]
    pub email: String,

    #[validate(
        custom(function = "not_blank", message = "Subject is required"),
        length(min = 5, max = 200, message = "Subject must be between 5 and 200 characters")
    )]
    #[serde(default)]
    pub subject: String,

    #[validate(
        custom(function = "not_blank", message = "Message is required"),
        length(min = 10, max = 1000, message = "Message must be between 10 and 1000 characters")
    )]
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct ContactInsert {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl From<ContactForm> for ContactInsert {
    fn from(form: ContactForm) -> Self {
        ContactInsert {
            name: form.name,
            email: form.email,
            subject: form.subject,
            message: form.message,
        }
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub is_read: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(message: &str) -> ContactForm {
        ContactForm {
            name: "Grace".into(),
            email: "grace@example.com".into(),
            subject: "Hello there".into(),
            message: message.into(),
        }
    }

    #[test]
    fn message_needs_ten_characters() {
        assert!(form("123456789").validate().is_err());
        assert!(form("1234567890").validate().is_ok());
    }

    #[test]
    fn invalid_email_is_rejected() {
        let mut f = form("long enough message");
        f.email = "not-an-email".into();
        let errors = f.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }
}
