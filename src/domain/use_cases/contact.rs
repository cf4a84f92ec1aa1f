use std::sync::Arc;

use validator::Validate;

use crate::entities::contact::{Contact, ContactForm, ContactInsert};
use crate::errors::AppError;
use crate::repositories::contact::ContactRepository;

#[derive(Clone)]
pub struct ContactHandler {
    pub contact_repo: Arc<dyn ContactRepository>,
}

impl ContactHandler {
    pub fn new(contact_repo: Arc<dyn ContactRepository>) -> Self {
        ContactHandler { contact_repo }
    }

    /// Stores a visitor's message. Returns the new message id.
    pub async fn submit(&self, form: ContactForm) -> Result<i64, AppError> {
        form.validate()?;

        let id = self
            .contact_repo
            .create_contact(&ContactInsert::from(form))
            .await
            .inspect_err(|e| tracing::error!("Failed to store contact message: {}", e))?;

        Ok(id)
    }

    /// Newest first; `limit` of `None` returns every message.
    pub async fn list(&self, limit: Option<i64>) -> Result<Vec<Contact>, AppError> {
        self.contact_repo.list_contacts(limit).await
    }

    pub async fn mark_read(&self, id: i64) -> Result<(), AppError> {
        self.contact_repo.mark_contact_read(id).await.map_err(|e| match e {
            AppError::NotFound(_) => AppError::NotFound("Contact message not found".into()),
            other => other,
        })
    }
}
