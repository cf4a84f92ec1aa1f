use async_trait::async_trait;

use crate::{
    entities::contact::{Contact, ContactInsert},
    errors::AppError,
    repositories::sqlx_repo::SqlxContactRepo,
};

#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn create_contact(&self, contact: &ContactInsert) -> Result<i64, AppError>;
    /// Newest messages first.
    async fn list_contacts(&self, limit: Option<i64>) -> Result<Vec<Contact>, AppError>;
    async fn mark_contact_read(&self, id: i64) -> Result<(), AppError>;
    async fn count_contacts(&self) -> Result<i64, AppError>;
    async fn count_unread_contacts(&self) -> Result<i64, AppError>;
}

impl SqlxContactRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxContactRepo { pool }
    }
}

#[async_trait]
impl ContactRepository for SqlxContactRepo {
    async fn create_contact(&self, contact: &ContactInsert) -> Result<i64, AppError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO contacts (name, email, subject, message)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&contact.name)
        .bind(&contact.email)
        .bind(&contact.subject)
        .bind(&contact.message)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn list_contacts(&self, limit: Option<i64>) -> Result<Vec<Contact>, AppError> {
        let contacts = sqlx::query_as::<_, Contact>(
            r#"
            SELECT id, name, email, subject, message, created_at, is_read
            FROM contacts
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(contacts)
    }

    async fn mark_contact_read(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE contacts SET is_read = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Contact message not found".into()));
        }

        Ok(())
    }

    async fn count_contacts(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM contacts")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn count_unread_contacts(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM contacts WHERE NOT is_read")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
