use async_trait::async_trait;

use crate::{entities::experience::Experience, errors::AppError, repositories::sqlx_repo::SqlxExperienceRepo};

#[async_trait]
pub trait ExperienceRepository: Send + Sync {
    async fn list_experiences(&self) -> Result<Vec<Experience>, AppError>;
}

impl SqlxExperienceRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxExperienceRepo { pool }
    }
}

#[async_trait]
impl ExperienceRepository for SqlxExperienceRepo {
    async fn list_experiences(&self) -> Result<Vec<Experience>, AppError> {
        let experiences = sqlx::query_as::<_, Experience>(
            r#"
            SELECT id, company, position, description, start_date, end_date,
                   location, company_url, order_priority
            FROM experiences
            ORDER BY order_priority DESC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(experiences)
    }
}
