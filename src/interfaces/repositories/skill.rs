use async_trait::async_trait;

use crate::{
    entities::skill::{Skill, SkillInsert},
    errors::AppError,
    repositories::sqlx_repo::SqlxSkillRepo,
};

#[async_trait]
pub trait SkillRepository: Send + Sync {
    async fn list_skills(&self) -> Result<Vec<Skill>, AppError>;
    async fn create_skill(&self, skill: &SkillInsert) -> Result<Skill, AppError>;
}

impl SqlxSkillRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxSkillRepo { pool }
    }
}

#[async_trait]
impl SkillRepository for SqlxSkillRepo {
    async fn list_skills(&self) -> Result<Vec<Skill>, AppError> {
        let skills = sqlx::query_as::<_, Skill>(
            r#"
            SELECT id, name, category, proficiency, icon_class, order_priority
            FROM skills
            ORDER BY order_priority DESC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(skills)
    }

    async fn create_skill(&self, skill: &SkillInsert) -> Result<Skill, AppError> {
        let created = sqlx::query_as::<_, Skill>(
            r#"
            INSERT INTO skills (name, category, proficiency, icon_class, order_priority)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, category, proficiency, icon_class, order_priority
            "#,
        )
        .bind(&skill.name)
        .bind(skill.category)
        .bind(skill.proficiency)
        .bind(&skill.icon_class)
        .bind(skill.order_priority)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }
}
