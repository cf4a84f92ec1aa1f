use async_trait::async_trait;

use crate::{
    entities::project::{AdminProjectRow, CategoryFilter, Project, ProjectInsert},
    errors::AppError,
    repositories::sqlx_repo::SqlxProjectRepo,
};

const PROJECT_COLUMNS: &str = "id, title, short_description, description, technologies, \
    github_url, live_url, image_url, category, featured, order_priority, created_at";

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Projects ordered by priority (highest first), ties by id.
    async fn list_projects(&self, filter: CategoryFilter) -> Result<Vec<Project>, AppError>;
    async fn list_featured_projects(&self, limit: i64) -> Result<Vec<Project>, AppError>;
    async fn list_projects_with_counts(&self) -> Result<Vec<AdminProjectRow>, AppError>;
    async fn get_project_by_id(&self, id: i64) -> Result<Option<Project>, AppError>;
    async fn create_project(&self, project: &ProjectInsert) -> Result<Project, AppError>;
    /// Removes the project together with its likes and comments.
    async fn delete_project(&self, id: i64) -> Result<(), AppError>;
    async fn count_projects(&self) -> Result<i64, AppError>;
}

impl SqlxProjectRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxProjectRepo { pool }
    }
}

#[async_trait]
impl ProjectRepository for SqlxProjectRepo {
    async fn list_projects(&self, filter: CategoryFilter) -> Result<Vec<Project>, AppError> {
        let projects = match filter {
            CategoryFilter::All => {
                sqlx::query_as::<_, Project>(&format!(
                    "SELECT {PROJECT_COLUMNS} FROM projects ORDER BY order_priority DESC, id ASC"
                ))
                .fetch_all(&self.pool)
                .await?
            }
            CategoryFilter::Only(category) => {
                sqlx::query_as::<_, Project>(&format!(
                    "SELECT {PROJECT_COLUMNS} FROM projects WHERE category = $1 \
                     ORDER BY order_priority DESC, id ASC"
                ))
                .bind(category)
                .fetch_all(&self.pool)
                .await?
            }
            CategoryFilter::Unknown => Vec::new(),
        };

        Ok(projects)
    }

    async fn list_featured_projects(&self, limit: i64) -> Result<Vec<Project>, AppError> {
        let projects = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE featured \
             ORDER BY order_priority DESC, id ASC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }

    async fn list_projects_with_counts(&self) -> Result<Vec<AdminProjectRow>, AppError> {
        let rows = sqlx::query_as::<_, AdminProjectRow>(
            r#"
            SELECT p.id, p.title, p.short_description, p.description, p.technologies,
                   p.github_url, p.live_url, p.image_url, p.category, p.featured,
                   p.order_priority, p.created_at,
                   (SELECT COUNT(*) FROM project_likes l WHERE l.project_id = p.id) AS likes_count,
                   (SELECT COUNT(*) FROM project_comments c WHERE c.project_id = p.id) AS comments_count
            FROM projects p
            ORDER BY p.order_priority DESC, p.id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn get_project_by_id(&self, id: i64) -> Result<Option<Project>, AppError> {
        let project = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }

    async fn create_project(&self, project: &ProjectInsert) -> Result<Project, AppError> {
        let created = sqlx::query_as::<_, Project>(&format!(
            r#"
            INSERT INTO projects (
                title, short_description, description, technologies,
                github_url, live_url, image_url, category, featured, order_priority
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {PROJECT_COLUMNS}
            "#
        ))
        .bind(&project.title)
        .bind(&project.short_description)
        .bind(&project.description)
        .bind(&project.technologies)
        .bind(&project.github_url)
        .bind(&project.live_url)
        .bind(&project.image_url)
        .bind(project.category)
        .bind(project.featured)
        .bind(project.order_priority)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn delete_project(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Project not found".to_string()));
        }

        Ok(())
    }

    async fn count_projects(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM projects")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
