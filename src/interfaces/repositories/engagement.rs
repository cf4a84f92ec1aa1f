use async_trait::async_trait;
use sqlx::PgConnection;

use crate::{
    entities::engagement::{CommentInsert, CommentView, LikeToggle, ProjectComment},
    errors::AppError,
    repositories::sqlx_repo::SqlxEngagementRepo,
};

const COMMENT_VIEW_SELECT: &str = r#"
    SELECT c.id, c.project_id, p.title AS project_title, c.content, c.created_at,
           c.is_approved, u.username, u.full_name
    FROM project_comments c
    JOIN users u ON u.id = c.user_id
    JOIN projects p ON p.id = c.project_id
"#;

#[async_trait]
pub trait EngagementRepository: Send + Sync {
    /// Flips the (user, project) like and reports the new state.
    async fn toggle_like(&self, user_id: i64, project_id: i64) -> Result<LikeToggle, AppError>;
    async fn count_likes(&self, project_id: i64) -> Result<i64, AppError>;
    async fn has_liked(&self, user_id: i64, project_id: i64) -> Result<bool, AppError>;
    async fn count_all_likes(&self) -> Result<i64, AppError>;
    async fn create_comment(&self, comment: &CommentInsert) -> Result<ProjectComment, AppError>;
    /// Approved comments of one project, newest first.
    async fn approved_comments(&self, project_id: i64) -> Result<Vec<CommentView>, AppError>;
    /// Every comment, newest first.
    async fn list_comments(&self) -> Result<Vec<CommentView>, AppError>;
    async fn approve_comment(&self, id: i64) -> Result<(), AppError>;
    async fn count_comments(&self) -> Result<i64, AppError>;
    async fn count_pending_comments(&self) -> Result<i64, AppError>;
}

impl SqlxEngagementRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxEngagementRepo { pool }
    }
}

async fn flip_like(conn: &mut PgConnection, user_id: i64, project_id: i64) -> Result<LikeToggle, sqlx::Error> {
    let removed = sqlx::query("DELETE FROM project_likes WHERE user_id = $1 AND project_id = $2")
        .bind(user_id)
        .bind(project_id)
        .execute(&mut *conn)
        .await?
        .rows_affected();

    // A concurrent request may insert the same pair first; the unique
    // constraint then turns this insert into a no-op.
    if removed == 0 {
        sqlx::query(
            r#"
            INSERT INTO project_likes (user_id, project_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, project_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(project_id)
        .execute(&mut *conn)
        .await?;
    }

    let likes_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM project_likes WHERE project_id = $1")
        .bind(project_id)
        .fetch_one(&mut *conn)
        .await?;

    Ok(LikeToggle { liked: removed == 0, likes_count })
}

#[async_trait]
impl EngagementRepository for SqlxEngagementRepo {
    async fn toggle_like(&self, user_id: i64, project_id: i64) -> Result<LikeToggle, AppError> {
        let mut tx = self.pool.begin().await?;

        match flip_like(&mut tx, user_id, project_id).await {
            Ok(toggle) => {
                tx.commit().await?;
                Ok(toggle)
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::error!("Like toggle rollback failed: {}", rollback_err);
                }
                Err(e.into())
            }
        }
    }

    async fn count_likes(&self, project_id: i64) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM project_likes WHERE project_id = $1")
            .bind(project_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn has_liked(&self, user_id: i64, project_id: i64) -> Result<bool, AppError> {
        let liked: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM project_likes WHERE user_id = $1 AND project_id = $2)",
        )
        .bind(user_id)
        .bind(project_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(liked)
    }

    async fn count_all_likes(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM project_likes")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn create_comment(&self, comment: &CommentInsert) -> Result<ProjectComment, AppError> {
        let created = sqlx::query_as::<_, ProjectComment>(
            r#"
            INSERT INTO project_comments (user_id, project_id, content)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, project_id, content, created_at, is_approved
            "#,
        )
        .bind(comment.user_id)
        .bind(comment.project_id)
        .bind(&comment.content)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn approved_comments(&self, project_id: i64) -> Result<Vec<CommentView>, AppError> {
        let comments = sqlx::query_as::<_, CommentView>(&format!(
            "{COMMENT_VIEW_SELECT} WHERE c.project_id = $1 AND c.is_approved \
             ORDER BY c.created_at DESC, c.id DESC"
        ))
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    async fn list_comments(&self) -> Result<Vec<CommentView>, AppError> {
        let comments = sqlx::query_as::<_, CommentView>(&format!(
            "{COMMENT_VIEW_SELECT} ORDER BY c.created_at DESC, c.id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    async fn approve_comment(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE project_comments SET is_approved = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Comment not found".into()));
        }

        Ok(())
    }

    async fn count_comments(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM project_comments")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn count_pending_comments(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM project_comments WHERE NOT is_approved")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
