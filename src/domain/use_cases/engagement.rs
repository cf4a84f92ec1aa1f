use std::sync::Arc;

use validator::Validate;

use crate::entities::engagement::{CommentForm, CommentInsert, LikeToggle, ProjectComment};
use crate::entities::principal::AuthenticatedPrincipal;
use crate::errors::AppError;
use crate::repositories::{engagement::EngagementRepository, project::ProjectRepository};

#[derive(Clone)]
pub struct EngagementHandler {
    pub project_repo: Arc<dyn ProjectRepository>,
    pub engagement_repo: Arc<dyn EngagementRepository>,
}

impl EngagementHandler {
    pub fn new(
        project_repo: Arc<dyn ProjectRepository>,
        engagement_repo: Arc<dyn EngagementRepository>,
    ) -> Self {
        EngagementHandler {
            project_repo,
            engagement_repo,
        }
    }

    async fn ensure_project(&self, project_id: i64) -> Result<(), AppError> {
        match self.project_repo.get_project_by_id(project_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound("Project not found".into())),
        }
    }

    /// Likes the project if the user has not, otherwise removes the like.
    pub async fn toggle_like(
        &self,
        user: &AuthenticatedPrincipal,
        project_id: i64,
    ) -> Result<LikeToggle, AppError> {
        self.ensure_project(project_id).await?;
        let toggle = self.engagement_repo.toggle_like(user.id, project_id).await?;

        tracing::debug!(user_id = user.id, project_id, liked = toggle.liked, "Like toggled");
        Ok(toggle)
    }

    /// Comments are published immediately.
    pub async fn add_comment(
        &self,
        user: &AuthenticatedPrincipal,
        project_id: i64,
        form: CommentForm,
    ) -> Result<ProjectComment, AppError> {
        self.ensure_project(project_id).await?;
        form.validate()?;

        let comment = self
            .engagement_repo
            .create_comment(&CommentInsert {
                user_id: user.id,
                project_id,
                content: form.content,
            })
            .await?;

        tracing::info!(comment_id = comment.id, project_id, user_id = user.id, "Comment added");
        Ok(comment)
    }

    pub async fn approve_comment(&self, id: i64) -> Result<(), AppError> {
        self.engagement_repo.approve_comment(id).await.map_err(|e| match e {
            AppError::NotFound(_) => AppError::NotFound("Comment not found".into()),
            other => other,
        })
    }
}
