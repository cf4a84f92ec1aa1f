use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use validator::Validate;

use crate::entities::contact::Contact;
use crate::entities::engagement::CommentView;
use crate::entities::principal::AuthenticatedPrincipal;
use crate::entities::project::{AdminProjectRow, NewProjectForm, Project};
use crate::entities::skill::{NewSkillForm, Skill, SkillInsert};
use crate::entities::user::PublicUser;
use crate::errors::AppError;
use crate::repositories::{
    contact::ContactRepository, engagement::EngagementRepository, project::ProjectRepository,
    skill::SkillRepository, user::UserRepository,
};
use crate::utils::image_upload::{store_project_image, UPLOAD_URL_PREFIX};

const RECENT_CONTACTS: i64 = 5;

#[derive(Debug, Serialize)]
pub struct DashboardCounts {
    pub projects: i64,
    pub users: i64,
    pub contacts: i64,
    pub unread_contacts: i64,
    pub comments: i64,
    pub pending_comments: i64,
    pub likes: i64,
}

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub counts: DashboardCounts,
    pub recent_contacts: Vec<Contact>,
}

/// An uploaded file already spooled to disk by the multipart layer.
#[derive(Debug)]
pub struct StagedImage {
    pub original_filename: String,
    pub temp_path: PathBuf,
}

#[derive(Clone)]
pub struct AdminHandler {
    pub user_repo: Arc<dyn UserRepository>,
    pub project_repo: Arc<dyn ProjectRepository>,
    pub skill_repo: Arc<dyn SkillRepository>,
    pub contact_repo: Arc<dyn ContactRepository>,
    pub engagement_repo: Arc<dyn EngagementRepository>,
    pub upload_dir: PathBuf,
}

impl AdminHandler {
    pub async fn dashboard(&self) -> Result<Dashboard, AppError> {
        let counts = DashboardCounts {
            projects: self.project_repo.count_projects().await?,
            users: self.user_repo.count_users().await?,
            contacts: self.contact_repo.count_contacts().await?,
            unread_contacts: self.contact_repo.count_unread_contacts().await?,
            comments: self.engagement_repo.count_comments().await?,
            pending_comments: self.engagement_repo.count_pending_comments().await?,
            likes: self.engagement_repo.count_all_likes().await?,
        };
        let recent_contacts = self.contact_repo.list_contacts(Some(RECENT_CONTACTS)).await?;

        Ok(Dashboard {
            counts,
            recent_contacts,
        })
    }

    pub async fn list_users(&self) -> Result<Vec<PublicUser>, AppError> {
        let users = self.user_repo.list_users().await?;
        Ok(users.into_iter().map(PublicUser::from).collect())
    }

    pub async fn list_projects(&self) -> Result<Vec<AdminProjectRow>, AppError> {
        self.project_repo.list_projects_with_counts().await
    }

    pub async fn list_comments(&self) -> Result<Vec<CommentView>, AppError> {
        self.engagement_repo.list_comments().await
    }

    /// Validates the form, stores the optional image, then inserts the project.
    /// A stored image is removed again when the insert fails.
    pub async fn create_project(
        &self,
        mut form: NewProjectForm,
        image: Option<StagedImage>,
    ) -> Result<Project, AppError> {
        form.image_filename = image.as_ref().map(|i| i.original_filename.clone());
        form.validate()?;
        let mut insert = form.prepare_for_insert(None)?;

        if let Some(image) = &image {
            let url = store_project_image(&image.original_filename, &image.temp_path, &self.upload_dir).await?;
            insert.image_url = Some(url);
        }

        match self.project_repo.create_project(&insert).await {
            Ok(project) => {
                tracing::info!(project_id = project.id, title = %project.title, "Project created");
                Ok(project)
            }
            Err(e) => {
                if let Some(url) = &insert.image_url {
                    self.discard_image(url).await;
                }
                Err(e)
            }
        }
    }

    async fn discard_image(&self, url: &str) {
        let Some(file_name) = url.strip_prefix(UPLOAD_URL_PREFIX).map(|f| f.trim_start_matches('/')) else {
            return;
        };
        let path = self.upload_dir.join(file_name);
        if let Err(e) = tokio::fs::remove_file(&path).await {
            tracing::warn!("Failed to remove orphaned upload {}: {}", path.display(), e);
        }
    }

    pub async fn create_skill(&self, form: NewSkillForm) -> Result<Skill, AppError> {
        form.validate()?;
        let skill = self.skill_repo.create_skill(&SkillInsert::try_from(form)?).await?;

        tracing::info!(skill_id = skill.id, name = %skill.name, "Skill created");
        Ok(skill)
    }

    /// Likes and comments of the project go with it.
    pub async fn delete_project(&self, id: i64) -> Result<(), AppError> {
        self.project_repo.delete_project(id).await.map_err(|e| match e {
            AppError::NotFound(_) => AppError::NotFound("Project not found".into()),
            other => other,
        })?;

        tracing::info!(project_id = id, "Project deleted");
        Ok(())
    }

    pub async fn delete_user(&self, acting: &AuthenticatedPrincipal, id: i64) -> Result<(), AppError> {
        if acting.id == id {
            return Err(AppError::Conflict("You cannot delete your own account".into()));
        }

        self.user_repo.delete_user(id).await.map_err(|e| match e {
            AppError::NotFound(_) => AppError::NotFound("User not found".into()),
            other => other,
        })?;

        tracing::info!(user_id = id, deleted_by = acting.id, "User deleted");
        Ok(())
    }
}
