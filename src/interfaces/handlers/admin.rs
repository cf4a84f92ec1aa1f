use actix_multipart::form::{tempfile::TempFile, text::Text, MultipartForm};
use actix_web::{delete, get, post, web, HttpResponse};

use crate::{
    entities::{flash::FlashMessage, project::NewProjectForm, skill::NewSkillForm},
    errors::AppError,
    form_rules::is_checked,
    handlers::flash::redirect_with_flash,
    use_cases::{admin::StagedImage, extractors::AdminUser},
    AppState,
};

#[get("")]
pub async fn dashboard(_admin: AdminUser, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let dashboard = state.admin_handler.dashboard().await?;
    Ok(HttpResponse::Ok().json(dashboard))
}

#[get("/projects")]
pub async fn list_projects(_admin: AdminUser, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let projects = state.admin_handler.list_projects().await?;
    Ok(HttpResponse::Ok().json(projects))
}

#[get("/users")]
pub async fn list_users(_admin: AdminUser, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let users = state.admin_handler.list_users().await?;
    Ok(HttpResponse::Ok().json(users))
}

#[get("/contacts")]
pub async fn list_contacts(_admin: AdminUser, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let contacts = state.contact_handler.list(None).await?;
    Ok(HttpResponse::Ok().json(contacts))
}

#[get("/comments")]
pub async fn list_comments(_admin: AdminUser, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let comments = state.admin_handler.list_comments().await?;
    Ok(HttpResponse::Ok().json(comments))
}

#[get("/contact/{id}/mark_read")]
#[tracing::instrument(skip(admin, state), fields(admin_id = admin.0.id))]
pub async fn mark_contact_read(
    admin: AdminUser,
    state: web::Data<AppState>,
    id: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    state.contact_handler.mark_read(id.into_inner()).await?;
    Ok(redirect_with_flash(
        "/admin/contacts",
        vec![FlashMessage::success("Message marked as read.")],
    ))
}

#[get("/comment/{id}/approve")]
#[tracing::instrument(skip(admin, state), fields(admin_id = admin.0.id))]
pub async fn approve_comment(
    admin: AdminUser,
    state: web::Data<AppState>,
    id: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    state.engagement_handler.approve_comment(id.into_inner()).await?;
    Ok(redirect_with_flash(
        "/admin/comments",
        vec![FlashMessage::success("Comment approved.")],
    ))
}

/// Multipart body of the project creation form.
#[derive(MultipartForm)]
pub struct ProjectUpload {
    pub title: Option<Text<String>>,
    pub short_description: Option<Text<String>>,
    pub description: Option<Text<String>>,
    pub technologies: Option<Text<String>>,
    pub category: Option<Text<String>>,
    pub github_url: Option<Text<String>>,
    pub live_url: Option<Text<String>>,
    pub featured: Option<Text<String>>,
    pub order_priority: Option<Text<String>>,
    #[multipart(limit = "5MB")]
    pub image: Option<TempFile>,
}

fn text(field: Option<Text<String>>) -> String {
    field.map(Text::into_inner).unwrap_or_default()
}

fn optional_text(field: Option<Text<String>>) -> Option<String> {
    field.map(Text::into_inner).filter(|v| !v.trim().is_empty())
}

impl ProjectUpload {
    /// Splits the upload into the validated form and the optional staged file.
    pub fn into_parts(self) -> Result<(NewProjectForm, Option<TempFile>), AppError> {
        let order_priority = match optional_text(self.order_priority) {
            None => None,
            Some(raw) => Some(raw.trim().parse::<i32>().map_err(|_| {
                AppError::invalid_field("order_priority", "Order priority must be a whole number")
            })?),
        };

        let image = self
            .image
            .filter(|file| file.size > 0 && file.file_name.as_deref().is_some_and(|n| !n.is_empty()));

        let form = NewProjectForm {
            title: text(self.title),
            short_description: text(self.short_description),
            description: text(self.description),
            technologies: text(self.technologies),
            category: text(self.category),
            github_url: optional_text(self.github_url),
            live_url: optional_text(self.live_url),
            image_filename: None,
            featured: self.featured.is_some_and(|f| is_checked(&f)),
            order_priority,
        };
        Ok((form, image))
    }
}

#[post("/projects")]
#[tracing::instrument(skip_all, fields(admin_id = admin.0.id))]
pub async fn create_project(
    admin: AdminUser,
    state: web::Data<AppState>,
    MultipartForm(upload): MultipartForm<ProjectUpload>,
) -> Result<HttpResponse, AppError> {
    let (form, image) = upload.into_parts()?;
    let staged = image.as_ref().map(|file| StagedImage {
        original_filename: file.file_name.clone().unwrap_or_default(),
        temp_path: file.file.path().to_path_buf(),
    });

    let project = state.admin_handler.create_project(form, staged).await?;
    Ok(HttpResponse::Created().json(project))
}

#[post("/skills")]
#[tracing::instrument(skip_all, fields(admin_id = admin.0.id))]
pub async fn create_skill(
    admin: AdminUser,
    state: web::Data<AppState>,
    form: web::Json<NewSkillForm>,
) -> Result<HttpResponse, AppError> {
    let skill = state.admin_handler.create_skill(form.into_inner()).await?;
    Ok(HttpResponse::Created().json(skill))
}

#[delete("/projects/{id}")]
#[tracing::instrument(skip(admin, state), fields(admin_id = admin.0.id))]
pub async fn delete_project(
    admin: AdminUser,
    state: web::Data<AppState>,
    id: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    state.admin_handler.delete_project(id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[delete("/users/{id}")]
#[tracing::instrument(skip(admin, state), fields(admin_id = admin.0.id))]
pub async fn delete_user(
    admin: AdminUser,
    state: web::Data<AppState>,
    id: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    state.admin_handler.delete_user(&admin.0, id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
