use actix_web::{get, post, http::StatusCode, web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::{
    entities::{engagement::CommentForm, flash::FlashMessage},
    errors::AppError,
    handlers::{
        flash::redirect_with_flash,
        page::{render_page, FormSchema},
    },
    use_cases::{
        extractors::{AuthenticatedUser, CurrentPrincipal},
        portfolio::ProjectDetail,
    },
    AppState,
};

const COMMENT_FIELDS: &[&str] = &["content"];

#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    pub category: Option<String>,
}

#[derive(Serialize)]
struct ProjectPage {
    #[serde(flatten)]
    detail: ProjectDetail,
    comment_form: Option<FormSchema>,
}

#[get("/api/projects")]
pub async fn api_projects(
    state: web::Data<AppState>,
    query: web::Query<CategoryQuery>,
) -> Result<HttpResponse, AppError> {
    let projects = state
        .portfolio_handler
        .list_projects(query.category.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(projects))
}

#[get("/project/{id}")]
#[tracing::instrument(skip(req, state, principal))]
pub async fn project_detail(
    req: HttpRequest,
    state: web::Data<AppState>,
    principal: CurrentPrincipal,
    id: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = id.into_inner();
    let detail = state.portfolio_handler.project_detail(id, &principal.0).await?;

    let page = ProjectPage {
        detail,
        comment_form: principal
            .0
            .is_authenticated()
            .then(|| FormSchema::post(format!("/project/{id}/comment"), COMMENT_FIELDS)),
    };
    Ok(render_page(&req, &principal.0, StatusCode::OK, &page))
}

#[post("/project/{id}/like")]
#[tracing::instrument(skip(state, user), fields(user_id = user.0.id))]
pub async fn like_project(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    id: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let toggle = state
        .engagement_handler
        .toggle_like(&user.0, id.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(toggle))
}

#[post("/project/{id}/comment")]
#[tracing::instrument(skip(state, user, form), fields(user_id = user.0.id))]
pub async fn comment_project(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    id: web::Path<i64>,
    form: web::Form<CommentForm>,
) -> Result<HttpResponse, AppError> {
    let project_id = id.into_inner();
    let anchor = format!("/#project-{project_id}");

    match state
        .engagement_handler
        .add_comment(&user.0, project_id, form.into_inner())
        .await
    {
        Ok(_) => Ok(redirect_with_flash(
            &anchor,
            vec![FlashMessage::success("Comment added successfully!")],
        )),
        Err(AppError::ValidationError(errors)) => Ok(redirect_with_flash(
            &anchor,
            FlashMessage::errors(errors.into_iter().map(|e| e.message)),
        )),
        Err(e) => Err(e),
    }
}
