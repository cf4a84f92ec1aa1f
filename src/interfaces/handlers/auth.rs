use actix_web::{
    cookie::{time::Duration as CookieDuration, Cookie, SameSite},
    get, post,
    http::StatusCode,
    web, HttpRequest, HttpResponse,
};
use serde::Serialize;

use crate::{
    entities::{
        flash::FlashMessage,
        token::IssuedSession,
        user::{LoginForm, RegisterForm},
    },
    errors::{AppError, AuthError},
    handlers::{
        flash::{redirect_with_flash, see_other},
        page::{render_page, FormSchema},
    },
    settings::AppConfig,
    use_cases::extractors::{AuthenticatedUser, CurrentPrincipal},
    utils::safe_redirect::safe_next,
    AppState,
};

const LOGIN_FIELDS: &[&str] = &["username", "password", "remember_me", "next"];
const REGISTER_FIELDS: &[&str] = &["full_name", "username", "email", "password", "password2"];

#[derive(Serialize)]
struct FormPage {
    form: FormSchema,
}

#[derive(serde::Deserialize)]
pub struct NextQuery {
    next: Option<String>,
}

pub fn session_cookie(config: &AppConfig, session: &IssuedSession) -> Cookie<'static> {
    let mut builder = Cookie::build(config.session_cookie_name.clone(), session.token.clone())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.is_production());

    if let Some(lifetime) = session.persistent_for {
        builder = builder.max_age(CookieDuration::seconds(lifetime.num_seconds()));
    }
    builder.finish()
}

fn session_removal_cookie(config: &AppConfig) -> Cookie<'static> {
    let mut removal = Cookie::new(config.session_cookie_name.clone(), "");
    removal.set_path("/");
    removal.make_removal();
    removal
}

#[get("/login")]
pub async fn login_page(
    req: HttpRequest,
    principal: CurrentPrincipal,
    query: web::Query<NextQuery>,
) -> HttpResponse {
    if principal.0.is_authenticated() {
        return redirect_with_flash("/", Vec::new());
    }

    let action = match query.next.as_deref() {
        Some(next) => format!("/login?next={}", urlencoding::encode(&safe_next(Some(next)))),
        None => "/login".to_string(),
    };
    let page = FormPage { form: FormSchema::post(action, LOGIN_FIELDS) };
    render_page(&req, &principal.0, StatusCode::OK, &page)
}

#[post("/login")]
#[tracing::instrument(skip_all)]
pub async fn login(
    state: web::Data<AppState>,
    principal: CurrentPrincipal,
    query: web::Query<NextQuery>,
    form: web::Form<LoginForm>,
) -> HttpResponse {
    if principal.0.is_authenticated() {
        return redirect_with_flash("/", Vec::new());
    }

    let form = form.into_inner();
    let next = form.next.clone().or_else(|| query.next.clone());

    match state.auth_handler.login(form).await {
        Ok(success) => {
            let cookie = session_cookie(&state.config, &success.session);
            see_other(
                &safe_next(next.as_deref()),
                vec![FlashMessage::success(format!("Welcome back, {}!", success.username))],
            )
            .cookie(cookie)
            .finish()
        }
        Err(e @ AuthError::SessionCreation) | Err(e @ AuthError::SessionStore(_)) => {
            tracing::error!("Login failed unexpectedly: {}", e);
            redirect_with_flash("/login", FlashMessage::errors(e.user_messages()))
        }
        Err(e) => redirect_with_flash("/login", FlashMessage::errors(e.user_messages())),
    }
}

#[get("/register")]
pub async fn register_page(req: HttpRequest, principal: CurrentPrincipal) -> HttpResponse {
    if principal.0.is_authenticated() {
        return redirect_with_flash("/", Vec::new());
    }

    let page = FormPage { form: FormSchema::post("/register", REGISTER_FIELDS) };
    render_page(&req, &principal.0, StatusCode::OK, &page)
}

#[post("/register")]
#[tracing::instrument(skip_all)]
pub async fn register(
    state: web::Data<AppState>,
    principal: CurrentPrincipal,
    form: web::Form<RegisterForm>,
) -> HttpResponse {
    if principal.0.is_authenticated() {
        return redirect_with_flash("/", Vec::new());
    }

    match state.auth_handler.register(form.into_inner()).await {
        Ok(_) => redirect_with_flash(
            "/login",
            vec![FlashMessage::success("Registration successful! Please log in.")],
        ),
        Err(e) => {
            if let AppError::InternalError(cause) = &e {
                tracing::error!("Registration failed: {}", cause);
            }
            redirect_with_flash("/register", FlashMessage::errors(e.user_messages()))
        }
    }
}

#[get("/logout")]
#[tracing::instrument(skip_all, fields(user_id = user.0.id))]
pub async fn logout(state: web::Data<AppState>, user: AuthenticatedUser) -> HttpResponse {
    if let Err(e) = state.auth_handler.logout(&user.0).await {
        tracing::error!("Failed to revoke session: {}", e);
    }

    see_other("/", vec![FlashMessage::info("You have been logged out.")])
        .cookie(session_removal_cookie(&state.config))
        .finish()
}

/// First-run helper that creates the administrator account.
/// Mounted inside the `/admin` scope but exempt from the admin guard.
#[get("/create_admin")]
pub async fn create_admin(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let outcome = state
        .auth_handler
        .bootstrap_admin(
            state.config.is_production(),
            state.config.bootstrap_admin_password.as_deref(),
        )
        .await?;

    let status = if outcome.created { StatusCode::CREATED } else { StatusCode::OK };
    Ok(HttpResponse::build(status).json(outcome))
}
