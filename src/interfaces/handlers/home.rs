use actix_web::{
    dev::ServiceResponse,
    get,
    http::{
        header::{self, HeaderValue},
        StatusCode,
    },
    middleware::{ErrorHandlerResponse, ErrorHandlers},
    web, HttpRequest, HttpResponse,
};
use serde::Serialize;

use crate::{
    errors::AppError,
    handlers::page::{render_page, FormSchema},
    use_cases::{
        extractors::{principal_of, CurrentPrincipal},
        portfolio::PortfolioOverview,
    },
    AppState,
};

pub const CONTACT_FIELDS: &[&str] = &["name", "email", "subject", "message"];

#[derive(Serialize)]
struct HomePage {
    #[serde(flatten)]
    overview: PortfolioOverview,
    contact_form: FormSchema,
}

impl HomePage {
    fn new(overview: PortfolioOverview) -> Self {
        HomePage {
            overview,
            contact_form: FormSchema::post("/contact", CONTACT_FIELDS),
        }
    }
}

#[get("/")]
#[tracing::instrument(skip_all)]
pub async fn home(
    req: HttpRequest,
    state: web::Data<AppState>,
    principal: CurrentPrincipal,
) -> Result<HttpResponse, AppError> {
    let page = HomePage::new(state.portfolio_handler.overview().await?);
    Ok(render_page(&req, &principal.0, StatusCode::OK, &page))
}

/// Fallback for unmatched routes. The error pages layer renders the body.
pub async fn not_found(req: HttpRequest) -> Result<HttpResponse, AppError> {
    tracing::debug!("No route for {} {}", req.method(), req.path());
    Err(AppError::NotFound("Page not found".into()))
}

/// Renders the listing page in place of any 404 or 500 response, keeping
/// the status and any cookies already set. A 500 page carries no store data.
pub fn error_pages<B: 'static>() -> ErrorHandlers<B> {
    ErrorHandlers::new()
        .handler(StatusCode::NOT_FOUND, listing_error_page)
        .handler(StatusCode::INTERNAL_SERVER_ERROR, listing_error_page)
}

fn listing_error_page<B: 'static>(res: ServiceResponse<B>) -> actix_web::Result<ErrorHandlerResponse<B>> {
    let status = res.status();
    let (req, original) = res.into_parts();
    let set_cookies: Vec<HeaderValue> = original.headers().get_all(header::SET_COOKIE).cloned().collect();

    Ok(ErrorHandlerResponse::Future(Box::pin(async move {
        let overview = if status == StatusCode::NOT_FOUND {
            listing_overview(&req).await
        } else {
            PortfolioOverview::default()
        };
        let mut response = render_page(&req, &principal_of(&req), status, &HomePage::new(overview));
        for cookie in set_cookies {
            response.headers_mut().append(header::SET_COOKIE, cookie);
        }
        Ok(ServiceResponse::new(req, response).map_into_right_body())
    })))
}

async fn listing_overview(req: &HttpRequest) -> PortfolioOverview {
    let Some(state) = req.app_data::<web::Data<AppState>>() else {
        return PortfolioOverview::default();
    };
    state.portfolio_handler.overview().await.unwrap_or_else(|e| {
        tracing::error!("Failed to load listing for not-found page: {}", e);
        PortfolioOverview::default()
    })
}
