use actix_web::{
    body::BoxBody,
    cookie::Cookie,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage, ResponseError,
};
use futures_util::future::{ok, Ready, LocalBoxFuture};
use std::{rc::Rc, task::{Context, Poll}};

use crate::{entities::principal::Principal, errors::AuthError, AppState};

const ADMIN_PREFIX: &str = "/admin";
const ADMIN_BOOTSTRAP_PATH: &str = "/admin/create_admin";

/// Resolves the session cookie into a [`Principal`] once per request and
/// keeps non-admins out of the admin area.
pub struct SessionMiddleware;

impl<S> Transform<S, ServiceRequest> for SessionMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(SessionMiddlewareService {
            service: Rc::new(service),
        })
    }
}

pub struct SessionMiddlewareService<S> {
    service: Rc<S>,
}

impl<S> Service<ServiceRequest> for SessionMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
                tracing::error!("AppState missing in session middleware");
                return service.call(req).await;
            };

            let cookie_name = state.config.session_cookie_name.clone();
            let (principal, stale_cookie) = match req.cookie(&cookie_name) {
                None => (Principal::Anonymous, false),
                Some(cookie) => match state.auth_handler.resolve_principal(cookie.value()).await {
                    Ok(principal) => (principal, false),
                    Err(AuthError::SessionStore(cause)) => {
                        tracing::error!("Could not load session user: {}", cause);
                        (Principal::Anonymous, false)
                    }
                    Err(e) => {
                        tracing::debug!("Discarding session cookie: {}", e);
                        (Principal::Anonymous, true)
                    }
                },
            };

            if let Err(forbidden) = enforce_admin_access(req.path(), &principal) {
                let response = forbidden.error_response();
                return Ok(req.into_response(response));
            }

            req.extensions_mut().insert(principal);
            let mut res = service.call(req).await?;

            if stale_cookie {
                let mut removal = Cookie::new(cookie_name, "");
                removal.set_path("/");
                if let Err(e) = res.response_mut().add_removal_cookie(&removal) {
                    tracing::warn!("Failed to clear stale session cookie: {}", e);
                }
            }
            Ok(res)
        })
    }
}

fn is_admin_path(path: &str) -> bool {
    let in_admin_area = path == ADMIN_PREFIX || path.starts_with("/admin/");
    in_admin_area && path != ADMIN_BOOTSTRAP_PATH
}

fn enforce_admin_access(path: &str, principal: &Principal) -> Result<(), AuthError> {
    if is_admin_path(path) {
        principal.require_admin().map_err(|e| {
            tracing::warn!("Admin access required for path: {}", path);
            e
        })?;
    }
    Ok(())
}
