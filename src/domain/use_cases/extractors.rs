use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::entities::principal::{AuthenticatedPrincipal, Principal};

pub fn principal_of(req: &HttpRequest) -> Principal {
    req.extensions().get::<Principal>().cloned().unwrap_or_default()
}

/// Whoever is making the request, possibly anonymous.
#[derive(Debug)]
pub struct CurrentPrincipal(pub Principal);

impl FromRequest for CurrentPrincipal {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(Ok(CurrentPrincipal(principal_of(req))))
    }
}

/// Extractor for a logged-in user.
/// Returns 401 with a login hint when the request carries no valid session.
#[derive(Debug)]
pub struct AuthenticatedUser(pub AuthenticatedPrincipal);

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(
            principal_of(req)
                .require_authenticated()
                .map(AuthenticatedUser)
                .map_err(Into::into),
        )
    }
}

/// Extractor for administrators.
/// Returns 403 for members and anonymous callers alike.
#[derive(Debug)]
pub struct AdminUser(pub AuthenticatedPrincipal);

impl FromRequest for AdminUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(
            principal_of(req)
                .require_admin()
                .map(AdminUser)
                .map_err(|e| {
                    tracing::warn!("Admin access denied for {}", req.path());
                    e.into()
                }),
        )
    }
}
