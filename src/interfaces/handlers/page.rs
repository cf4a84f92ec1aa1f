use actix_web::{http::StatusCode, HttpRequest, HttpResponse};
use serde::Serialize;

use crate::entities::{flash::FlashMessage, principal::{AuthenticatedPrincipal, Principal}};
use crate::handlers::flash::{consume_flash, pending_flash};

/// Description of a form the client should render.
#[derive(Debug, Serialize)]
pub struct FormSchema {
    pub action: String,
    pub method: &'static str,
    pub fields: &'static [&'static str],
}

impl FormSchema {
    pub fn post(action: impl Into<String>, fields: &'static [&'static str]) -> Self {
        FormSchema {
            action: action.into(),
            method: "POST",
            fields,
        }
    }
}

#[derive(Serialize)]
struct Page<'a, T: Serialize> {
    #[serde(flatten)]
    content: &'a T,
    flash: Vec<FlashMessage>,
    current_user: Option<&'a AuthenticatedPrincipal>,
}

/// JSON stand-in for a rendered page: the content plus pending flash
/// messages and the signed-in user. Flash messages are consumed.
pub fn render_page<T: Serialize>(
    req: &HttpRequest,
    principal: &Principal,
    status: StatusCode,
    content: &T,
) -> HttpResponse {
    let page = Page {
        content,
        flash: pending_flash(req),
        current_user: principal.as_authenticated(),
    };

    let mut builder = HttpResponse::build(status);
    consume_flash(req, &mut builder);
    builder.json(page)
}
