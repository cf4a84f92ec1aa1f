use actix_web::{
    cookie::{time::Duration as CookieDuration, Cookie, SameSite},
    http::header,
    HttpRequest, HttpResponse, HttpResponseBuilder,
};

use crate::entities::flash::FlashMessage;

pub const FLASH_COOKIE: &str = "flash";
const FLASH_COOKIE_MINUTES: i64 = 5;

pub fn encode_flash(messages: &[FlashMessage]) -> Option<String> {
    serde_json::to_string(messages)
        .map(|json| urlencoding::encode(&json).into_owned())
        .inspect_err(|e| tracing::warn!("Failed to encode flash messages: {}", e))
        .ok()
}

/// Garbage in the cookie reads as "no messages".
pub fn decode_flash(raw: &str) -> Vec<FlashMessage> {
    urlencoding::decode(raw)
        .ok()
        .and_then(|json| serde_json::from_str(&json).ok())
        .unwrap_or_default()
}

fn flash_cookie(value: String) -> Cookie<'static> {
    Cookie::build(FLASH_COOKIE, value)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::minutes(FLASH_COOKIE_MINUTES))
        .finish()
}

/// Messages queued by the previous response.
pub fn pending_flash(req: &HttpRequest) -> Vec<FlashMessage> {
    req.cookie(FLASH_COOKIE)
        .map(|cookie| decode_flash(cookie.value()))
        .unwrap_or_default()
}

/// Expires the flash cookie once its messages have been shown.
pub fn consume_flash(req: &HttpRequest, builder: &mut HttpResponseBuilder) {
    if req.cookie(FLASH_COOKIE).is_some() {
        let mut removal = Cookie::new(FLASH_COOKIE, "");
        removal.set_path("/");
        removal.make_removal();
        builder.cookie(removal);
    }
}

/// `303 See Other` to `location`, queueing `messages` for the next page.
pub fn see_other(location: &str, messages: Vec<FlashMessage>) -> HttpResponseBuilder {
    let mut builder = HttpResponse::SeeOther();
    builder.insert_header((header::LOCATION, location.to_string()));
    if !messages.is_empty() {
        if let Some(value) = encode_flash(&messages) {
            builder.cookie(flash_cookie(value));
        }
    }
    builder
}

pub fn redirect_with_flash(location: &str, messages: Vec<FlashMessage>) -> HttpResponse {
    see_other(location, messages).finish()
}
