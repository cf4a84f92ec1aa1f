use actix_web::{post, web, HttpRequest, HttpResponse};

use crate::{
    entities::{contact::ContactForm, flash::FlashMessage},
    errors::AppError,
    handlers::flash::redirect_with_flash,
    utils::get_client_ip::get_client_ip,
    AppState,
};

const CONTACT_ANCHOR: &str = "/#contact";

#[post("/contact")]
#[tracing::instrument(skip_all)]
pub async fn submit_contact(
    req: HttpRequest,
    state: web::Data<AppState>,
    form: web::Form<ContactForm>,
) -> HttpResponse {
    let client_ip = get_client_ip(&req, state.config.trust_x_forwarded_for);

    let flash = match state.contact_handler.submit(form.into_inner()).await {
        Ok(id) => {
            tracing::info!(contact_id = id, %client_ip, "Contact message received");
            FlashMessage::success("Thank you for your message! I'll get back to you soon.")
        }
        Err(AppError::ValidationError(errors)) => {
            tracing::debug!(%client_ip, "Contact form rejected");
            return redirect_with_flash(
                CONTACT_ANCHOR,
                FlashMessage::errors(errors.into_iter().map(|e| e.message)),
            );
        }
        Err(_) => FlashMessage::error("Sorry, there was an error sending your message. Please try again."),
    };

    redirect_with_flash(CONTACT_ANCHOR, vec![flash])
}
