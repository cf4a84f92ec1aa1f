use actix_web::web;

use crate::handlers::home::not_found;

mod admin;
mod auth;
mod json_error;
mod portfolio;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(json_error::config_routes);
    cfg.configure(portfolio::config_routes);
    cfg.configure(auth::config_routes);
    cfg.configure(admin::config_routes);
    cfg.default_service(web::to(not_found));
}
