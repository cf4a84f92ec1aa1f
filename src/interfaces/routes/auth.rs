use actix_web::web;

use crate::handlers::auth::{login, login_page, logout, register, register_page};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(login_page)
        .service(login)
        .service(register_page)
        .service(register)
        .service(logout);
}
