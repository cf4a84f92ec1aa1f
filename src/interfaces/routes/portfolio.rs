use actix_web::web;

use crate::handlers::{
    contact::submit_contact,
    home::home,
    projects::{api_projects, comment_project, like_project, project_detail},
};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home)
        .service(submit_contact)
        .service(api_projects)
        .service(project_detail)
        .service(like_project)
        .service(comment_project);
}
