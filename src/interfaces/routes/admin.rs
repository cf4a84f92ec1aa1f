use actix_web::web;

use crate::handlers::{
    admin::{
        approve_comment, create_project, create_skill, dashboard, delete_project, delete_user,
        list_comments, list_contacts, list_projects, list_users, mark_contact_read,
    },
    auth::create_admin,
    system::admin_health_check,
};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .service(create_admin)
            .service(dashboard)
            .service(admin_health_check)
            .service(list_projects)
            .service(create_project)
            .service(delete_project)
            .service(list_users)
            .service(delete_user)
            .service(list_contacts)
            .service(mark_contact_read)
            .service(list_comments)
            .service(approve_comment)
            .service(create_skill),
    );
}
