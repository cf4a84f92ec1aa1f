use std::sync::Arc;

use crate::repositories::{
    contact::ContactRepository,
    engagement::EngagementRepository,
    experience::ExperienceRepository,
    project::ProjectRepository,
    skill::SkillRepository,
    sqlx_repo::{
        SqlxContactRepo, SqlxEngagementRepo, SqlxExperienceRepo, SqlxProjectRepo, SqlxSkillRepo,
        SqlxUserRepo,
    },
    token::SessionRevocationRepository,
    user::UserRepository,
};

/// Every store the use cases talk to, behind trait objects so tests can swap them.
#[derive(Clone)]
pub struct SharedRepositories {
    pub user_repo: Arc<dyn UserRepository>,
    pub project_repo: Arc<dyn ProjectRepository>,
    pub skill_repo: Arc<dyn SkillRepository>,
    pub experience_repo: Arc<dyn ExperienceRepository>,
    pub contact_repo: Arc<dyn ContactRepository>,
    pub engagement_repo: Arc<dyn EngagementRepository>,
    pub revocations: Option<Arc<dyn SessionRevocationRepository>>,
}

impl SharedRepositories {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SharedRepositories {
            user_repo: Arc::new(SqlxUserRepo::new(pool.clone())),
            project_repo: Arc::new(SqlxProjectRepo::new(pool.clone())),
            skill_repo: Arc::new(SqlxSkillRepo::new(pool.clone())),
            experience_repo: Arc::new(SqlxExperienceRepo::new(pool.clone())),
            contact_repo: Arc::new(SqlxContactRepo::new(pool.clone())),
            engagement_repo: Arc::new(SqlxEngagementRepo::new(pool)),
            revocations: None,
        }
    }

    pub fn with_revocations(mut self, revocations: Arc<dyn SessionRevocationRepository>) -> Self {
        self.revocations = Some(revocations);
        self
    }
}
