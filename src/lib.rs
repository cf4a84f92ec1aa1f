use std::{path::PathBuf, sync::Arc};

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod graceful_shutdown;
pub mod shared_repos;

pub use domain::{entities, form_rules, use_cases};
pub use interfaces::{handlers, repositories, middlewares, routes};
pub use infrastructure::{auth, db, utils};

use auth::{jwt::JwtService, revocation::RedisSessionRevocations};
use repositories::token::SessionRevocationRepository;
use settings::AppConfig;
use shared_repos::SharedRepositories;
use use_cases::{
    admin::AdminHandler, auth::AuthHandler, contact::ContactHandler,
    engagement::EngagementHandler, portfolio::PortfolioHandler,
};

pub struct AppState {
    pub config: AppConfig,
    pub auth_handler: AuthHandler,
    pub portfolio_handler: PortfolioHandler,
    pub contact_handler: ContactHandler,
    pub engagement_handler: EngagementHandler,
    pub admin_handler: AdminHandler,
}

impl AppState {
    pub fn new(config: &AppConfig, pool: sqlx::PgPool) -> Self {
        let mut repos = SharedRepositories::new(pool);

        if let Some(url) = &config.redis_url {
            match RedisSessionRevocations::connect(url) {
                Ok(store) => {
                    let store: Arc<dyn SessionRevocationRepository> = Arc::new(store);
                    repos = repos.with_revocations(store);
                }
                Err(e) => tracing::error!("Redis connection error: {}", e),
            }
        }

        Self::from_repositories(config, repos)
    }

    /// Wires the use cases over an arbitrary set of stores.
    pub fn from_repositories(config: &AppConfig, repos: SharedRepositories) -> Self {
        let token_service = Arc::new(JwtService::new(config));

        AppState {
            config: config.clone(),
            auth_handler: AuthHandler::new(repos.user_repo.clone(), token_service, repos.revocations.clone()),
            portfolio_handler: PortfolioHandler::new(
                repos.project_repo.clone(),
                repos.skill_repo.clone(),
                repos.experience_repo.clone(),
                repos.engagement_repo.clone(),
            ),
            contact_handler: ContactHandler::new(repos.contact_repo.clone()),
            engagement_handler: EngagementHandler::new(
                repos.project_repo.clone(),
                repos.engagement_repo.clone(),
            ),
            admin_handler: AdminHandler {
                user_repo: repos.user_repo,
                project_repo: repos.project_repo,
                skill_repo: repos.skill_repo,
                contact_repo: repos.contact_repo,
                engagement_repo: repos.engagement_repo,
                upload_dir: PathBuf::from(&config.upload_dir),
            },
        }
    }
}
