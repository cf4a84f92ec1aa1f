#![allow(dead_code)]

use std::{collections::HashSet, sync::{Arc, Mutex}};

use actix_web::{cookie::Cookie, web};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use portfolio_showcase::{
    auth::{jwt::JwtService, password::hash_password},
    entities::{
        contact::{Contact, ContactInsert},
        engagement::{CommentInsert, CommentView, LikeToggle, ProjectComment},
        experience::Experience,
        project::{AdminProjectRow, CategoryFilter, Project, ProjectCategory, ProjectInsert},
        skill::{Skill, SkillCategory, SkillInsert},
        user::{User, UserInsert},
    },
    errors::{AppError, AuthError},
    repositories::{
        contact::ContactRepository,
        engagement::EngagementRepository,
        experience::ExperienceRepository,
        project::ProjectRepository,
        skill::SkillRepository,
        token::{SessionRevocationRepository, TokenServiceRepository},
        user::UserRepository,
    },
    settings::{AppConfig, AppEnvironment},
    shared_repos::SharedRepositories,
    AppState,
};

pub const TEST_PASSWORD: &str = "secret123";

pub fn test_config() -> AppConfig {
    AppConfig {
        env: AppEnvironment::Testing,
        name: "Portfolio Test".to_string(),
        port: 0,
        host: "127.0.0.1".to_string(),
        worker_count: 1,
        database_url: "postgres://localhost/portfolio_test".into(),
        database_max_connections: 1,
        redis_url: None,
        cors_allowed_origins: vec!["*".to_string()],
        session_secret: "test_session_secret_that_is_long_enough_1234567890".into(),
        session_expiration_minutes: 5,
        remember_me_days: 1,
        session_cookie_name: "portfolio_session".into(),
        upload_dir: std::env::temp_dir()
            .join("portfolio-test-uploads")
            .to_string_lossy()
            .into_owned(),
        max_upload_bytes: 1024 * 1024,
        bootstrap_admin_password: None,
        trust_x_forwarded_for: false,
    }
}

#[derive(Default)]
struct Tables {
    next_id: i64,
    users: Vec<User>,
    projects: Vec<Project>,
    skills: Vec<Skill>,
    experiences: Vec<Experience>,
    contacts: Vec<Contact>,
    likes: Vec<(i64, i64)>,
    comments: Vec<ProjectComment>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn comment_view(&self, comment: &ProjectComment) -> Option<CommentView> {
        let user = self.users.iter().find(|u| u.id == comment.user_id)?;
        let project = self.projects.iter().find(|p| p.id == comment.project_id)?;
        Some(CommentView {
            id: comment.id,
            project_id: project.id,
            project_title: project.title.clone(),
            content: comment.content.clone(),
            created_at: comment.created_at,
            is_approved: comment.is_approved,
            username: user.username.clone(),
            full_name: user.full_name.clone(),
        })
    }

    fn comment_views<F: Fn(&ProjectComment) -> bool>(&self, keep: F) -> Vec<CommentView> {
        let mut views: Vec<CommentView> = self
            .comments
            .iter()
            .filter(|c| keep(c))
            .filter_map(|c| self.comment_view(c))
            .collect();
        views.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        views
    }
}

fn by_priority(projects: &mut [Project]) {
    projects.sort_by(|a, b| b.order_priority.cmp(&a.order_priority).then(a.id.cmp(&b.id)));
}

/// In-memory stand-in for the Postgres repositories, cascades included.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_user(&self, username: &str, is_admin: bool) -> User {
        let mut tables = self.tables.lock().unwrap();
        let user = User {
            id: tables.next_id(),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: hash_password(TEST_PASSWORD).unwrap(),
            full_name: format!("{username} tester"),
            is_admin,
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());
        user
    }

    pub fn add_project(&self, title: &str, category: ProjectCategory, order_priority: i32, featured: bool) -> Project {
        let mut tables = self.tables.lock().unwrap();
        let project = Project {
            id: tables.next_id(),
            title: title.to_string(),
            short_description: format!("{title} in short"),
            description: format!("{title} described at length"),
            technologies: "Rust, actix-web , ,PostgreSQL".to_string(),
            github_url: None,
            live_url: None,
            image_url: None,
            category,
            featured,
            order_priority,
            created_at: Utc::now(),
        };
        tables.projects.push(project.clone());
        project
    }

    pub fn add_skill(&self, name: &str, category: SkillCategory, order_priority: i32) -> Skill {
        let mut tables = self.tables.lock().unwrap();
        let skill = Skill {
            id: tables.next_id(),
            name: name.to_string(),
            category,
            proficiency: 80,
            icon_class: None,
            order_priority,
        };
        tables.skills.push(skill.clone());
        skill
    }

    pub fn add_experience(&self, company: &str, current: bool) -> Experience {
        let mut tables = self.tables.lock().unwrap();
        let experience = Experience {
            id: tables.next_id(),
            company: company.to_string(),
            position: "Engineer".to_string(),
            description: "Built things".to_string(),
            start_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            end_date: (!current).then(|| NaiveDate::from_ymd_opt(2022, 6, 30).unwrap()),
            location: None,
            company_url: None,
            order_priority: 0,
        };
        tables.experiences.push(experience.clone());
        experience
    }

    pub fn add_comment(&self, user_id: i64, project_id: i64, content: &str, is_approved: bool) -> ProjectComment {
        let mut tables = self.tables.lock().unwrap();
        let comment = ProjectComment {
            id: tables.next_id(),
            user_id,
            project_id,
            content: content.to_string(),
            created_at: Utc::now(),
            is_approved,
        };
        tables.comments.push(comment.clone());
        comment
    }

    pub fn user_count(&self) -> usize {
        self.tables.lock().unwrap().users.len()
    }

    pub fn find_user(&self, username: &str) -> Option<User> {
        self.tables.lock().unwrap().users.iter().find(|u| u.username == username).cloned()
    }

    pub fn contacts(&self) -> Vec<Contact> {
        self.tables.lock().unwrap().contacts.clone()
    }

    pub fn comments(&self) -> Vec<ProjectComment> {
        self.tables.lock().unwrap().comments.clone()
    }

    pub fn like_count(&self) -> usize {
        self.tables.lock().unwrap().likes.len()
    }

    pub fn project_count(&self) -> usize {
        self.tables.lock().unwrap().projects.len()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn check_connection(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn count_users(&self) -> Result<i64, AppError> {
        Ok(self.tables.lock().unwrap().users.len() as i64)
    }

    async fn admin_exists(&self) -> Result<bool, AppError> {
        Ok(self.tables.lock().unwrap().users.iter().any(|u| u.is_admin))
    }

    async fn username_exists(&self, username: &str) -> Result<bool, AppError> {
        Ok(self.tables.lock().unwrap().users.iter().any(|u| u.username == username))
    }

    async fn email_exists(&self, email: &str) -> Result<bool, AppError> {
        Ok(self.tables.lock().unwrap().users.iter().any(|u| u.email == email))
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        Ok(self.find_user(username))
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.tables.lock().unwrap().users.iter().find(|u| u.id == id).cloned())
    }

    async fn create_user(&self, user: &UserInsert) -> Result<i64, AppError> {
        let mut tables = self.tables.lock().unwrap();
        if tables.users.iter().any(|u| u.username == user.username || u.email == user.email) {
            return Err(AppError::Conflict("Username or email is already in use".into()));
        }
        let id = tables.next_id();
        tables.users.push(User {
            id,
            username: user.username.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            full_name: user.full_name.clone(),
            is_admin: user.is_admin,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let mut users = self.tables.lock().unwrap().users.clone();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(users)
    }

    async fn delete_user(&self, id: i64) -> Result<(), AppError> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.users.len();
        tables.users.retain(|u| u.id != id);
        if tables.users.len() == before {
            return Err(AppError::NotFound("Record not found".into()));
        }
        tables.likes.retain(|(user_id, _)| *user_id != id);
        tables.comments.retain(|c| c.user_id != id);
        Ok(())
    }
}

#[async_trait]
impl ProjectRepository for InMemoryStore {
    async fn list_projects(&self, filter: CategoryFilter) -> Result<Vec<Project>, AppError> {
        let mut projects: Vec<Project> = self
            .tables
            .lock()
            .unwrap()
            .projects
            .iter()
            .filter(|p| match filter {
                CategoryFilter::All => true,
                CategoryFilter::Only(category) => p.category == category,
                CategoryFilter::Unknown => false,
            })
            .cloned()
            .collect();
        by_priority(&mut projects);
        Ok(projects)
    }

    async fn list_featured_projects(&self, limit: i64) -> Result<Vec<Project>, AppError> {
        let mut projects: Vec<Project> = self
            .tables
            .lock()
            .unwrap()
            .projects
            .iter()
            .filter(|p| p.featured)
            .cloned()
            .collect();
        by_priority(&mut projects);
        projects.truncate(limit as usize);
        Ok(projects)
    }

    async fn list_projects_with_counts(&self) -> Result<Vec<AdminProjectRow>, AppError> {
        let tables = self.tables.lock().unwrap();
        let mut projects = tables.projects.clone();
        by_priority(&mut projects);
        Ok(projects
            .into_iter()
            .map(|project| AdminProjectRow {
                likes_count: tables.likes.iter().filter(|(_, p)| *p == project.id).count() as i64,
                comments_count: tables.comments.iter().filter(|c| c.project_id == project.id).count() as i64,
                project,
            })
            .collect())
    }

    async fn get_project_by_id(&self, id: i64) -> Result<Option<Project>, AppError> {
        Ok(self.tables.lock().unwrap().projects.iter().find(|p| p.id == id).cloned())
    }

    async fn create_project(&self, project: &ProjectInsert) -> Result<Project, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let created = Project {
            id: tables.next_id(),
            title: project.title.clone(),
            short_description: project.short_description.clone(),
            description: project.description.clone(),
            technologies: project.technologies.clone(),
            github_url: project.github_url.clone(),
            live_url: project.live_url.clone(),
            image_url: project.image_url.clone(),
            category: project.category,
            featured: project.featured,
            order_priority: project.order_priority,
            created_at: Utc::now(),
        };
        tables.projects.push(created.clone());
        Ok(created)
    }

    async fn delete_project(&self, id: i64) -> Result<(), AppError> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.projects.len();
        tables.projects.retain(|p| p.id != id);
        if tables.projects.len() == before {
            return Err(AppError::NotFound("Record not found".into()));
        }
        tables.likes.retain(|(_, project_id)| *project_id != id);
        tables.comments.retain(|c| c.project_id != id);
        Ok(())
    }

    async fn count_projects(&self) -> Result<i64, AppError> {
        Ok(self.tables.lock().unwrap().projects.len() as i64)
    }
}

#[async_trait]
impl SkillRepository for InMemoryStore {
    async fn list_skills(&self) -> Result<Vec<Skill>, AppError> {
        let mut skills = self.tables.lock().unwrap().skills.clone();
        skills.sort_by(|a, b| b.order_priority.cmp(&a.order_priority).then(a.id.cmp(&b.id)));
        Ok(skills)
    }

    async fn create_skill(&self, skill: &SkillInsert) -> Result<Skill, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let created = Skill {
            id: tables.next_id(),
            name: skill.name.clone(),
            category: skill.category,
            proficiency: skill.proficiency,
            icon_class: skill.icon_class.clone(),
            order_priority: skill.order_priority,
        };
        tables.skills.push(created.clone());
        Ok(created)
    }
}

#[async_trait]
impl ExperienceRepository for InMemoryStore {
    async fn list_experiences(&self) -> Result<Vec<Experience>, AppError> {
        let mut experiences = self.tables.lock().unwrap().experiences.clone();
        experiences.sort_by(|a, b| b.order_priority.cmp(&a.order_priority).then(a.id.cmp(&b.id)));
        Ok(experiences)
    }
}

#[async_trait]
impl ContactRepository for InMemoryStore {
    async fn create_contact(&self, contact: &ContactInsert) -> Result<i64, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let id = tables.next_id();
        tables.contacts.push(Contact {
            id,
            name: contact.name.clone(),
            email: contact.email.clone(),
            subject: contact.subject.clone(),
            message: contact.message.clone(),
            created_at: Utc::now(),
            is_read: false,
        });
        Ok(id)
    }

    async fn list_contacts(&self, limit: Option<i64>) -> Result<Vec<Contact>, AppError> {
        let mut contacts = self.tables.lock().unwrap().contacts.clone();
        contacts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        if let Some(limit) = limit {
            contacts.truncate(limit as usize);
        }
        Ok(contacts)
    }

    async fn mark_contact_read(&self, id: i64) -> Result<(), AppError> {
        let mut tables = self.tables.lock().unwrap();
        match tables.contacts.iter_mut().find(|c| c.id == id) {
            Some(contact) => {
                contact.is_read = true;
                Ok(())
            }
            None => Err(AppError::NotFound("Record not found".into())),
        }
    }

    async fn count_contacts(&self) -> Result<i64, AppError> {
        Ok(self.tables.lock().unwrap().contacts.len() as i64)
    }

    async fn count_unread_contacts(&self) -> Result<i64, AppError> {
        Ok(self.tables.lock().unwrap().contacts.iter().filter(|c| !c.is_read).count() as i64)
    }
}

#[async_trait]
impl EngagementRepository for InMemoryStore {
    async fn toggle_like(&self, user_id: i64, project_id: i64) -> Result<LikeToggle, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.likes.len();
        tables.likes.retain(|like| *like != (user_id, project_id));
        let liked = tables.likes.len() == before;
        if liked {
            tables.likes.push((user_id, project_id));
        }
        let likes_count = tables.likes.iter().filter(|(_, p)| *p == project_id).count() as i64;
        Ok(LikeToggle { liked, likes_count })
    }

    async fn count_likes(&self, project_id: i64) -> Result<i64, AppError> {
        Ok(self.tables.lock().unwrap().likes.iter().filter(|(_, p)| *p == project_id).count() as i64)
    }

    async fn has_liked(&self, user_id: i64, project_id: i64) -> Result<bool, AppError> {
        Ok(self.tables.lock().unwrap().likes.contains(&(user_id, project_id)))
    }

    async fn count_all_likes(&self) -> Result<i64, AppError> {
        Ok(self.tables.lock().unwrap().likes.len() as i64)
    }

    async fn create_comment(&self, comment: &CommentInsert) -> Result<ProjectComment, AppError> {
        Ok(self.add_comment(comment.user_id, comment.project_id, &comment.content, true))
    }

    async fn approved_comments(&self, project_id: i64) -> Result<Vec<CommentView>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.comment_views(|c| c.project_id == project_id && c.is_approved))
    }

    async fn list_comments(&self) -> Result<Vec<CommentView>, AppError> {
        Ok(self.tables.lock().unwrap().comment_views(|_| true))
    }

    async fn approve_comment(&self, id: i64) -> Result<(), AppError> {
        let mut tables = self.tables.lock().unwrap();
        match tables.comments.iter_mut().find(|c| c.id == id) {
            Some(comment) => {
                comment.is_approved = true;
                Ok(())
            }
            None => Err(AppError::NotFound("Record not found".into())),
        }
    }

    async fn count_comments(&self) -> Result<i64, AppError> {
        Ok(self.tables.lock().unwrap().comments.len() as i64)
    }

    async fn count_pending_comments(&self) -> Result<i64, AppError> {
        Ok(self.tables.lock().unwrap().comments.iter().filter(|c| !c.is_approved).count() as i64)
    }
}

/// Deny-list kept in memory.
#[derive(Default)]
pub struct InMemoryRevocations {
    revoked: Mutex<HashSet<String>>,
}

impl InMemoryRevocations {
    pub fn contains(&self, session_id: &str) -> bool {
        self.revoked.lock().unwrap().contains(session_id)
    }
}

#[async_trait]
impl SessionRevocationRepository for InMemoryRevocations {
    async fn revoke(&self, session_id: &str, _ttl_seconds: u64) -> Result<(), AuthError> {
        self.revoked.lock().unwrap().insert(session_id.to_string());
        Ok(())
    }

    async fn is_revoked(&self, session_id: &str) -> Result<bool, AuthError> {
        Ok(self.contains(session_id))
    }

    async fn ping(&self) -> Result<(), AuthError> {
        Ok(())
    }
}

pub fn shared_repositories(store: &Arc<InMemoryStore>) -> SharedRepositories {
    SharedRepositories {
        user_repo: store.clone(),
        project_repo: store.clone(),
        skill_repo: store.clone(),
        experience_repo: store.clone(),
        contact_repo: store.clone(),
        engagement_repo: store.clone(),
        revocations: None,
    }
}

pub fn app_state(config: &AppConfig, repos: SharedRepositories) -> web::Data<AppState> {
    web::Data::new(AppState::from_repositories(config, repos))
}

pub fn memory_state(store: &Arc<InMemoryStore>) -> web::Data<AppState> {
    app_state(&test_config(), shared_repositories(store))
}

/// Session cookie for `user`, signed the same way a login would.
pub fn session_cookie_for(config: &AppConfig, user: &User) -> Cookie<'static> {
    let session = JwtService::new(config).issue_session(user, false).unwrap();
    Cookie::new(config.session_cookie_name.clone(), session.token)
}

/// Builds the full application around `state`, like `main` does.
#[allow(unused_macros)]
macro_rules! test_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($state.clone())
                .wrap(portfolio_showcase::middlewares::auth::SessionMiddleware)
                .wrap(portfolio_showcase::handlers::home::error_pages())
                .wrap(actix_web::middleware::NormalizePath::trim())
                .configure(portfolio_showcase::routes::configure_routes),
        )
        .await
    };
}
