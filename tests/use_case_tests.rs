#[macro_use]
mod test_utils;

use std::sync::Arc;

use actix_web::{http::StatusCode, test};
use async_trait::async_trait;
use mockall::{mock, predicate::*};
use portfolio_showcase::{
    auth::jwt::JwtService,
    entities::{
        contact::{Contact, ContactInsert},
        engagement::{CommentInsert, CommentView, LikeToggle, ProjectComment},
        principal::Principal,
        project::ProjectCategory,
        user::{LoginForm, RegisterForm, User, UserInsert},
    },
    errors::{AppError, AuthError},
    handlers::flash::{decode_flash, FLASH_COOKIE},
    repositories::{
        contact::ContactRepository, engagement::EngagementRepository,
        token::{SessionRevocationRepository, TokenServiceRepository},
        user::UserRepository,
    },
    use_cases::auth::AuthHandler,
};
use serde_json::Value;
use test_utils::*;

mock! {
    pub UserRepo {}

    #[async_trait]
    impl UserRepository for UserRepo {
        async fn check_connection(&self) -> Result<(), AppError>;
        async fn count_users(&self) -> Result<i64, AppError>;
        async fn admin_exists(&self) -> Result<bool, AppError>;
        async fn username_exists(&self, username: &str) -> Result<bool, AppError>;
        async fn email_exists(&self, email: &str) -> Result<bool, AppError>;
        async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
        async fn get_user_by_id(&self, id: i64) -> Result<Option<User>, AppError>;
        async fn create_user(&self, user: &UserInsert) -> Result<i64, AppError>;
        async fn list_users(&self) -> Result<Vec<User>, AppError>;
        async fn delete_user(&self, id: i64) -> Result<(), AppError>;
    }
}

mock! {
    pub ContactRepo {}

    #[async_trait]
    impl ContactRepository for ContactRepo {
        async fn create_contact(&self, contact: &ContactInsert) -> Result<i64, AppError>;
        async fn list_contacts(&self, limit: Option<i64>) -> Result<Vec<Contact>, AppError>;
        async fn mark_contact_read(&self, id: i64) -> Result<(), AppError>;
        async fn count_contacts(&self) -> Result<i64, AppError>;
        async fn count_unread_contacts(&self) -> Result<i64, AppError>;
    }
}

mock! {
    pub EngagementRepo {}

    #[async_trait]
    impl EngagementRepository for EngagementRepo {
        async fn toggle_like(&self, user_id: i64, project_id: i64) -> Result<LikeToggle, AppError>;
        async fn count_likes(&self, project_id: i64) -> Result<i64, AppError>;
        async fn has_liked(&self, user_id: i64, project_id: i64) -> Result<bool, AppError>;
        async fn count_all_likes(&self) -> Result<i64, AppError>;
        async fn create_comment(&self, comment: &CommentInsert) -> Result<ProjectComment, AppError>;
        async fn approved_comments(&self, project_id: i64) -> Result<Vec<CommentView>, AppError>;
        async fn list_comments(&self) -> Result<Vec<CommentView>, AppError>;
        async fn approve_comment(&self, id: i64) -> Result<(), AppError>;
        async fn count_comments(&self) -> Result<i64, AppError>;
        async fn count_pending_comments(&self) -> Result<i64, AppError>;
    }
}

mock! {
    pub Revocations {}

    #[async_trait]
    impl SessionRevocationRepository for Revocations {
        async fn revoke(&self, session_id: &str, ttl_seconds: u64) -> Result<(), AuthError>;
        async fn is_revoked(&self, session_id: &str) -> Result<bool, AuthError>;
        async fn ping(&self) -> Result<(), AuthError>;
    }
}

fn auth_handler(user_repo: MockUserRepo, revocations: Option<MockRevocations>) -> AuthHandler {
    AuthHandler::new(
        Arc::new(user_repo),
        Arc::new(JwtService::new(&test_config())),
        revocations.map(|r| Arc::new(r) as Arc<dyn SessionRevocationRepository>),
    )
}

fn registered_user() -> User {
    let store = InMemoryStore::new();
    store.add_user("ada", false)
}

#[actix_rt::test]
async fn register_reports_a_uniqueness_race_as_conflict() {
    let mut repo = MockUserRepo::new();
    repo.expect_username_exists().times(1).returning(|_| Ok(false));
    repo.expect_email_exists().times(1).returning(|_| Ok(false));
    repo.expect_create_user()
        .times(1)
        .returning(|_| Err(AppError::Conflict("Username or email is already in use".into())));

    let err = auth_handler(repo, None)
        .register(RegisterForm {
            full_name: "Grace Hopper".into(),
            username: "grace".into(),
            email: "grace@example.com".into(),
            password: TEST_PASSWORD.into(),
            password2: TEST_PASSWORD.into(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)));
}

#[actix_rt::test]
async fn invalid_registration_never_reaches_the_database() {
    let mut repo = MockUserRepo::new();
    repo.expect_username_exists().never();
    repo.expect_email_exists().never();
    repo.expect_create_user().never();

    let err = auth_handler(repo, None)
        .register(RegisterForm {
            full_name: "Grace Hopper".into(),
            username: "g".into(),
            email: "not-an-email".into(),
            password: TEST_PASSWORD.into(),
            password2: TEST_PASSWORD.into(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::ValidationError(ref f) if f.len() == 2));
}

fn login_form(username: &str) -> LoginForm {
    LoginForm {
        username: username.into(),
        password: TEST_PASSWORD.into(),
        remember_me: false,
        next: None,
    }
}

#[actix_rt::test]
async fn login_lookup_failure_is_a_generic_store_error() {
    let mut repo = MockUserRepo::new();
    repo.expect_get_user_by_username()
        .times(1)
        .returning(|_| Err(AppError::InternalError("connection reset".into())));

    let err = auth_handler(repo, None).login(login_form("ada")).await.err().unwrap();

    assert!(matches!(err, AuthError::SessionStore(_)));
    assert_eq!(err.user_messages(), vec!["Something went wrong. Please try again.".to_string()]);
}

#[actix_rt::test]
async fn unknown_username_is_rejected_like_a_wrong_password() {
    let mut repo = MockUserRepo::new();
    repo.expect_get_user_by_username().times(1).returning(|_| Ok(None));

    let err = auth_handler(repo, None).login(login_form("nobody")).await.err().unwrap();

    assert_eq!(err, AuthError::WrongCredentials);
}

#[actix_rt::test]
async fn revocation_store_outage_keeps_sessions_valid() {
    let user = registered_user();
    let token = JwtService::new(&test_config()).issue_session(&user, false).unwrap().token;

    let mut repo = MockUserRepo::new();
    let found = user.clone();
    repo.expect_get_user_by_id()
        .with(eq(user.id))
        .returning(move |_| Ok(Some(found.clone())));
    let mut revocations = MockRevocations::new();
    revocations
        .expect_is_revoked()
        .returning(|_| Err(AuthError::SessionStore("redis down".into())));

    let principal = auth_handler(repo, Some(revocations)).resolve_principal(&token).await.unwrap();
    assert_eq!(principal.id(), Some(user.id));
}

#[actix_rt::test]
async fn revoked_sessions_are_rejected() {
    let user = registered_user();
    let token = JwtService::new(&test_config()).issue_session(&user, false).unwrap().token;

    let mut repo = MockUserRepo::new();
    repo.expect_get_user_by_id().never();
    let mut revocations = MockRevocations::new();
    revocations.expect_is_revoked().returning(|_| Ok(true));

    let err = auth_handler(repo, Some(revocations)).resolve_principal(&token).await.unwrap_err();
    assert_eq!(err, AuthError::SessionRevoked);
}

#[actix_rt::test]
async fn admin_rights_follow_the_stored_flag() {
    let user = registered_user();
    let token = JwtService::new(&test_config()).issue_session(&user, false).unwrap().token;

    let mut repo = MockUserRepo::new();
    let mut promoted = user.clone();
    promoted.is_admin = true;
    repo.expect_get_user_by_id().returning(move |_| Ok(Some(promoted.clone())));

    let principal = auth_handler(repo, None).resolve_principal(&token).await.unwrap();
    assert!(principal.is_admin());
    assert!(matches!(principal, Principal::Authenticated(ref p) if p.username == "ada"));
}

#[actix_rt::test]
async fn contact_store_failure_flashes_a_generic_error() {
    let store = InMemoryStore::new();
    let mut contacts = MockContactRepo::new();
    contacts
        .expect_create_contact()
        .times(1)
        .returning(|_| Err(AppError::InternalError("disk full".into())));
    let mut repos = shared_repositories(&store);
    repos.contact_repo = Arc::new(contacts);
    let state = app_state(&test_config(), repos);
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/contact")
        .set_form([
            ("name", "Grace"),
            ("email", "grace@example.com"),
            ("subject", "Hello there"),
            ("message", "A message long enough"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let flash = resp
        .response()
        .cookies()
        .find(|c| c.name() == FLASH_COOKIE)
        .map(|c| decode_flash(c.value()))
        .unwrap_or_default();
    assert_eq!(flash.len(), 1);
    assert!(flash[0].message.starts_with("Sorry, there was an error"));
    assert!(!flash[0].message.contains("disk full"));
}

#[actix_rt::test]
async fn like_store_failure_renders_an_empty_listing_with_500() {
    let store = InMemoryStore::new();
    let user = store.add_user("ada", false);
    let project = store.add_project("Compiler", ProjectCategory::Backend, 0, false);
    let mut engagement = MockEngagementRepo::new();
    engagement
        .expect_toggle_like()
        .with(eq(user.id), eq(project.id))
        .returning(|_, _| Err(AppError::InternalError("deadlock detected".into())));
    let mut repos = shared_repositories(&store);
    repos.engagement_repo = Arc::new(engagement);
    let state = app_state(&test_config(), repos);
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri(&format!("/project/{}/like", project.id))
        .cookie(session_cookie_for(&test_config(), &user))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["projects"], serde_json::json!([]));
    assert_eq!(body["featured_projects"], serde_json::json!([]));
    assert_eq!(body["current_user"]["username"], "ada");
    assert!(!body.to_string().contains("deadlock"));
}
