use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::form_rules::not_blank;

/// Result of flipping a like.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LikeToggle {
    pub liked: bool,
    pub likes_count: i64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CommentForm {
    #[validate(
        custom(function = "not_blank", message = "Comment is required"),
        length(min = 5, max = 500, message = "Comment must be between 5 and 500 characters")
    )]
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct CommentInsert {
    pub user_id: i64,
    pub project_id: i64,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProjectComment {
    pub id: i64,
    pub user_id: i64,
    pub project_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub is_approved: bool,
}

/// Comment joined with its author and project for display.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CommentView {
    pub id: i64,
    pub project_id: i64,
    pub project_title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub is_approved: bool,
    pub username: String,
    pub full_name: String,
}
