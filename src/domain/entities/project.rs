use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::form_rules::{allowed_image_extension, empty_string_as_none, not_blank};
use crate::errors::AppError;

pub const FEATURED_PROJECTS_LIMIT: i64 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "project_category", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProjectCategory {
    Frontend,
    Backend,
    Fullstack,
    Mobile,
    Design,
}

impl ProjectCategory {
    pub const ALL: [ProjectCategory; 5] = [
        ProjectCategory::Frontend,
        ProjectCategory::Backend,
        ProjectCategory::Fullstack,
        ProjectCategory::Mobile,
        ProjectCategory::Design,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectCategory::Frontend => "frontend",
            ProjectCategory::Backend => "backend",
            ProjectCategory::Fullstack => "fullstack",
            ProjectCategory::Mobile => "mobile",
            ProjectCategory::Design => "design",
        }
    }
}

impl FromStr for ProjectCategory {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProjectCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| AppError::invalid_field("category", "Invalid project category"))
    }
}

impl fmt::Display for ProjectCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Selects which projects a listing returns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CategoryFilter {
    All,
    Only(ProjectCategory),
    /// A category name that matches nothing.
    Unknown,
}

impl CategoryFilter {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") | Some("all") => CategoryFilter::All,
            Some(name) => name
                .parse::<ProjectCategory>()
                .map(CategoryFilter::Only)
                .unwrap_or(CategoryFilter::Unknown),
        }
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Project {
    pub id: i64,
    pub title: String,
    pub short_description: String,
    pub description: String,
    pub technologies: String,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub image_url: Option<String>,
    pub category: ProjectCategory,
    pub featured: bool,
    pub order_priority: i32,
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Comma-separated technologies as individual tokens.
    pub fn technology_list(&self) -> Vec<String> {
        split_technologies(&self.technologies)
    }
}

pub fn split_technologies(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Shape returned by the projects API and the listing page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectSummary {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub short_description: String,
    pub technologies: Vec<String>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub image_url: Option<String>,
    pub category: ProjectCategory,
}

impl From<&Project> for ProjectSummary {
    fn from(project: &Project) -> Self {
        ProjectSummary {
            id: project.id,
            title: project.title.clone(),
            description: project.description.clone(),
            short_description: project.short_description.clone(),
            technologies: project.technology_list(),
            github_url: project.github_url.clone(),
            live_url: project.live_url.clone(),
            image_url: project.image_url.clone(),
            category: project.category,
        }
    }
}

/// Admin listing row: the project plus its engagement counters.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct AdminProjectRow {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub project: Project,
    pub likes_count: i64,
    pub comments_count: i64,
}

fn known_project_category(value: &str) -> Result<(), ValidationError> {
    if not_blank(value).is_err() {
        let mut error = ValidationError::new("required");
        error.message = Some("Category is required".into());
        return Err(error);
    }
    value.parse::<ProjectCategory>().map(|_| ()).map_err(|_| {
        let mut error = ValidationError::new("category");
        error.message = Some("Invalid project category".into());
        error
    })
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewProjectForm {
    #[validate(
        custom(function = "not_blank", message = "Title is required"),
        length(min = 5, max = 100, message = "Title must be between 5 and 100 characters")
    )]
    pub title: String,

    #[validate(
        custom(function = "not_blank", message = "Short description is required"),
        length(min = 10, max = 200, message = "Short description must be between 10 and 200 characters")
    )]
    pub short_description: String,

    #[validate(
        custom(function = "not_blank", message = "Description is required"),
        length(min = 50, max = 2000, message = "Description must be between 50 and 2000 characters")
    )]
    pub description: String,

    #[validate(
        custom(function = "not_blank", message = "Technologies are required"),
        length(min = 5, max = 500, message = "Technologies must be between 5 and 500 characters")
    )]
    pub technologies: String,

    #[validate(custom(function = "known_project_category"))]
    pub category: String,

    #[validate(
        url(message = "Invalid GitHub URL"),
        length(max = 200, message = "URL is too long")
    )]
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub github_url: Option<String>,

    #[validate(
        url(message = "Invalid project URL"),
        length(max = 200, message = "URL is too long")
    )]
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub live_url: Option<String>,

    /// Original name of the uploaded image, if any.
    #[validate(custom(function = "allowed_image_extension", message = "Only images are allowed"))]
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub image_filename: Option<String>,

    #[serde(default)]
    pub featured: bool,

    #[serde(default)]
    pub order_priority: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct ProjectInsert {
    pub title: String,
    pub short_description: String,
    pub description: String,
    pub technologies: String,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub image_url: Option<String>,
    pub category: ProjectCategory,
    pub featured: bool,
    pub order_priority: i32,
}

impl NewProjectForm {
    pub fn prepare_for_insert(&self, image_url: Option<String>) -> Result<ProjectInsert, AppError> {
        Ok(ProjectInsert {
            title: self.title.clone(),
            short_description: self.short_description.clone(),
            description: self.description.clone(),
            technologies: self.technologies.clone(),
            github_url: self.github_url.clone(),
            live_url: self.live_url.clone(),
            image_url,
            category: self.category.parse()?,
            featured: self.featured,
            order_priority: self.order_priority.unwrap_or(0),
        })
    }
}
