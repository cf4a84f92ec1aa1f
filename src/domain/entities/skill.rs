use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::form_rules::{empty_string_as_none, not_blank};
use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "skill_category", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SkillCategory {
    Frontend,
    Backend,
    Tools,
    Database,
    Design,
}

impl SkillCategory {
    pub const ALL: [SkillCategory; 5] = [
        SkillCategory::Frontend,
        SkillCategory::Backend,
        SkillCategory::Tools,
        SkillCategory::Database,
        SkillCategory::Design,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SkillCategory::Frontend => "frontend",
            SkillCategory::Backend => "backend",
            SkillCategory::Tools => "tools",
            SkillCategory::Database => "database",
            SkillCategory::Design => "design",
        }
    }
}

impl FromStr for SkillCategory {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SkillCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| AppError::invalid_field("category", "Invalid skill category"))
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Skill {
    pub id: i64,
    pub name: String,
    pub category: SkillCategory,
    pub proficiency: i32,
    pub icon_class: Option<String>,
    pub order_priority: i32,
}

/// Skills bucketed per category, each bucket keeping the incoming order.
#[derive(Debug, Default, Serialize)]
pub struct SkillsByCategory {
    pub frontend: Vec<Skill>,
    pub backend: Vec<Skill>,
    pub tools: Vec<Skill>,
    pub database: Vec<Skill>,
    pub design: Vec<Skill>,
}

impl SkillsByCategory {
    pub fn group(skills: Vec<Skill>) -> Self {
        let mut grouped = SkillsByCategory::default();
        for skill in skills {
            let bucket = match skill.category {
                SkillCategory::Frontend => &mut grouped.frontend,
                SkillCategory::Backend => &mut grouped.backend,
                SkillCategory::Tools => &mut grouped.tools,
                SkillCategory::Database => &mut grouped.database,
                SkillCategory::Design => &mut grouped.design,
            };
            bucket.push(skill);
        }
        grouped
    }
}

fn known_skill_category(value: &str) -> Result<(), ValidationError> {
    if not_blank(value).is_err() {
        let mut error = ValidationError::new("required");
        error.message = Some("Category is required".into());
        return Err(error);
    }
    value.parse::<SkillCategory>().map(|_| ()).map_err(|_| {
        let mut error = ValidationError::new("category");
        error.message = Some("Invalid skill category".into());
        error
    })
}

// Proficiency is documented as 1-100 but deliberately not range-checked.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewSkillForm {
    #[validate(
        custom(function = "not_blank", message = "Skill name is required"),
        length(min = 2, max = 50, message = "Name must be between 2 and 50 characters")
    )]
    #[serde(default)]
    pub name: String,

    #[validate(custom(function = "known_skill_category"))]
    #[serde(default)]
    pub category: String,

    #[validate(required(message = "Proficiency is required"))]
    #[serde(default)]
    pub proficiency: Option<i32>,

    #[validate(length(max = 50, message = "Icon class is too long"))]
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub icon_class: Option<String>,

    #[serde(default)]
    pub order_priority: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct SkillInsert {
    pub name: String,
    pub category: SkillCategory,
    pub proficiency: i32,
    pub icon_class: Option<String>,
    pub order_priority: i32,
}

impl TryFrom<NewSkillForm> for SkillInsert {
    type Error = AppError;

    fn try_from(form: NewSkillForm) -> Result<Self, Self::Error> {
        Ok(SkillInsert {
            category: form.category.parse()?,
            proficiency: form
                .proficiency
                .ok_or_else(|| AppError::invalid_field("proficiency", "Proficiency is required"))?,
            name: form.name,
            icon_class: form.icon_class,
            order_priority: form.order_priority.unwrap_or(0),
        })
    }
}
