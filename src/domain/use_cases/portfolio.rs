use std::sync::Arc;

use serde::Serialize;

use crate::entities::engagement::CommentView;
use crate::entities::experience::Experience;
use crate::entities::principal::Principal;
use crate::entities::project::{CategoryFilter, Project, ProjectSummary, FEATURED_PROJECTS_LIMIT};
use crate::entities::skill::SkillsByCategory;
use crate::errors::AppError;
use crate::repositories::{
    engagement::EngagementRepository, experience::ExperienceRepository, project::ProjectRepository,
    skill::SkillRepository,
};

#[derive(Debug, Default, Serialize)]
pub struct PortfolioOverview {
    pub featured_projects: Vec<ProjectSummary>,
    pub projects: Vec<ProjectSummary>,
    pub skills: SkillsByCategory,
    pub experiences: Vec<Experience>,
}

#[derive(Debug, Serialize)]
pub struct ProjectDetail {
    pub project: Project,
    pub technologies: Vec<String>,
    pub comments: Vec<CommentView>,
    pub likes_count: i64,
    pub liked_by_me: bool,
}

/// Read side of the portfolio: listings and project detail.
#[derive(Clone)]
pub struct PortfolioHandler {
    pub project_repo: Arc<dyn ProjectRepository>,
    pub skill_repo: Arc<dyn SkillRepository>,
    pub experience_repo: Arc<dyn ExperienceRepository>,
    pub engagement_repo: Arc<dyn EngagementRepository>,
}

impl PortfolioHandler {
    pub fn new(
        project_repo: Arc<dyn ProjectRepository>,
        skill_repo: Arc<dyn SkillRepository>,
        experience_repo: Arc<dyn ExperienceRepository>,
        engagement_repo: Arc<dyn EngagementRepository>,
    ) -> Self {
        PortfolioHandler {
            project_repo,
            skill_repo,
            experience_repo,
            engagement_repo,
        }
    }

    pub async fn overview(&self) -> Result<PortfolioOverview, AppError> {
        let featured = self.project_repo.list_featured_projects(FEATURED_PROJECTS_LIMIT).await?;
        let projects = self.project_repo.list_projects(CategoryFilter::All).await?;
        let skills = self.skill_repo.list_skills().await?;
        let experiences = self.experience_repo.list_experiences().await?;

        Ok(PortfolioOverview {
            featured_projects: featured.iter().map(ProjectSummary::from).collect(),
            projects: projects.iter().map(ProjectSummary::from).collect(),
            skills: SkillsByCategory::group(skills),
            experiences,
        })
    }

    /// Projects for the public API. `None`, empty and `"all"` list everything;
    /// unknown category names list nothing.
    pub async fn list_projects(&self, category: Option<&str>) -> Result<Vec<ProjectSummary>, AppError> {
        let projects = self.project_repo.list_projects(CategoryFilter::parse(category)).await?;
        Ok(projects.iter().map(ProjectSummary::from).collect())
    }

    pub async fn project_detail(&self, id: i64, principal: &Principal) -> Result<ProjectDetail, AppError> {
        let project = self
            .project_repo
            .get_project_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Project not found".into()))?;

        let comments = self.engagement_repo.approved_comments(id).await?;
        let likes_count = self.engagement_repo.count_likes(id).await?;
        let liked_by_me = match principal.id() {
            Some(user_id) => self.engagement_repo.has_liked(user_id, id).await?,
            None => false,
        };

        Ok(ProjectDetail {
            technologies: project.technology_list(),
            project,
            comments,
            likes_count,
            liked_by_me,
        })
    }
}
