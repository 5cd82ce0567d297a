use std::sync::Arc;

use crate::{
    constants::FEATURED_SKILLS_LIMIT,
    entities::skill::{NewSkill, Skill, SkillCategory, SkillFilter, SkillSort, UpdateSkill},
    errors::AppError,
    listing::{ListQuery, Paginated, Sort, Window},
    repositories::skill::SkillRepository,
    utils::valid_uuid::valid_uuid,
};

const NOT_FOUND: &str = "Skill not found";

pub struct SkillHandler<R>
where
    R: SkillRepository + ?Sized,
{
    pub skill_repo: Arc<R>,
}

impl<R> SkillHandler<R>
where
    R: SkillRepository + ?Sized,
{
    pub fn new(skill_repo: Arc<R>) -> Self {
        SkillHandler { skill_repo }
    }

    pub async fn list_skills(
        &self,
        query: ListQuery<SkillFilter, SkillSort>,
    ) -> Result<Paginated<Skill>, AppError> {
        let total = self.skill_repo.count(&query.filter).await?;
        let data = self
            .skill_repo
            .find(&query.filter, &query.sort, Some(query.page.window()))
            .await?;

        Ok(Paginated::new(data, query.page, total))
    }

    /// Most proficient featured skills.
    pub async fn featured_skills(&self) -> Result<Vec<Skill>, AppError> {
        self.skill_repo
            .find(
                &SkillFilter::featured(),
                &Sort::desc(SkillSort::Proficiency),
                Some(Window::first(FEATURED_SKILLS_LIMIT)),
            )
            .await
    }

    /// Every skill in `category`, most proficient first. Unknown categories are rejected.
    pub async fn skills_by_category(&self, category: &str) -> Result<Vec<Skill>, AppError> {
        let category = SkillCategory::parse_param(category)?;

        self.skill_repo
            .find(&SkillFilter::in_category(category), &Sort::desc(SkillSort::Proficiency), None)
            .await
    }

    pub async fn get_skill(&self, id: &str) -> Result<Skill, AppError> {
        let id = valid_uuid(id, NOT_FOUND)?;

        self.skill_repo
            .get(&id)
            .await?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))
    }

    pub async fn create_skill(&self, request: NewSkill) -> Result<Skill, AppError> {
        let insert = request.into_insert()?;
        let skill = self.skill_repo.create(&insert).await?;

        tracing::info!(skill_id = %skill.id, name = %skill.name, "Skill created");
        Ok(skill)
    }

    pub async fn update_skill(&self, id: &str, request: UpdateSkill) -> Result<Skill, AppError> {
        let current = self.get_skill(id).await?;
        let merged = request.merge(&current)?;

        self.skill_repo
            .update(&current.id, &merged)
            .await?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))
    }

    pub async fn delete_skill(&self, id: &str) -> Result<(), AppError> {
        let id = valid_uuid(id, NOT_FOUND)?;

        if self.skill_repo.delete(&id).await? {
            tracing::info!(skill_id = %id, "Skill deleted");
            Ok(())
        } else {
            Err(AppError::NotFound(NOT_FOUND.to_string()))
        }
    }
}
