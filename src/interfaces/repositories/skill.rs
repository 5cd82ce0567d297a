use std::borrow::Cow;

use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    entities::skill::{Skill, SkillFilter, SkillInsert, SkillSort},
    errors::AppError,
    listing::{Sort, Window},
    repositories::sqlx_repo::{push_order, push_window, to_count, SqlxSkillRepo},
};

pub const DUPLICATE_SKILL: &str = "Skill with this name already exists";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SkillRepository: Send + Sync {
    /// Fails with `Conflict` when the name is already taken.
    async fn create(&self, skill: &SkillInsert) -> Result<Skill, AppError>;
    async fn get(&self, id: &Uuid) -> Result<Option<Skill>, AppError>;
    async fn find(
        &self,
        filter: &SkillFilter,
        sort: &Sort<SkillSort>,
        window: Option<Window>,
    ) -> Result<Vec<Skill>, AppError>;
    async fn count(&self, filter: &SkillFilter) -> Result<u64, AppError>;
    async fn update(&self, id: &Uuid, skill: &SkillInsert) -> Result<Option<Skill>, AppError>;
    async fn delete(&self, id: &Uuid) -> Result<bool, AppError>;
    async fn delete_all(&self) -> Result<u64, AppError>;
}

const SKILL_COLUMNS: &str = "id, name, category, proficiency, icon, color, featured, created_at, updated_at";

impl SqlxSkillRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxSkillRepo { pool }
    }
}

fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &SkillFilter) {
    qb.push(" WHERE TRUE");
    if let Some(category) = filter.category {
        qb.push(" AND category = ").push_bind(category);
    }
    if let Some(featured) = filter.featured {
        qb.push(" AND featured = ").push_bind(featured);
    }
}

fn map_unique_name(e: sqlx::Error) -> AppError {
    match e {
        sqlx::Error::Database(db_err) if db_err.code() == Some(Cow::Borrowed("23505")) => {
            AppError::Conflict(DUPLICATE_SKILL.to_string())
        }
        _ => AppError::from(e),
    }
}

#[async_trait]
impl SkillRepository for SqlxSkillRepo {
    async fn create(&self, skill: &SkillInsert) -> Result<Skill, AppError> {
        let sql = format!(
            r#"INSERT INTO skills (name, category, proficiency, icon, color, featured)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {SKILL_COLUMNS}"#
        );

        sqlx::query_as::<_, Skill>(&sql)
            .bind(&skill.name)
            .bind(skill.category)
            .bind(skill.proficiency)
            .bind(&skill.icon)
            .bind(&skill.color)
            .bind(skill.featured)
            .fetch_one(&self.pool)
            .await
            .map_err(map_unique_name)
    }

    async fn get(&self, id: &Uuid) -> Result<Option<Skill>, AppError> {
        let sql = format!("SELECT {SKILL_COLUMNS} FROM skills WHERE id = $1");
        sqlx::query_as::<_, Skill>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn find(
        &self,
        filter: &SkillFilter,
        sort: &Sort<SkillSort>,
        window: Option<Window>,
    ) -> Result<Vec<Skill>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {SKILL_COLUMNS} FROM skills"));
        push_filter(&mut qb, filter);
        push_order(&mut qb, sort);
        push_window(&mut qb, window);

        qb.build_query_as::<Skill>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn count(&self, filter: &SkillFilter) -> Result<u64, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM skills");
        push_filter(&mut qb, filter);

        let count = qb.build_query_scalar::<i64>().fetch_one(&self.pool).await?;
        Ok(to_count(count))
    }

    async fn update(&self, id: &Uuid, skill: &SkillInsert) -> Result<Option<Skill>, AppError> {
        let sql = format!(
            r#"UPDATE skills SET
                name = $2, category = $3, proficiency = $4, icon = $5, color = $6,
                featured = $7, updated_at = NOW()
            WHERE id = $1
            RETURNING {SKILL_COLUMNS}"#
        );

        sqlx::query_as::<_, Skill>(&sql)
            .bind(id)
            .bind(&skill.name)
            .bind(skill.category)
            .bind(skill.proficiency)
            .bind(&skill.icon)
            .bind(&skill.color)
            .bind(skill.featured)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_unique_name)
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM skills WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_all(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM skills").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}
