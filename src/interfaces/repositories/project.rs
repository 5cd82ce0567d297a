use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    entities::project::{Project, ProjectFilter, ProjectInsert, ProjectSort},
    errors::AppError,
    listing::{Sort, Window},
    repositories::sqlx_repo::{push_order, push_window, to_count, SqlxProjectRepo},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn create(&self, project: &ProjectInsert) -> Result<Project, AppError>;
    async fn get(&self, id: &Uuid) -> Result<Option<Project>, AppError>;
    async fn find(
        &self,
        filter: &ProjectFilter,
        sort: &Sort<ProjectSort>,
        window: Option<Window>,
    ) -> Result<Vec<Project>, AppError>;
    async fn count(&self, filter: &ProjectFilter) -> Result<u64, AppError>;
    /// Replaces every writable field. `None` when no record has this id.
    async fn update(&self, id: &Uuid, project: &ProjectInsert) -> Result<Option<Project>, AppError>;
    async fn delete(&self, id: &Uuid) -> Result<bool, AppError>;
    async fn delete_all(&self) -> Result<u64, AppError>;
}

const PROJECT_COLUMNS: &str = "id, title, description, long_description, technologies, images, \
    github_url, live_url, featured, category, status, start_date, end_date, created_at, updated_at";

impl SqlxProjectRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxProjectRepo { pool }
    }
}

fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &ProjectFilter) {
    qb.push(" WHERE TRUE");
    if let Some(category) = filter.category {
        qb.push(" AND category = ").push_bind(category);
    }
    if let Some(featured) = filter.featured {
        qb.push(" AND featured = ").push_bind(featured);
    }
    if let Some(status) = filter.status {
        qb.push(" AND status = ").push_bind(status);
    }
}

#[async_trait]
impl ProjectRepository for SqlxProjectRepo {
    async fn create(&self, project: &ProjectInsert) -> Result<Project, AppError> {
        let sql = format!(
            r#"INSERT INTO projects (
                title, description, long_description, technologies, images,
                github_url, live_url, featured, category, status, start_date, end_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {PROJECT_COLUMNS}"#
        );

        let created = sqlx::query_as::<_, Project>(&sql)
            .bind(&project.title)
            .bind(&project.description)
            .bind(&project.long_description)
            .bind(&project.technologies)
            .bind(&project.images)
            .bind(&project.github_url)
            .bind(&project.live_url)
            .bind(project.featured)
            .bind(project.category)
            .bind(project.status)
            .bind(project.start_date)
            .bind(project.end_date)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    async fn get(&self, id: &Uuid) -> Result<Option<Project>, AppError> {
        let sql = format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn find(
        &self,
        filter: &ProjectFilter,
        sort: &Sort<ProjectSort>,
        window: Option<Window>,
    ) -> Result<Vec<Project>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {PROJECT_COLUMNS} FROM projects"));
        push_filter(&mut qb, filter);
        push_order(&mut qb, sort);
        push_window(&mut qb, window);

        qb.build_query_as::<Project>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn count(&self, filter: &ProjectFilter) -> Result<u64, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM projects");
        push_filter(&mut qb, filter);

        let count = qb.build_query_scalar::<i64>().fetch_one(&self.pool).await?;
        Ok(to_count(count))
    }

    async fn update(&self, id: &Uuid, project: &ProjectInsert) -> Result<Option<Project>, AppError> {
        let sql = format!(
            r#"UPDATE projects SET
                title = $2, description = $3, long_description = $4, technologies = $5,
                images = $6, github_url = $7, live_url = $8, featured = $9, category = $10,
                status = $11, start_date = $12, end_date = $13, updated_at = NOW()
            WHERE id = $1
            RETURNING {PROJECT_COLUMNS}"#
        );

        sqlx::query_as::<_, Project>(&sql)
            .bind(id)
            .bind(&project.title)
            .bind(&project.description)
            .bind(&project.long_description)
            .bind(&project.technologies)
            .bind(&project.images)
            .bind(&project.github_url)
            .bind(&project.live_url)
            .bind(project.featured)
            .bind(project.category)
            .bind(project.status)
            .bind(project.start_date)
            .bind(project.end_date)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_all(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM projects").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}
