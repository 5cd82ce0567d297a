use std::sync::Arc;

use crate::{
    constants::FEATURED_PROJECTS_LIMIT,
    entities::project::{NewProject, Project, ProjectFilter, ProjectSort, UpdateProject},
    errors::AppError,
    listing::{ListQuery, Paginated, Sort, Window},
    repositories::project::ProjectRepository,
    utils::valid_uuid::valid_uuid,
};

const NOT_FOUND: &str = "Project not found";

pub struct ProjectHandler<R>
where
    R: ProjectRepository + ?Sized,
{
    pub project_repo: Arc<R>,
}

impl<R> ProjectHandler<R>
where
    R: ProjectRepository + ?Sized,
{
    pub fn new(project_repo: Arc<R>) -> Self {
        ProjectHandler { project_repo }
    }

    /// One page of projects matching the supplied filters.
    pub async fn list_projects(
        &self,
        query: ListQuery<ProjectFilter, ProjectSort>,
    ) -> Result<Paginated<Project>, AppError> {
        let total = self.project_repo.count(&query.filter).await?;
        let data = self
            .project_repo
            .find(&query.filter, &query.sort, Some(query.page.window()))
            .await?;

        Ok(Paginated::new(data, query.page, total))
    }

    /// Newest featured projects, capped at a fixed count.
    pub async fn featured_projects(&self) -> Result<Vec<Project>, AppError> {
        self.project_repo
            .find(
                &ProjectFilter::featured(),
                &Sort::desc(ProjectSort::CreatedAt),
                Some(Window::first(FEATURED_PROJECTS_LIMIT)),
            )
            .await
    }

    pub async fn get_project(&self, id: &str) -> Result<Project, AppError> {
        let id = valid_uuid(id, NOT_FOUND)?;

        self.project_repo
            .get(&id)
            .await?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))
    }

    pub async fn create_project(&self, request: NewProject) -> Result<Project, AppError> {
        let insert = request.into_insert()?;
        let project = self.project_repo.create(&insert).await?;

        tracing::info!(project_id = %project.id, "Project created");
        Ok(project)
    }

    pub async fn update_project(&self, id: &str, request: UpdateProject) -> Result<Project, AppError> {
        let current = self.get_project(id).await?;
        let merged = request.merge(&current)?;

        self.project_repo
            .update(&current.id, &merged)
            .await?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))
    }

    pub async fn delete_project(&self, id: &str) -> Result<(), AppError> {
        let id = valid_uuid(id, NOT_FOUND)?;

        if self.project_repo.delete(&id).await? {
            tracing::info!(project_id = %id, "Project deleted");
            Ok(())
        } else {
            Err(AppError::NotFound(NOT_FOUND.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use mockall::predicate::eq;
    use uuid::Uuid;

    use super::*;
    use crate::{
        entities::project::{ProjectCategory, ProjectInsert, ProjectStatus},
        listing::{PageRequest, RawQuery},
        repositories::project::MockProjectRepository,
    };

    fn stored(featured: bool) -> Project {
        let now = Utc::now();
        ProjectInsert {
            title: "Site".into(),
            description: "desc".into(),
            long_description: None,
            technologies: vec!["Rust".into()],
            images: vec![],
            github_url: None,
            live_url: None,
            featured,
            category: ProjectCategory::Web,
            status: ProjectStatus::Completed,
            start_date: now,
            end_date: None,
        }
        .into_project(Uuid::new_v4(), now, now)
    }

    fn handler(repo: MockProjectRepository) -> ProjectHandler<MockProjectRepository> {
        ProjectHandler::new(Arc::new(repo))
    }

    #[actix_rt::test]
    async fn list_counts_and_windows_with_the_same_filter() {
        let mut repo = MockProjectRepository::new();
        let filter = ProjectFilter::featured();

        repo.expect_count().with(eq(filter)).times(1).returning(|_| Ok(5));
        repo.expect_find()
            .withf(move |f, _, w| *f == filter && *w == Some(Window { offset: 0, limit: 2 }))
            .times(1)
            .returning(|_, _, _| Ok(vec![stored(true), stored(true)]));

        let raw: RawQuery = [("featured", "true"), ("limit", "2"), ("page", "1")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let query = ListQuery::from_params(&raw, ProjectFilter::from_params(&raw), ProjectSort::CreatedAt, 10);

        assert_eq!(query.page, PageRequest { page: 1, limit: 2 });

        let page = handler(repo).list_projects(query).await.unwrap();
        assert_eq!(page.data.len(), 2);
        assert_eq!(page.pagination.pages, 3);
        assert!(page.pagination.has_next);
    }

    #[actix_rt::test]
    async fn featured_uses_fixed_filter_sort_and_limit() {
        let mut repo = MockProjectRepository::new();
        repo.expect_find()
            .withf(|f, s, w| {
                *f == ProjectFilter::featured()
                    && *s == Sort::desc(ProjectSort::CreatedAt)
                    && *w == Some(Window::first(FEATURED_PROJECTS_LIMIT))
            })
            .returning(|_, _, _| Ok(vec![]));

        assert!(handler(repo).featured_projects().await.unwrap().is_empty());
    }

    #[actix_rt::test]
    async fn malformed_id_never_reaches_the_store() {
        let repo = MockProjectRepository::new();
        let err = handler(repo).get_project("not-a-uuid").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(msg) if msg == NOT_FOUND));
    }

    #[actix_rt::test]
    async fn deleting_a_missing_project_is_not_found() {
        let mut repo = MockProjectRepository::new();
        repo.expect_delete().returning(|_| Ok(false));

        let err = handler(repo).delete_project(&Uuid::new_v4().to_string()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[actix_rt::test]
    async fn invalid_create_is_rejected_before_the_store() {
        let repo = MockProjectRepository::new();
        let err = handler(repo).create_project(NewProject::default()).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }
}
