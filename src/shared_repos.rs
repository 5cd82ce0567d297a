use std::sync::Arc;

use crate::{
    db::{memory::MemoryStore, postgres::connect_and_migrate},
    repositories::{
        contact::ContactRepository,
        project::ProjectRepository,
        skill::SkillRepository,
        sqlx_repo::{SqlxContactRepo, SqlxProjectRepo, SqlxSkillRepo, SqlxUserRepo},
        user::UserRepository,
    },
    settings::AppConfig,
};

/// One handle per entity table, all backed by the same store.
#[derive(Clone)]
pub struct SharedRepositories {
    pub user_repo: Arc<dyn UserRepository>,
    pub project_repo: Arc<dyn ProjectRepository>,
    pub skill_repo: Arc<dyn SkillRepository>,
    pub contact_repo: Arc<dyn ContactRepository>,
}

impl SharedRepositories {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SharedRepositories {
            user_repo: Arc::new(SqlxUserRepo::new(pool.clone())),
            project_repo: Arc::new(SqlxProjectRepo::new(pool.clone())),
            skill_repo: Arc::new(SqlxSkillRepo::new(pool.clone())),
            contact_repo: Arc::new(SqlxContactRepo::new(pool)),
        }
    }

    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::new());

        SharedRepositories {
            user_repo: store.clone(),
            project_repo: store.clone(),
            skill_repo: store.clone(),
            contact_repo: store,
        }
    }

    /// Picks the store named by `database_url`.
    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        if config.uses_memory_store() {
            tracing::warn!("Using the in-memory store; data is lost on shutdown");
            return Ok(SharedRepositories::in_memory());
        }

        let pool = connect_and_migrate(&config.database_url).await?;
        Ok(SharedRepositories::new(pool))
    }
}
