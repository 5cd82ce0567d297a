use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    entities::contact::{Contact, ContactFilter, ContactInsert, ContactSort, ContactStatus},
    errors::AppError,
    listing::{Sort, Window},
    repositories::sqlx_repo::{push_order, push_window, to_count, SqlxContactRepo},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn create(&self, contact: &ContactInsert) -> Result<Contact, AppError>;
    async fn get(&self, id: &Uuid) -> Result<Option<Contact>, AppError>;
    async fn find(
        &self,
        filter: &ContactFilter,
        sort: &Sort<ContactSort>,
        window: Option<Window>,
    ) -> Result<Vec<Contact>, AppError>;
    async fn count(&self, filter: &ContactFilter) -> Result<u64, AppError>;
    async fn update_status(&self, id: &Uuid, status: ContactStatus) -> Result<Option<Contact>, AppError>;
    async fn delete(&self, id: &Uuid) -> Result<bool, AppError>;
}

const CONTACT_COLUMNS: &str = "id, name, email, subject, message, status, created_at, updated_at";

impl SqlxContactRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxContactRepo { pool }
    }
}

fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &ContactFilter) {
    qb.push(" WHERE TRUE");
    if let Some(status) = filter.status {
        qb.push(" AND status = ").push_bind(status);
    }
}

#[async_trait]
impl ContactRepository for SqlxContactRepo {
    async fn create(&self, contact: &ContactInsert) -> Result<Contact, AppError> {
        let sql = format!(
            r#"INSERT INTO contacts (name, email, subject, message)
            VALUES ($1, $2, $3, $4)
            RETURNING {CONTACT_COLUMNS}"#
        );

        let created = sqlx::query_as::<_, Contact>(&sql)
            .bind(&contact.name)
            .bind(&contact.email)
            .bind(&contact.subject)
            .bind(&contact.message)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    async fn get(&self, id: &Uuid) -> Result<Option<Contact>, AppError> {
        let sql = format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = $1");
        sqlx::query_as::<_, Contact>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn find(
        &self,
        filter: &ContactFilter,
        sort: &Sort<ContactSort>,
        window: Option<Window>,
    ) -> Result<Vec<Contact>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {CONTACT_COLUMNS} FROM contacts"));
        push_filter(&mut qb, filter);
        push_order(&mut qb, sort);
        push_window(&mut qb, window);

        qb.build_query_as::<Contact>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn count(&self, filter: &ContactFilter) -> Result<u64, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM contacts");
        push_filter(&mut qb, filter);

        let count = qb.build_query_scalar::<i64>().fetch_one(&self.pool).await?;
        Ok(to_count(count))
    }

    async fn update_status(&self, id: &Uuid, status: ContactStatus) -> Result<Option<Contact>, AppError> {
        let sql = format!(
            "UPDATE contacts SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING {CONTACT_COLUMNS}"
        );

        sqlx::query_as::<_, Contact>(&sql)
            .bind(id)
            .bind(status)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
