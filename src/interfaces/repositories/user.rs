use async_trait::async_trait;
use uuid::Uuid;
use std::borrow::Cow;

use crate::{
    entities::user::{User, UserInsert},
    errors::AppError,
    repositories::sqlx_repo::SqlxUserRepo,
};

pub const DUPLICATE_USER: &str = "User with this email or username already exists";
pub const IDENTITY_TAKEN: &str = "Username or email already taken";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn check_connection(&self) -> Result<(), AppError>;
    /// Fails with `Conflict` when the username or email is taken.
    async fn create_user(&self, user: &UserInsert) -> Result<User, AppError>;
    async fn get_user_by_id(&self, id: &Uuid) -> Result<Option<User>, AppError>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    /// Whether a user other than `exclude` holds either identity value.
    async fn identity_taken(
        &self,
        username: Option<String>,
        email: Option<String>,
        exclude: Option<Uuid>,
    ) -> Result<bool, AppError>;
    /// `None` fields are left as they are.
    async fn update_profile(
        &self,
        id: &Uuid,
        username: Option<String>,
        email: Option<String>,
    ) -> Result<Option<User>, AppError>;
}

const USER_COLUMNS: &str = "id, username, email, password_hash, role, created_at, updated_at";

impl SqlxUserRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxUserRepo { pool }
    }
}

fn map_unique(e: sqlx::Error, message: &str) -> AppError {
    match e {
        sqlx::Error::Database(db_err) if db_err.code() == Some(Cow::Borrowed("23505")) => {
            AppError::Conflict(message.to_string())
        }
        _ => AppError::from(e),
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepo {
    async fn check_connection(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(AppError::from)
    }

    async fn create_user(&self, user: &UserInsert) -> Result<User, AppError> {
        let sql = format!(
            r#"INSERT INTO users (username, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING {USER_COLUMNS}"#
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_unique(e, DUPLICATE_USER))
    }

    async fn get_user_by_id(&self, id: &Uuid) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn identity_taken(
        &self,
        username: Option<String>,
        email: Option<String>,
        exclude: Option<Uuid>,
    ) -> Result<bool, AppError> {
        if username.is_none() && email.is_none() {
            return Ok(false);
        }

        let taken: bool = sqlx::query_scalar(
            r#"SELECT EXISTS(
                SELECT 1 FROM users
                WHERE ($1::uuid IS NULL OR id <> $1)
                  AND (username = $2 OR email = $3)
            )"#,
        )
        .bind(exclude)
        .bind(username)
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(taken)
    }

    async fn update_profile(
        &self,
        id: &Uuid,
        username: Option<String>,
        email: Option<String>,
    ) -> Result<Option<User>, AppError> {
        let sql = format!(
            r#"UPDATE users SET
                username = COALESCE($2, username),
                email = COALESCE($3, email),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}"#
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(username)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_unique(e, IDENTITY_TAKEN))
    }
}
