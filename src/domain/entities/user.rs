use serde::{Serialize, Deserialize};
use chrono::{DateTime, Utc};
use validator::{Validate, ValidateEmail};
use uuid::Uuid;

use crate::{
    domain::password::validate_password_strength,
    entities::validation::{present, trim_opt, validate_username_chars, violations},
    errors::AppError,
};

wire_enum! {
    #[derive(sqlx::Type, Default)]
    #[sqlx(type_name = "user_role", rename_all = "lowercase")]
    pub enum Role {
        Admin => "admin",
        #[default]
        User => "user",
    }
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Debug, Clone)]
pub struct UserInsert {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// Shape rules for whichever identity fields are being written.
pub fn check_identity(username: Option<&str>, email: Option<&str>) -> Result<(), AppError> {
    if let Some(username) = username {
        if !(3..=30).contains(&username.chars().count()) {
            return Err(AppError::invalid_field("username", "Username must be between 3 and 30 characters"));
        }
        validate_username_chars(username).map_err(|_| {
            AppError::invalid_field("username", "Username can only contain letters, numbers, and underscores")
        })?;
    }
    if let Some(email) = email {
        if !email.validate_email() {
            return Err(AppError::invalid_field("email", "Please provide a valid email"));
        }
    }
    Ok(())
}

impl UserInsert {
    pub fn check_invariants(&self) -> Result<(), AppError> {
        check_identity(Some(&self.username), Some(&self.email))
    }

    pub fn into_user(self, id: Uuid, now: DateTime<Utc>) -> User {
        User {
            id,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            role: self.role,
            created_at: now,
            updated_at: now,
        }
    }
}

/// The user as exposed over the API. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        PublicUser {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

fn normalize_email(email: Option<String>) -> Option<String> {
    trim_opt(email).map(|e| e.to_lowercase())
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RegisterUser {
    #[validate(
        required(message = "Username must be between 3 and 30 characters"),
        length(min = 3, max = 30, message = "Username must be between 3 and 30 characters"),
        custom(function = "validate_username_chars")
    )]
    pub username: Option<String>,

    #[validate(
        required(message = "Please provide a valid email"),
        email(message = "Please provide a valid email")
    )]
    pub email: Option<String>,

    #[validate(
        required(message = "Password must be at least 6 characters long"),
        custom(function = "validate_password_strength")
    )]
    pub password: Option<String>,
}

/// A registration that passed validation; the password is still plain text.
#[derive(Debug)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterUser {
    pub fn validated(self) -> Result<Registration, AppError> {
        let payload = RegisterUser {
            username: trim_opt(self.username),
            email: normalize_email(self.email),
            password: self.password,
        };

        let errors = violations(&payload);
        if !errors.is_empty() {
            return Err(errors.into());
        }

        Ok(Registration {
            username: present(payload.username, "username")?,
            email: present(payload.email, "email")?,
            password: present(payload.password, "password")?,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LoginUser {
    #[validate(
        required(message = "Please provide a valid email"),
        email(message = "Please provide a valid email")
    )]
    pub email: Option<String>,

    #[validate(
        required(message = "Password is required"),
        length(min = 1, message = "Password is required")
    )]
    pub password: Option<String>,
}

#[derive(Debug)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl LoginUser {
    pub fn validated(self) -> Result<Credentials, AppError> {
        let payload = LoginUser {
            email: normalize_email(self.email),
            password: self.password,
        };

        let errors = violations(&payload);
        if !errors.is_empty() {
            return Err(errors.into());
        }

        Ok(Credentials {
            email: present(payload.email, "email")?,
            password: present(payload.password, "password")?,
        })
    }
}

/// Profile changes a user may make to their own account. Any other keys in
/// the body are ignored.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProfile {
    #[validate(
        length(min = 3, max = 30, message = "Username must be between 3 and 30 characters"),
        custom(function = "validate_username_chars")
    )]
    pub username: Option<String>,

    #[validate(email(message = "Please provide a valid email"))]
    pub email: Option<String>,
}

impl UpdateProfile {
    pub fn validated(self) -> Result<Self, AppError> {
        let payload = UpdateProfile {
            username: trim_opt(self.username),
            email: normalize_email(self.email),
        };

        payload.validate()?;
        Ok(payload)
    }

    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(err: AppError) -> Vec<String> {
        match err {
            AppError::ValidationError(errors) => errors.into_iter().map(|e| e.field).collect(),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn short_username_is_rejected() {
        let form = RegisterUser {
            username: Some("ab".into()),
            email: Some("a@b.com".into()),
            password: Some("secret".into()),
        };
        assert_eq!(fields(form.validated().unwrap_err()), vec!["username"]);
    }

    #[test]
    fn registration_normalizes_email() {
        let form = RegisterUser {
            username: Some(" jane_doe ".into()),
            email: Some(" Jane@Example.com".into()),
            password: Some("secret".into()),
        };
        let reg = form.validated().unwrap();
        assert_eq!(reg.username, "jane_doe");
        assert_eq!(reg.email, "jane@example.com");
    }

    #[test]
    fn empty_registration_lists_all_fields() {
        assert_eq!(
            fields(RegisterUser::default().validated().unwrap_err()),
            vec!["email", "password", "username"]
        );
    }

    #[test]
    fn login_requires_password() {
        let form = LoginUser { email: Some("x@y.com".into()), password: Some(String::new()) };
        assert_eq!(fields(form.validated().unwrap_err()), vec!["password"]);
    }

    #[test]
    fn public_user_hides_hash() {
        let now = Utc::now();
        let user = UserInsert {
            username: "jane".into(),
            email: "jane@example.com".into(),
            password_hash: "$argon2id$secret".into(),
            role: Role::User,
        }
        .into_user(Uuid::new_v4(), now);

        let json = serde_json::to_value(PublicUser::from(user)).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["role"], "user");
        assert!(json.get("_id").is_some());
    }
}
