use std::sync::Arc;

use uuid::Uuid;

use crate::auth::password::{hash_password, verify_password};
use crate::entities::token::{AuthResponse, Claims};
use crate::entities::user::{LoginUser, PublicUser, RegisterUser, Role, UpdateProfile, User, UserInsert};
use crate::errors::{AppError, AuthError};
use crate::repositories::token::TokenServiceRepository;
use crate::repositories::user::{UserRepository, DUPLICATE_USER, IDENTITY_TAKEN};

pub struct AuthHandler<R, T>
where
    R: UserRepository + ?Sized,
    T: TokenServiceRepository + ?Sized,
{
    pub user_repo: Arc<R>,
    pub token_service: Arc<T>,
}

impl<R, T> AuthHandler<R, T>
where
    R: UserRepository + ?Sized,
    T: TokenServiceRepository + ?Sized,
{
    pub fn new(user_repo: Arc<R>, token_service: Arc<T>) -> Self {
        AuthHandler {
            user_repo,
            token_service
        }
    }

    /// Registers a new user with the `user` role and signs them in.
    pub async fn register(&self, request: RegisterUser) -> Result<AuthResponse, AppError> {
        let registration = request.validated()?;

        let taken = self.user_repo
            .identity_taken(Some(registration.username.clone()), Some(registration.email.clone()), None)
            .await?;
        if taken {
            return Err(AppError::Conflict(DUPLICATE_USER.to_string()));
        }

        let password_hash = hash_password(&registration.password)?;
        let user = self.user_repo
            .create_user(&UserInsert {
                username: registration.username,
                email: registration.email,
                password_hash,
                role: Role::User,
            })
            .await?;

        tracing::info!(user_id = %user.id, "User registered");
        self.create_auth_response(user)
    }

    /// Unknown email and wrong password fail identically.
    pub async fn login(&self, request: LoginUser) -> Result<AuthResponse, AppError> {
        let credentials = request.validated()?;

        let user = self.user_repo.get_user_by_email(&credentials.email)
            .await?
            .ok_or(AuthError::WrongCredentials)?;

        let is_password_valid = verify_password(&credentials.password, &user.password_hash)
            .map_err(|e| {
                tracing::warn!("Password verification error: {}", e);
                AuthError::WrongCredentials
            })?;
        if !is_password_valid {
            return Err(AuthError::WrongCredentials.into());
        }

        tracing::info!(user_id = %user.id, "User logged in successfully");
        self.create_auth_response(user)
    }

    pub fn create_auth_response(&self, user: User) -> Result<AuthResponse, AppError> {
        let token = self.token_service.create_jwt(&user)?;
        Ok(AuthResponse::new(user.into(), token))
    }

    /// Verifies a bearer token.
    pub fn decode_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.token_service.decode_jwt(token)
    }

    /// Resolves verified claims to the live user they name.
    pub async fn resolve_claims(&self, claims: &Claims) -> Result<User, AppError> {
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::UnknownSubject)?;

        self.user_repo
            .get_user_by_id(&user_id)
            .await?
            .ok_or_else(|| AuthError::UnknownSubject.into())
    }

    /// Changes the caller's username and/or email.
    pub async fn update_profile(&self, user: &User, request: UpdateProfile) -> Result<PublicUser, AppError> {
        let changes = request.validated()?;
        if changes.is_empty() {
            return Ok(user.clone().into());
        }

        let taken = self.user_repo
            .identity_taken(changes.username.clone(), changes.email.clone(), Some(user.id))
            .await?;
        if taken {
            return Err(AppError::Conflict(IDENTITY_TAKEN.to_string()));
        }

        let updated = self.user_repo
            .update_profile(&user.id, changes.username, changes.email)
            .await?
            .ok_or(AuthError::UnknownSubject)?;

        tracing::info!(user_id = %updated.id, "Profile updated");
        Ok(updated.into())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::repositories::{token::MockTokenServiceRepository, user::MockUserRepository};

    fn stored_user(password: &str) -> User {
        UserInsert {
            username: "ada".into(),
            email: "x@y.com".into(),
            password_hash: hash_password(password).unwrap(),
            role: Role::User,
        }
        .into_user(Uuid::new_v4(), Utc::now())
    }

    fn handler(
        users: MockUserRepository,
        tokens: MockTokenServiceRepository,
    ) -> AuthHandler<MockUserRepository, MockTokenServiceRepository> {
        AuthHandler::new(Arc::new(users), Arc::new(tokens))
    }

    fn login(email: &str, password: &str) -> LoginUser {
        LoginUser { email: Some(email.into()), password: Some(password.into()) }
    }

    #[actix_rt::test]
    async fn wrong_password_and_unknown_email_fail_identically() {
        let user = stored_user("correct-horse");
        let mut users = MockUserRepository::new();
        users.expect_get_user_by_email()
            .returning(move |email| Ok((email == user.email).then(|| user.clone())));

        let auth = handler(users, MockTokenServiceRepository::new());

        let wrong = auth.login(login("x@y.com", "wrong")).await.unwrap_err();
        let unknown = auth.login(login("nobody@y.com", "wrong")).await.unwrap_err();

        assert_eq!(wrong.to_string(), "Invalid credentials");
        assert_eq!(wrong.to_string(), unknown.to_string());
        assert!(matches!(wrong, AppError::Unauthorized(_)));
    }

    #[actix_rt::test]
    async fn register_rejects_short_username_before_touching_the_store() {
        let auth = handler(MockUserRepository::new(), MockTokenServiceRepository::new());
        let request = RegisterUser {
            username: Some("ab".into()),
            email: Some("a@b.com".into()),
            password: Some("secret".into()),
        };

        match auth.register(request).await {
            Err(AppError::ValidationError(errors)) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "username");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[actix_rt::test]
    async fn register_conflicts_on_taken_identity() {
        let mut users = MockUserRepository::new();
        users.expect_identity_taken().returning(|_, _, _| Ok(true));

        let request = RegisterUser {
            username: Some("ada".into()),
            email: Some("a@b.com".into()),
            password: Some("secret".into()),
        };
        let err = handler(users, MockTokenServiceRepository::new()).register(request).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(msg) if msg == DUPLICATE_USER));
    }

    #[actix_rt::test]
    async fn register_issues_token_for_new_user() {
        let mut users = MockUserRepository::new();
        users.expect_identity_taken().returning(|_, _, _| Ok(false));
        users.expect_create_user()
            .withf(|insert| insert.role == Role::User && insert.password_hash != "secret")
            .returning(|insert| Ok(insert.clone().into_user(Uuid::new_v4(), Utc::now())));

        let mut tokens = MockTokenServiceRepository::new();
        tokens.expect_create_jwt().returning(|_| Ok("signed".to_string()));

        let request = RegisterUser {
            username: Some("ada_l".into()),
            email: Some("Ada@B.com".into()),
            password: Some("secret".into()),
        };
        let response = handler(users, tokens).register(request).await.unwrap();
        assert_eq!(response.token, "signed");
        assert_eq!(response.user.email, "ada@b.com");
        assert_eq!(response.user.role, Role::User);
    }

    #[actix_rt::test]
    async fn vanished_subject_is_unauthorized() {
        let mut users = MockUserRepository::new();
        users.expect_get_user_by_id().returning(|_| Ok(None));

        let claims = Claims { sub: Uuid::new_v4().to_string(), role: Role::Admin, iat: 0, exp: 0 };
        let err = handler(users, MockTokenServiceRepository::new())
            .resolve_claims(&claims)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[actix_rt::test]
    async fn profile_update_conflicts_with_other_users_only() {
        let user = stored_user("secret1");
        let user_id = user.id;

        let mut users = MockUserRepository::new();
        users.expect_identity_taken()
            .withf(move |_, _, exclude| *exclude == Some(user_id))
            .returning(|_, _, _| Ok(true));

        let request = UpdateProfile { username: Some("taken".into()), email: None };
        let err = handler(users, MockTokenServiceRepository::new())
            .update_profile(&user, request)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(msg) if msg == IDENTITY_TAKEN));
    }
}
