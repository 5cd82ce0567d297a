use actix_web::{dev::Payload, web, FromRequest, HttpMessage, HttpRequest};
use futures_util::future::LocalBoxFuture;

use crate::{
    entities::{token::Credential, user::User},
    errors::{AppError, AuthError},
    AppState,
};

pub const ADMIN_REQUIRED: &str = "Access denied. Admin role required.";

/// The authenticated caller, resolved to a live user record.
/// Fails with 401 when the token is absent, invalid, expired, or names a
/// user that no longer exists.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let credential = req.extensions().get::<Credential>().cloned();
        let state = req.app_data::<web::Data<AppState>>().cloned();

        Box::pin(async move {
            let state = state.ok_or_else(|| AppError::Internal("AppState missing".into()))?;

            let claims = match credential {
                Some(Credential::Verified(claims)) => claims,
                Some(Credential::Rejected(err)) => return Err(err.into()),
                None => return Err(AuthError::MissingCredentials.into()),
            };

            let user = state.auth_handler.resolve_claims(&claims).await?;
            Ok(AuthUser(user))
        })
    }
}

/// An authenticated caller holding the admin role.
/// Returns 401 like [`AuthUser`], or 403 for any other role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

impl FromRequest for AdminUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let user = AuthUser::from_request(req, payload);

        Box::pin(async move {
            let AuthUser(user) = user.await?;
            if user.is_admin() {
                Ok(AdminUser(user))
            } else {
                tracing::warn!(user_id = %user.id, "Admin access denied");
                Err(AppError::Forbidden(ADMIN_REQUIRED.to_string()))
            }
        })
    }
}
