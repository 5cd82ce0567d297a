use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::{
        response::ApiResponse,
        user::{LoginUser, PublicUser, RegisterUser, UpdateProfile},
    },
    errors::AppError,
    use_cases::extractors::AuthUser,
    AppState,
};

#[instrument(skip(state, user))]
pub async fn register(
    state: web::Data<AppState>,
    user: web::Json<RegisterUser>,
) -> Result<impl Responder, AppError> {
    let response = state.auth_handler.register(user.into_inner()).await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok("User registered successfully", response)))
}

#[instrument(skip(state, user))]
pub async fn login(
    state: web::Data<AppState>,
    user: web::Json<LoginUser>,
) -> Result<impl Responder, AppError> {
    let response = state.auth_handler.login(user.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok("Login successful", response)))
}

#[instrument(skip(user), fields(user_id = %user.0.id))]
pub async fn me(user: AuthUser) -> Result<impl Responder, AppError> {
    let user = PublicUser::from(user.0);

    Ok(HttpResponse::Ok().json(ApiResponse::ok("User profile retrieved successfully", user)))
}

#[instrument(skip(user, state, data), fields(user_id = %user.0.id))]
pub async fn update_profile(
    user: AuthUser,
    state: web::Data<AppState>,
    data: web::Json<UpdateProfile>,
) -> Result<impl Responder, AppError> {
    let updated = state
        .auth_handler
        .update_profile(&user.0, data.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok("Profile updated successfully", updated)))
}
