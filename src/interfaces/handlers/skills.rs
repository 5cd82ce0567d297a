use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    constants::DEFAULT_SKILL_PAGE_SIZE,
    entities::{
        response::ApiResponse,
        skill::{NewSkill, SkillFilter, SkillSort, UpdateSkill},
    },
    errors::AppError,
    listing::{ListQuery, RawQuery},
    use_cases::extractors::AdminUser,
    AppState,
};

#[instrument(skip(state, query))]
pub async fn list_skills(
    state: web::Data<AppState>,
    query: web::Query<RawQuery>,
) -> Result<impl Responder, AppError> {
    let query = ListQuery::from_params(
        &query,
        SkillFilter::from_params(&query),
        SkillSort::Proficiency,
        DEFAULT_SKILL_PAGE_SIZE,
    );

    let page = state.skill_handler.list_skills(query).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok("Skills retrieved successfully", page)))
}

#[instrument(skip(state))]
pub async fn featured_skills(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let skills = state.skill_handler.featured_skills().await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok("Featured skills retrieved successfully", skills)))
}

#[instrument(skip(state))]
pub async fn skills_by_category(
    state: web::Data<AppState>,
    category: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let skills = state.skill_handler.skills_by_category(&category).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok("Skills retrieved successfully", skills)))
}

#[instrument(skip(state))]
pub async fn get_skill(
    state: web::Data<AppState>,
    skill_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let skill = state.skill_handler.get_skill(&skill_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok("Skill retrieved successfully", skill)))
}

#[instrument(skip(_admin, state, data))]
pub async fn create_skill(
    _admin: AdminUser,
    state: web::Data<AppState>,
    data: web::Json<NewSkill>,
) -> Result<impl Responder, AppError> {
    let skill = state.skill_handler.create_skill(data.into_inner()).await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok("Skill created successfully", skill)))
}

#[instrument(skip(_admin, state, data))]
pub async fn update_skill(
    _admin: AdminUser,
    state: web::Data<AppState>,
    skill_id: web::Path<String>,
    data: web::Json<UpdateSkill>,
) -> Result<impl Responder, AppError> {
    let skill = state
        .skill_handler
        .update_skill(&skill_id, data.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok("Skill updated successfully", skill)))
}

#[instrument(skip(_admin, state))]
pub async fn delete_skill(
    _admin: AdminUser,
    state: web::Data<AppState>,
    skill_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    state.skill_handler.delete_skill(&skill_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::<()>::message("Skill deleted successfully")))
}
