use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    constants::DEFAULT_PROJECT_PAGE_SIZE,
    entities::{
        project::{NewProject, ProjectFilter, ProjectSort, UpdateProject},
        response::ApiResponse,
    },
    errors::AppError,
    listing::{ListQuery, RawQuery},
    use_cases::extractors::AdminUser,
    AppState,
};

#[instrument(skip(state, query))]
pub async fn list_projects(
    state: web::Data<AppState>,
    query: web::Query<RawQuery>,
) -> Result<impl Responder, AppError> {
    let query = ListQuery::from_params(
        &query,
        ProjectFilter::from_params(&query),
        ProjectSort::CreatedAt,
        DEFAULT_PROJECT_PAGE_SIZE,
    );

    let page = state.project_handler.list_projects(query).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok("Projects retrieved successfully", page)))
}

#[instrument(skip(state))]
pub async fn featured_projects(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let projects = state.project_handler.featured_projects().await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok("Featured projects retrieved successfully", projects)))
}

#[instrument(skip(state))]
pub async fn get_project(
    state: web::Data<AppState>,
    project_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let project = state.project_handler.get_project(&project_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok("Project retrieved successfully", project)))
}

#[instrument(skip(_admin, state, data))]
pub async fn create_project(
    _admin: AdminUser,
    state: web::Data<AppState>,
    data: web::Json<NewProject>,
) -> Result<impl Responder, AppError> {
    let project = state.project_handler.create_project(data.into_inner()).await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok("Project created successfully", project)))
}

#[instrument(skip(_admin, state, data))]
pub async fn update_project(
    _admin: AdminUser,
    state: web::Data<AppState>,
    project_id: web::Path<String>,
    data: web::Json<UpdateProject>,
) -> Result<impl Responder, AppError> {
    let project = state
        .project_handler
        .update_project(&project_id, data.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok("Project updated successfully", project)))
}

#[instrument(skip(_admin, state))]
pub async fn delete_project(
    _admin: AdminUser,
    state: web::Data<AppState>,
    project_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    state.project_handler.delete_project(&project_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::<()>::message("Project deleted successfully")))
}
