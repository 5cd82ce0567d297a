use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    constants::DEFAULT_CONTACT_PAGE_SIZE,
    entities::{
        contact::{ContactFilter, ContactSort, NewContact, UpdateContactStatus},
        response::ApiResponse,
    },
    errors::AppError,
    listing::{ListQuery, RawQuery},
    use_cases::extractors::AdminUser,
    AppState,
};

#[instrument(skip(state, data))]
pub async fn submit_contact(
    state: web::Data<AppState>,
    data: web::Json<NewContact>,
) -> Result<impl Responder, AppError> {
    let contact = state.contact_handler.submit_contact(data.into_inner()).await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(
        "Contact form submitted successfully. We will get back to you soon!",
        contact,
    )))
}

#[instrument(skip(_admin, state, query))]
pub async fn list_contacts(
    _admin: AdminUser,
    state: web::Data<AppState>,
    query: web::Query<RawQuery>,
) -> Result<impl Responder, AppError> {
    let query = ListQuery::from_params(
        &query,
        ContactFilter::from_params(&query),
        ContactSort::CreatedAt,
        DEFAULT_CONTACT_PAGE_SIZE,
    );

    let page = state.contact_handler.list_contacts(query).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok("Contacts retrieved successfully", page)))
}

#[instrument(skip(_admin, state))]
pub async fn get_contact(
    _admin: AdminUser,
    state: web::Data<AppState>,
    contact_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let contact = state.contact_handler.get_contact(&contact_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok("Contact retrieved successfully", contact)))
}

#[instrument(skip(_admin, state, data))]
pub async fn update_contact_status(
    _admin: AdminUser,
    state: web::Data<AppState>,
    contact_id: web::Path<String>,
    data: web::Json<UpdateContactStatus>,
) -> Result<impl Responder, AppError> {
    let contact = state
        .contact_handler
        .update_status(&contact_id, data.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok("Contact status updated successfully", contact)))
}

#[instrument(skip(_admin, state))]
pub async fn delete_contact(
    _admin: AdminUser,
    state: web::Data<AppState>,
    contact_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    state.contact_handler.delete_contact(&contact_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::<()>::message("Contact deleted successfully")))
}
