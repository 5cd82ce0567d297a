use actix_web::{
    error::{JsonPayloadError, QueryPayloadError},
    HttpRequest,
};

use crate::errors::AppError;

/// Malformed request bodies answer with the same 400 envelope as field violations.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::debug!("Rejected JSON payload: {}", err);

    let message = match &err {
        JsonPayloadError::ContentType => "Content type must be application/json".to_string(),
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            "Request body is too large".to_string()
        }
        JsonPayloadError::Deserialize(e) => format!("Invalid JSON: {e}"),
        _ => format!("Invalid request body: {err}"),
    };

    AppError::invalid_field("body", &message).into()
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::invalid_field("query", &format!("Invalid query string: {err}")).into()
}
