use actix_web::{HttpRequest, HttpResponse, Responder};

pub async fn home() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Welcome to the Portfolio API",
        "version": env!("CARGO_PKG_VERSION"),
        "health": "/api/health"
    }))
}

/// Fallback for every unmatched route.
pub async fn not_found(req: HttpRequest) -> impl Responder {
    HttpResponse::NotFound().json(serde_json::json!({
        "success": false,
        "message": format!("Route {} not found", req.uri()),
    }))
}
