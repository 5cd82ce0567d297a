#[macro_use]
mod test_utils;

use actix_web::{http::StatusCode, test};
use serde_json::Value;
use test_utils::TestApp;

#[actix_rt::test]
async fn health_reports_a_reachable_store() {
    let app = TestApp::new();
    let service = init_app!(app);

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "healthy");
    assert_eq!(body["data"]["database"], "OK");
    assert_eq!(body["data"]["version"], env!("CARGO_PKG_VERSION"));
}

#[actix_rt::test]
async fn root_serves_the_banner() {
    let app = TestApp::new();
    let service = init_app!(app);

    let req = test::TestRequest::get().uri("/").to_request();
    let body: Value = test::call_and_read_body_json(&service, req).await;

    assert_eq!(body["success"], true);
    assert_eq!(body["health"], "/api/health");
}
