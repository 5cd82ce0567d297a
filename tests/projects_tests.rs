#[macro_use]
mod test_utils;

use actix_web::{http::StatusCode, test};
use serde_json::{json, Value};
use test_utils::{bearer, sample_project, TestApp};

#[actix_rt::test]
async fn featured_filter_paginates_over_matching_projects_only() {
    let app = TestApp::new();
    let (_, token) = app.admin().await;
    let service = init_app!(app);

    for i in 0..5 {
        let req = test::TestRequest::post()
            .uri("/api/projects")
            .insert_header(bearer(&token))
            .set_json(sample_project(&format!("Featured {i}"), true))
            .to_request();
        assert_eq!(test::call_service(&service, req).await.status(), StatusCode::CREATED);
    }
    for i in 0..3 {
        let req = test::TestRequest::post()
            .uri("/api/projects")
            .insert_header(bearer(&token))
            .set_json(sample_project(&format!("Plain {i}"), false))
            .to_request();
        assert_eq!(test::call_service(&service, req).await.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get()
        .uri("/api/projects?featured=true&limit=2&page=1")
        .to_request();
    let body: Value = test::call_and_read_body_json(&service, req).await;

    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["data"].as_array().unwrap().len(), 2);
    assert_eq!(
        body["data"]["pagination"],
        json!({"page": 1, "limit": 2, "total": 5, "pages": 3, "hasNext": true, "hasPrev": false})
    );

    // Omitting the filter must not narrow to featured=false.
    let req = test::TestRequest::get().uri("/api/projects").to_request();
    let body: Value = test::call_and_read_body_json(&service, req).await;
    assert_eq!(body["data"]["pagination"]["total"], 8);

    // An un-coercible value is the same as no filter.
    let req = test::TestRequest::get().uri("/api/projects?featured=maybe").to_request();
    let body: Value = test::call_and_read_body_json(&service, req).await;
    assert_eq!(body["data"]["pagination"]["total"], 8);
}

#[actix_rt::test]
async fn featured_view_is_capped_and_newest_first() {
    let app = TestApp::new();
    let (_, token) = app.admin().await;
    let service = init_app!(app);

    for i in 0..8 {
        let req = test::TestRequest::post()
            .uri("/api/projects")
            .insert_header(bearer(&token))
            .set_json(sample_project(&format!("Project {i}"), true))
            .to_request();
        test::call_service(&service, req).await;
    }

    let req = test::TestRequest::get().uri("/api/projects/featured").to_request();
    let body: Value = test::call_and_read_body_json(&service, req).await;
    let projects = body["data"].as_array().unwrap();

    assert_eq!(projects.len(), 6);
    assert_eq!(projects[0]["title"], "Project 7");
}

#[actix_rt::test]
async fn created_project_reads_back_with_system_fields() {
    let app = TestApp::new();
    let (_, token) = app.admin().await;
    let service = init_app!(app);

    let req = test::TestRequest::post()
        .uri("/api/projects")
        .insert_header(bearer(&token))
        .set_json(sample_project("Portfolio API", false))
        .to_request();
    let created: Value = test::call_and_read_body_json(&service, req).await;
    let id = created["data"]["_id"].as_str().unwrap().to_string();

    let req = test::TestRequest::get().uri(&format!("/api/projects/{id}")).to_request();
    let fetched: Value = test::call_and_read_body_json(&service, req).await;

    assert_eq!(fetched["data"], created["data"]);
    assert_eq!(fetched["data"]["status"], "completed");
    assert_eq!(fetched["data"]["featured"], false);
    assert_eq!(fetched["data"]["technologies"], json!(["Rust", "actix-web"]));
    assert!(fetched["data"]["createdAt"].is_string());
}

#[actix_rt::test]
async fn create_reports_every_violation() {
    let app = TestApp::new();
    let (_, token) = app.admin().await;
    let service = init_app!(app);

    let req = test::TestRequest::post()
        .uri("/api/projects")
        .insert_header(bearer(&token))
        .set_json(json!({"title": "x".repeat(101), "category": "spaceship"}))
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    for field in ["title", "description", "technologies", "category", "startDate"] {
        assert!(fields.contains(&field), "missing violation for {field}: {fields:?}");
    }
}

#[actix_rt::test]
async fn update_rejects_end_date_before_start_date() {
    let app = TestApp::new();
    let (_, token) = app.admin().await;
    let service = init_app!(app);

    let req = test::TestRequest::post()
        .uri("/api/projects")
        .insert_header(bearer(&token))
        .set_json(sample_project("Dated", false))
        .to_request();
    let created: Value = test::call_and_read_body_json(&service, req).await;
    let id = created["data"]["_id"].as_str().unwrap().to_string();

    let req = test::TestRequest::put()
        .uri(&format!("/api/projects/{id}"))
        .insert_header(bearer(&token))
        .set_json(json!({"endDate": "2023-12-31"}))
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errors"][0]["field"], "endDate");

    let req = test::TestRequest::put()
        .uri(&format!("/api/projects/{id}"))
        .insert_header(bearer(&token))
        .set_json(json!({"endDate": "2024-06-30", "status": "in-progress"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&service, req).await;
    assert_eq!(body["message"], "Project updated successfully");
    assert_eq!(body["data"]["status"], "in-progress");
    assert_eq!(body["data"]["title"], "Dated");
}

#[actix_rt::test]
async fn second_delete_is_not_found() {
    let app = TestApp::new();
    let (_, token) = app.admin().await;
    let service = init_app!(app);

    let req = test::TestRequest::post()
        .uri("/api/projects")
        .insert_header(bearer(&token))
        .set_json(sample_project("Short lived", false))
        .to_request();
    let created: Value = test::call_and_read_body_json(&service, req).await;
    let uri = format!("/api/projects/{}", created["data"]["_id"].as_str().unwrap());

    let req = test::TestRequest::delete().uri(&uri).insert_header(bearer(&token)).to_request();
    assert_eq!(test::call_service(&service, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::delete().uri(&uri).insert_header(bearer(&token)).to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Project not found");
}

#[actix_rt::test]
async fn malformed_id_is_not_found() {
    let app = TestApp::new();
    let service = init_app!(app);

    let req = test::TestRequest::get().uri("/api/projects/not-an-id").to_request();
    assert_eq!(test::call_service(&service, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn writes_require_a_token() {
    let app = TestApp::new();
    let service = init_app!(app);

    let req = test::TestRequest::post()
        .uri("/api/projects")
        .set_json(sample_project("Anonymous", false))
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn unknown_route_uses_not_found_envelope() {
    let app = TestApp::new();
    let service = init_app!(app);

    let req = test::TestRequest::get().uri("/api/nothing-here").to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"success": false, "message": "Route /api/nothing-here not found"}));
}

#[actix_rt::test]
async fn unsupported_method_uses_not_found_envelope() {
    let app = TestApp::new();
    let service = init_app!(app);

    let req = test::TestRequest::patch().uri("/api/projects").to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"success": false, "message": "Route /api/projects not found"}));

    let req = test::TestRequest::post().uri("/api/skills/featured").to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
}

#[actix_rt::test]
async fn malformed_json_is_a_validation_error() {
    let app = TestApp::new();
    let (_, token) = app.admin().await;
    let service = init_app!(app);

    let req = test::TestRequest::post()
        .uri("/api/projects")
        .insert_header(bearer(&token))
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
}
