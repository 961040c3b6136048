//! HTTP-level tests for the project creation wizard.

mod common;

use axum::http::{header, StatusCode};
use common::{
    advance, body_json, get, get_with_cookie, post_json, post_json_with_cookie, post_multipart,
    seed_employees, start_wizard, step_uri, walk_to_documents, WIZARD,
};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Entering the wizard
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_issues_cookie_and_renders_step_one(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(&app, WIZARD).await;

    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(set_cookie.starts_with("smoothie_session="));
    assert!(set_cookie.contains("HttpOnly"));

    let json = body_json(response).await;
    assert_eq!(json["data"]["step"], 1);
    assert_eq!(json["data"]["state"]["current_step"], 1);
    assert_eq!(json["data"]["errors"], json!([]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_resets_existing_progress(pool: PgPool) {
    let app = common::build_test_app(pool);
    let cookie = start_wizard(&app).await;
    advance(
        &app,
        &cookie,
        1,
        json!({"name": "Alpha", "start_date": "2025-01-01", "end_date": "2025-06-01", "priority": 5}),
        &step_uri(2),
    )
    .await;

    let response = get_with_cookie(&app, WIZARD, Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    // Same session, cookie re-issued.
    assert_eq!(common::session_cookie(&response), cookie);
    let json = body_json(response).await;
    assert_eq!(json["data"]["state"]["name"], serde_json::Value::Null);
    assert_eq!(json["data"]["state"]["current_step"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_step_requests_refresh_session_cookie(pool: PgPool) {
    let app = common::build_test_app(pool);
    let cookie = start_wizard(&app).await;

    let response = get_with_cookie(&app, &step_uri(1), Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(common::session_cookie(&response), cookie);
    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(set_cookie.contains("Max-Age=1800"), "{set_cookie}");

    let response = post_json_with_cookie(
        &app,
        &step_uri(1),
        Some(&cookie),
        json!({"name": "Alpha", "start_date": "2025-01-01", "end_date": "2025-06-01", "priority": 5}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(common::session_cookie(&response), cookie);
}

// ---------------------------------------------------------------------------
// Step navigation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_step_one_validation_errors_return_422(pool: PgPool) {
    let app = common::build_test_app(pool);
    let cookie = start_wizard(&app).await;

    let response = post_json_with_cookie(
        &app,
        &step_uri(1),
        Some(&cookie),
        json!({"name": "Alpha", "start_date": "2025-06-01", "end_date": "2025-01-01", "priority": 5}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["data"]["step"], 1);
    assert_eq!(
        json["data"]["errors"],
        json!([{"field": "end_date", "message": "End date must be after start date"}])
    );

    // Nothing was persisted: step 2 is still out of reach.
    let response = get_with_cookie(&app, &step_uri(2), Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(common::location(&response), step_uri(1));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_step_one_advance_keeps_fields(pool: PgPool) {
    let app = common::build_test_app(pool);
    let cookie = start_wizard(&app).await;
    advance(
        &app,
        &cookie,
        1,
        json!({"name": "Alpha", "start_date": "2025-01-01", "end_date": "2025-06-01", "priority": 5}),
        &step_uri(2),
    )
    .await;

    let response = get_with_cookie(&app, &step_uri(2), Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let state = &body_json(response).await["data"]["state"];
    assert_eq!(state["current_step"], 2);
    assert_eq!(state["name"], "Alpha");
    assert_eq!(state["start_date"], "2025-01-01");
    assert_eq!(state["end_date"], "2025-06-01");
    assert_eq!(state["priority"], 5);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_same_companies_error_on_executor(pool: PgPool) {
    let app = common::build_test_app(pool);
    let cookie = start_wizard(&app).await;
    advance(
        &app,
        &cookie,
        1,
        json!({"name": "Alpha", "start_date": "2025-01-01", "end_date": "2025-06-01", "priority": 5}),
        &step_uri(2),
    )
    .await;

    let response = post_json_with_cookie(
        &app,
        &step_uri(2),
        Some(&cookie),
        json!({"customer_company_id": 101, "executor_company_id": 101}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["data"]["errors"][0]["field"], "executor_company_id");
    assert_eq!(
        json["data"]["errors"][0]["message"],
        "Executor must differ from customer"
    );

    let response = get_with_cookie(&app, &step_uri(2), Some(&cookie)).await;
    let state = &body_json(response).await["data"]["state"];
    assert_eq!(state["current_step"], 2);
    assert_eq!(state["customer_company_id"], serde_json::Value::Null);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_back_skips_validation(pool: PgPool) {
    let app = common::build_test_app(pool);
    let cookie = start_wizard(&app).await;
    advance(
        &app,
        &cookie,
        1,
        json!({"name": "Alpha", "start_date": "2025-01-01", "end_date": "2025-06-01", "priority": 5}),
        &step_uri(2),
    )
    .await;

    // Invalid companies, but going back never validates.
    advance(
        &app,
        &cookie,
        2,
        json!({"action": "back", "customer_company_id": 101, "executor_company_id": 101}),
        &step_uri(1),
    )
    .await;

    let response = get_with_cookie(&app, &step_uri(1), Some(&cookie)).await;
    let state = &body_json(response).await["data"]["state"];
    assert_eq!(state["current_step"], 1);
    assert_eq!(state["customer_company_id"], 101);
    assert_eq!(state["name"], "Alpha");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cannot_skip_ahead(pool: PgPool) {
    let app = common::build_test_app(pool);
    let cookie = start_wizard(&app).await;

    let response = get_with_cookie(&app, &step_uri(4), Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(common::location(&response), step_uri(1));

    let response =
        post_json_with_cookie(&app, &step_uri(3), Some(&cookie), json!({"head_id": 101})).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(common::location(&response), step_uri(1));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_head_joins_team_after_step_four(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    seed_employees(&pool, &[201, 202]).await;
    let cookie = start_wizard(&app).await;
    walk_to_documents(&app, &cookie).await;

    // Back to step 4 with a team that lacks the head, then forward again.
    post_multipart(&app, &step_uri(5), Some(&cookie), "back", &[]).await;
    advance(&app, &cookie, 4, json!({"employee_ids": [202]}), &step_uri(5)).await;

    let response = get_with_cookie(&app, &step_uri(5), Some(&cookie)).await;
    let state = &body_json(response).await["data"]["state"];
    assert_eq!(state["employee_ids"], json!([201, 202]));
}

// ---------------------------------------------------------------------------
// Session handling
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_session_redirects_to_create(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(&app, &step_uri(2)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(common::location(&response), WIZARD);

    let response = post_json(&app, &step_uri(1), json!({"name": "Alpha"})).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(common::location(&response), WIZARD);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_session_redirects_to_create(pool: PgPool) {
    let app = common::build_test_app(pool);
    let cookie = format!("smoothie_session={}", uuid::Uuid::new_v4());

    let response = get_with_cookie(&app, &step_uri(1), Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(common::location(&response), WIZARD);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invalid_step_number_is_bad_request(pool: PgPool) {
    let app = common::build_test_app(pool);
    let cookie = start_wizard(&app).await;

    let response = get_with_cookie(&app, &step_uri(6), Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_malformed_step_fields_are_bad_request(pool: PgPool) {
    let app = common::build_test_app(pool);
    let cookie = start_wizard(&app).await;

    let response = post_json_with_cookie(
        &app,
        &step_uri(1),
        Some(&cookie),
        json!({"start_date": "first of january"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

// ---------------------------------------------------------------------------
// End to end
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_alpha_scenario_persists_project(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    seed_employees(&pool, &[201, 202]).await;
    let cookie = start_wizard(&app).await;
    walk_to_documents(&app, &cookie).await;

    let response = post_multipart(&app, &step_uri(5), Some(&cookie), "next", &[]).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(common::location(&response), "/api/v1/projects");

    let response = get(&app, "/api/v1/projects").await;
    assert_eq!(response.status(), StatusCode::OK);
    let projects = body_json(response).await["data"].clone();
    assert_eq!(projects.as_array().unwrap().len(), 1);
    let id = projects[0]["id"].as_i64().unwrap();
    assert_eq!(projects[0]["name"], "Alpha");
    assert_eq!(projects[0]["head_id"], 201);

    let response = get(&app, &format!("/api/v1/projects/{id}")).await;
    let detail = body_json(response).await;
    assert_eq!(detail["data"]["employee_ids"], json!([201, 202]));
    assert_eq!(detail["data"]["documents"], json!([]));

    // The wizard state is gone.
    let response = get_with_cookie(&app, &step_uri(5), Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(common::location(&response), WIZARD);
}
