//! Integration tests for statement submission endpoints.

mod common;

use axum::http::StatusCode;

#[tokio::test]
async fn test_upsert_and_list_statements() {
    let app = common::build_test_app();

    let (status, json) = common::put_json(
        app.clone(),
        "/api/v1/sessions/s1/statements",
        &serde_json::json!({
            "email": "Alice@X.com",
            "alias": "Alice",
            "truth1": "I ran a marathon",
            "truth2": "I own a telescope",
            "lie1": "I met the queen"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["email"], "alice@x.com");

    let (status, json) = common::get_json(app, "/api/v1/sessions/s1/statements").await;

    assert_eq!(status, StatusCode::OK);
    let statements = json.as_array().unwrap();
    assert_eq!(statements.len(), 1);
    assert_eq!(statements[0]["truth1"], "I ran a marathon");
    assert_eq!(statements[0]["lie1"], "I met the queen");
}

#[tokio::test]
async fn test_upsert_statements_overwrites_previous_set() {
    let app = common::build_test_app();
    let body = serde_json::json!({
        "email": "alice@x.com",
        "alias": "Alice",
        "truth1": "t1",
        "truth2": "t2",
        "lie1": "l1"
    });
    common::put_json(app.clone(), "/api/v1/sessions/s1/statements", &body).await;

    let mut updated = body.clone();
    updated["lie1"] = serde_json::json!("a different lie");
    common::put_json(app.clone(), "/api/v1/sessions/s1/statements", &updated).await;

    let (_, json) = common::get_json(app, "/api/v1/sessions/s1/statements").await;
    let statements = json.as_array().unwrap();
    assert_eq!(statements.len(), 1);
    assert_eq!(statements[0]["lie1"], "a different lie");
}

#[tokio::test]
async fn test_list_statements_is_scoped_to_session() {
    let app = common::build_test_app();
    let body = serde_json::json!({
        "email": "alice@x.com",
        "alias": "Alice",
        "truth1": "t1",
        "truth2": "t2",
        "lie1": "l1"
    });
    common::put_json(app.clone(), "/api/v1/sessions/s1/statements", &body).await;

    let (status, json) = common::get_json(app, "/api/v1/sessions/s2/statements").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 0);
}
