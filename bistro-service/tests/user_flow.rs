mod support;

use axum::http::{Method, StatusCode};
use serde_json::json;
use support::TestApp;

#[tokio::test]
async fn duplicate_registration_keeps_single_record() {
    let app = TestApp::new();
    let token = app.token_for("a@x.com");
    let body = json!({ "email": "a@x.com", "name": "Ada" });

    let (status, first) = app.call(Method::POST, "/users", Some(&token), Some(body.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["acknowledged"], true);
    assert!(first["insertedId"].is_string());

    for _ in 0..3 {
        let (status, again) = app.call(Method::POST, "/users", Some(&token), Some(body.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(again, json!({ "message": "user already exists", "insertedId": null }));
    }
    assert_eq!(app.store.count_users_with_email("a@x.com").unwrap(), 1);
}

#[tokio::test]
async fn registration_cannot_self_assign_admin() {
    let app = TestApp::new();
    let token = app.token_for("a@x.com");
    let (status, _) = app
        .call(Method::POST, "/users", Some(&token), Some(json!({ "email": "a@x.com", "role": "admin" })))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, status_body) = app.call(Method::GET, "/users/admin/a@x.com", Some(&token), None).await;
    assert_eq!(status_body, json!({ "admin": false }));
}

#[tokio::test]
async fn invalid_email_is_bad_request() {
    let app = TestApp::new();
    let token = app.token_for("a@x.com");
    let (status, body) = app
        .call(Method::POST, "/users", Some(&token), Some(json!({ "email": "   " })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_user");
}

#[tokio::test]
async fn listing_users_requires_admin_role() {
    let app = TestApp::new();
    let admin = app.admin_token("boss@x.com");
    app.store.seed_user("plain@x.com", None).unwrap();
    app.store.seed_user("odd@x.com", Some("Admin")).unwrap();

    let (status, body) = app.call(Method::GET, "/users", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(3));

    for email in ["plain@x.com", "odd@x.com", "ghost@x.com"] {
        let token = app.token_for(email);
        let (status, body) = app.call(Method::GET, "/users", Some(&token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{email}");
        assert_eq!(body["message"], "forbidden access");
        assert_eq!(body["missing_role"], "admin", "{email}");
    }

    let (status, _) = app.call(Method::GET, "/users", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_status_requires_matching_email() {
    let app = TestApp::new();
    let token = app.token_for("a@x.com");
    let (status, body) = app.call(Method::GET, "/users/admin/b@x.com", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "forbidden");

    let (status, body) = app.call(Method::GET, "/users/admin/a@x.com", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "admin": false }));
}

#[tokio::test]
async fn promoted_user_reports_admin() {
    let app = TestApp::new();
    let admin = app.admin_token("boss@x.com");
    let user_id = app.store.seed_user("cook@x.com", None).unwrap();

    let uri = format!("/users/admin/{user_id}");
    let (status, body) = app.call(Method::PATCH, &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["matchedCount"], 1);
    assert_eq!(body["modifiedCount"], 1);

    let cook = app.token_for("cook@x.com");
    let (status, body) = app.call(Method::GET, "/users/admin/cook@x.com", Some(&cook), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "admin": true }));

    // The promoted account now passes the role check too.
    let (status, _) = app.call(Method::GET, "/users", Some(&cook), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn promotion_is_admin_only() {
    let app = TestApp::new();
    let user_id = app.store.seed_user("cook@x.com", None).unwrap();
    let cook = app.token_for("cook@x.com");
    let (status, body) = app
        .call(Method::PATCH, &format!("/users/admin/{user_id}"), Some(&cook), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["missing_role"], "admin");
}

#[tokio::test]
async fn delete_user_by_id() {
    let app = TestApp::new();
    let admin = app.admin_token("boss@x.com");
    let user_id = app.store.seed_user("gone@x.com", None).unwrap();

    let uri = format!("/users/{user_id}");
    let (status, body) = app.call(Method::DELETE, &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "acknowledged": true, "deletedCount": 1 }));

    let (_, body) = app.call(Method::DELETE, &uri, Some(&admin), None).await;
    assert_eq!(body["deletedCount"], 0);
    assert_eq!(app.store.count_users_with_email("gone@x.com").unwrap(), 0);
}

#[tokio::test]
async fn malformed_user_id_is_bad_request() {
    let app = TestApp::new();
    let admin = app.admin_token("boss@x.com");
    let (status, body) = app.call(Method::DELETE, "/users/12345", Some(&admin), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_id");
}

#[tokio::test]
async fn token_only_routes_report_trace_id_on_401() {
    let app = TestApp::new();
    let (status, body) = app.call(Method::GET, "/users/admin/a@x.com", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthorized");
    assert!(body["trace_id"].as_str().is_some_and(|id| !id.is_empty()));

    let (status, body) = app
        .call(Method::POST, "/users", Some("garbage"), Some(json!({ "email": "a@x.com" })))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["trace_id"].is_string());
}
