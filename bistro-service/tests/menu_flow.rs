mod support;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use serde_json::{json, Value};
use support::TestApp;

fn soup() -> Value {
    json!({
        "name": "Tomato Soup",
        "category": "soup",
        "price": 6.5,
        "recipe": "tomatoes, basil",
        "image": "https://img.example/soup.png"
    })
}

async fn create(app: &TestApp, admin: &str, body: Value) -> String {
    let (status, created) = app.call(Method::POST, "/menu", Some(admin), Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    created["insertedId"].as_str().expect("inserted id").to_string()
}

#[tokio::test]
async fn menu_reads_are_public() {
    let app = TestApp::new();
    let admin = app.admin_token("boss@x.com");
    let id = create(&app, &admin, soup()).await;

    let (status, list) = app.call(Method::GET, "/menu", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().map(Vec::len), Some(1));
    assert_eq!(list[0]["_id"], id);

    let (status, item) = app.call(Method::GET, &format!("/menu/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(item["name"], "Tomato Soup");
    assert_eq!(item["price"], 6.5);
}

#[tokio::test]
async fn unknown_menu_item_is_null() {
    let app = TestApp::new();
    let (status, item) = app
        .call(Method::GET, "/menu/64b7f0c2a1b2c3d4e5f60718", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(item, Value::Null);
}

#[tokio::test]
async fn creating_menu_items_requires_admin() {
    let app = TestApp::new();
    let (status, _) = app.call(Method::POST, "/menu", None, Some(soup())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    app.store.seed_user("guest@x.com", Some("user")).unwrap();
    let guest = app.token_for("guest@x.com");
    let (status, _) = app.call(Method::POST, "/menu", Some(&guest), Some(soup())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, list) = app.call(Method::GET, "/menu", None, None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn invalid_menu_payload_is_rejected() {
    let app = TestApp::new();
    let admin = app.admin_token("boss@x.com");
    let mut body = soup();
    body["price"] = json!(-3);
    let (status, err) = app.call(Method::POST, "/menu", Some(&admin), Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], "invalid_menu_item");
}

#[tokio::test]
async fn update_replaces_all_fields_without_auth() {
    let app = TestApp::new();
    let admin = app.admin_token("boss@x.com");
    let id = create(&app, &admin, soup()).await;

    let replacement = json!({
        "name": "Pumpkin Soup",
        "category": "soup",
        "price": 7.0,
        "recipe": "pumpkin",
        "image": ""
    });
    let uri = format!("/menu/{id}");
    let (status, outcome) = app.call(Method::PATCH, &uri, None, Some(replacement.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["matchedCount"], 1);
    assert_eq!(outcome["modifiedCount"], 1);

    let (_, item) = app.call(Method::GET, &uri, None, None).await;
    let mut expected = replacement;
    expected["_id"] = json!(id);
    assert_eq!(item, expected);
}

#[tokio::test]
async fn deleting_missing_menu_item_reports_zero() {
    let app = TestApp::new();
    let admin = app.admin_token("boss@x.com");
    let (status, outcome) = app
        .call(Method::DELETE, "/menu/64b7f0c2a1b2c3d4e5f60718", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome, json!({ "acknowledged": true, "deletedCount": 0 }));
}

#[tokio::test]
async fn malformed_menu_id_is_a_failure() {
    let app = TestApp::new();
    let admin = app.admin_token("boss@x.com");
    let (status, body) = app.call(Method::DELETE, "/menu/not-an-id", Some(&admin), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_id");

    let (status, _) = app.call(Method::GET, "/menu/zzzz", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_menu_item_by_admin() {
    let app = TestApp::new();
    let admin = app.admin_token("boss@x.com");
    let id = create(&app, &admin, soup()).await;

    let (status, outcome) = app.call(Method::DELETE, &format!("/menu/{id}"), Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["deletedCount"], 1);
    let (_, list) = app.call(Method::GET, "/menu", None, None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn update_without_json_content_type_is_invalid_payload() {
    let app = TestApp::new();
    let admin = app.admin_token("boss@x.com");
    let id = create(&app, &admin, soup()).await;
    let request = Request::builder()
        .method(Method::PATCH)
        .uri(format!("/menu/{id}"))
        .body(Body::from(soup().to_string()))
        .unwrap();
    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_payload");
}
