//! Login, session cookie and user management integration tests.
//!
//! Run with: `cargo test -p showroom-api --test auth_test`

mod helpers;

use helpers::auth::{login_admin, login_as, TEST_PASSWORD};
use helpers::setup_test_app;
use serde_json::{json, Value};
use showroom_core::models::UserRole;

#[tokio::test]
async fn test_login_sets_session_cookie_and_hides_hash() {
    let app = setup_test_app().await;
    let client = app.client();
    let admin = login_admin(client, &app.pool).await;

    let response = client
        .post("/auth/login")
        .json(&json!({ "email": admin.email.to_uppercase(), "password": TEST_PASSWORD }))
        .await;
    assert_eq!(response.status_code(), 200);

    let cookie = response
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .expect("session cookie")
        .to_string();
    assert!(cookie.starts_with("token="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));

    let body: Value = response.json();
    assert_eq!(body["result"]["user"]["role"], "admin");
    assert!(body["result"]["user"].get("password_hash").is_none());

    // The cookie alone authenticates
    let token_cookie = cookie.split(';').next().unwrap().to_string();
    let users = client
        .get("/users/view-users")
        .add_header("Cookie", token_cookie)
        .await;
    assert_eq!(users.status_code(), 200);
}

#[tokio::test]
async fn test_bad_credentials_are_unauthorized() {
    let app = setup_test_app().await;
    let client = app.client();
    let admin = login_admin(client, &app.pool).await;

    for (email, password) in [
        (admin.email.as_str(), "wrong-password"),
        ("nobody@showroom.test", TEST_PASSWORD),
    ] {
        let response = client
            .post("/auth/login")
            .json(&json!({ "email": email, "password": password }))
            .await;
        assert_eq!(response.status_code(), 401);
        assert_eq!(response.json::<Value>()["message"], "Invalid email or password");
    }
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let app = setup_test_app().await;
    let response = app.client().post("/auth/logout").await;
    assert_eq!(response.status_code(), 200);
    let cookie = response
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(cookie.starts_with("token=;"));
    assert!(cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_admin_adds_user_and_duplicates_conflict() {
    let app = setup_test_app().await;
    let client = app.client();
    let admin = login_admin(client, &app.pool).await;

    let new_user = json!({
        "name": "Sam",
        "email": "sam@showroom.test",
        "phone_number": "+15550100",
        "password": "longenough",
    });
    let response = client
        .post("/users/add-user")
        .add_header("Authorization", admin.bearer())
        .json(&new_user)
        .await;
    assert_eq!(response.status_code(), 201, "{}", response.text());
    let body: Value = response.json();
    assert_eq!(body["result"]["role"], "assistant");

    let duplicate = client
        .post("/users/add-user")
        .add_header("Authorization", admin.bearer())
        .json(&new_user)
        .await;
    assert_eq!(duplicate.status_code(), 409);
    assert_eq!(
        duplicate.json::<Value>()["message"],
        "A user with this email or phone number already exists"
    );

    let id = body["result"]["id"].as_str().unwrap();
    let fetched = client
        .get(&format!("/users/view-user/{}", id))
        .add_header("Authorization", admin.bearer())
        .await;
    assert_eq!(fetched.status_code(), 200);
}

#[tokio::test]
async fn test_assistant_cannot_add_users() {
    let app = setup_test_app().await;
    let client = app.client();
    let assistant = login_as(
        client,
        &app.pool,
        "assistant@showroom.test",
        UserRole::Assistant,
    )
    .await;

    let response = client
        .post("/users/add-user")
        .add_header("Authorization", assistant.bearer())
        .json(&json!({
            "name": "Eve",
            "email": "eve@showroom.test",
            "phone_number": "+15550199",
            "password": "longenough",
        }))
        .await;
    assert_eq!(response.status_code(), 403);
}

#[tokio::test]
async fn test_short_password_rejected() {
    let app = setup_test_app().await;
    let client = app.client();
    let admin = login_admin(client, &app.pool).await;

    let response = client
        .post("/users/add-user")
        .add_header("Authorization", admin.bearer())
        .json(&json!({
            "name": "Short",
            "email": "short@showroom.test",
            "phone_number": "+15550111",
            "password": "short",
        }))
        .await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_health_reports_database() {
    let app = setup_test_app().await;
    let response = app.client().get("/health").await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "OK");
    assert_eq!(body["database"], "healthy");
}
