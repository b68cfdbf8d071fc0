//! Admin accounts for authenticated requests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use axum_test::TestServer;
use serde_json::json;
use showroom_api::auth::password::hash_password;
use showroom_core::models::UserRole;
use showroom_db::UserRepository;

pub const TEST_PASSWORD: &str = "correct-horse-battery";

static NEXT_PHONE: AtomicUsize = AtomicUsize::new(1);

pub struct TestUser {
    pub email: String,
    pub token: String,
}

impl TestUser {
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// Insert a user directly and log in through the API.
pub async fn login_as(
    server: &TestServer,
    pool: &sqlx::PgPool,
    email: &str,
    role: UserRole,
) -> TestUser {
    let hash = hash_password(TEST_PASSWORD).expect("Failed to hash password");
    let phone = format!("+1555{:04}", NEXT_PHONE.fetch_add(1, Ordering::SeqCst));
    UserRepository::new(pool.clone())
        .create("Test User", email, &phone, &hash, role)
        .await
        .expect("Failed to create test user");

    let response = server
        .post("/auth/login")
        .json(&json!({ "email": email, "password": TEST_PASSWORD }))
        .await;
    assert_eq!(response.status_code(), 200, "login failed: {}", response.text());

    let body: serde_json::Value = response.json();
    let token = body["result"]["token"]
        .as_str()
        .expect("Expected token in login response")
        .to_string();

    TestUser {
        email: email.to_string(),
        token,
    }
}

pub async fn login_admin(server: &TestServer, pool: &sqlx::PgPool) -> TestUser {
    login_as(server, pool, "admin@showroom.test", UserRole::Admin).await
}
