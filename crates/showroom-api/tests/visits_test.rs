//! Visit tracking integration tests.
//!
//! Run with: `cargo test -p showroom-api --test visits_test`

mod helpers;

use std::future::IntoFuture;

use helpers::auth::login_admin;
use helpers::setup_test_app;
use serde_json::Value;

fn visitor_cookie(response: &axum_test::TestResponse) -> Option<String> {
    response
        .headers()
        .get_all("set-cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("visitor_id="))
        .map(|v| v.split(';').next().unwrap_or_default().to_string())
}

#[tokio::test]
async fn test_same_visitor_is_counted_once_per_window() {
    let app = setup_test_app().await;
    let client = app.client();

    let first = client
        .post("/visit/track-visit")
        .add_header("X-Forwarded-For", "203.0.113.9")
        .add_header("User-Agent", "integration-test")
        .await;
    assert_eq!(first.status_code(), 200);
    let cookie = visitor_cookie(&first).expect("visitor cookie should be set");
    assert!(first
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .contains("HttpOnly"));

    let second = client
        .post("/visit/track-visit")
        .add_header("Cookie", cookie.clone())
        .await;
    assert_eq!(second.status_code(), 200);
    assert!(visitor_cookie(&second).is_none());

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM visits")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(count, 1);

    let (ip, country): (String, String) =
        sqlx::query_as("SELECT ip_address, country FROM visits LIMIT 1")
            .fetch_one(&app.pool)
            .await
            .unwrap();
    assert_eq!(ip, "203.0.113.9");
    assert_eq!(country, "Unknown");
}

/// Seed one visit for `visitor`, `minutes_ago` in the past, then track it again.
async fn revisit_after(minutes_ago: i32, visitor: &str) -> i64 {
    let app = setup_test_app().await;
    sqlx::query(
        "INSERT INTO visits (visitor_id, ip_address, country, user_agent, created_at)
         VALUES ($1, '127.0.0.1', 'Unknown', '', NOW() - make_interval(mins => $2))",
    )
    .bind(visitor)
    .bind(minutes_ago)
    .execute(&app.pool)
    .await
    .unwrap();

    let response = app
        .client()
        .post("/visit/track-visit")
        .add_header("Cookie", format!("visitor_id={}", visitor))
        .await;
    assert_eq!(response.status_code(), 200);

    sqlx::query_scalar("SELECT COUNT(*) FROM visits WHERE visitor_id = $1")
        .bind(visitor)
        .fetch_one(&app.pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_visit_after_window_is_counted_again() {
    assert_eq!(revisit_after(61, "returning-visitor").await, 2);
}

#[tokio::test]
async fn test_visit_inside_window_is_not_counted_again() {
    assert_eq!(revisit_after(59, "recent-visitor").await, 1);
}

#[tokio::test]
async fn test_concurrent_first_visits_record_one_row() {
    let app = setup_test_app().await;
    let client = app.client();

    let track = || {
        client
            .post("/visit/track-visit")
            .add_header("Cookie", "visitor_id=burst-visitor")
            .into_future()
    };
    let (a, b, c, d) = tokio::join!(track(), track(), track(), track());
    for response in [a, b, c, d] {
        assert_eq!(response.status_code(), 200);
    }

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM visits WHERE visitor_id = $1")
        .bind("burst-visitor")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_stats_counts_visits_and_unique_visitors() {
    let app = setup_test_app().await;
    let client = app.client();
    let admin = login_admin(client, &app.pool).await;

    for visitor in ["a", "b", "a"] {
        client
            .post("/visit/track-visit")
            .add_header("Cookie", format!("visitor_id={}", visitor))
            .await;
    }
    // Older visit from "a", outside the dedup window
    sqlx::query(
        "INSERT INTO visits (visitor_id, ip_address, country, user_agent, created_at)
         VALUES ('a', '127.0.0.1', 'Unknown', '', NOW() - INTERVAL '2 days')",
    )
    .execute(&app.pool)
    .await
    .unwrap();

    let all: Value = client
        .get("/visit/stats")
        .add_header("Authorization", admin.bearer())
        .await
        .json();
    assert_eq!(all["result"]["totalVisits"], 3);
    assert_eq!(all["result"]["uniqueVisitors"], 2);
    assert_eq!(all["result"]["startDate"], "all time");
    assert_eq!(all["result"]["endDate"], "all time");

    let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
    let recent: Value = client
        .get(&format!("/visit/stats?startDate={}", today))
        .add_header("Authorization", admin.bearer())
        .await
        .json();
    assert_eq!(recent["result"]["totalVisits"], 2);
    assert_eq!(recent["result"]["startDate"], today.as_str());
}

#[tokio::test]
async fn test_stats_rejects_malformed_dates() {
    let app = setup_test_app().await;
    let client = app.client();
    let admin = login_admin(client, &app.pool).await;

    let response = client
        .get("/visit/stats?startDate=last-week")
        .add_header("Authorization", admin.bearer())
        .await;
    assert_eq!(response.status_code(), 400);
}
