//! Project API integration tests: media replacement on update.
//!
//! Run with: `cargo test -p showroom-api --test projects_test`

mod helpers;

use helpers::auth::{login_admin, TestUser};
use helpers::fixtures::{png_part, project_form};
use helpers::{setup_test_app, TestApp};
use serde_json::{json, Value};

async fn create_project(app: &TestApp, admin: &TestUser) -> Value {
    let response = app
        .client()
        .post("/projects/add-project")
        .add_header("Authorization", admin.bearer())
        .multipart(
            project_form()
                .add_part("images", png_part("one.png"))
                .add_part("images", png_part("two.png"))
                .add_part("logo", png_part("logo.png")),
        )
        .await;
    assert_eq!(response.status_code(), 201, "{}", response.text());
    response.json::<Value>()["result"].clone()
}

#[tokio::test]
async fn test_update_without_image_flag_keeps_images() {
    let app = setup_test_app().await;
    let admin = login_admin(app.client(), &app.pool).await;
    let project = create_project(&app, &admin).await;
    let id = project["id"].as_str().unwrap();

    let form = axum_test::multipart::MultipartForm::new()
        .add_text("title", "Renamed")
        .add_text("imagesChanged", "false");
    let response = app
        .client()
        .put(&format!("/projects/update-project/{}", id))
        .add_header("Authorization", admin.bearer())
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), 200, "{}", response.text());
    let updated = &response.json::<Value>()["result"];
    assert_eq!(updated["title"], "Renamed");
    assert_eq!(updated["images"], project["images"]);
    assert_eq!(updated["logo"], project["logo"]);
    assert_eq!(app.host.upload_count(), 3);
    assert!(app.host.destroyed().is_empty());
}

#[tokio::test]
async fn test_update_with_kept_images_removes_the_rest() {
    let app = setup_test_app().await;
    let admin = login_admin(app.client(), &app.pool).await;
    let project = create_project(&app, &admin).await;
    let id = project["id"].as_str().unwrap();
    let images: Vec<String> = project["images"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();

    let form = axum_test::multipart::MultipartForm::new()
        .add_text("imagesChanged", "true")
        .add_text("existingImages", &images[0])
        .add_part("images", png_part("three.png"));
    let response = app
        .client()
        .put(&format!("/projects/update-project/{}", id))
        .add_header("Authorization", admin.bearer())
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), 200, "{}", response.text());
    let updated = &response.json::<Value>()["result"];
    let updated_images = updated["images"].as_array().unwrap();
    assert_eq!(updated_images.len(), 2);
    assert_eq!(updated_images[0], images[0].as_str());

    // Only the dropped image is removed remotely.
    let destroyed = app.wait_for_destroyed(1).await;
    assert_eq!(destroyed.len(), 1);
    assert!(images[1].contains(&destroyed[0]));
}

#[tokio::test]
async fn test_clearing_all_images_is_rejected() {
    let app = setup_test_app().await;
    let admin = login_admin(app.client(), &app.pool).await;
    let project = create_project(&app, &admin).await;
    let id = project["id"].as_str().unwrap();

    let form = axum_test::multipart::MultipartForm::new().add_text("imagesChanged", "true");
    let response = app
        .client()
        .put(&format!("/projects/update-project/{}", id))
        .add_header("Authorization", admin.bearer())
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), 400);
    assert!(app.host.destroyed().is_empty());
}

#[tokio::test]
async fn test_list_status_controls_public_listing() {
    let app = setup_test_app().await;
    let admin = login_admin(app.client(), &app.pool).await;
    let project = create_project(&app, &admin).await;
    let id = project["id"].as_str().unwrap();

    let public: Value = app.client().get("/projects/public-projects").await.json();
    assert_eq!(public["resultCount"], 1);

    let response = app
        .client()
        .put(&format!("/projects/update-list-status/{}", id))
        .add_header("Authorization", admin.bearer())
        .json(&json!({ "listOnWebsite": false }))
        .await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.json::<Value>()["result"]["listOnWebsite"], false);

    let public: Value = app.client().get("/projects/public-projects").await.json();
    assert_eq!(public["resultCount"], 0);
}

#[tokio::test]
async fn test_delete_project_removes_all_media() {
    let app = setup_test_app().await;
    let admin = login_admin(app.client(), &app.pool).await;
    let project = create_project(&app, &admin).await;
    let id = project["id"].as_str().unwrap();

    let response = app
        .client()
        .delete(&format!("/projects/delete-project/{}", id))
        .add_header("Authorization", admin.bearer())
        .await;
    assert_eq!(response.status_code(), 200);

    let destroyed = app.wait_for_destroyed(3).await;
    assert_eq!(destroyed.len(), 3);
}

#[tokio::test]
async fn test_unflagged_image_files_are_ignored() {
    let app = setup_test_app().await;
    let admin = login_admin(app.client(), &app.pool).await;
    let project = create_project(&app, &admin).await;
    let id = project["id"].as_str().unwrap();

    let form = axum_test::multipart::MultipartForm::new()
        .add_text("title", "Renamed")
        .add_part("images", png_part("three.png"));
    let response = app
        .client()
        .put(&format!("/projects/update-project/{}", id))
        .add_header("Authorization", admin.bearer())
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), 200, "{}", response.text());
    let updated = &response.json::<Value>()["result"];
    assert_eq!(updated["title"], "Renamed");
    assert_eq!(updated["images"], project["images"]);
    // The unflagged file never reaches the host.
    assert_eq!(app.host.upload_count(), 3);
    assert!(app.host.destroyed().is_empty());
    app.wait_for_empty_staging().await;
}

#[tokio::test]
async fn test_new_logo_replaces_old_and_removes_it_remotely() {
    let app = setup_test_app().await;
    let admin = login_admin(app.client(), &app.pool).await;
    let project = create_project(&app, &admin).await;
    let id = project["id"].as_str().unwrap();
    let old_logo = project["logo"].as_str().unwrap().to_string();

    let form = axum_test::multipart::MultipartForm::new()
        .add_part("logo", png_part("new-logo.png"));
    let response = app
        .client()
        .put(&format!("/projects/update-project/{}", id))
        .add_header("Authorization", admin.bearer())
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), 200, "{}", response.text());
    let updated = &response.json::<Value>()["result"];
    let new_logo = updated["logo"].as_str().unwrap();
    assert_ne!(new_logo, old_logo);
    assert!(new_logo.starts_with("https://media.test/demo/image/upload/"));
    assert_eq!(updated["images"], project["images"]);

    let destroyed = app.wait_for_destroyed(1).await;
    assert_eq!(destroyed.len(), 1);
    assert!(old_logo.contains(&destroyed[0]));
}

#[tokio::test]
async fn test_image_limit_is_checked_before_uploading() {
    let app = setup_test_app().await;
    let admin = login_admin(app.client(), &app.pool).await;
    let project = create_project(&app, &admin).await;
    let id = project["id"].as_str().unwrap();
    let images: Vec<String> = project["images"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();

    // Two kept plus nine new is one over the limit of ten.
    let mut form = axum_test::multipart::MultipartForm::new()
        .add_text("imagesChanged", "true")
        .add_text("existingImages", &images[0])
        .add_text("existingImages", &images[1]);
    for i in 0..9 {
        form = form.add_part("images", png_part(&format!("extra{}.png", i)));
    }
    let response = app
        .client()
        .put(&format!("/projects/update-project/{}", id))
        .add_header("Authorization", admin.bearer())
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), 400, "{}", response.text());
    assert_eq!(app.host.upload_count(), 3);
    assert!(app.host.destroyed().is_empty());
    app.wait_for_empty_staging().await;
}
