use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::response::IntoResponse;
use showroom_core::models::{ListStatusRequest, Project};
use showroom_core::AppError;
use showroom_db::ResourceRepository;

use crate::error::{HttpAppError, ValidatedJson};
use crate::handlers::ResourceId;
use crate::response::ApiResponse;
use crate::state::AppState;

#[tracing::instrument(skip(state, multipart))]
pub async fn add_project(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let form = state.media.read_form::<Project>(multipart).await?;
    let project = state.media.pipeline.create(&state.db.projects, form).await?;
    Ok(ApiResponse::created("Project created successfully", project))
}

pub async fn view_projects(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let projects = state.db.projects.list_summaries().await?;
    Ok(ApiResponse::list("Projects retrieved", projects))
}

pub async fn view_project(
    State(state): State<Arc<AppState>>,
    ResourceId(id): ResourceId,
) -> Result<impl IntoResponse, HttpAppError> {
    let project = state
        .db
        .projects
        .find(id)
        .await?
        .ok_or_else(|| AppError::not_found("Project"))?;
    Ok(ApiResponse::ok("Project retrieved", project))
}

/// Images follow `imagesChanged` / `existingImages[]`; logo and video follow
/// `logoChanged` and `videoChanged` the same way.
#[tracing::instrument(skip(state, multipart))]
pub async fn update_project(
    State(state): State<Arc<AppState>>,
    ResourceId(id): ResourceId,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let form = state.media.read_form::<Project>(multipart).await?;
    let project = state
        .media
        .pipeline
        .update(&state.db.projects, id, form)
        .await?;
    Ok(ApiResponse::ok("Project updated successfully", project))
}

#[tracing::instrument(skip(state))]
pub async fn delete_project(
    State(state): State<Arc<AppState>>,
    ResourceId(id): ResourceId,
) -> Result<impl IntoResponse, HttpAppError> {
    state.media.pipeline.delete(&state.db.projects, id).await?;
    Ok(ApiResponse::message("Project deleted successfully"))
}

pub async fn update_list_status(
    State(state): State<Arc<AppState>>,
    ResourceId(id): ResourceId,
    ValidatedJson(request): ValidatedJson<ListStatusRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let project = state
        .db
        .projects
        .set_list_status(id, request.list_on_website)
        .await?
        .ok_or_else(|| AppError::not_found("Project"))?;
    Ok(ApiResponse::ok("List status updated", project))
}

pub async fn public_projects(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let projects = state.db.projects.list_public().await?;
    Ok(ApiResponse::list("Public projects retrieved", projects))
}
