use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use showroom_core::models::ColorRequest;
use showroom_core::AppError;
use validator::Validate;

use crate::error::{HttpAppError, ValidatedJson};
use crate::handlers::ResourceId;
use crate::response::ApiResponse;
use crate::state::AppState;

fn color_name(request: &ColorRequest) -> Result<String, AppError> {
    request.validate()?;
    let name = request.trimmed_name();
    if name.is_empty() {
        return Err(AppError::MissingFields("name".to_string()));
    }
    Ok(name)
}

pub async fn add_color(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<ColorRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let name = color_name(&request)?;
    let color = state.db.colors.create(&name).await?;
    Ok(ApiResponse::created("Color added successfully", color))
}

/// Newest first
pub async fn view_colors(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let colors = state.db.colors.list().await?;
    Ok(ApiResponse::list("Colors retrieved", colors))
}

pub async fn view_color(
    State(state): State<Arc<AppState>>,
    ResourceId(id): ResourceId,
) -> Result<impl IntoResponse, HttpAppError> {
    let color = state
        .db
        .colors
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found("Color"))?;
    Ok(ApiResponse::ok("Color retrieved", color))
}

pub async fn update_color(
    State(state): State<Arc<AppState>>,
    ResourceId(id): ResourceId,
    ValidatedJson(request): ValidatedJson<ColorRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let name = color_name(&request)?;
    let color = state
        .db
        .colors
        .rename(id, &name)
        .await?
        .ok_or_else(|| AppError::not_found("Color"))?;
    Ok(ApiResponse::ok("Color updated successfully", color))
}

pub async fn delete_color(
    State(state): State<Arc<AppState>>,
    ResourceId(id): ResourceId,
) -> Result<impl IntoResponse, HttpAppError> {
    if !state.db.colors.delete(id).await? {
        return Err(AppError::not_found("Color").into());
    }
    Ok(ApiResponse::message("Color deleted successfully"))
}
