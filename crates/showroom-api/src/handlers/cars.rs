use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::response::IntoResponse;
use serde_json::json;
use showroom_core::models::Car;
use showroom_core::AppError;
use showroom_db::ResourceRepository;

use crate::error::HttpAppError;
use crate::handlers::ResourceId;
use crate::response::ApiResponse;
use crate::state::AppState;

#[tracing::instrument(skip(state, multipart))]
pub async fn add_car(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let form = state.media.read_car_form::<Car>(multipart).await?;
    let car = state.media.pipeline.create(&state.db.cars, form).await?;
    Ok(ApiResponse::created("Car added successfully", car))
}

pub async fn view_cars(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let cars = state.db.cars.list_summaries().await?;
    Ok(ApiResponse::list("Cars successfully retrieved", cars))
}

pub async fn view_car(
    State(state): State<Arc<AppState>>,
    ResourceId(id): ResourceId,
) -> Result<impl IntoResponse, HttpAppError> {
    let car = state
        .db
        .cars
        .find(id)
        .await?
        .ok_or_else(|| AppError::not_found("Car"))?;
    Ok(ApiResponse::ok("Car successfully retrieved", car))
}

/// Partial update. Images are only touched when `imagesChanged` is set or new files arrive.
#[tracing::instrument(skip(state, multipart))]
pub async fn update_car(
    State(state): State<Arc<AppState>>,
    ResourceId(id): ResourceId,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let form = state.media.read_car_form::<Car>(multipart).await?;
    let car = state.media.pipeline.update(&state.db.cars, id, form).await?;
    Ok(ApiResponse::ok("Car successfully updated", car))
}

#[tracing::instrument(skip(state))]
pub async fn delete_car(
    State(state): State<Arc<AppState>>,
    ResourceId(id): ResourceId,
) -> Result<impl IntoResponse, HttpAppError> {
    state.media.pipeline.delete(&state.db.cars, id).await?;
    Ok(ApiResponse::message(
        "Car and associated images successfully deleted",
    ))
}

pub async fn public_cars(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let cars = state.db.cars.list_public().await?;
    Ok(ApiResponse::list("Listed cars retrieved", cars))
}

/// Count a click on a listed car.
pub async fn record_click(
    State(state): State<Arc<AppState>>,
    ResourceId(id): ResourceId,
) -> Result<impl IntoResponse, HttpAppError> {
    let clicks = state
        .db
        .cars
        .record_click(id)
        .await?
        .ok_or_else(|| AppError::not_found("Car"))?;
    Ok(ApiResponse::ok("Click recorded", json!({ "clicks": clicks })))
}
