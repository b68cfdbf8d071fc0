//! Car makes and the models offered under each make

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use showroom_core::models::{
    normalize_models, CarModelsResponse, CreateCarMakeRequest, UpdateCarMakeRequest,
};
use showroom_core::AppError;
use validator::Validate;

use crate::error::{HttpAppError, ValidatedJson};
use crate::handlers::ResourceId;
use crate::response::ApiResponse;
use crate::state::AppState;

fn trimmed_name(name: &str) -> Result<String, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::MissingFields("name".to_string()));
    }
    Ok(name.to_string())
}

#[tracing::instrument(skip(state, request))]
pub async fn add_car_config(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateCarMakeRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate().map_err(AppError::from)?;
    let name = trimmed_name(&request.name)?;
    let models = normalize_models(request.models);

    let make = state.db.car_makes.create(&name, &models).await?;
    tracing::info!(make = %make.name, models = make.models.len(), "Car make created");
    Ok(ApiResponse::created("Car configuration added", make))
}

pub async fn view_car_configs(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let makes = state.db.car_makes.list().await?;
    Ok(ApiResponse::list("Car configurations retrieved", makes))
}

pub async fn view_car_config(
    State(state): State<Arc<AppState>>,
    ResourceId(id): ResourceId,
) -> Result<impl IntoResponse, HttpAppError> {
    let make = state
        .db
        .car_makes
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found("Car make"))?;
    Ok(ApiResponse::ok("Car configuration retrieved", make))
}

#[tracing::instrument(skip(state, request))]
pub async fn update_car_config(
    State(state): State<Arc<AppState>>,
    ResourceId(id): ResourceId,
    ValidatedJson(request): ValidatedJson<UpdateCarMakeRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate().map_err(AppError::from)?;
    let name = request.name.as_deref().map(trimmed_name).transpose()?;
    let models = request.models.map(normalize_models);

    let make = state
        .db
        .car_makes
        .update(id, name.as_deref(), models.as_deref())
        .await?
        .ok_or_else(|| AppError::not_found("Car make"))?;
    Ok(ApiResponse::ok("Car configuration updated", make))
}

#[tracing::instrument(skip(state))]
pub async fn delete_car_config(
    State(state): State<Arc<AppState>>,
    ResourceId(id): ResourceId,
) -> Result<impl IntoResponse, HttpAppError> {
    if !state.db.car_makes.delete(id).await? {
        return Err(AppError::not_found("Car make").into());
    }
    Ok(ApiResponse::message("Car configuration deleted"))
}

/// Make names for dropdowns
pub async fn get_makes(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let makes = state.db.car_makes.list_names().await?;
    Ok(ApiResponse::list("Car makes retrieved", makes))
}

/// Models of a make, looked up case-insensitively by name
pub async fn get_models(
    State(state): State<Arc<AppState>>,
    Path(make_name): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let make = state
        .db
        .car_makes
        .find_by_name(make_name.trim())
        .await?
        .ok_or_else(|| AppError::not_found("Car make"))?;

    Ok(ApiResponse::ok(
        "Car models retrieved",
        CarModelsResponse {
            make_name: make.name,
            models: make.models,
        },
    ))
}
