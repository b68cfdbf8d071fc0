use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use showroom_core::models::{CreateFaqRequest, UpdateFaqRequest};
use showroom_core::AppError;
use validator::Validate;

use crate::error::{HttpAppError, ValidatedJson};
use crate::handlers::ResourceId;
use crate::response::ApiResponse;
use crate::state::AppState;

pub async fn add_faq(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateFaqRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate().map_err(AppError::from)?;
    let faq = state.db.faqs.create(&request).await?;
    Ok(ApiResponse::created("FAQ added successfully", faq))
}

pub async fn view_faqs(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let faqs = state.db.faqs.list(false).await?;
    Ok(ApiResponse::list("FAQs retrieved", faqs))
}

pub async fn view_faq(
    State(state): State<Arc<AppState>>,
    ResourceId(id): ResourceId,
) -> Result<impl IntoResponse, HttpAppError> {
    let faq = state
        .db
        .faqs
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found("FAQ"))?;
    Ok(ApiResponse::ok("FAQ retrieved", faq))
}

pub async fn update_faq(
    State(state): State<Arc<AppState>>,
    ResourceId(id): ResourceId,
    ValidatedJson(request): ValidatedJson<UpdateFaqRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate().map_err(AppError::from)?;
    let faq = state
        .db
        .faqs
        .update(id, &request)
        .await?
        .ok_or_else(|| AppError::not_found("FAQ"))?;
    Ok(ApiResponse::ok("FAQ updated successfully", faq))
}

pub async fn delete_faq(
    State(state): State<Arc<AppState>>,
    ResourceId(id): ResourceId,
) -> Result<impl IntoResponse, HttpAppError> {
    if !state.db.faqs.delete(id).await? {
        return Err(AppError::not_found("FAQ").into());
    }
    Ok(ApiResponse::message("FAQ deleted successfully"))
}

pub async fn listed_faqs(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let faqs = state.db.faqs.list(true).await?;
    Ok(ApiResponse::list("Listed FAQs retrieved", faqs))
}
