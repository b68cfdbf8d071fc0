use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::response::IntoResponse;
use showroom_core::models::{ListStatusRequest, VideoTestimonial};
use showroom_core::AppError;
use showroom_db::ResourceRepository;

use crate::error::{HttpAppError, ValidatedJson};
use crate::handlers::ResourceId;
use crate::response::ApiResponse;
use crate::state::AppState;

#[tracing::instrument(skip(state, multipart))]
pub async fn add_video_testimonial(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let form = state.media.read_form::<VideoTestimonial>(multipart).await?;
    let testimonial = state
        .media
        .pipeline
        .create(&state.db.video_testimonials, form)
        .await?;
    Ok(ApiResponse::created(
        "Video testimonial added successfully",
        testimonial,
    ))
}

pub async fn view_video_testimonials(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let testimonials = state.db.video_testimonials.list(false).await?;
    Ok(ApiResponse::list("Video testimonials retrieved", testimonials))
}

pub async fn view_video_testimonial(
    State(state): State<Arc<AppState>>,
    ResourceId(id): ResourceId,
) -> Result<impl IntoResponse, HttpAppError> {
    let testimonial = state
        .db
        .video_testimonials
        .find(id)
        .await?
        .ok_or_else(|| AppError::not_found("Video testimonial"))?;
    Ok(ApiResponse::ok("Video testimonial retrieved", testimonial))
}

#[tracing::instrument(skip(state, multipart))]
pub async fn update_video_testimonial(
    State(state): State<Arc<AppState>>,
    ResourceId(id): ResourceId,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let form = state.media.read_form::<VideoTestimonial>(multipart).await?;
    let testimonial = state
        .media
        .pipeline
        .update(&state.db.video_testimonials, id, form)
        .await?;
    Ok(ApiResponse::ok(
        "Video testimonial updated successfully",
        testimonial,
    ))
}

#[tracing::instrument(skip(state))]
pub async fn delete_video_testimonial(
    State(state): State<Arc<AppState>>,
    ResourceId(id): ResourceId,
) -> Result<impl IntoResponse, HttpAppError> {
    state
        .media
        .pipeline
        .delete(&state.db.video_testimonials, id)
        .await?;
    Ok(ApiResponse::message("Video testimonial deleted successfully"))
}

pub async fn update_video_testimonial_status(
    State(state): State<Arc<AppState>>,
    ResourceId(id): ResourceId,
    ValidatedJson(request): ValidatedJson<ListStatusRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let testimonial = state
        .db
        .video_testimonials
        .set_list_status(id, request.list_on_website)
        .await?
        .ok_or_else(|| AppError::not_found("Video testimonial"))?;
    Ok(ApiResponse::ok("Status updated", testimonial))
}

pub async fn listed_video_testimonials(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let testimonials = state.db.video_testimonials.list(true).await?;
    Ok(ApiResponse::list("Listed video testimonials retrieved", testimonials))
}
