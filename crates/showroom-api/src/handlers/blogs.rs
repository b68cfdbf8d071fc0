//! Blog posts
//!
//! Block media arrives as `blockMedia_{index}` file fields next to the
//! `contentBlocks` JSON array; the pipeline matches them by index.

use std::sync::Arc;

use axum::extract::{Multipart, Query, State};
use axum::response::IntoResponse;
use serde::Serialize;
use showroom_core::models::{Blog, ListStatusRequest, PageQuery};
use showroom_core::AppError;
use showroom_db::ResourceRepository;

use crate::error::{HttpAppError, ValidatedJson};
use crate::handlers::ResourceId;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ListedBlogs {
    pub blogs: Vec<Blog>,
    pub total: i64,
    pub skip: i64,
    pub limit: i64,
}

#[tracing::instrument(skip(state, multipart))]
pub async fn add_blog(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let form = state.media.read_form::<Blog>(multipart).await?;
    let blog = state.media.pipeline.create(&state.db.blogs, form).await?;
    Ok(ApiResponse::created("Blog created successfully", blog))
}

pub async fn view_blogs(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let blogs = state.db.blogs.list().await?;
    Ok(ApiResponse::list("Blogs retrieved", blogs))
}

pub async fn view_blog(
    State(state): State<Arc<AppState>>,
    ResourceId(id): ResourceId,
) -> Result<impl IntoResponse, HttpAppError> {
    let blog = state
        .db
        .blogs
        .find(id)
        .await?
        .ok_or_else(|| AppError::not_found("Blog"))?;
    Ok(ApiResponse::ok("Blog retrieved", blog))
}

#[tracing::instrument(skip(state, multipart))]
pub async fn update_blog(
    State(state): State<Arc<AppState>>,
    ResourceId(id): ResourceId,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let form = state.media.read_form::<Blog>(multipart).await?;
    let blog = state.media.pipeline.update(&state.db.blogs, id, form).await?;
    Ok(ApiResponse::ok("Blog updated successfully", blog))
}

#[tracing::instrument(skip(state))]
pub async fn delete_blog(
    State(state): State<Arc<AppState>>,
    ResourceId(id): ResourceId,
) -> Result<impl IntoResponse, HttpAppError> {
    state.media.pipeline.delete(&state.db.blogs, id).await?;
    Ok(ApiResponse::message("Blog deleted successfully"))
}

pub async fn update_blog_list_status(
    State(state): State<Arc<AppState>>,
    ResourceId(id): ResourceId,
    ValidatedJson(request): ValidatedJson<ListStatusRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let blog = state
        .db
        .blogs
        .set_list_status(id, request.list_on_website)
        .await?
        .ok_or_else(|| AppError::not_found("Blog"))?;
    Ok(ApiResponse::ok("Status updated", blog))
}

/// Listed posts, newest first, paginated with `skip` / `limit`.
pub async fn listed_blogs(
    State(state): State<Arc<AppState>>,
    Query(page): Query<PageQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let (skip, limit) = (page.offset(), page.limit());
    let blogs = state.db.blogs.list_public(skip, limit).await?;
    let total = state.db.blogs.count_public().await?;

    Ok(ApiResponse::ok(
        "Listed blogs retrieved",
        ListedBlogs {
            blogs,
            total,
            skip,
            limit,
        },
    ))
}
