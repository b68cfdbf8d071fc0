//! HTTP handlers, one module per resource group.

pub mod auth;
pub mod blogs;
pub mod car_config;
pub mod cars;
pub mod colors;
pub mod contacts;
pub mod faqs;
pub mod projects;
pub mod static_testimonials;
pub mod users;
pub mod video_testimonials;
pub mod visits;

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use showroom_core::AppError;
use uuid::Uuid;

use crate::error::HttpAppError;

/// `{id}` path segment parsed as a UUID, answering malformed ids with a 400 envelope.
#[derive(Debug, Clone, Copy)]
pub struct ResourceId(pub Uuid);

impl<S> FromRequestParts<S> for ResourceId
where
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::InvalidInput(e.body_text()))?;
        Uuid::parse_str(raw.trim())
            .map(ResourceId)
            .map_err(|_| HttpAppError(AppError::InvalidInput(format!("Invalid id: {}", raw))))
    }
}
