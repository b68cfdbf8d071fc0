//! Database repositories for data access layer
//!
//! Repositories are organized into control/ (admin users) and content/ (everything
//! the admin panel edits or the public site submits). Media-bearing repositories
//! also implement [`ResourceRepository`] so the upload pipeline can drive them
//! generically.
//
// Admin users
pub mod control;
//
// Catalog, content and inbound repositories
pub mod content;
//
// Generic repository contract for media-bearing resources
pub mod resource;

pub use content::{
    BlogRepository, CarMakeRepository, CarRepository, ColorRepository, ContactRepository,
    FaqRepository, ProjectRepository, StaticTestimonialRepository, VideoTestimonialRepository,
    VisitRepository,
};
pub use control::UserRepository;
pub use resource::{ResourceRepository, UpdatableRepository};

use showroom_core::AppError;
use sqlx::PgPool;

/// Round-trip to the database, used by the health check.
#[tracing::instrument(skip(pool), fields(db.operation = "ping"))]
pub async fn ping(pool: &PgPool) -> Result<(), AppError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
