use async_trait::async_trait;
use showroom_core::{AppError, Document, Draft, Patch};
use uuid::Uuid;

/// Storage operations the upload pipeline needs to create, load and remove a
/// media-bearing resource.
///
/// `delete` reports a missing row as `false` rather than an error so the caller
/// decides how to phrase the 404.
#[async_trait]
pub trait ResourceRepository: Clone + Send + Sync + 'static {
    type Doc: Document;
    type Draft: Draft;

    async fn insert(&self, draft: Self::Draft) -> Result<Self::Doc, AppError>;

    async fn find(&self, id: Uuid) -> Result<Option<Self::Doc>, AppError>;

    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

/// Resources that can also be patched in place.
#[async_trait]
pub trait UpdatableRepository: ResourceRepository {
    type Patch: Patch<Self::Doc>;

    /// Apply `patch`; `None` when the row is gone.
    async fn update(&self, id: Uuid, patch: Self::Patch) -> Result<Option<Self::Doc>, AppError>;
}
