use async_trait::async_trait;
use showroom_core::models::{
    StaticTestimonial, StaticTestimonialDraft, StaticTestimonialPatch, VideoTestimonial,
    VideoTestimonialDraft, VideoTestimonialPatch,
};
use showroom_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use crate::db::resource::{ResourceRepository, UpdatableRepository};

const STATIC_COLUMNS: &str = "id, client_name, designation, project_name, description, \
     project_logo, client_image, list_on_website, created_at, updated_at";

const VIDEO_COLUMNS: &str = "id, client_name, designation, project_name, live_status, \
     description, website_link, ios_link, android_link, stars, video_url, list_on_website, \
     created_at, updated_at";

/// Repository for text testimonials with optional logo and portrait
#[derive(Clone)]
pub struct StaticTestimonialRepository {
    pool: PgPool,
}

impl StaticTestimonialRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self), fields(db.table = "static_testimonials", db.operation = "select"))]
    pub async fn list(&self, listed_only: bool) -> Result<Vec<StaticTestimonial>, AppError> {
        let testimonials = sqlx::query_as::<Postgres, StaticTestimonial>(&format!(
            "SELECT {} FROM static_testimonials WHERE list_on_website OR NOT $1 ORDER BY created_at DESC",
            STATIC_COLUMNS
        ))
        .bind(listed_only)
        .fetch_all(&self.pool)
        .await?;

        Ok(testimonials)
    }

    #[tracing::instrument(skip(self), fields(db.table = "static_testimonials", db.operation = "update", db.record_id = %id))]
    pub async fn set_list_status(
        &self,
        id: Uuid,
        listed: bool,
    ) -> Result<Option<StaticTestimonial>, AppError> {
        let testimonial = sqlx::query_as::<Postgres, StaticTestimonial>(&format!(
            "UPDATE static_testimonials SET list_on_website = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            STATIC_COLUMNS
        ))
        .bind(id)
        .bind(listed)
        .fetch_optional(&self.pool)
        .await?;

        Ok(testimonial)
    }
}

#[async_trait]
impl ResourceRepository for StaticTestimonialRepository {
    type Doc = StaticTestimonial;
    type Draft = StaticTestimonialDraft;

    #[tracing::instrument(skip(self, draft), fields(db.table = "static_testimonials", db.operation = "insert"))]
    async fn insert(&self, draft: StaticTestimonialDraft) -> Result<StaticTestimonial, AppError> {
        let testimonial = sqlx::query_as::<Postgres, StaticTestimonial>(&format!(
            r#"
            INSERT INTO static_testimonials (
                client_name, designation, project_name, description, project_logo,
                client_image, list_on_website
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            STATIC_COLUMNS
        ))
        .bind(&draft.client_name)
        .bind(&draft.designation)
        .bind(&draft.project_name)
        .bind(&draft.description)
        .bind(&draft.project_logo)
        .bind(&draft.client_image)
        .bind(draft.list_on_website)
        .fetch_one(&self.pool)
        .await?;

        Ok(testimonial)
    }

    #[tracing::instrument(skip(self), fields(db.table = "static_testimonials", db.operation = "select", db.record_id = %id))]
    async fn find(&self, id: Uuid) -> Result<Option<StaticTestimonial>, AppError> {
        let testimonial = sqlx::query_as::<Postgres, StaticTestimonial>(&format!(
            "SELECT {} FROM static_testimonials WHERE id = $1",
            STATIC_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(testimonial)
    }

    #[tracing::instrument(skip(self), fields(db.table = "static_testimonials", db.operation = "delete", db.record_id = %id))]
    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM static_testimonials WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl UpdatableRepository for StaticTestimonialRepository {
    type Patch = StaticTestimonialPatch;

    #[tracing::instrument(skip(self, patch), fields(db.table = "static_testimonials", db.operation = "update", db.record_id = %id))]
    async fn update(
        &self,
        id: Uuid,
        patch: StaticTestimonialPatch,
    ) -> Result<Option<StaticTestimonial>, AppError> {
        let testimonial = sqlx::query_as::<Postgres, StaticTestimonial>(&format!(
            r#"
            UPDATE static_testimonials SET
                client_name = COALESCE($2, client_name),
                designation = COALESCE($3, designation),
                project_name = COALESCE($4, project_name),
                description = COALESCE($5, description),
                project_logo = CASE WHEN $6 THEN $7 ELSE project_logo END,
                client_image = CASE WHEN $8 THEN $9 ELSE client_image END,
                list_on_website = COALESCE($10, list_on_website),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            STATIC_COLUMNS
        ))
        .bind(id)
        .bind(&patch.client_name)
        .bind(&patch.designation)
        .bind(&patch.project_name)
        .bind(&patch.description)
        .bind(patch.project_logo.is_some())
        .bind(patch.project_logo.clone().flatten())
        .bind(patch.client_image.is_some())
        .bind(patch.client_image.clone().flatten())
        .bind(patch.list_on_website)
        .fetch_optional(&self.pool)
        .await?;

        Ok(testimonial)
    }
}

/// Repository for video testimonials
#[derive(Clone)]
pub struct VideoTestimonialRepository {
    pool: PgPool,
}

impl VideoTestimonialRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self), fields(db.table = "video_testimonials", db.operation = "select"))]
    pub async fn list(&self, listed_only: bool) -> Result<Vec<VideoTestimonial>, AppError> {
        let testimonials = sqlx::query_as::<Postgres, VideoTestimonial>(&format!(
            "SELECT {} FROM video_testimonials WHERE list_on_website OR NOT $1 ORDER BY created_at DESC",
            VIDEO_COLUMNS
        ))
        .bind(listed_only)
        .fetch_all(&self.pool)
        .await?;

        Ok(testimonials)
    }

    #[tracing::instrument(skip(self), fields(db.table = "video_testimonials", db.operation = "update", db.record_id = %id))]
    pub async fn set_list_status(
        &self,
        id: Uuid,
        listed: bool,
    ) -> Result<Option<VideoTestimonial>, AppError> {
        let testimonial = sqlx::query_as::<Postgres, VideoTestimonial>(&format!(
            "UPDATE video_testimonials SET list_on_website = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            VIDEO_COLUMNS
        ))
        .bind(id)
        .bind(listed)
        .fetch_optional(&self.pool)
        .await?;

        Ok(testimonial)
    }
}

#[async_trait]
impl ResourceRepository for VideoTestimonialRepository {
    type Doc = VideoTestimonial;
    type Draft = VideoTestimonialDraft;

    #[tracing::instrument(skip(self, draft), fields(db.table = "video_testimonials", db.operation = "insert"))]
    async fn insert(&self, draft: VideoTestimonialDraft) -> Result<VideoTestimonial, AppError> {
        let testimonial = sqlx::query_as::<Postgres, VideoTestimonial>(&format!(
            r#"
            INSERT INTO video_testimonials (
                client_name, designation, project_name, live_status, description,
                website_link, ios_link, android_link, stars, video_url, list_on_website
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {}
            "#,
            VIDEO_COLUMNS
        ))
        .bind(&draft.client_name)
        .bind(&draft.designation)
        .bind(&draft.project_name)
        .bind(draft.live_status)
        .bind(&draft.description)
        .bind(&draft.website_link)
        .bind(&draft.ios_link)
        .bind(&draft.android_link)
        .bind(draft.stars)
        .bind(&draft.video_url)
        .bind(draft.list_on_website)
        .fetch_one(&self.pool)
        .await?;

        Ok(testimonial)
    }

    #[tracing::instrument(skip(self), fields(db.table = "video_testimonials", db.operation = "select", db.record_id = %id))]
    async fn find(&self, id: Uuid) -> Result<Option<VideoTestimonial>, AppError> {
        let testimonial = sqlx::query_as::<Postgres, VideoTestimonial>(&format!(
            "SELECT {} FROM video_testimonials WHERE id = $1",
            VIDEO_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(testimonial)
    }

    #[tracing::instrument(skip(self), fields(db.table = "video_testimonials", db.operation = "delete", db.record_id = %id))]
    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM video_testimonials WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl UpdatableRepository for VideoTestimonialRepository {
    type Patch = VideoTestimonialPatch;

    #[tracing::instrument(skip(self, patch), fields(db.table = "video_testimonials", db.operation = "update", db.record_id = %id))]
    async fn update(
        &self,
        id: Uuid,
        patch: VideoTestimonialPatch,
    ) -> Result<Option<VideoTestimonial>, AppError> {
        let testimonial = sqlx::query_as::<Postgres, VideoTestimonial>(&format!(
            r#"
            UPDATE video_testimonials SET
                client_name = COALESCE($2, client_name),
                designation = COALESCE($3, designation),
                project_name = COALESCE($4, project_name),
                live_status = COALESCE($5, live_status),
                description = COALESCE($6, description),
                website_link = COALESCE($7, website_link),
                ios_link = COALESCE($8, ios_link),
                android_link = COALESCE($9, android_link),
                stars = COALESCE($10, stars),
                video_url = COALESCE($11, video_url),
                list_on_website = COALESCE($12, list_on_website),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            VIDEO_COLUMNS
        ))
        .bind(id)
        .bind(&patch.client_name)
        .bind(&patch.designation)
        .bind(&patch.project_name)
        .bind(patch.live_status)
        .bind(&patch.description)
        .bind(&patch.website_link)
        .bind(&patch.ios_link)
        .bind(&patch.android_link)
        .bind(patch.stars)
        .bind(&patch.video_url)
        .bind(patch.list_on_website)
        .fetch_optional(&self.pool)
        .await?;

        Ok(testimonial)
    }
}
