use async_trait::async_trait;
use showroom_core::models::{Blog, BlogDraft, BlogPatch};
use showroom_core::AppError;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use crate::db::resource::{ResourceRepository, UpdatableRepository};

const BLOG_COLUMNS: &str = "id, writer_name, blog_title, categories, blog_content, \
     content_blocks, list_on_website, blog_image_url, created_at, updated_at";

/// Repository for blog posts. Content blocks are stored as a JSONB array.
#[derive(Clone)]
pub struct BlogRepository {
    pool: PgPool,
}

impl BlogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self), fields(db.table = "blogs", db.operation = "select"))]
    pub async fn list(&self) -> Result<Vec<Blog>, AppError> {
        let blogs = sqlx::query_as::<Postgres, Blog>(&format!(
            "SELECT {} FROM blogs ORDER BY created_at DESC",
            BLOG_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(blogs)
    }

    /// One page of listed blogs, newest first
    #[tracing::instrument(skip(self), fields(db.table = "blogs", db.operation = "select"))]
    pub async fn list_public(&self, offset: i64, limit: i64) -> Result<Vec<Blog>, AppError> {
        let blogs = sqlx::query_as::<Postgres, Blog>(&format!(
            r#"
            SELECT {} FROM blogs
            WHERE list_on_website
            ORDER BY created_at DESC
            OFFSET $1 LIMIT $2
            "#,
            BLOG_COLUMNS
        ))
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(blogs)
    }

    #[tracing::instrument(skip(self), fields(db.table = "blogs", db.operation = "select"))]
    pub async fn count_public(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<Postgres, i64>(
            "SELECT COUNT(*) FROM blogs WHERE list_on_website",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    #[tracing::instrument(skip(self), fields(db.table = "blogs", db.operation = "update", db.record_id = %id))]
    pub async fn set_list_status(&self, id: Uuid, listed: bool) -> Result<Option<Blog>, AppError> {
        let blog = sqlx::query_as::<Postgres, Blog>(&format!(
            "UPDATE blogs SET list_on_website = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            BLOG_COLUMNS
        ))
        .bind(id)
        .bind(listed)
        .fetch_optional(&self.pool)
        .await?;

        Ok(blog)
    }
}

#[async_trait]
impl ResourceRepository for BlogRepository {
    type Doc = Blog;
    type Draft = BlogDraft;

    #[tracing::instrument(skip(self, draft), fields(db.table = "blogs", db.operation = "insert"))]
    async fn insert(&self, draft: BlogDraft) -> Result<Blog, AppError> {
        let blog = sqlx::query_as::<Postgres, Blog>(&format!(
            r#"
            INSERT INTO blogs (
                writer_name, blog_title, categories, blog_content, content_blocks,
                list_on_website, blog_image_url
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            BLOG_COLUMNS
        ))
        .bind(&draft.writer_name)
        .bind(&draft.blog_title)
        .bind(&draft.categories)
        .bind(&draft.blog_content)
        .bind(Json(&draft.content_blocks))
        .bind(draft.list_on_website)
        .bind(&draft.blog_image_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(blog)
    }

    #[tracing::instrument(skip(self), fields(db.table = "blogs", db.operation = "select", db.record_id = %id))]
    async fn find(&self, id: Uuid) -> Result<Option<Blog>, AppError> {
        let blog = sqlx::query_as::<Postgres, Blog>(&format!(
            "SELECT {} FROM blogs WHERE id = $1",
            BLOG_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(blog)
    }

    #[tracing::instrument(skip(self), fields(db.table = "blogs", db.operation = "delete", db.record_id = %id))]
    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM blogs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl UpdatableRepository for BlogRepository {
    type Patch = BlogPatch;

    #[tracing::instrument(skip(self, patch), fields(db.table = "blogs", db.operation = "update", db.record_id = %id))]
    async fn update(&self, id: Uuid, patch: BlogPatch) -> Result<Option<Blog>, AppError> {
        let blog = sqlx::query_as::<Postgres, Blog>(&format!(
            r#"
            UPDATE blogs SET
                writer_name = COALESCE($2, writer_name),
                blog_title = COALESCE($3, blog_title),
                categories = COALESCE($4, categories),
                blog_content = COALESCE($5, blog_content),
                content_blocks = COALESCE($6, content_blocks),
                list_on_website = COALESCE($7, list_on_website),
                blog_image_url = CASE WHEN $8 THEN $9 ELSE blog_image_url END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            BLOG_COLUMNS
        ))
        .bind(id)
        .bind(&patch.writer_name)
        .bind(&patch.blog_title)
        .bind(&patch.categories)
        .bind(&patch.blog_content)
        .bind(patch.content_blocks.as_ref().map(Json))
        .bind(patch.list_on_website)
        .bind(patch.blog_image_url.is_some())
        .bind(patch.blog_image_url.clone().flatten())
        .fetch_optional(&self.pool)
        .await?;

        Ok(blog)
    }
}
