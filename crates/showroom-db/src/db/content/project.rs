use async_trait::async_trait;
use showroom_core::models::{Project, ProjectDraft, ProjectPatch, ProjectSummary};
use showroom_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use crate::db::resource::{ResourceRepository, UpdatableRepository};

const PROJECT_COLUMNS: &str = "id, title, main_category, client, duration, downloads, images, \
     video, logo, categories, description, list_on_website, created_at, updated_at";

/// Repository for portfolio projects
#[derive(Clone)]
pub struct ProjectRepository {
    pool: PgPool,
}

impl ProjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self), fields(db.table = "projects", db.operation = "select"))]
    pub async fn list_summaries(&self) -> Result<Vec<ProjectSummary>, AppError> {
        let projects = sqlx::query_as::<Postgres, ProjectSummary>(
            r#"
            SELECT id, title, main_category, logo, video, categories, description
            FROM projects
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }

    #[tracing::instrument(skip(self), fields(db.table = "projects", db.operation = "select"))]
    pub async fn list_public(&self) -> Result<Vec<Project>, AppError> {
        let projects = sqlx::query_as::<Postgres, Project>(&format!(
            "SELECT {} FROM projects WHERE list_on_website ORDER BY created_at DESC",
            PROJECT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }

    #[tracing::instrument(skip(self), fields(db.table = "projects", db.operation = "update", db.record_id = %id))]
    pub async fn set_list_status(&self, id: Uuid, listed: bool) -> Result<Option<Project>, AppError> {
        let project = sqlx::query_as::<Postgres, Project>(&format!(
            "UPDATE projects SET list_on_website = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            PROJECT_COLUMNS
        ))
        .bind(id)
        .bind(listed)
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }
}

#[async_trait]
impl ResourceRepository for ProjectRepository {
    type Doc = Project;
    type Draft = ProjectDraft;

    #[tracing::instrument(skip(self, draft), fields(db.table = "projects", db.operation = "insert"))]
    async fn insert(&self, draft: ProjectDraft) -> Result<Project, AppError> {
        let project = sqlx::query_as::<Postgres, Project>(&format!(
            r#"
            INSERT INTO projects (
                title, main_category, client, duration, downloads, images, video, logo,
                categories, description, list_on_website
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {}
            "#,
            PROJECT_COLUMNS
        ))
        .bind(&draft.title)
        .bind(&draft.main_category)
        .bind(&draft.client)
        .bind(&draft.duration)
        .bind(&draft.downloads)
        .bind(&draft.images)
        .bind(&draft.video)
        .bind(&draft.logo)
        .bind(&draft.categories)
        .bind(&draft.description)
        .bind(draft.list_on_website)
        .fetch_one(&self.pool)
        .await?;

        Ok(project)
    }

    #[tracing::instrument(skip(self), fields(db.table = "projects", db.operation = "select", db.record_id = %id))]
    async fn find(&self, id: Uuid) -> Result<Option<Project>, AppError> {
        let project = sqlx::query_as::<Postgres, Project>(&format!(
            "SELECT {} FROM projects WHERE id = $1",
            PROJECT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }

    #[tracing::instrument(skip(self), fields(db.table = "projects", db.operation = "delete", db.record_id = %id))]
    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl UpdatableRepository for ProjectRepository {
    type Patch = ProjectPatch;

    #[tracing::instrument(skip(self, patch), fields(db.table = "projects", db.operation = "update", db.record_id = %id))]
    async fn update(&self, id: Uuid, patch: ProjectPatch) -> Result<Option<Project>, AppError> {
        // Nullable media columns: $n flags whether the slot changed, $n+1 the new value.
        let project = sqlx::query_as::<Postgres, Project>(&format!(
            r#"
            UPDATE projects SET
                title = COALESCE($2, title),
                main_category = COALESCE($3, main_category),
                client = COALESCE($4, client),
                duration = COALESCE($5, duration),
                downloads = COALESCE($6, downloads),
                images = COALESCE($7, images),
                video = CASE WHEN $8 THEN $9 ELSE video END,
                logo = CASE WHEN $10 THEN $11 ELSE logo END,
                categories = COALESCE($12, categories),
                description = COALESCE($13, description),
                list_on_website = COALESCE($14, list_on_website),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            PROJECT_COLUMNS
        ))
        .bind(id)
        .bind(&patch.title)
        .bind(&patch.main_category)
        .bind(&patch.client)
        .bind(&patch.duration)
        .bind(&patch.downloads)
        .bind(&patch.images)
        .bind(patch.video.is_some())
        .bind(patch.video.clone().flatten())
        .bind(patch.logo.is_some())
        .bind(patch.logo.clone().flatten())
        .bind(&patch.categories)
        .bind(&patch.description)
        .bind(patch.list_on_website)
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }
}
