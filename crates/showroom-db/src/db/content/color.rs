use showroom_core::models::Color;
use showroom_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Repository for the color palette
#[derive(Clone)]
pub struct ColorRepository {
    pool: PgPool,
}

impl ColorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self), fields(db.table = "colors", db.operation = "insert"))]
    pub async fn create(&self, name: &str) -> Result<Color, AppError> {
        let color = sqlx::query_as::<Postgres, Color>(
            r#"
            INSERT INTO colors (name) VALUES ($1)
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(color)
    }

    /// Insert unless a color with the same name (any case) exists. Returns whether a row
    /// was added.
    #[tracing::instrument(skip(self), fields(db.table = "colors", db.operation = "insert"))]
    pub async fn insert_if_missing(&self, name: &str) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO colors (name)
            SELECT $1
            WHERE NOT EXISTS (SELECT 1 FROM colors WHERE LOWER(name) = LOWER($1))
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(name)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Newest first
    #[tracing::instrument(skip(self), fields(db.table = "colors", db.operation = "select"))]
    pub async fn list(&self) -> Result<Vec<Color>, AppError> {
        let colors = sqlx::query_as::<Postgres, Color>(
            "SELECT id, name, created_at, updated_at FROM colors ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(colors)
    }

    #[tracing::instrument(skip(self), fields(db.table = "colors", db.operation = "select", db.record_id = %id))]
    pub async fn get(&self, id: Uuid) -> Result<Option<Color>, AppError> {
        let color = sqlx::query_as::<Postgres, Color>(
            "SELECT id, name, created_at, updated_at FROM colors WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(color)
    }

    #[tracing::instrument(skip(self), fields(db.table = "colors", db.operation = "update", db.record_id = %id))]
    pub async fn rename(&self, id: Uuid, name: &str) -> Result<Option<Color>, AppError> {
        let color = sqlx::query_as::<Postgres, Color>(
            r#"
            UPDATE colors SET name = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(color)
    }

    #[tracing::instrument(skip(self), fields(db.table = "colors", db.operation = "delete", db.record_id = %id))]
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM colors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
