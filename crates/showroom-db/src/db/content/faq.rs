use showroom_core::models::{CreateFaqRequest, Faq, UpdateFaqRequest};
use showroom_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Repository for frequently asked questions
#[derive(Clone)]
pub struct FaqRepository {
    pool: PgPool,
}

impl FaqRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self, req), fields(db.table = "faqs", db.operation = "insert"))]
    pub async fn create(&self, req: &CreateFaqRequest) -> Result<Faq, AppError> {
        let faq = sqlx::query_as::<Postgres, Faq>(
            r#"
            INSERT INTO faqs (question, answer, list_on_website)
            VALUES ($1, $2, $3)
            RETURNING id, question, answer, list_on_website, created_at, updated_at
            "#,
        )
        .bind(req.question.trim())
        .bind(req.answer.trim())
        .bind(req.list_on_website)
        .fetch_one(&self.pool)
        .await?;

        Ok(faq)
    }

    /// All FAQs, or only the listed ones, oldest first so the site keeps a stable order
    #[tracing::instrument(skip(self), fields(db.table = "faqs", db.operation = "select"))]
    pub async fn list(&self, listed_only: bool) -> Result<Vec<Faq>, AppError> {
        let faqs = sqlx::query_as::<Postgres, Faq>(
            r#"
            SELECT id, question, answer, list_on_website, created_at, updated_at
            FROM faqs
            WHERE list_on_website OR NOT $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(listed_only)
        .fetch_all(&self.pool)
        .await?;

        Ok(faqs)
    }

    #[tracing::instrument(skip(self), fields(db.table = "faqs", db.operation = "select", db.record_id = %id))]
    pub async fn get(&self, id: Uuid) -> Result<Option<Faq>, AppError> {
        let faq = sqlx::query_as::<Postgres, Faq>(
            "SELECT id, question, answer, list_on_website, created_at, updated_at FROM faqs WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(faq)
    }

    #[tracing::instrument(skip(self, req), fields(db.table = "faqs", db.operation = "update", db.record_id = %id))]
    pub async fn update(&self, id: Uuid, req: &UpdateFaqRequest) -> Result<Option<Faq>, AppError> {
        let faq = sqlx::query_as::<Postgres, Faq>(
            r#"
            UPDATE faqs SET
                question = COALESCE($2, question),
                answer = COALESCE($3, answer),
                list_on_website = COALESCE($4, list_on_website),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, question, answer, list_on_website, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(req.question.as_deref().map(str::trim))
        .bind(req.answer.as_deref().map(str::trim))
        .bind(req.list_on_website)
        .fetch_optional(&self.pool)
        .await?;

        Ok(faq)
    }

    #[tracing::instrument(skip(self), fields(db.table = "faqs", db.operation = "delete", db.record_id = %id))]
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM faqs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
