use chrono::{DateTime, Utc};
use showroom_core::models::{NewVisit, Visit};
use showroom_core::AppError;
use sqlx::{PgPool, Postgres};

/// Repository for website visit analytics
#[derive(Clone)]
pub struct VisitRepository {
    pool: PgPool,
}

impl VisitRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record a visit unless the same visitor was already counted within the last
    /// `window_minutes`. Returns the stored row, or `None` for a duplicate.
    ///
    /// Concurrent calls for one visitor serialize on a transaction-scoped advisory
    /// lock keyed by the visitor id, so a burst still yields a single row.
    #[tracing::instrument(skip(self, visit), fields(db.table = "visits", db.operation = "insert"))]
    pub async fn record_if_new(
        &self,
        visit: &NewVisit,
        window_minutes: i64,
    ) -> Result<Option<Visit>, AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(&visit.visitor_id)
            .execute(&mut *tx)
            .await?;

        let inserted = sqlx::query_as::<Postgres, Visit>(
            r#"
            INSERT INTO visits (visitor_id, ip_address, country, user_agent)
            SELECT $1, $2, $3, $4
            WHERE NOT EXISTS (
                SELECT 1 FROM visits
                WHERE visitor_id = $1
                  AND created_at > NOW() - make_interval(mins => $5::int)
            )
            RETURNING id, visitor_id, ip_address, country, user_agent, created_at
            "#,
        )
        .bind(&visit.visitor_id)
        .bind(&visit.ip_address)
        .bind(&visit.country)
        .bind(&visit.user_agent)
        .bind(window_minutes as i32)
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(inserted)
    }

    /// Total visits and distinct visitors, optionally bounded (inclusive) by time.
    #[tracing::instrument(skip(self), fields(db.table = "visits", db.operation = "select"))]
    pub async fn stats(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<(i64, i64), AppError> {
        let row = sqlx::query_as::<Postgres, (i64, i64)>(
            r#"
            SELECT COUNT(*), COUNT(DISTINCT visitor_id)
            FROM visits
            WHERE ($1::timestamptz IS NULL OR created_at >= $1)
              AND ($2::timestamptz IS NULL OR created_at <= $2)
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }
}
