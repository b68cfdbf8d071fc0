use showroom_core::models::{CarMake, CarMakeName};
use showroom_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Repository for car makes and their model lists
#[derive(Clone)]
pub struct CarMakeRepository {
    pool: PgPool,
}

impl CarMakeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self), fields(db.table = "car_makes", db.operation = "insert"))]
    pub async fn create(&self, name: &str, models: &[String]) -> Result<CarMake, AppError> {
        let make = sqlx::query_as::<Postgres, CarMake>(
            r#"
            INSERT INTO car_makes (name, models)
            VALUES ($1, $2)
            RETURNING id, name, models, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(models)
        .fetch_one(&self.pool)
        .await?;

        Ok(make)
    }

    #[tracing::instrument(skip(self), fields(db.table = "car_makes", db.operation = "select"))]
    pub async fn list(&self) -> Result<Vec<CarMake>, AppError> {
        let makes = sqlx::query_as::<Postgres, CarMake>(
            "SELECT id, name, models, created_at, updated_at FROM car_makes ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(makes)
    }

    #[tracing::instrument(skip(self), fields(db.table = "car_makes", db.operation = "select", db.record_id = %id))]
    pub async fn get(&self, id: Uuid) -> Result<Option<CarMake>, AppError> {
        let make = sqlx::query_as::<Postgres, CarMake>(
            "SELECT id, name, models, created_at, updated_at FROM car_makes WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(make)
    }

    /// Case-insensitive lookup by make name
    #[tracing::instrument(skip(self), fields(db.table = "car_makes", db.operation = "select"))]
    pub async fn find_by_name(&self, name: &str) -> Result<Option<CarMake>, AppError> {
        let make = sqlx::query_as::<Postgres, CarMake>(
            "SELECT id, name, models, created_at, updated_at FROM car_makes WHERE LOWER(name) = LOWER($1)",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(make)
    }

    #[tracing::instrument(skip(self), fields(db.table = "car_makes", db.operation = "select"))]
    pub async fn list_names(&self) -> Result<Vec<CarMakeName>, AppError> {
        let names = sqlx::query_as::<Postgres, CarMakeName>(
            "SELECT id, name FROM car_makes ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(names)
    }

    #[tracing::instrument(skip(self), fields(db.table = "car_makes", db.operation = "update", db.record_id = %id))]
    pub async fn update(
        &self,
        id: Uuid,
        name: Option<&str>,
        models: Option<&[String]>,
    ) -> Result<Option<CarMake>, AppError> {
        let make = sqlx::query_as::<Postgres, CarMake>(
            r#"
            UPDATE car_makes SET
                name = COALESCE($2, name),
                models = COALESCE($3, models),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, models, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(models)
        .fetch_optional(&self.pool)
        .await?;

        Ok(make)
    }

    #[tracing::instrument(skip(self), fields(db.table = "car_makes", db.operation = "delete", db.record_id = %id))]
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM car_makes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
