use async_trait::async_trait;
use showroom_core::models::{Car, CarDraft, CarPatch, CarSummary};
use showroom_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use crate::db::resource::{ResourceRepository, UpdatableRepository};

const CAR_COLUMNS: &str = "id, title, make, model, manufacturing_year, condition, body_type, \
     engine, cylinders, doors, horsepower, fuel_type, gear_type, drive_train, exterior_color, \
     interior_color, chasis_no, engine_no, reg_no, state, price, currency, mileage, mileage_unit, \
     description, should_list_on_website, reserved_by, clicks, images, created_at, updated_at";

/// Repository for car listings
#[derive(Clone)]
pub struct CarRepository {
    pool: PgPool,
}

impl CarRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Admin list projection, newest first
    #[tracing::instrument(skip(self), fields(db.table = "cars", db.operation = "select"))]
    pub async fn list_summaries(&self) -> Result<Vec<CarSummary>, AppError> {
        let cars = sqlx::query_as::<Postgres, CarSummary>(
            r#"
            SELECT id, make, model, manufacturing_year, fuel_type, gear_type, price, currency
            FROM cars
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(cars)
    }

    /// Cars flagged for the public website, newest first
    #[tracing::instrument(skip(self), fields(db.table = "cars", db.operation = "select"))]
    pub async fn list_public(&self) -> Result<Vec<Car>, AppError> {
        let cars = sqlx::query_as::<Postgres, Car>(&format!(
            "SELECT {} FROM cars WHERE should_list_on_website ORDER BY created_at DESC",
            CAR_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(cars)
    }

    /// Increment the public click counter. Returns the new count, `None` when the car
    /// does not exist or is not listed.
    #[tracing::instrument(skip(self), fields(db.table = "cars", db.operation = "update", db.record_id = %id))]
    pub async fn record_click(&self, id: Uuid) -> Result<Option<i64>, AppError> {
        let clicks = sqlx::query_scalar::<Postgres, i64>(
            r#"
            UPDATE cars SET clicks = clicks + 1
            WHERE id = $1 AND should_list_on_website
            RETURNING clicks
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(clicks)
    }
}

#[async_trait]
impl ResourceRepository for CarRepository {
    type Doc = Car;
    type Draft = CarDraft;

    #[tracing::instrument(skip(self, draft), fields(db.table = "cars", db.operation = "insert"))]
    async fn insert(&self, draft: CarDraft) -> Result<Car, AppError> {
        let car = sqlx::query_as::<Postgres, Car>(&format!(
            r#"
            INSERT INTO cars (
                title, make, model, manufacturing_year, condition, body_type, engine,
                cylinders, doors, horsepower, fuel_type, gear_type, drive_train,
                exterior_color, interior_color, chasis_no, engine_no, reg_no, state,
                price, currency, mileage, mileage_unit, description,
                should_list_on_website, reserved_by, images
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                    $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27)
            RETURNING {}
            "#,
            CAR_COLUMNS
        ))
        .bind(&draft.title)
        .bind(&draft.make)
        .bind(&draft.model)
        .bind(draft.manufacturing_year)
        .bind(&draft.condition)
        .bind(&draft.body_type)
        .bind(&draft.engine)
        .bind(draft.cylinders)
        .bind(draft.doors)
        .bind(draft.horsepower)
        .bind(&draft.fuel_type)
        .bind(&draft.gear_type)
        .bind(&draft.drive_train)
        .bind(&draft.exterior_color)
        .bind(&draft.interior_color)
        .bind(&draft.chasis_no)
        .bind(&draft.engine_no)
        .bind(&draft.reg_no)
        .bind(&draft.state)
        .bind(draft.price)
        .bind(&draft.currency)
        .bind(draft.mileage)
        .bind(&draft.mileage_unit)
        .bind(&draft.description)
        .bind(draft.should_list_on_website)
        .bind(&draft.reserved_by)
        .bind(&draft.images)
        .fetch_one(&self.pool)
        .await?;

        Ok(car)
    }

    #[tracing::instrument(skip(self), fields(db.table = "cars", db.operation = "select", db.record_id = %id))]
    async fn find(&self, id: Uuid) -> Result<Option<Car>, AppError> {
        let car = sqlx::query_as::<Postgres, Car>(&format!(
            "SELECT {} FROM cars WHERE id = $1",
            CAR_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(car)
    }

    #[tracing::instrument(skip(self), fields(db.table = "cars", db.operation = "delete", db.record_id = %id))]
    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM cars WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl UpdatableRepository for CarRepository {
    type Patch = CarPatch;

    #[tracing::instrument(skip(self, patch), fields(db.table = "cars", db.operation = "update", db.record_id = %id))]
    async fn update(&self, id: Uuid, patch: CarPatch) -> Result<Option<Car>, AppError> {
        let car = sqlx::query_as::<Postgres, Car>(&format!(
            r#"
            UPDATE cars SET
                title = COALESCE($2, title),
                make = COALESCE($3, make),
                model = COALESCE($4, model),
                manufacturing_year = COALESCE($5, manufacturing_year),
                condition = COALESCE($6, condition),
                body_type = COALESCE($7, body_type),
                engine = COALESCE($8, engine),
                cylinders = COALESCE($9, cylinders),
                doors = COALESCE($10, doors),
                horsepower = COALESCE($11, horsepower),
                fuel_type = COALESCE($12, fuel_type),
                gear_type = COALESCE($13, gear_type),
                drive_train = COALESCE($14, drive_train),
                exterior_color = COALESCE($15, exterior_color),
                interior_color = COALESCE($16, interior_color),
                chasis_no = COALESCE($17, chasis_no),
                engine_no = COALESCE($18, engine_no),
                reg_no = COALESCE($19, reg_no),
                state = COALESCE($20, state),
                price = COALESCE($21, price),
                currency = COALESCE($22, currency),
                mileage = COALESCE($23, mileage),
                mileage_unit = COALESCE($24, mileage_unit),
                description = COALESCE($25, description),
                should_list_on_website = COALESCE($26, should_list_on_website),
                reserved_by = COALESCE($27, reserved_by),
                images = COALESCE($28, images),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            CAR_COLUMNS
        ))
        .bind(id)
        .bind(&patch.title)
        .bind(&patch.make)
        .bind(&patch.model)
        .bind(patch.manufacturing_year)
        .bind(&patch.condition)
        .bind(&patch.body_type)
        .bind(&patch.engine)
        .bind(patch.cylinders)
        .bind(patch.doors)
        .bind(patch.horsepower)
        .bind(&patch.fuel_type)
        .bind(&patch.gear_type)
        .bind(&patch.drive_train)
        .bind(&patch.exterior_color)
        .bind(&patch.interior_color)
        .bind(&patch.chasis_no)
        .bind(&patch.engine_no)
        .bind(&patch.reg_no)
        .bind(&patch.state)
        .bind(patch.price)
        .bind(&patch.currency)
        .bind(patch.mileage)
        .bind(&patch.mileage_unit)
        .bind(&patch.description)
        .bind(patch.should_list_on_website)
        .bind(&patch.reserved_by)
        .bind(&patch.images)
        .fetch_optional(&self.pool)
        .await?;

        Ok(car)
    }
}
