use async_trait::async_trait;
use showroom_core::models::{Contact, ContactDraft, CONTACT_SCHEMA_VERSION};
use showroom_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use crate::db::resource::ResourceRepository;

const CONTACT_COLUMNS: &str = "id, schema_version, country_code, country_name, full_name, \
     phone, email, description, services, file_url, created_at, updated_at";

/// Repository for contact form submissions
#[derive(Clone)]
pub struct ContactRepository {
    pool: PgPool,
}

impl ContactRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Newest first
    #[tracing::instrument(skip(self), fields(db.table = "contacts", db.operation = "select"))]
    pub async fn list(&self) -> Result<Vec<Contact>, AppError> {
        let contacts = sqlx::query_as::<Postgres, Contact>(&format!(
            "SELECT {} FROM contacts ORDER BY created_at DESC",
            CONTACT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(contacts)
    }
}

#[async_trait]
impl ResourceRepository for ContactRepository {
    type Doc = Contact;
    type Draft = ContactDraft;

    #[tracing::instrument(skip(self, draft), fields(db.table = "contacts", db.operation = "insert"))]
    async fn insert(&self, draft: ContactDraft) -> Result<Contact, AppError> {
        let contact = sqlx::query_as::<Postgres, Contact>(&format!(
            r#"
            INSERT INTO contacts (
                schema_version, country_code, country_name, full_name, phone, email,
                description, services, file_url
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            CONTACT_COLUMNS
        ))
        .bind(CONTACT_SCHEMA_VERSION)
        .bind(&draft.country_code)
        .bind(&draft.country_name)
        .bind(&draft.full_name)
        .bind(&draft.phone)
        .bind(&draft.email)
        .bind(&draft.description)
        .bind(&draft.services)
        .bind(&draft.file_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(contact)
    }

    #[tracing::instrument(skip(self), fields(db.table = "contacts", db.operation = "select", db.record_id = %id))]
    async fn find(&self, id: Uuid) -> Result<Option<Contact>, AppError> {
        let contact = sqlx::query_as::<Postgres, Contact>(&format!(
            "SELECT {} FROM contacts WHERE id = $1",
            CONTACT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(contact)
    }

    #[tracing::instrument(skip(self), fields(db.table = "contacts", db.operation = "delete", db.record_id = %id))]
    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
