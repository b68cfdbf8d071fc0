use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A car make with the models offered under it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CarMake {
    pub id: Uuid,
    pub name: String,
    pub models: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Name-only projection used by dropdowns
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CarMakeName {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarModelsResponse {
    pub make_name: String,
    pub models: Vec<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCarMakeRequest {
    #[validate(length(min = 1, max = 100, message = "Make name is required"))]
    pub name: String,
    #[serde(default)]
    pub models: Vec<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCarMakeRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "Make name must not be empty"))]
    pub name: Option<String>,
    #[serde(default)]
    pub models: Option<Vec<String>>,
}

/// Trim model names, drop blanks and duplicates while keeping first-seen order.
pub fn normalize_models(models: Vec<String>) -> Vec<String> {
    let mut seen = Vec::<String>::new();
    for model in models {
        let model = model.trim().to_string();
        if !model.is_empty() && !seen.iter().any(|m| m.eq_ignore_ascii_case(&model)) {
            seen.push(model);
        }
    }
    seen
}
