use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Standard palette inserted by the seeding tool.
pub const STANDARD_COLORS: &[&str] = &[
    "Red", "Blue", "Black", "White", "Silver", "Grey", "Green", "Yellow", "Orange", "Brown",
    "Beige", "Purple", "Pink", "Maroon", "Gold", "Navy", "Teal", "Cyan", "Magenta",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Color {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ColorRequest {
    #[validate(length(min = 1, max = 64, message = "Color name is required"))]
    pub name: String,
}

impl ColorRequest {
    pub fn trimmed_name(&self) -> String {
        self.name.trim().to_string()
    }
}
