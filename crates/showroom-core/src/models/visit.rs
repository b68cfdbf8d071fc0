use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const UNKNOWN_COUNTRY: &str = "Unknown";

/// One counted visit of the public website
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Visit {
    pub id: Uuid,
    pub visitor_id: String,
    pub ip_address: String,
    pub country: String,
    pub user_agent: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewVisit {
    pub visitor_id: String,
    pub ip_address: String,
    pub country: String,
    pub user_agent: String,
}

/// Optional `startDate` / `endDate` bounds for the stats endpoint
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitStatsQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitStats {
    pub total_visits: i64,
    pub unique_visitors: i64,
    pub start_date: String,
    pub end_date: String,
}
