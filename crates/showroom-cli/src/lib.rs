//! Shared plumbing for the operator binaries.

use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

/// Connect to `database_url` and bring the schema up to date.
pub async fn connect(database_url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;
    showroom_api::setup::database::run_migrations(&pool).await?;
    Ok(pool)
}

/// Trimmed, de-duplicated (case-insensitively) palette entries in input order.
pub fn palette<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    let mut out = Vec::new();
    for name in names.into_iter().map(str::trim).filter(|n| !n.is_empty()) {
        let key = name.to_lowercase();
        if !seen.contains(&key) {
            seen.push(key);
            out.push(name.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use showroom_core::models::STANDARD_COLORS;

    #[test]
    fn palette_skips_blanks_and_duplicates() {
        assert_eq!(
            palette(["Red", " red ", "", "Blue"]),
            vec!["Red".to_string(), "Blue".to_string()]
        );
    }

    #[test]
    fn standard_palette_has_no_duplicates() {
        assert_eq!(palette(STANDARD_COLORS.iter().copied()).len(), STANDARD_COLORS.len());
    }
}
