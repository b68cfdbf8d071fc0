//! Application setup and initialization
//!
//! `main` calls [`initialize_app`]; integration tests call [`build_state`] and
//! [`routes::setup_routes`] directly with their own pool and media host.

pub mod database;
pub mod routes;
pub mod server;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use showroom_core::Config;
use showroom_services::{
    create_media_host, CleanupQueue, CleanupSettings, CleanupWorker, MediaHost, MediaStore,
};
use sqlx::PgPool;

use crate::auth::jwt::JwtService;
use crate::services::{create_geo_locator, MediaPipeline};
use crate::state::{AppState, AuthConfig, DbState, MediaState, VisitState};
use crate::utils::upload::UploadLimits;

/// Initialize the entire application: tracing, database, media host, state and routes.
pub async fn initialize_app(config: &Config) -> Result<(Arc<AppState>, Router, CleanupWorker)> {
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    crate::telemetry::init_telemetry(json_logs)
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    config
        .validate()
        .context("Configuration validation failed")?;
    tracing::info!(
        environment = %config.base.environment,
        "Configuration loaded and validated successfully"
    );

    let pool = database::setup_database(config).await?;
    let host = create_media_host(config)
        .await
        .context("Failed to initialize media host")?;
    tracing::info!(host = host.name(), "Media host ready");

    let (state, cleanup) = build_state(config, pool, host).await?;
    let router = routes::setup_routes(config, state.clone())?;

    Ok((state, router, cleanup))
}

/// Wire repositories, the upload pipeline and the cleanup worker around `host`.
pub async fn build_state(
    config: &Config,
    pool: PgPool,
    host: Arc<dyn MediaHost>,
) -> Result<(Arc<AppState>, CleanupWorker)> {
    tokio::fs::create_dir_all(&config.upload.temp_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create upload directory {}",
                config.upload.temp_dir.display()
            )
        })?;

    let store = MediaStore::from_config(host, config);
    let (cleanup, worker) = CleanupQueue::start(store.clone(), CleanupSettings::from_config(config));
    let geo = create_geo_locator(config).context("Failed to initialize geo lookup")?;

    let state = AppState {
        db: DbState::new(pool),
        media: MediaState {
            pipeline: MediaPipeline::new(store, cleanup),
            limits: UploadLimits::from_config(config),
            max_car_images: config.upload.max_car_images,
        },
        auth: AuthConfig {
            jwt: JwtService::new(config.jwt_secret(), config.jwt_expiry_hours()),
            secure_cookies: config.is_production(),
        },
        visits: VisitState {
            geo,
            cookie_max_age_days: config.visits.cookie_max_age_days,
            dedup_window_minutes: config.visits.dedup_window_minutes,
            trusted_proxy_count: config.visits.trusted_proxy_count,
        },
    };

    Ok((Arc::new(state), worker))
}
