//! Route configuration and setup.
//!
//! Collection route groups live in [domains](domains); the health check in [health](health).

mod domains;
mod health;

use std::sync::Arc;

use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use showroom_core::{Config, MediaBackend};
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::auth::middleware::{auth_middleware, AuthState};
use crate::constants::LOCAL_MEDIA_ROUTE;
use crate::state::AppState;

const DEFAULT_CONCURRENCY_LIMIT: usize = 1_024;

/// Build the full router: public routes, login-gated routes and the shared layers.
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router> {
    let cors = setup_cors(config)?;
    let auth_state = Arc::new(AuthState {
        jwt: state.auth.jwt.clone(),
    });

    let protected = protected_routes().layer(axum::middleware::from_fn_with_state(
        auth_state,
        auth_middleware,
    ));

    let mut app = public_routes()
        .merge(protected)
        .route("/health", get(health::health_check))
        .with_state(state);

    if config.media.backend == MediaBackend::Local {
        tracing::info!(
            path = %config.media.local_media_path.display(),
            route = LOCAL_MEDIA_ROUTE,
            "Serving local media"
        );
        app = app.nest_service(
            LOCAL_MEDIA_ROUTE,
            ServeDir::new(&config.media.local_media_path),
        );
    }

    let concurrency_limit = std::env::var("HTTP_CONCURRENCY_LIMIT")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(DEFAULT_CONCURRENCY_LIMIT)
        .max(1);

    let app = app
        .layer(ConcurrencyLimitLayer::new(concurrency_limit))
        .layer(RequestBodyLimitLayer::new(config.max_request_body_bytes()))
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(app)
}

fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(domains::auth_routes())
        .merge(domains::public_car_routes())
        .merge(domains::public_project_routes())
        .merge(domains::public_blog_routes())
        .merge(domains::public_static_testimonial_routes())
        .merge(domains::public_video_testimonial_routes())
        .merge(domains::public_contact_routes())
        .merge(domains::public_faq_routes())
        .merge(domains::public_visit_routes())
}

fn protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(domains::user_routes())
        .merge(domains::car_routes())
        .merge(domains::car_config_routes())
        .merge(domains::color_routes())
        .merge(domains::project_routes())
        .merge(domains::blog_routes())
        .merge(domains::static_testimonial_routes())
        .merge(domains::video_testimonial_routes())
        .merge(domains::contact_routes())
        .merge(domains::faq_routes())
        .merge(domains::visit_routes())
}

/// Browsers send the session cookie cross-site only with credentialed CORS, which
/// rules out wildcard origins; `*` mirrors the request origin instead.
fn setup_cors(config: &Config) -> Result<CorsLayer> {
    let origins = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        AllowOrigin::mirror_request()
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true))
}
