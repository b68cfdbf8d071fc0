//! Website visit tracking and stats

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, Query, Request, State};
use axum::http::header::{SET_COOKIE, USER_AGENT};
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use showroom_core::models::{NewVisit, VisitStats, VisitStatsQuery, UNKNOWN_COUNTRY};
use showroom_core::AppError;
use uuid::Uuid;

use crate::constants::VISITOR_COOKIE;
use crate::error::HttpAppError;
use crate::response::ApiResponse;
use crate::state::AppState;
use crate::utils::cookies::{build_cookie, read_cookie};
use crate::utils::ip_extraction::{extract_client_ip, UNKNOWN_IP};

const ALL_TIME: &str = "all time";

#[tracing::instrument(skip_all)]
pub async fn track_visit(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Response, HttpAppError> {
    let settings = &state.visits;
    let (parts, _) = request.into_parts();
    let headers = &parts.headers;
    let peer = parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr);

    let (visitor_id, set_cookie) = match read_cookie(headers, VISITOR_COOKIE) {
        Some(existing) => (existing, None),
        None => {
            let minted = Uuid::new_v4().to_string();
            let cookie = build_cookie(
                VISITOR_COOKIE,
                &minted,
                Duration::days(settings.cookie_max_age_days),
                state.auth.secure_cookies,
            )?;
            (minted, Some(cookie))
        }
    };

    let ip_address = extract_client_ip(
        headers,
        peer,
        settings.trusted_proxy_count,
    );
    let country = if ip_address == UNKNOWN_IP {
        None
    } else {
        settings.geo.country(&ip_address).await
    }
    .unwrap_or_else(|| UNKNOWN_COUNTRY.to_string());

    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let visit = NewVisit {
        visitor_id,
        ip_address,
        country,
        user_agent,
    };
    let recorded = state
        .db
        .visits
        .record_if_new(&visit, settings.dedup_window_minutes)
        .await?;

    let message = match recorded {
        Some(row) => {
            tracing::debug!(visit_id = %row.id, country = %row.country, "Visit recorded");
            "Visit tracked successfully"
        }
        None => "Visit already recorded recently",
    };

    let body = ApiResponse::message(message);
    Ok(match set_cookie {
        Some(cookie) => ([(SET_COOKIE, cookie)], body).into_response(),
        None => body.into_response(),
    })
}

pub async fn visit_stats(
    State(state): State<Arc<AppState>>,
    Query(query): Query<VisitStatsQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let from = parse_bound(query.start_date.as_deref(), "startDate", false)?;
    let to = parse_bound(query.end_date.as_deref(), "endDate", true)?;
    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            return Err(AppError::InvalidInput(
                "startDate must not be after endDate".to_string(),
            )
            .into());
        }
    }

    let (total_visits, unique_visitors) = state.db.visits.stats(from, to).await?;
    let label = |raw: Option<&str>| {
        raw.map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(ALL_TIME)
            .to_string()
    };

    Ok(ApiResponse::ok(
        "Visit stats retrieved",
        VisitStats {
            total_visits,
            unique_visitors,
            start_date: label(query.start_date.as_deref()),
            end_date: label(query.end_date.as_deref()),
        },
    ))
}

/// RFC 3339 timestamps are taken as-is; bare `YYYY-MM-DD` dates cover the whole
/// day, so an end bound lands on the last millisecond of that day.
fn parse_bound(
    raw: Option<&str>,
    name: &str,
    end_of_day: bool,
) -> Result<Option<DateTime<Utc>>, AppError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(ts.with_timezone(&Utc)));
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::InvalidInput(format!("Invalid {}: {}", name, raw)))?;
    let time = if end_of_day {
        date.and_hms_milli_opt(23, 59, 59, 999)
    } else {
        date.and_hms_opt(0, 0, 0)
    };
    time.map(|t| Some(t.and_utc()))
        .ok_or_else(|| AppError::InvalidInput(format!("Invalid {}: {}", name, raw)))
}
