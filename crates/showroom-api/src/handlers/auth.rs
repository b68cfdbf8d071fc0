use std::sync::Arc;

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::response::IntoResponse;
use showroom_core::models::{LoginRequest, LoginResponse, UserResponse};
use showroom_core::AppError;
use validator::Validate;

use crate::auth::password::verify_password;
use crate::constants::AUTH_COOKIE;
use crate::error::{HttpAppError, ValidatedJson};
use crate::response::ApiResponse;
use crate::state::AppState;
use crate::utils::cookies::{build_cookie, clear_cookie};

const BAD_CREDENTIALS: &str = "Invalid email or password";

#[tracing::instrument(skip(state, request), fields(email = %request.email))]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate().map_err(AppError::from)?;

    let user = state
        .db
        .users
        .find_by_email(request.email.trim())
        .await?
        .ok_or_else(|| AppError::Unauthorized(BAD_CREDENTIALS.to_string()))?;

    if !verify_password(&request.password, &user.password_hash)? {
        tracing::debug!(user_id = %user.id, "Password mismatch");
        return Err(AppError::Unauthorized(BAD_CREDENTIALS.to_string()).into());
    }

    let (token, expires_at) = state.auth.jwt.issue(&user)?;
    let cookie = build_cookie(
        AUTH_COOKIE,
        &token,
        state.auth.jwt.expiry(),
        state.auth.secure_cookies,
    )?;
    state.db.users.touch_last_login(user.id).await?;

    tracing::info!(user_id = %user.id, "User logged in");
    let body = LoginResponse {
        token,
        expires_at,
        user: UserResponse::from(user),
    };
    Ok(([(SET_COOKIE, cookie)], ApiResponse::ok("Login successful", body)))
}

pub async fn logout(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        [(SET_COOKIE, clear_cookie(AUTH_COOKIE, state.auth.secure_cookies))],
        ApiResponse::message("Logged out"),
    )
}
