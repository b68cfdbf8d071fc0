use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use showroom_core::AppError;
use std::sync::Arc;

use crate::auth::jwt::JwtService;
use crate::auth::models::AuthUser;
use crate::constants::AUTH_COOKIE;
use crate::error::HttpAppError;
use crate::utils::cookies::read_cookie;

#[derive(Clone)]
pub struct AuthState {
    pub jwt: JwtService,
}

/// Session token from `Authorization: Bearer` or, failing that, the session cookie.
fn extract_token(request: &Request) -> Option<String> {
    let bearer = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    bearer.or_else(|| read_cookie(request.headers(), AUTH_COOKIE))
}

pub async fn auth_middleware(
    State(auth_state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = extract_token(&request) else {
        tracing::debug!(path = %request.uri().path(), "Missing session token");
        return HttpAppError(AppError::Unauthorized(
            "Authentication required".to_string(),
        ))
        .into_response();
    };

    let claims = match auth_state.jwt.verify(&token) {
        Ok(claims) => claims,
        Err(e) => return HttpAppError(e).into_response(),
    };

    let user = AuthUser::from(claims);
    tracing::debug!(user_id = %user.user_id, role = %user.role, "Authenticated request");
    request.extensions_mut().insert(user);

    next.run(request).await
}
