use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use showroom_core::models::{CreateUserRequest, UserResponse};
use showroom_core::AppError;
use validator::Validate;

use crate::auth::models::AuthUser;
use crate::auth::password::hash_password;
use crate::error::{HttpAppError, ValidatedJson};
use crate::handlers::ResourceId;
use crate::response::ApiResponse;
use crate::state::AppState;

const DUPLICATE_USER: &str = "A user with this email or phone number already exists";

#[tracing::instrument(skip(state, request), fields(email = %request.email))]
pub async fn add_user(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    caller.require_admin()?;
    request.validate().map_err(AppError::from)?;

    let password_hash = hash_password(&request.password)?;
    let user = state
        .db
        .users
        .create(
            request.name.trim(),
            request.email.trim(),
            request.phone_number.trim(),
            &password_hash,
            request.role,
        )
        .await
        .map_err(|e| match e {
            AppError::Conflict(_) => AppError::Conflict(DUPLICATE_USER.to_string()),
            other => other,
        })?;

    tracing::info!(user_id = %user.id, role = %user.role, "User created");
    Ok(ApiResponse::created(
        "User added successfully",
        UserResponse::from(user),
    ))
}

pub async fn view_users(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let users: Vec<UserResponse> = state
        .db
        .users
        .list()
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();
    Ok(ApiResponse::list("Users retrieved", users))
}

pub async fn view_user(
    State(state): State<Arc<AppState>>,
    ResourceId(id): ResourceId,
) -> Result<impl IntoResponse, HttpAppError> {
    let user = state
        .db
        .users
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;
    Ok(ApiResponse::ok("User retrieved", UserResponse::from(user)))
}
