use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::response::IntoResponse;
use showroom_core::models::Contact;

use crate::error::HttpAppError;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Public contact form. The attachment is mandatory and goes through the
/// same staged upload as admin media.
#[tracing::instrument(skip(state, multipart))]
pub async fn add_contact(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let form = state.media.read_form::<Contact>(multipart).await?;
    let contact = state.media.pipeline.create(&state.db.contacts, form).await?;
    tracing::info!(contact_id = %contact.id, "Contact request received");
    Ok(ApiResponse::created("Contact request submitted", contact))
}

pub async fn view_contacts(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let contacts = state.db.contacts.list().await?;
    Ok(ApiResponse::list("Contacts retrieved", contacts))
}
