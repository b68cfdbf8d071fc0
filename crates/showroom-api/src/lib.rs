//! Showroom API Library
//!
//! HTTP handlers, auth, the media upload pipeline and application setup.

pub mod constants;
pub mod handlers;
pub mod response;
pub mod services;
pub mod setup;
pub mod telemetry;
pub mod utils;

// Public modules
pub mod auth;
pub mod error;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use response::ApiResponse;
pub use state::AppState;
