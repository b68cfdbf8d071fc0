//! Data models for the application
//!
//! One sub-module per collection. Media-bearing resources also provide their
//! draft and patch types and their slot descriptors.

mod blog;
mod car;
mod car_make;
mod color;
mod contact;
mod faq;
mod project;
mod testimonial;
mod user;
mod visit;

pub use blog::*;
pub use car::*;
pub use car_make::*;
pub use color::*;
pub use contact::*;
pub use faq::*;
pub use project::*;
pub use testimonial::*;
pub use user::*;
pub use visit::*;

use serde::Deserialize;

/// Body of the `update-*-list-status` endpoints
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListStatusRequest {
    pub list_on_website: bool,
}

/// `skip` / `limit` query for paginated public lists
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub skip: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
}

impl PageQuery {
    pub const DEFAULT_LIMIT: i64 = 6;
    pub const MAX_LIMIT: i64 = 100;

    pub fn offset(&self) -> i64 {
        self.skip.unwrap_or(0).max(0)
    }

    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT)
    }
}
