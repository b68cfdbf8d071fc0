//! Showroom Core Library
//!
//! Domain models, error types, configuration and the media slot vocabulary shared
//! by every Showroom crate.

pub mod config;
pub mod error;
pub mod form;
pub mod media;
pub mod media_backend;
pub mod models;
pub mod resource;

pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use form::FormFields;
pub use media::{Cardinality, MediaKind, MediaReference, MediaSlot, SlotKind, SlotValue};
pub use media_backend::MediaBackend;
pub use resource::{Document, Draft, Patch};
