//! Showroom database layer
//!
//! PostgreSQL repositories over `sqlx`. One repository per table, each a thin
//! `Clone` wrapper around the shared [`sqlx::PgPool`].

pub mod db;

pub use db::*;
