//! RSAC Reports core - dataset registry, district normalization, and the
//! report query builder.
//!
//! This crate is database-agnostic: it produces parameterized SQL
//! ([`query::SqlQuery`]) and domain models; the `rsac-store` crate executes
//! them.

pub mod alias;
pub mod config;
pub mod error;
pub mod models;
pub mod query;
pub mod registry;

pub use error::{ReportError, Result};
