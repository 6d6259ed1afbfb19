//! Storage adapters for the RSAC reporting backend.
//!
//! [`ports`] defines the store traits the API layer programs against;
//! [`postgres`] executes the core query builder's SQL over a sqlx pool, and
//! [`memory`] implements the same contracts over in-process tables for
//! development and tests.

pub mod memory;
pub mod ports;
pub mod postgres;

pub use memory::MemoryStore;
pub use ports::{DashboardStore, ReportStore};
pub use postgres::{PostgresConfig, PostgresStore};
