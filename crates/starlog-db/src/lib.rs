//! Database layer for Starlog.
//!
//! Provides SQLite connection pooling (via `r2d2`), WAL-mode initialization,
//! and embedded SQL migrations. Every table in Starlog is created through
//! versioned migrations managed by this crate; uniqueness, foreign-key
//! integrity and cascade rules all live in that schema.
//!
//! Foreign keys are switched on for every pooled connection. Without that
//! pragma SQLite silently ignores `REFERENCES` clauses, so connections that
//! bypass [`create_pool`] must enable it themselves.

mod migrations;
mod pool;

pub use migrations::{migration_names, run_migrations, MigrationError};
pub use pool::{create_pool, DbPool, DbRuntimeSettings, PoolError};
