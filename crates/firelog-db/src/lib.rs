//! Database layer for firelog.
//!
//! Provides SQLite connection pooling (via `r2d2`), WAL-mode initialization,
//! the declarative table model, and the startup schema reconciler that
//! brings a live database in line with that model.
//!
//! # Design decisions
//!
//! - **SQLite with WAL mode**: no external database process required. WAL
//!   mode allows concurrent readers with a single writer.
//! - **`r2d2` connection pool**: one checkout per request, returned to the
//!   pool when the guard drops.
//! - **Declarative schema**: every table, reference tables included, is
//!   described once in [`SCHEMA`]. The reconciler only ever adds tables and
//!   columns; it never drops, alters, or rewrites rows.

mod pool;
mod reconcile;
mod schema;

pub use pool::{configure_connection, create_pool, DbPool, DbRuntimeSettings, PoolError};
pub use reconcile::{
    plan_changes, reconcile, reconcile_schema, ReconcileReport, SchemaChange, SchemaError,
};
pub use schema::{ColumnDef, ColumnDefault, ForeignKey, SqlType, TableDef, SCHEMA};
