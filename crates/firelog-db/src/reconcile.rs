//! Startup schema reconciler.
//!
//! Compares the live database against a set of [`TableDef`]s and issues only
//! additive statements: `CREATE TABLE` for missing tables and
//! `ALTER TABLE .. ADD COLUMN` for missing columns. Existing columns and rows
//! are never touched, so reconciling an already-conforming database is a
//! no-op.
//!
//! A column is appended in its [`ColumnDef::appended`] form: one declared
//! with an expression default (such as `created_at`) is added nullable,
//! and rows that predate it keep `NULL`.
//!
//! The whole change set is planned and validated before the first statement
//! runs. Statements are then applied one by one without a surrounding
//! transaction; if one fails, the earlier ones stay applied and a later run
//! picks up where this one stopped.

use std::collections::HashSet;

use rusqlite::Connection;
use thiserror::Error;

use crate::schema::{ColumnDef, TableDef, SCHEMA};

/// Errors that can occur while reconciling the schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A declared column is missing from an existing table and SQLite cannot
    /// add it without violating the declaration.
    #[error("cannot add column '{column}' to existing table '{table}': {reason}")]
    UnaddableColumn {
        table: String,
        column: String,
        reason: &'static str,
    },

    /// Reading live table metadata failed.
    #[error("failed to inspect table '{table}': {source}")]
    Inspect {
        table: String,
        source: rusqlite::Error,
    },

    /// A schema statement failed.
    #[error("schema statement failed ({statement}): {source}")]
    Execute {
        statement: String,
        source: rusqlite::Error,
    },
}

/// One additive schema statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaChange {
    CreateTable {
        table: String,
        sql: String,
    },
    AddColumn {
        table: String,
        column: String,
        sql: String,
    },
}

impl SchemaChange {
    /// The statement that applies this change.
    pub fn sql(&self) -> &str {
        match self {
            Self::CreateTable { sql, .. } | Self::AddColumn { sql, .. } => sql,
        }
    }

    /// The table this change targets.
    pub fn table(&self) -> &str {
        match self {
            Self::CreateTable { table, .. } | Self::AddColumn { table, .. } => table,
        }
    }
}

/// Changes applied by one reconciliation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub applied: Vec<SchemaChange>,
}

impl ReconcileReport {
    /// True when the database already matched the declared schema.
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty()
    }

    pub fn tables_created(&self) -> usize {
        self.applied
            .iter()
            .filter(|c| matches!(c, SchemaChange::CreateTable { .. }))
            .count()
    }

    pub fn columns_added(&self) -> usize {
        self.applied
            .iter()
            .filter(|c| matches!(c, SchemaChange::AddColumn { .. }))
            .count()
    }
}

/// Brings the live database in line with [`SCHEMA`].
///
/// # Errors
///
/// Returns `SchemaError` if metadata cannot be read, if a missing column
/// cannot be added to an existing table, or if a statement fails. The caller
/// must not serve traffic after an error.
pub fn reconcile_schema(conn: &Connection) -> Result<ReconcileReport, SchemaError> {
    reconcile(conn, SCHEMA)
}

/// Brings the live database in line with `tables`.
///
/// # Errors
///
/// See [`reconcile_schema`].
pub fn reconcile(conn: &Connection, tables: &[TableDef]) -> Result<ReconcileReport, SchemaError> {
    let changes = plan_changes(conn, tables)?;
    let mut report = ReconcileReport::default();

    for change in changes {
        conn.execute_batch(change.sql())
            .map_err(|source| SchemaError::Execute {
                statement: change.sql().to_string(),
                source,
            })?;

        match &change {
            SchemaChange::CreateTable { table, .. } => {
                tracing::info!(table = %table, "created table");
            }
            SchemaChange::AddColumn { table, column, .. } => {
                tracing::info!(table = %table, column = %column, "added column");
            }
        }
        report.applied.push(change);
    }

    Ok(report)
}

/// Computes the statements needed to reconcile `tables` without running them.
///
/// # Errors
///
/// Returns `SchemaError::Inspect` if live metadata cannot be read and
/// `SchemaError::UnaddableColumn` if a missing column cannot be added.
pub fn plan_changes(
    conn: &Connection,
    tables: &[TableDef],
) -> Result<Vec<SchemaChange>, SchemaError> {
    let mut changes = Vec::new();

    for table in tables {
        if !table_exists(conn, table.name)? {
            tracing::debug!(table = table.name, "table missing, will create");
            changes.push(SchemaChange::CreateTable {
                table: table.name.to_string(),
                sql: table.create_sql(),
            });
            continue;
        }

        let live = live_columns(conn, table.name)?;
        for column in table.columns {
            if live.contains(&column.name.to_ascii_lowercase()) {
                continue;
            }
            if let Some(reason) = add_column_blocker(column) {
                return Err(SchemaError::UnaddableColumn {
                    table: table.name.to_string(),
                    column: column.name.to_string(),
                    reason,
                });
            }
            tracing::debug!(
                table = table.name,
                column = column.name,
                "column missing, will add"
            );
            changes.push(SchemaChange::AddColumn {
                table: table.name.to_string(),
                column: column.name.to_string(),
                sql: table.add_column_sql(column),
            });
        }
    }

    Ok(changes)
}

/// Why SQLite cannot append `column` to a table that already has rows, if it
/// cannot.
fn add_column_blocker(column: &ColumnDef) -> Option<&'static str> {
    let column = column.appended();
    if column.primary_key {
        return Some("primary key columns can only be declared at table creation");
    }
    if column.unique {
        return Some("unique columns can only be declared at table creation");
    }
    if !column.nullable && column.references.is_some() {
        return Some("required foreign keys can only be declared at table creation");
    }
    if !column.nullable && column.default.is_none() {
        return Some("required column has no literal default for existing rows");
    }
    None
}

fn table_exists(conn: &Connection, table: &str) -> Result<bool, SchemaError> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
        [table],
        |row| row.get(0),
    )
    .map_err(|source| SchemaError::Inspect {
        table: table.to_string(),
        source,
    })
}

/// Lower-cased names of the live columns; SQLite column names are
/// case-insensitive.
fn live_columns(conn: &Connection, table: &str) -> Result<HashSet<String>, SchemaError> {
    let inspect = |source: rusqlite::Error| SchemaError::Inspect {
        table: table.to_string(),
        source,
    };

    let mut stmt = conn
        .prepare("SELECT name FROM pragma_table_info(?1)")
        .map_err(inspect)?;
    let rows = stmt
        .query_map([table], |row| row.get::<_, String>(0))
        .map_err(inspect)?;

    let mut columns = HashSet::new();
    for row in rows {
        columns.insert(row.map_err(inspect)?.to_ascii_lowercase());
    }
    Ok(columns)
}
