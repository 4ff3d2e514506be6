//! Address-like records: general addresses, user-added addresses, and
//! fire-incident addresses.
//!
//! General and user-added addresses share the `addresses` table and are told
//! apart by its `kind` column; every query is scoped to one kind, so an id
//! from one family never resolves in another.

use firelog_types::{timestamp_now, AddressFields, AddressKind, AddressRecord, IncidentDetails, UserId};
use rusqlite::{ffi, params, Connection, OptionalExtension, Row};

use crate::error::{is_constraint, StoreError};
use crate::users::user_exists;

/// Inserts a record owned by `owner_id` and returns it as stored.
///
/// # Errors
///
/// Returns `StoreError::NotFound` if `owner_id` is not a registered user.
pub fn create_address(
    conn: &Connection,
    kind: AddressKind,
    owner_id: UserId,
    fields: &AddressFields,
) -> Result<AddressRecord, StoreError> {
    let created_at = timestamp_now();

    let inserted = match kind.discriminator() {
        Some(discriminator) => conn.execute(
            "INSERT INTO addresses (address, memo, user_id, created_at, kind)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![fields.address, fields.memo, owner_id, created_at, discriminator],
        ),
        None => conn.execute(
            "INSERT INTO fire_addresses (address, memo, cause, user_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![fields.address, fields.memo, fields.cause, owner_id, created_at],
        ),
    };

    match inserted {
        Ok(_) => {}
        Err(e) if is_constraint(&e, ffi::SQLITE_CONSTRAINT_FOREIGNKEY) => {
            return Err(StoreError::NotFound {
                entity: "user",
                id: owner_id,
            });
        }
        Err(e) => return Err(e.into()),
    }

    get_address(conn, kind, conn.last_insert_rowid())
}

/// Fetches one record with its owner joined in.
///
/// # Errors
///
/// Returns `StoreError::NotFound` if no record of this kind has that id.
pub fn get_address(conn: &Connection, kind: AddressKind, id: i64) -> Result<AddressRecord, StoreError> {
    let sql = format!("{} AND a.id = ?1", select_sql(kind));
    conn.query_row(&sql, [id], |row| map_row(kind, row))
        .optional()?
        .ok_or(StoreError::NotFound {
            entity: kind.label(),
            id,
        })
}

/// Lists every record of `kind`, optionally only those owned by `owner`.
///
/// General addresses come back newest first; the other kinds in insertion
/// order.
///
/// # Errors
///
/// Returns `StoreError::NotFound` if `owner` is given and does not exist.
pub fn list_addresses(
    conn: &Connection,
    kind: AddressKind,
    owner: Option<UserId>,
) -> Result<Vec<AddressRecord>, StoreError> {
    if let Some(owner_id) = owner {
        if !user_exists(conn, owner_id)? {
            return Err(StoreError::NotFound {
                entity: "user",
                id: owner_id,
            });
        }
    }

    let sql = format!(
        "{} AND (?1 IS NULL OR a.user_id = ?1) {}",
        select_sql(kind),
        order_clause(kind)
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([owner], |row| map_row(kind, row))?;

    let mut records = Vec::new();
    for row in rows {
        records.push(row?);
    }
    Ok(records)
}

/// Overwrites the editable fields (`address`, `memo`, and `cause` for fire
/// records) and returns the stored record. Id, owner and `created_at` are
/// never modified.
///
/// # Errors
///
/// Returns `StoreError::NotFound` if no record of this kind has that id.
pub fn update_address(
    conn: &Connection,
    kind: AddressKind,
    id: i64,
    fields: &AddressFields,
) -> Result<AddressRecord, StoreError> {
    let count = match kind.discriminator() {
        Some(discriminator) => conn.execute(
            "UPDATE addresses SET address = ?1, memo = ?2 WHERE id = ?3 AND kind = ?4",
            params![fields.address, fields.memo, id, discriminator],
        )?,
        None => conn.execute(
            "UPDATE fire_addresses SET address = ?1, memo = ?2, cause = ?3 WHERE id = ?4",
            params![fields.address, fields.memo, fields.cause, id],
        )?,
    };

    if count == 0 {
        return Err(StoreError::NotFound {
            entity: kind.label(),
            id,
        });
    }

    get_address(conn, kind, id)
}

/// Physically removes a record.
///
/// # Errors
///
/// Returns `StoreError::NotFound` if no record of this kind has that id.
pub fn delete_address(conn: &Connection, kind: AddressKind, id: i64) -> Result<(), StoreError> {
    let count = match kind.discriminator() {
        Some(discriminator) => conn.execute(
            "DELETE FROM addresses WHERE id = ?1 AND kind = ?2",
            params![id, discriminator],
        )?,
        None => conn.execute("DELETE FROM fire_addresses WHERE id = ?1", [id])?,
    };

    if count == 0 {
        return Err(StoreError::NotFound {
            entity: kind.label(),
            id,
        });
    }
    Ok(())
}

/// `SELECT` over one kind with the owner joined in, ending in an open
/// `WHERE` clause that callers extend with `AND ...`.
fn select_sql(kind: AddressKind) -> String {
    let (table, cause) = if kind.has_cause() {
        ("fire_addresses", "a.cause")
    } else {
        ("addresses", "NULL")
    };
    // Discriminators are compile-time constants, never request input.
    let filter = match kind.discriminator() {
        Some(discriminator) => format!("a.kind = '{}'", discriminator),
        None => "1 = 1".to_string(),
    };

    format!(
        "SELECT a.id, a.address, a.memo, a.user_id, u.username, a.created_at, {cause}
         FROM {table} a
         LEFT JOIN users u ON u.id = a.user_id
         WHERE {filter}"
    )
}

fn order_clause(kind: AddressKind) -> &'static str {
    match kind {
        AddressKind::General => "ORDER BY a.created_at DESC, a.id DESC",
        AddressKind::UserAdded | AddressKind::Fire => "ORDER BY a.id ASC",
    }
}

fn map_row(kind: AddressKind, row: &Row) -> rusqlite::Result<AddressRecord> {
    let incident = if kind.has_cause() {
        Some(IncidentDetails { cause: row.get(6)? })
    } else {
        None
    };

    Ok(AddressRecord {
        id: row.get(0)?,
        address: row.get(1)?,
        memo: row.get(2)?,
        user_id: row.get(3)?,
        username: row.get(4)?,
        created_at: row.get(5)?,
        incident,
    })
}
