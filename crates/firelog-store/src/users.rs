//! User accounts: registration and credential checks.
//!
//! Passwords are stored as Argon2id PHC strings. Rows written before hashing
//! was introduced hold the plaintext password; those still verify by exact
//! comparison and are re-hashed on their first successful login.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use firelog_types::UserId;
use rusqlite::{ffi, params, Connection, OptionalExtension};

use crate::error::{is_constraint, StoreError};

/// Registers a new user and returns its id.
///
/// # Errors
///
/// Returns `StoreError::Conflict` if the username is taken.
pub fn create_user(conn: &Connection, username: &str, password: &str) -> Result<UserId, StoreError> {
    let hash = hash_password(password)?;

    match conn.execute(
        "INSERT INTO users (username, password) VALUES (?1, ?2)",
        params![username, hash],
    ) {
        Ok(_) => Ok(conn.last_insert_rowid()),
        Err(e) if is_constraint(&e, ffi::SQLITE_CONSTRAINT_UNIQUE) => {
            Err(StoreError::Conflict(username.to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Returns the id of the user whose username and password both match.
///
/// # Errors
///
/// Returns `StoreError::InvalidCredentials` for an unknown username or a
/// wrong password.
pub fn authenticate(conn: &Connection, username: &str, password: &str) -> Result<UserId, StoreError> {
    let (id, stored): (UserId, String) = conn
        .query_row(
            "SELECT id, password FROM users WHERE username = ?1",
            [username],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?
        .ok_or(StoreError::InvalidCredentials)?;

    match PasswordHash::new(&stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .map(|()| id)
            .map_err(|_| StoreError::InvalidCredentials),
        Err(_) if stored == password => {
            upgrade_legacy_password(conn, id, password)?;
            Ok(id)
        }
        Err(_) => Err(StoreError::InvalidCredentials),
    }
}

/// Whether a user with this id exists.
pub fn user_exists(conn: &Connection, id: UserId) -> Result<bool, StoreError> {
    let exists = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM users WHERE id = ?1)",
        [id],
        |row| row.get(0),
    )?;
    Ok(exists)
}

fn upgrade_legacy_password(conn: &Connection, id: UserId, password: &str) -> Result<(), StoreError> {
    let hash = hash_password(password)?;
    conn.execute(
        "UPDATE users SET password = ?1 WHERE id = ?2",
        params![hash, id],
    )?;
    tracing::info!(user_id = id, "re-hashed legacy plaintext password");
    Ok(())
}

fn hash_password(password: &str) -> Result<String, StoreError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| StoreError::PasswordHash)
}
