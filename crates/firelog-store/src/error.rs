//! Error types for record store operations.

use std::os::raw::c_int;

/// Errors that can occur during record store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The username is already registered.
    #[error("username already taken: {0}")]
    Conflict(String),

    /// No user matches the supplied username and password.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// A referenced row does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    /// Password hashing failed.
    #[error("failed to hash password")]
    PasswordHash,

    /// A database operation failed.
    #[error("store database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Whether `err` is a constraint violation with the given extended code
/// (e.g. `SQLITE_CONSTRAINT_UNIQUE`).
pub(crate) fn is_constraint(err: &rusqlite::Error, extended_code: c_int) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _) if failure.extended_code == extended_code
    )
}
