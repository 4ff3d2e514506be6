//! Record store for firelog.
//!
//! Every operation takes a borrowed [`rusqlite::Connection`] and performs one
//! statement (plus a re-read for writes). Callers own the connection's scope:
//! the HTTP layer checks one out of the pool per request and drops it on
//! every exit path.
//!
//! | Family | Table | Listing order |
//! |--------|-------|---------------|
//! | [`AddressKind::General`] | `addresses` (`kind = 'general'`) | newest first |
//! | [`AddressKind::UserAdded`] | `addresses` (`kind = 'user'`) | insertion order |
//! | [`AddressKind::Fire`] | `fire_addresses` | insertion order |
//! | [`ReferenceKind`] | `facilities`, `fire_stations` | id order, read-only |
//!
//! Address-like records are always returned with the owner's username joined
//! in, and writes re-read the stored row so server-assigned fields (`id`,
//! `created_at`) come from the database.
//!
//! [`AddressKind::General`]: firelog_types::AddressKind::General
//! [`AddressKind::UserAdded`]: firelog_types::AddressKind::UserAdded
//! [`AddressKind::Fire`]: firelog_types::AddressKind::Fire
//! [`ReferenceKind`]: firelog_types::ReferenceKind

mod addresses;
mod error;
mod reference;
mod users;

pub use addresses::{create_address, delete_address, get_address, list_addresses, update_address};
pub use error::StoreError;
pub use reference::{list_facilities, list_fire_stations, list_reference};
pub use users::{authenticate, create_user, user_exists};
