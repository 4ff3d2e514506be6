//! Shared types for the firelog service.
//!
//! Holds the record kinds, the wire shapes returned by the record store, and
//! the fixed text format used for `created_at` timestamps. Every other crate
//! in the workspace takes these definitions from here so the HTTP layer and
//! the store agree on one serialization.

use serde::{Deserialize, Serialize};

/// Database identifier of a user account.
pub type UserId = i64;

/// Text format of every `created_at` value, e.g. `2024-05-01 13:45:09`.
pub const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Returns the current local time rendered in [`CREATED_AT_FORMAT`].
pub fn timestamp_now() -> String {
    chrono::Local::now().format(CREATED_AT_FORMAT).to_string()
}

/// The address-like record families kept by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressKind {
    /// A general saved location tied to the account that created it.
    General,
    /// A location the user personally added to their own list.
    UserAdded,
    /// A fire-incident location log entry, carrying a `cause`.
    Fire,
}

impl AddressKind {
    /// Value of the `kind` discriminator column for kinds stored in the
    /// shared `addresses` table. `Fire` lives in its own table.
    pub fn discriminator(self) -> Option<&'static str> {
        match self {
            Self::General => Some("general"),
            Self::UserAdded => Some("user"),
            Self::Fire => None,
        }
    }

    /// Whether records of this kind carry incident details.
    pub fn has_cause(self) -> bool {
        matches!(self, Self::Fire)
    }

    /// Human-readable entity name used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::General => "address",
            Self::UserAdded => "user address",
            Self::Fire => "fire address",
        }
    }
}

/// Read-only reference tables populated outside this service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferenceKind {
    Facilities,
    FireStations,
}

/// Incident fields attached to fire-address records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentDetails {
    /// Free-text description of what caused the incident.
    pub cause: Option<String>,
}

/// An address-like record with its owner's username joined in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressRecord {
    pub id: i64,
    pub address: String,
    pub memo: Option<String>,
    /// Owner's username. `None` only if the owning row disappeared out-of-band.
    pub username: Option<String>,
    /// Insertion time in [`CREATED_AT_FORMAT`].
    pub created_at: Option<String>,
    pub user_id: UserId,
    /// Present for [`AddressKind::Fire`] records only.
    #[serde(flatten)]
    pub incident: Option<IncidentDetails>,
}

/// Editable fields of an address-like record.
///
/// `cause` is ignored for kinds without incident details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressFields {
    pub address: String,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub cause: Option<String>,
}

/// A facility from the `facilities` reference table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    #[serde(rename = "type")]
    pub facility_type: Option<String>,
}

/// A fire station from the `fire_stations` reference table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FireStation {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
    #[serde(rename = "type")]
    pub station_type: Option<String>,
}

/// One row of a reference table, serialized as its bare fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReferenceRecord {
    Facility(Facility),
    FireStation(FireStation),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_table_kinds_have_distinct_discriminators() {
        assert_eq!(AddressKind::General.discriminator(), Some("general"));
        assert_eq!(AddressKind::UserAdded.discriminator(), Some("user"));
        assert_eq!(AddressKind::Fire.discriminator(), None);
    }

    #[test]
    fn timestamp_matches_format() {
        let now = timestamp_now();
        chrono::NaiveDateTime::parse_from_str(&now, CREATED_AT_FORMAT)
            .expect("timestamp should parse back with the same format");
        assert_eq!(now.len(), "2024-01-01 00:00:00".len());
    }

    #[test]
    fn general_record_omits_cause() {
        let record = AddressRecord {
            id: 1,
            address: "Seoul".to_string(),
            memo: None,
            username: Some("alice".to_string()),
            created_at: Some("2024-01-01 09:00:00".to_string()),
            user_id: 7,
            incident: None,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("cause").is_none());
        assert_eq!(json["username"], "alice");
        assert_eq!(json["user_id"], 7);
    }

    #[test]
    fn fire_record_flattens_cause() {
        let record = AddressRecord {
            id: 2,
            address: "Busan".to_string(),
            memo: Some("warehouse".to_string()),
            username: Some("bob".to_string()),
            created_at: Some("2024-01-01 09:00:00".to_string()),
            user_id: 3,
            incident: Some(IncidentDetails { cause: None }),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("cause").is_some());
        assert!(json["cause"].is_null());
    }

    #[test]
    fn reference_record_serializes_type_field() {
        let station = ReferenceRecord::FireStation(FireStation {
            id: 1,
            name: "Central".to_string(),
            address: Some("1 Main St".to_string()),
            station_type: Some("119 safety center".to_string()),
        });
        let json = serde_json::to_value(&station).unwrap();
        assert_eq!(json["type"], "119 safety center");
        assert!(json.get("FireStation").is_none());
    }
}
