//! Read-only projections over the reference tables.
//!
//! Facilities and fire stations are loaded outside this service; nothing
//! here writes to them.

use firelog_types::{Facility, FireStation, ReferenceKind, ReferenceRecord};
use rusqlite::Connection;

use crate::error::StoreError;

/// Lists every row of a reference table in id order.
pub fn list_reference(conn: &Connection, kind: ReferenceKind) -> Result<Vec<ReferenceRecord>, StoreError> {
    let records = match kind {
        ReferenceKind::Facilities => list_facilities(conn)?
            .into_iter()
            .map(ReferenceRecord::Facility)
            .collect(),
        ReferenceKind::FireStations => list_fire_stations(conn)?
            .into_iter()
            .map(ReferenceRecord::FireStation)
            .collect(),
    };
    Ok(records)
}

pub fn list_facilities(conn: &Connection) -> Result<Vec<Facility>, StoreError> {
    let mut stmt =
        conn.prepare("SELECT id, name, address, lat, lng, type FROM facilities ORDER BY id ASC")?;
    let rows = stmt.query_map([], |row| {
        Ok(Facility {
            id: row.get(0)?,
            name: row.get(1)?,
            address: row.get(2)?,
            lat: row.get(3)?,
            lng: row.get(4)?,
            facility_type: row.get(5)?,
        })
    })?;

    let mut facilities = Vec::new();
    for row in rows {
        facilities.push(row?);
    }
    Ok(facilities)
}

pub fn list_fire_stations(conn: &Connection) -> Result<Vec<FireStation>, StoreError> {
    let mut stmt =
        conn.prepare("SELECT id, name, address, type FROM fire_stations ORDER BY id ASC")?;
    let rows = stmt.query_map([], |row| {
        Ok(FireStation {
            id: row.get(0)?,
            name: row.get(1)?,
            address: row.get(2)?,
            station_type: row.get(3)?,
        })
    })?;

    let mut stations = Vec::new();
    for row in rows {
        stations.push(row?);
    }
    Ok(stations)
}
