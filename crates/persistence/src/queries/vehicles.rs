// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use vex_domain::{Vehicle, VehicleRegNo};

use crate::data_models::decode_timestamp;
use crate::diesel_schema::vehicles;
use crate::error::PersistenceError;

/// Diesel Queryable struct for vehicle rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = vehicles)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct VehicleRow {
    vehicle_id: i64,
    vehicle_reg_no: String,
    user_id: i64,
    created_at: String,
}

impl VehicleRow {
    fn into_domain(self) -> Result<Vehicle, PersistenceError> {
        Ok(Vehicle {
            vehicle_id: self.vehicle_id,
            vehicle_reg_no: VehicleRegNo::new(&self.vehicle_reg_no),
            user_id: self.user_id,
            created_at: decode_timestamp(&self.created_at)?,
        })
    }
}

/// Retrieves a vehicle by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the vehicle is not found.
pub fn get_vehicle(
    conn: &mut SqliteConnection,
    vehicle_id: i64,
) -> Result<Option<Vehicle>, PersistenceError> {
    vehicles::table
        .filter(vehicles::vehicle_id.eq(vehicle_id))
        .select(VehicleRow::as_select())
        .first(conn)
        .optional()?
        .map(VehicleRow::into_domain)
        .transpose()
}

/// Retrieves the vehicle with the given registration number.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if no such vehicle is registered.
pub fn find_vehicle(
    conn: &mut SqliteConnection,
    vehicle_reg_no: &VehicleRegNo,
) -> Result<Option<Vehicle>, PersistenceError> {
    vehicles::table
        .filter(vehicles::vehicle_reg_no.eq(vehicle_reg_no.value()))
        .select(VehicleRow::as_select())
        .first(conn)
        .optional()?
        .map(VehicleRow::into_domain)
        .transpose()
}

/// Retrieves every vehicle, ordered by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_vehicles(conn: &mut SqliteConnection) -> Result<Vec<Vehicle>, PersistenceError> {
    vehicles::table
        .order(vehicles::vehicle_id.asc())
        .select(VehicleRow::as_select())
        .load(conn)?
        .into_iter()
        .map(VehicleRow::into_domain)
        .collect()
}
