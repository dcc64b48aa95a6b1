// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use time::OffsetDateTime;
use tracing::info;
use vex_domain::VehicleRegNo;

use crate::backend::PersistenceBackend;
use crate::data_models::encode_timestamp;
use crate::diesel_schema::{applications, vehicles};
use crate::error::PersistenceError;
use crate::queries::users::get_user;
use crate::queries::vehicles::{find_vehicle, get_vehicle};

/// Returns the ID of the vehicle with this registration number, registering
/// it to `user_id` first if it does not exist yet.
///
/// # Errors
///
/// Returns an error if the lookup or insert fails.
pub fn resolve_vehicle(
    conn: &mut SqliteConnection,
    vehicle_reg_no: &VehicleRegNo,
    user_id: i64,
    now: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    if let Some(vehicle) = find_vehicle(conn, vehicle_reg_no)? {
        return Ok(vehicle.vehicle_id);
    }

    insert_vehicle(conn, vehicle_reg_no, user_id, now)
}

fn insert_vehicle(
    conn: &mut SqliteConnection,
    vehicle_reg_no: &VehicleRegNo,
    user_id: i64,
    now: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(vehicles::table)
        .values((
            vehicles::vehicle_reg_no.eq(vehicle_reg_no.value()),
            vehicles::user_id.eq(user_id),
            vehicles::created_at.eq(encode_timestamp(now)?),
        ))
        .execute(conn)?;

    let vehicle_id: i64 = conn.get_last_insert_rowid()?;
    info!(vehicle_id, vehicle_reg_no = vehicle_reg_no.value(), "Registered vehicle");

    Ok(vehicle_id)
}

/// Registers a vehicle to an existing user.
///
/// # Errors
///
/// Returns `PersistenceError::UserNotFound` if the owner does not exist,
/// `PersistenceError::VehicleRegistered` if the registration number is
/// already taken, or an error if the insert fails.
pub fn create_vehicle(
    conn: &mut SqliteConnection,
    vehicle_reg_no: &VehicleRegNo,
    user_id: i64,
    now: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    if get_user(conn, user_id)?.is_none() {
        return Err(PersistenceError::UserNotFound(user_id));
    }
    if find_vehicle(conn, vehicle_reg_no)?.is_some() {
        return Err(PersistenceError::VehicleRegistered(
            vehicle_reg_no.value().to_string(),
        ));
    }

    insert_vehicle(conn, vehicle_reg_no, user_id, now)
}

/// Corrects the registration number of a vehicle.
///
/// # Errors
///
/// Returns `PersistenceError::VehicleNotFound` if the vehicle does not
/// exist, `PersistenceError::VehicleRegistered` if another vehicle already
/// carries the number, or an error if the update fails.
pub fn update_vehicle(
    conn: &mut SqliteConnection,
    vehicle_id: i64,
    vehicle_reg_no: &VehicleRegNo,
) -> Result<(), PersistenceError> {
    if get_vehicle(conn, vehicle_id)?.is_none() {
        return Err(PersistenceError::VehicleNotFound(vehicle_id));
    }
    if let Some(existing) = find_vehicle(conn, vehicle_reg_no)?
        && existing.vehicle_id != vehicle_id
    {
        return Err(PersistenceError::VehicleRegistered(
            vehicle_reg_no.value().to_string(),
        ));
    }

    diesel::update(vehicles::table)
        .filter(vehicles::vehicle_id.eq(vehicle_id))
        .set(vehicles::vehicle_reg_no.eq(vehicle_reg_no.value()))
        .execute(conn)?;

    info!(vehicle_id, vehicle_reg_no = vehicle_reg_no.value(), "Updated vehicle");
    Ok(())
}

/// Deletes a vehicle that carries no applications.
///
/// # Errors
///
/// Returns `PersistenceError::VehicleNotFound` if the vehicle does not
/// exist, `PersistenceError::InUse` if applications still reference it, or
/// an error if the delete fails.
pub fn delete_vehicle(conn: &mut SqliteConnection, vehicle_id: i64) -> Result<(), PersistenceError> {
    if get_vehicle(conn, vehicle_id)?.is_none() {
        return Err(PersistenceError::VehicleNotFound(vehicle_id));
    }

    let applications_on_file: i64 = applications::table
        .filter(applications::vehicle_id.eq(vehicle_id))
        .count()
        .get_result(conn)?;
    if applications_on_file > 0 {
        return Err(PersistenceError::InUse {
            resource: "Vehicle",
            id: vehicle_id,
            referenced_by: "applications",
        });
    }

    diesel::delete(vehicles::table)
        .filter(vehicles::vehicle_id.eq(vehicle_id))
        .execute(conn)?;

    info!(vehicle_id, "Deleted vehicle");
    Ok(())
}
