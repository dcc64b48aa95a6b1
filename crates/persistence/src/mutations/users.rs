// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use time::OffsetDateTime;
use tracing::info;
use vex_domain::User;

use crate::backend::PersistenceBackend;
use crate::data_models::encode_timestamp;
use crate::diesel_schema::{applications, users, vehicles};
use crate::error::PersistenceError;
use crate::queries::users::{get_user, get_user_by_email};

/// bcrypt work factor. Debug builds use the minimum so test suites stay fast.
const PASSWORD_HASH_COST: u32 = if cfg!(debug_assertions) {
    4
} else {
    bcrypt::DEFAULT_COST
};

fn hash_password(password: &str) -> Result<String, PersistenceError> {
    bcrypt::hash(password, PASSWORD_HASH_COST)
        .map_err(|e| PersistenceError::Other(format!("Failed to hash password: {e}")))
}

/// Creates a new staff account.
///
/// The email is expected in normalized (lowercase) form, as produced by
/// `User::new`.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `user` - The account details (its `user_id` is ignored)
/// * `password` - The plain-text password (will be hashed)
/// * `now` - The creation instant
///
/// # Errors
///
/// Returns `PersistenceError::EmailTaken` if the email is already in use, or
/// an error if hashing or the insert fails.
pub fn create_user(
    conn: &mut SqliteConnection,
    user: &User,
    password: &str,
    now: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    if get_user_by_email(conn, &user.email)?.is_some() {
        return Err(PersistenceError::EmailTaken(user.email.clone()));
    }

    let password_hash: String = hash_password(password)?;

    diesel::insert_into(users::table)
        .values((
            users::email.eq(&user.email),
            users::first_name.eq(&user.first_name),
            users::middle_name.eq(user.middle_name.as_deref()),
            users::last_name.eq(&user.last_name),
            users::password_hash.eq(&password_hash),
            users::role_id.eq(user.role.id()),
            users::created_at.eq(encode_timestamp(now)?),
        ))
        .execute(conn)?;

    let user_id: i64 = conn.get_last_insert_rowid()?;

    info!(user_id, email = %user.email, role = user.role.as_str(), "Created user");

    Ok(user_id)
}

/// Replaces the profile of an existing staff account.
///
/// The password hash is only replaced when `password` is given.
///
/// # Errors
///
/// Returns `PersistenceError::UserNotFound` if the account does not exist,
/// `PersistenceError::EmailTaken` if another account already uses the email,
/// or an error if hashing or the update fails.
pub fn update_user(
    conn: &mut SqliteConnection,
    user_id: i64,
    user: &User,
    password: Option<&str>,
) -> Result<(), PersistenceError> {
    if get_user(conn, user_id)?.is_none() {
        return Err(PersistenceError::UserNotFound(user_id));
    }

    if let Some(existing) = get_user_by_email(conn, &user.email)?
        && existing.user_id != Some(user_id)
    {
        return Err(PersistenceError::EmailTaken(user.email.clone()));
    }

    diesel::update(users::table)
        .filter(users::user_id.eq(user_id))
        .set((
            users::email.eq(&user.email),
            users::first_name.eq(&user.first_name),
            users::middle_name.eq(user.middle_name.as_deref()),
            users::last_name.eq(&user.last_name),
            users::role_id.eq(user.role.id()),
        ))
        .execute(conn)?;

    if let Some(password) = password {
        let password_hash: String = hash_password(password)?;
        diesel::update(users::table)
            .filter(users::user_id.eq(user_id))
            .set(users::password_hash.eq(&password_hash))
            .execute(conn)?;
    }

    info!(
        user_id,
        email = %user.email,
        role = user.role.as_str(),
        password_changed = password.is_some(),
        "Updated user"
    );

    Ok(())
}

/// Deletes a staff account.
///
/// Accounts that own vehicles or submitted applications are kept.
///
/// # Errors
///
/// Returns `PersistenceError::UserNotFound` if the account does not exist,
/// `PersistenceError::InUse` if rows still reference it, or an error if the
/// delete fails.
pub fn delete_user(conn: &mut SqliteConnection, user_id: i64) -> Result<(), PersistenceError> {
    if get_user(conn, user_id)?.is_none() {
        return Err(PersistenceError::UserNotFound(user_id));
    }

    let owned_vehicles: i64 = vehicles::table
        .filter(vehicles::user_id.eq(user_id))
        .count()
        .get_result(conn)?;
    if owned_vehicles > 0 {
        return Err(PersistenceError::InUse {
            resource: "User",
            id: user_id,
            referenced_by: "vehicles",
        });
    }

    let submitted: i64 = applications::table
        .filter(applications::user_id.eq(user_id))
        .count()
        .get_result(conn)?;
    if submitted > 0 {
        return Err(PersistenceError::InUse {
            resource: "User",
            id: user_id,
            referenced_by: "applications",
        });
    }

    diesel::delete(users::table)
        .filter(users::user_id.eq(user_id))
        .execute(conn)?;

    info!(user_id, "Deleted user");
    Ok(())
}
