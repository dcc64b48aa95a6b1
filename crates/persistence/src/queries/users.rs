// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Staff account queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::debug;
use vex_domain::{Role, User};

use crate::diesel_schema::users;
use crate::error::PersistenceError;

/// Diesel Queryable struct for user rows.
///
/// The password hash is never selected.
#[derive(Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct UserRow {
    user_id: i64,
    email: String,
    first_name: String,
    middle_name: Option<String>,
    last_name: String,
    role_id: i32,
}

impl UserRow {
    fn into_domain(self) -> Result<User, PersistenceError> {
        let role: Role = Role::from_id(self.role_id)
            .map_err(|e| PersistenceError::SerializationError(e.to_string()))?;
        Ok(User {
            user_id: Some(self.user_id),
            email: self.email,
            first_name: self.first_name,
            middle_name: self.middle_name,
            last_name: self.last_name,
            role,
        })
    }
}

/// Retrieves a user by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the user is not found.
pub fn get_user(conn: &mut SqliteConnection, user_id: i64) -> Result<Option<User>, PersistenceError> {
    debug!(user_id, "Looking up user");

    users::table
        .filter(users::user_id.eq(user_id))
        .select(UserRow::as_select())
        .first(conn)
        .optional()?
        .map(UserRow::into_domain)
        .transpose()
}

/// Retrieves a user by email. The lookup is case-insensitive.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the user is not found.
pub fn get_user_by_email(
    conn: &mut SqliteConnection,
    email: &str,
) -> Result<Option<User>, PersistenceError> {
    let normalized_email: String = email.trim().to_lowercase();

    users::table
        .filter(users::email.eq(&normalized_email))
        .select(UserRow::as_select())
        .first(conn)
        .optional()?
        .map(UserRow::into_domain)
        .transpose()
}

/// Retrieves every user, ordered by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_users(conn: &mut SqliteConnection) -> Result<Vec<User>, PersistenceError> {
    users::table
        .order(users::user_id.asc())
        .select(UserRow::as_select())
        .load(conn)?
        .into_iter()
        .map(UserRow::into_domain)
        .collect()
}

