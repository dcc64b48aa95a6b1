// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the vehicle exemption workflow.
//!
//! Stores users, vehicles, applications, documents and the audit trail in
//! `SQLite` through Diesel. Migrations are embedded and applied on open.
//!
//! ## Transactions
//!
//! Writes happen through [`Transaction`], obtained from
//! [`Persistence::transaction`]. The closure's `Ok` commits and its `Err`
//! rolls back. [`Transaction::savepoint`] nests a savepoint so bulk
//! operations can fail one item without abandoning the rest.
//!
//! ## Testing
//!
//! [`Persistence::new_in_memory`] gives every caller its own isolated
//! shared-cache in-memory database.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::OffsetDateTime;
use vex_audit::{AuditEvent, Cause};
use vex_domain::{
    Application, ApplicationDraft, ApplicationView, Document, DocumentUpload, User, Vehicle,
    VehicleRegNo,
};

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod transaction;

#[cfg(test)]
mod tests;

pub use data_models::ApplicationSummary;
pub use error::PersistenceError;
pub use mutations::SubmitOutcome;
pub use transaction::Transaction;

use backend::PersistenceBackend;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Name used by the server and API layers.
pub type SqlitePersistence = Persistence;

/// The application repository.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:memdb_test_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        conn.verify_foreign_key_enforcement()?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        conn.verify_foreign_key_enforcement()?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        self.conn.verify_foreign_key_enforcement()
    }

    /// Runs `f` inside one database transaction.
    ///
    /// The transaction commits when `f` returns `Ok` and rolls back when it
    /// returns `Err`. Any error type that can absorb a [`PersistenceError`]
    /// may be used.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `f`, or a storage error if the
    /// transaction cannot be opened or committed.
    pub fn transaction<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Transaction<'_>) -> Result<T, E>,
        E: From<PersistenceError>,
    {
        transaction::run_scoped(&mut self.conn, f)
    }

    // ========================================================================
    // Applications
    // ========================================================================

    /// Records a new submission atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The draft fails validation
    /// - The submitting user does not exist
    /// - A non-rejected application exists for the vehicle and national id
    /// - Any insert fails (nothing is written in that case)
    pub fn submit_application(
        &mut self,
        draft: &ApplicationDraft,
        documents: &[DocumentUpload],
        cause: Cause,
        now: OffsetDateTime,
    ) -> Result<SubmitOutcome, PersistenceError> {
        self.transaction(|tx| tx.submit_application(draft, documents, cause, now))
    }

    /// Retrieves an application by ID.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::ApplicationNotFound` if absent.
    pub fn get_application(&mut self, application_id: i64) -> Result<Application, PersistenceError> {
        self.transaction(|tx| tx.require_application(application_id))
    }

    /// Retrieves the assembled view of one application.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::ApplicationNotFound` if absent.
    pub fn get_application_view(
        &mut self,
        application_id: i64,
    ) -> Result<ApplicationView, PersistenceError> {
        self.transaction(|tx| tx.get_application_view(application_id))
    }

    /// Retrieves every assembled application view, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_applications(&mut self) -> Result<Vec<ApplicationView>, PersistenceError> {
        self.transaction(|tx| tx.list_application_views())
    }

    /// Hard-deletes an application. Documents and audit events are kept.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::ApplicationNotFound` if absent.
    pub fn delete_application(&mut self, application_id: i64) -> Result<(), PersistenceError> {
        self.transaction(|tx| tx.delete_application(application_id))
    }

    /// Counts applications by status and expiry class as of `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn application_summary(
        &mut self,
        now: OffsetDateTime,
    ) -> Result<ApplicationSummary, PersistenceError> {
        self.transaction(|tx| tx.application_summary(now))
    }

    /// Retrieves the audit timeline of an application, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query or deserialization fails.
    pub fn get_audit_timeline(
        &mut self,
        application_id: i64,
    ) -> Result<Vec<AuditEvent>, PersistenceError> {
        self.transaction(|tx| tx.get_audit_timeline(application_id))
    }

    // ========================================================================
    // Users, Documents & Vehicles
    // ========================================================================

    /// Creates a staff account and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns `EmailTaken` for a duplicate email, or a storage error.
    pub fn create_user(
        &mut self,
        user: &User,
        password: &str,
        now: OffsetDateTime,
    ) -> Result<i64, PersistenceError> {
        self.transaction(|tx| tx.create_user(user, password, now))
    }

    /// Replaces a staff account's profile, and its password when one is given.
    ///
    /// # Errors
    ///
    /// Returns `UserNotFound`, `EmailTaken`, or a storage error.
    pub fn update_user(
        &mut self,
        user_id: i64,
        user: &User,
        password: Option<&str>,
    ) -> Result<(), PersistenceError> {
        self.transaction(|tx| tx.update_user(user_id, user, password))
    }

    /// Deletes a staff account that nothing references.
    ///
    /// # Errors
    ///
    /// Returns `UserNotFound`, `InUse`, or a storage error.
    pub fn delete_user(&mut self, user_id: i64) -> Result<(), PersistenceError> {
        self.transaction(|tx| tx.delete_user(user_id))
    }

    /// Retrieves a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::UserNotFound` if absent.
    pub fn get_user(&mut self, user_id: i64) -> Result<User, PersistenceError> {
        self.transaction(|tx| tx.require_user(user_id))
    }

    /// Retrieves every user, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_users(&mut self) -> Result<Vec<User>, PersistenceError> {
        self.transaction(|tx| tx.list_users())
    }

    /// Retrieves documents, optionally for one application only.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_documents(
        &mut self,
        application_id: Option<i64>,
    ) -> Result<Vec<Document>, PersistenceError> {
        self.transaction(|tx| tx.list_documents(application_id))
    }

    /// Retrieves every vehicle, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_vehicles(&mut self) -> Result<Vec<Vehicle>, PersistenceError> {
        self.transaction(|tx| tx.list_vehicles())
    }

    /// Retrieves a vehicle by ID.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::VehicleNotFound` if absent.
    pub fn get_vehicle(&mut self, vehicle_id: i64) -> Result<Vehicle, PersistenceError> {
        self.transaction(|tx| tx.require_vehicle(vehicle_id))
    }

    /// Registers a vehicle to an existing user and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns `UserNotFound`, `VehicleRegistered`, or a storage error.
    pub fn create_vehicle(
        &mut self,
        vehicle_reg_no: &VehicleRegNo,
        user_id: i64,
        now: OffsetDateTime,
    ) -> Result<i64, PersistenceError> {
        self.transaction(|tx| tx.create_vehicle(vehicle_reg_no, user_id, now))
    }

    /// Corrects a vehicle's registration number.
    ///
    /// # Errors
    ///
    /// Returns `VehicleNotFound`, `VehicleRegistered`, or a storage error.
    pub fn update_vehicle(
        &mut self,
        vehicle_id: i64,
        vehicle_reg_no: &VehicleRegNo,
    ) -> Result<(), PersistenceError> {
        self.transaction(|tx| tx.update_vehicle(vehicle_id, vehicle_reg_no))
    }

    /// Deletes a vehicle that carries no applications.
    ///
    /// # Errors
    ///
    /// Returns `VehicleNotFound`, `InUse`, or a storage error.
    pub fn delete_vehicle(&mut self, vehicle_id: i64) -> Result<(), PersistenceError> {
        self.transaction(|tx| tx.delete_vehicle(vehicle_id))
    }
}
