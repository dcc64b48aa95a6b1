// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The explicit transaction handle.
//!
//! Every repository operation that writes goes through a [`Transaction`].
//! The handle is only obtainable from [`crate::Persistence::transaction`] or
//! [`Transaction::savepoint`], so a write can never run outside a scope that
//! commits on `Ok` and rolls back on `Err`.

use diesel::{Connection, SqliteConnection};
use time::OffsetDateTime;
use vex_audit::{AuditEvent, Cause};
use vex_domain::{
    Application, ApplicationDraft, ApplicationStatus, ApplicationView, Document, DocumentUpload,
    User, Vehicle, VehicleRegNo,
};

use crate::data_models::ApplicationSummary;
use crate::error::PersistenceError;
use crate::mutations::{self, SubmitOutcome};
use crate::queries;

/// A database handle scoped to one open transaction or savepoint.
pub struct Transaction<'a> {
    conn: &'a mut SqliteConnection,
}

/// Carries either the caller's error or a Diesel error out of a transaction
/// closure, so callers are not forced to implement `From<diesel::result::Error>`.
enum Scoped<E> {
    Caller(E),
    Database(diesel::result::Error),
}

impl<E> From<diesel::result::Error> for Scoped<E> {
    fn from(err: diesel::result::Error) -> Self {
        Self::Database(err)
    }
}

/// Runs `f` inside a transaction on `conn`. Nested calls become savepoints.
pub(crate) fn run_scoped<T, E, F>(conn: &mut SqliteConnection, f: F) -> Result<T, E>
where
    F: FnOnce(&mut Transaction<'_>) -> Result<T, E>,
    E: From<PersistenceError>,
{
    conn.transaction::<T, Scoped<E>, _>(|conn| {
        let mut tx: Transaction<'_> = Transaction { conn };
        f(&mut tx).map_err(Scoped::Caller)
    })
    .map_err(|err| match err {
        Scoped::Caller(err) => err,
        Scoped::Database(err) => E::from(PersistenceError::from(err)),
    })
}

impl Transaction<'_> {
    /// Runs `f` in a savepoint nested in this transaction.
    ///
    /// An `Err` from `f` rolls back only the savepoint; the enclosing
    /// transaction stays usable.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `f`, or a storage error if the savepoint
    /// cannot be opened or released.
    pub fn savepoint<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Transaction<'_>) -> Result<T, E>,
        E: From<PersistenceError>,
    {
        run_scoped(self.conn, f)
    }

    // ========================================================================
    // Applications
    // ========================================================================

    /// Records a new submission. See [`mutations::applications::submit_application`].
    ///
    /// # Errors
    ///
    /// Returns an error if validation, the duplicate check or any insert fails.
    pub fn submit_application(
        &mut self,
        draft: &ApplicationDraft,
        documents: &[DocumentUpload],
        cause: Cause,
        now: OffsetDateTime,
    ) -> Result<SubmitOutcome, PersistenceError> {
        mutations::applications::submit_application(self.conn, draft, documents, cause, now)
    }

    /// Retrieves an application by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_application(
        &mut self,
        application_id: i64,
    ) -> Result<Option<Application>, PersistenceError> {
        queries::applications::get_application(self.conn, application_id)
    }

    /// Retrieves an application by ID, failing when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::ApplicationNotFound` if absent.
    pub fn require_application(
        &mut self,
        application_id: i64,
    ) -> Result<Application, PersistenceError> {
        self.get_application(application_id)?
            .ok_or(PersistenceError::ApplicationNotFound(application_id))
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
        queries::applications::get_application_view(self.conn, application_id)?
            .ok_or(PersistenceError::ApplicationNotFound(application_id))
    }

    /// Retrieves every assembled application view, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_application_views(&mut self) -> Result<Vec<ApplicationView>, PersistenceError> {
        queries::applications::list_application_views(self.conn)
    }

    /// Retrieves every `Approved` application not yet final-approved.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_awaiting_final_approval(&mut self) -> Result<Vec<Application>, PersistenceError> {
        queries::applications::list_awaiting_final_approval(self.conn)
    }

    /// Writes a transitioned application, guarded on `expected` status.
    ///
    /// # Errors
    ///
    /// Returns `StaleWrite` if the stored status moved, or `ApplicationNotFound`.
    pub fn update_application(
        &mut self,
        application: &Application,
        expected: ApplicationStatus,
    ) -> Result<(), PersistenceError> {
        mutations::applications::update_application(self.conn, application, expected)
    }

    /// Hard-deletes an application.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::ApplicationNotFound` if absent.
    pub fn delete_application(&mut self, application_id: i64) -> Result<(), PersistenceError> {
        mutations::applications::delete_application(self.conn, application_id)
    }

    /// Counts applications by status and expiry class.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn application_summary(
        &mut self,
        now: OffsetDateTime,
    ) -> Result<ApplicationSummary, PersistenceError> {
        queries::applications::application_summary(self.conn, now)
    }

    // ========================================================================
    // Audit
    // ========================================================================

    /// Persists an audit event and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the insert fails.
    pub fn record_audit_event(&mut self, event: &AuditEvent) -> Result<i64, PersistenceError> {
        mutations::audit::persist_audit_event(self.conn, event)
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
        queries::audit::get_audit_timeline(self.conn, application_id)
    }

    // ========================================================================
    // Users
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
        mutations::users::create_user(self.conn, user, password, now)
    }

    /// Replaces a staff account's profile, and its password when one is given.
    ///
    /// # Errors
    ///
    /// Returns `UserNotFound` if absent, `EmailTaken` if another account uses
    /// the email, or a storage error.
    pub fn update_user(
        &mut self,
        user_id: i64,
        user: &User,
        password: Option<&str>,
    ) -> Result<(), PersistenceError> {
        mutations::users::update_user(self.conn, user_id, user, password)
    }

    /// Deletes a staff account that nothing references.
    ///
    /// # Errors
    ///
    /// Returns `UserNotFound` if absent, `InUse` if vehicles or applications
    /// reference the account, or a storage error.
    pub fn delete_user(&mut self, user_id: i64) -> Result<(), PersistenceError> {
        mutations::users::delete_user(self.conn, user_id)
    }

    /// Retrieves a user by ID, failing when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::UserNotFound` if absent.
    pub fn require_user(&mut self, user_id: i64) -> Result<User, PersistenceError> {
        queries::users::get_user(self.conn, user_id)?.ok_or(PersistenceError::UserNotFound(user_id))
    }

    /// Retrieves a user by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_user_by_email(&mut self, email: &str) -> Result<Option<User>, PersistenceError> {
        queries::users::get_user_by_email(self.conn, email)
    }

    /// Retrieves every user, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_users(&mut self) -> Result<Vec<User>, PersistenceError> {
        queries::users::list_users(self.conn)
    }

    // ========================================================================
    // Documents & Vehicles
    // ========================================================================

    /// Retrieves documents, optionally for one application only.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_documents(
        &mut self,
        application_id: Option<i64>,
    ) -> Result<Vec<Document>, PersistenceError> {
        queries::documents::list_documents(self.conn, application_id)
    }

    /// Retrieves a document by ID, failing when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::DocumentNotFound` if absent.
    pub fn require_document(&mut self, document_id: i64) -> Result<Document, PersistenceError> {
        queries::documents::get_document(self.conn, document_id)?
            .ok_or(PersistenceError::DocumentNotFound(document_id))
    }

    /// Corrects the type label of a document.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::DocumentNotFound` if absent.
    pub fn update_document_type(
        &mut self,
        document_id: i64,
        doc_type: &str,
        now: OffsetDateTime,
    ) -> Result<(), PersistenceError> {
        mutations::documents::update_document_type(self.conn, document_id, doc_type, now)
    }

    /// Deletes a document.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::DocumentNotFound` if absent.
    pub fn delete_document(&mut self, document_id: i64) -> Result<(), PersistenceError> {
        mutations::documents::delete_document(self.conn, document_id)
    }

    /// Retrieves every vehicle, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_vehicles(&mut self) -> Result<Vec<Vehicle>, PersistenceError> {
        queries::vehicles::list_vehicles(self.conn)
    }

    /// Retrieves a vehicle by ID, failing when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::VehicleNotFound` if absent.
    pub fn require_vehicle(&mut self, vehicle_id: i64) -> Result<Vehicle, PersistenceError> {
        queries::vehicles::get_vehicle(self.conn, vehicle_id)?
            .ok_or(PersistenceError::VehicleNotFound(vehicle_id))
    }

    /// Registers a vehicle to an existing user and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns `UserNotFound` for an unknown owner, `VehicleRegistered` if the
    /// number is taken, or a storage error.
    pub fn create_vehicle(
        &mut self,
        vehicle_reg_no: &VehicleRegNo,
        user_id: i64,
        now: OffsetDateTime,
    ) -> Result<i64, PersistenceError> {
        mutations::vehicles::create_vehicle(self.conn, vehicle_reg_no, user_id, now)
    }

    /// Corrects a vehicle's registration number.
    ///
    /// # Errors
    ///
    /// Returns `VehicleNotFound` if absent, `VehicleRegistered` if another
    /// vehicle carries the number, or a storage error.
    pub fn update_vehicle(
        &mut self,
        vehicle_id: i64,
        vehicle_reg_no: &VehicleRegNo,
    ) -> Result<(), PersistenceError> {
        mutations::vehicles::update_vehicle(self.conn, vehicle_id, vehicle_reg_no)
    }

    /// Deletes a vehicle that carries no applications.
    ///
    /// # Errors
    ///
    /// Returns `VehicleNotFound` if absent, `InUse` if applications reference
    /// it, or a storage error.
    pub fn delete_vehicle(&mut self, vehicle_id: i64) -> Result<(), PersistenceError> {
        mutations::vehicles::delete_vehicle(self.conn, vehicle_id)
    }
}
