// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use vex::CoreError;
use vex_domain::ApplicationStatus;

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// A database error occurred.
    DatabaseError(String),
    /// Database connection failed.
    DatabaseConnectionFailed(String),
    /// Database migration failed.
    MigrationFailed(String),
    /// Query execution failed.
    QueryFailed(String),
    /// Serialization/deserialization error, including malformed stored values.
    SerializationError(String),
    /// Initialization error.
    InitializationError(String),
    /// Foreign key enforcement is not enabled.
    ForeignKeyEnforcementNotEnabled,
    /// The requested application was not found.
    ApplicationNotFound(i64),
    /// The requested user was not found.
    UserNotFound(i64),
    /// The requested document was not found.
    DocumentNotFound(i64),
    /// The requested vehicle was not found.
    VehicleNotFound(i64),
    /// A vehicle with this registration number is already registered.
    VehicleRegistered(String),
    /// The row cannot be deleted while other rows still reference it.
    InUse {
        resource: &'static str,
        id: i64,
        referenced_by: &'static str,
    },
    /// A non-rejected application already exists for this vehicle and applicant.
    DuplicateApplication {
        vehicle_reg_no: String,
        national_id: String,
        existing_application_id: i64,
    },
    /// A staff account with this email already exists.
    EmailTaken(String),
    /// A guarded update found the application in a different status than
    /// the one it was validated against.
    StaleWrite {
        application_id: i64,
        expected: ApplicationStatus,
    },
    /// The lifecycle rules refused the operation.
    Rejected(CoreError),
    /// The requested resource was not found.
    NotFound(String),
    /// A general error occurred.
    Other(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::DatabaseConnectionFailed(msg) => {
                write!(f, "Database connection failed: {msg}")
            }
            Self::MigrationFailed(msg) => write!(f, "Migration failed: {msg}"),
            Self::QueryFailed(msg) => write!(f, "Query failed: {msg}"),
            Self::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
            Self::InitializationError(msg) => write!(f, "Initialization error: {msg}"),
            Self::ForeignKeyEnforcementNotEnabled => {
                write!(f, "Foreign key enforcement is not enabled")
            }
            Self::ApplicationNotFound(id) => write!(f, "Application {id} not found"),
            Self::UserNotFound(id) => write!(f, "User {id} not found"),
            Self::DocumentNotFound(id) => write!(f, "Document {id} not found"),
            Self::VehicleNotFound(id) => write!(f, "Vehicle {id} not found"),
            Self::VehicleRegistered(reg) => {
                write!(f, "Vehicle {reg} is already registered")
            }
            Self::InUse {
                resource,
                id,
                referenced_by,
            } => write!(f, "{resource} {id} is still referenced by {referenced_by}"),
            Self::DuplicateApplication {
                vehicle_reg_no,
                national_id,
                existing_application_id,
            } => write!(
                f,
                "Vehicle {vehicle_reg_no} already has an open application \
                 ({existing_application_id}) for national id {national_id}"
            ),
            Self::EmailTaken(email) => write!(f, "A user with email {email} already exists"),
            Self::StaleWrite {
                application_id,
                expected,
            } => write!(
                f,
                "Application {application_id} is no longer in status '{}'",
                expected.as_str()
            ),
            Self::Rejected(err) => write!(f, "{err}"),
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::NotFound("Record not found".to_string()),
            _ => Self::DatabaseError(err.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<CoreError> for PersistenceError {
    fn from(err: CoreError) -> Self {
        Self::Rejected(err)
    }
}
