// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use tracing::error;
use vex::CoreError;
use vex_domain::DomainError;
use vex_persistence::PersistenceError;

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// A non-rejected application already exists for the vehicle and applicant.
    DuplicateApplication {
        /// The existing application.
        existing_application_id: i64,
        /// A human-readable description of the conflict.
        message: String,
    },
    /// The requested action is not permitted from the application's status.
    IllegalTransition {
        /// The application the action targeted.
        application_id: i64,
        /// A human-readable description of why the action was refused.
        message: String,
    },
    /// The write clashes with existing rows: a taken email or registration
    /// number, or a row that is still referenced.
    Conflict {
        /// A human-readable description of the conflict.
        message: String,
    },
    /// The storage layer failed.
    Storage {
        /// A description of the storage failure.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::DuplicateApplication { message, .. } => {
                write!(f, "Duplicate application: {message}")
            }
            Self::IllegalTransition { message, .. } => {
                write!(f, "Illegal transition: {message}")
            }
            Self::Conflict { message } => write!(f, "Conflict: {message}"),
            Self::Storage { message } => write!(f, "Storage error: {message}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        translate_persistence_error(err)
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        translate_core_error(err)
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        translate_domain_error(err)
    }
}

fn invalid(field: &str, err: &DomainError) -> ApiError {
    ApiError::InvalidInput {
        field: field.to_string(),
        message: err.to_string(),
    }
}

fn not_found(resource_type: &str, message: String) -> ApiError {
    ApiError::ResourceNotFound {
        resource_type: resource_type.to_string(),
        message,
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::MissingField { field } => invalid(field, &err),
        DomainError::NoDocuments => invalid("documents", &err),
        DomainError::InvalidCategory(_) => invalid("category", &err),
        DomainError::InvalidStatus(_) => invalid("status", &err),
        DomainError::InvalidRole(_) => invalid("role", &err),
        DomainError::InvalidEmail(_) => invalid("email", &err),
        DomainError::WeakPassword { .. } => invalid("password", &err),
        DomainError::MissingReason => invalid("reason", &err),
        DomainError::ActorRequired { .. } => invalid("actor_id", &err),
        DomainError::NotARenewal { .. } => invalid("application_id", &err),
        DomainError::DateArithmeticOverflow { .. } => invalid("date", &err),
        DomainError::IllegalTransition { application_id, .. } => ApiError::IllegalTransition {
            application_id,
            message: err.to_string(),
        },
        DomainError::ApplicationNotFound(id) => {
            not_found("Application", format!("Application {id} does not exist"))
        }
        DomainError::UserNotFound(id) => not_found("User", format!("User {id} does not exist")),
        DomainError::DocumentNotFound(id) => {
            not_found("Document", format!("Document {id} does not exist"))
        }
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
    }
}

/// Translates a persistence error into an API error.
///
/// Failures that are not part of the API contract are logged and reported
/// as `Storage`.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::ApplicationNotFound(id) => {
            translate_domain_error(DomainError::ApplicationNotFound(id))
        }
        PersistenceError::UserNotFound(id) => translate_domain_error(DomainError::UserNotFound(id)),
        PersistenceError::DocumentNotFound(id) => {
            translate_domain_error(DomainError::DocumentNotFound(id))
        }
        PersistenceError::VehicleNotFound(id) => {
            not_found("Vehicle", format!("Vehicle {id} does not exist"))
        }
        PersistenceError::NotFound(message) => not_found("Resource", message),
        PersistenceError::DuplicateApplication {
            existing_application_id,
            ..
        } => ApiError::DuplicateApplication {
            existing_application_id,
            message: err.to_string(),
        },
        PersistenceError::StaleWrite { application_id, .. } => ApiError::IllegalTransition {
            application_id,
            message: err.to_string(),
        },
        PersistenceError::EmailTaken(_)
        | PersistenceError::VehicleRegistered(_)
        | PersistenceError::InUse { .. } => ApiError::Conflict {
            message: err.to_string(),
        },
        PersistenceError::Rejected(core_err) => translate_core_error(core_err),
        PersistenceError::DatabaseError(_)
        | PersistenceError::DatabaseConnectionFailed(_)
        | PersistenceError::MigrationFailed(_)
        | PersistenceError::QueryFailed(_)
        | PersistenceError::SerializationError(_)
        | PersistenceError::InitializationError(_)
        | PersistenceError::ForeignKeyEnforcementNotEnabled
        | PersistenceError::Other(_) => {
            error!(error = %err, "Storage failure");
            ApiError::Storage {
                message: err.to_string(),
            }
        }
    }
}
