// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::status::ApplicationStatus;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A required submission field is missing or blank.
    MissingField {
        /// The name of the missing field.
        field: &'static str,
    },
    /// A submission arrived without any supporting documents.
    NoDocuments,
    /// Exemption category string is not recognised.
    InvalidCategory(String),
    /// Application status string is not recognised.
    InvalidStatus(String),
    /// Role string or identifier is not recognised.
    InvalidRole(String),
    /// Email address is empty or malformed.
    InvalidEmail(String),
    /// Password does not meet the minimum length.
    WeakPassword {
        /// The minimum accepted length.
        min_length: usize,
    },
    /// A rejection was requested without a reason.
    MissingReason,
    /// The command requires an acting user but none was supplied.
    ActorRequired {
        /// The action that was attempted.
        action: &'static str,
    },
    /// A renewal-only action was attempted on a non-renewal application.
    NotARenewal {
        /// The application that is not a renewal.
        application_id: i64,
    },
    /// The lifecycle state machine does not permit the requested action.
    IllegalTransition {
        /// The application the action targeted.
        application_id: i64,
        /// The current status of the application.
        from: ApplicationStatus,
        /// The action that was attempted.
        action: &'static str,
        /// Why the transition is not allowed.
        reason: String,
    },
    /// Application does not exist.
    ApplicationNotFound(i64),
    /// User does not exist.
    UserNotFound(i64),
    /// Document does not exist.
    DocumentNotFound(i64),
    /// Date arithmetic overflow.
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField { field } => write!(f, "Field '{field}' is required"),
            Self::NoDocuments => write!(f, "At least one supporting document is required"),
            Self::InvalidCategory(value) => write!(f, "Invalid exemption category: '{value}'"),
            Self::InvalidStatus(value) => write!(f, "Invalid application status: '{value}'"),
            Self::InvalidRole(value) => write!(f, "Invalid role: '{value}'"),
            Self::InvalidEmail(value) => write!(f, "Invalid email address: '{value}'"),
            Self::WeakPassword { min_length } => {
                write!(f, "Password must be at least {min_length} characters long")
            }
            Self::MissingReason => write!(f, "A rejection reason is required"),
            Self::ActorRequired { action } => {
                write!(f, "Action '{action}' requires an acting user")
            }
            Self::NotARenewal { application_id } => {
                write!(f, "Application {application_id} is not a renewal application")
            }
            Self::IllegalTransition {
                application_id,
                from,
                action,
                reason,
            } => write!(
                f,
                "Cannot {action} application {application_id} in status '{}': {reason}",
                from.as_str()
            ),
            Self::ApplicationNotFound(id) => write!(f, "Application {id} not found"),
            Self::UserNotFound(id) => write!(f, "User {id} not found"),
            Self::DocumentNotFound(id) => write!(f, "Document {id} not found"),
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow while {operation}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
