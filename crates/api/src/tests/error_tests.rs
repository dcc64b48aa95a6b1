// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use vex::CoreError;
use vex_domain::{ApplicationStatus, DomainError};
use vex_persistence::PersistenceError;

use crate::{ApiError, translate_core_error, translate_domain_error, translate_persistence_error};

#[test]
fn test_validation_errors_name_the_field() {
    let err: ApiError = translate_domain_error(DomainError::MissingField { field: "cell" });
    assert!(matches!(err, ApiError::InvalidInput { field, .. } if field == "cell"));

    let err: ApiError = translate_domain_error(DomainError::NotARenewal { application_id: 3 });
    assert!(matches!(err, ApiError::InvalidInput { .. }));
}

#[test]
fn test_illegal_transition_keeps_application_id() {
    let err: ApiError = translate_core_error(CoreError::DomainViolation(
        DomainError::IllegalTransition {
            application_id: 5,
            from: ApplicationStatus::Rejected,
            action: "approve",
            reason: String::from("only pending applications can be approved"),
        },
    ));
    assert!(matches!(err, ApiError::IllegalTransition { application_id: 5, .. }));
}

#[test]
fn test_stale_write_is_an_illegal_transition() {
    let err: ApiError = translate_persistence_error(PersistenceError::StaleWrite {
        application_id: 8,
        expected: ApplicationStatus::Approved,
    });
    assert!(matches!(err, ApiError::IllegalTransition { application_id: 8, .. }));
}

#[test]
fn test_not_found_variants() {
    for (err, resource) in [
        (PersistenceError::ApplicationNotFound(1), "Application"),
        (PersistenceError::UserNotFound(1), "User"),
        (PersistenceError::DocumentNotFound(1), "Document"),
        (PersistenceError::VehicleNotFound(1), "Vehicle"),
    ] {
        assert!(matches!(
            translate_persistence_error(err),
            ApiError::ResourceNotFound { resource_type, .. } if resource_type == resource
        ));
    }
}

#[test]
fn test_rejected_submission_unwraps_domain_error() {
    let err: ApiError = ApiError::from(PersistenceError::Rejected(CoreError::DomainViolation(
        DomainError::NoDocuments,
    )));
    assert!(matches!(err, ApiError::InvalidInput { field, .. } if field == "documents"));
}

#[test]
fn test_storage_failures_are_opaque() {
    let err: ApiError =
        translate_persistence_error(PersistenceError::QueryFailed(String::from("disk I/O error")));
    assert!(matches!(err, ApiError::Storage { .. }));
    assert!(err.to_string().contains("disk I/O error"));
}

#[test]
fn test_clashes_are_conflicts() {
    for err in [
        PersistenceError::EmailTaken(String::from("clerk@example.com")),
        PersistenceError::VehicleRegistered(String::from("ABC123")),
        PersistenceError::InUse {
            resource: "Vehicle",
            id: 2,
            referenced_by: "applications",
        },
    ] {
        assert!(matches!(translate_persistence_error(err), ApiError::Conflict { .. }));
    }
}
