// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{ApplicationStatus, DomainError};

#[test]
fn test_domain_error_display() {
    let err: DomainError = DomainError::MissingField {
        field: "national_id",
    };
    assert_eq!(format!("{err}"), "Field 'national_id' is required");

    let err: DomainError = DomainError::NoDocuments;
    assert_eq!(
        format!("{err}"),
        "At least one supporting document is required"
    );

    let err: DomainError = DomainError::MissingReason;
    assert_eq!(format!("{err}"), "A rejection reason is required");

    let err: DomainError = DomainError::NotARenewal { application_id: 7 };
    assert_eq!(
        format!("{err}"),
        "Application 7 is not a renewal application"
    );

    let err: DomainError = DomainError::ApplicationNotFound(3);
    assert_eq!(format!("{err}"), "Application 3 not found");

    let err: DomainError = DomainError::UserNotFound(9);
    assert_eq!(format!("{err}"), "User 9 not found");
}

#[test]
fn test_illegal_transition_display_uses_canonical_status() {
    let err: DomainError = DomainError::IllegalTransition {
        application_id: 1,
        from: ApplicationStatus::FinalApproved,
        action: "approve",
        reason: String::from("only pending applications can be approved"),
    };
    assert_eq!(
        format!("{err}"),
        "Cannot approve application 1 in status 'finalApproved': only pending applications can be approved"
    );
}
