// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    Applicant, ApplicationDraft, DocumentUpload, DomainError, ExemptionCategory, VehicleRegNo,
    validate_draft, validate_new_user, validate_reason, validate_user_update,
};

fn create_test_draft() -> ApplicationDraft {
    ApplicationDraft {
        user_id: 1,
        vehicle_reg_no: VehicleRegNo::new("ABC123"),
        applicant: Applicant::new("Mr", "John", "Doe", "63-1234", "1 Main St", "0771000000"),
        category: ExemptionCategory::WarVeteran,
    }
}

#[test]
fn test_validate_draft_accepts_complete_submission() {
    let documents: Vec<DocumentUpload> = vec![DocumentUpload::new("regbook.pdf")];
    assert_eq!(validate_draft(&create_test_draft(), &documents), Ok(()));
}

#[test]
fn test_validate_draft_rejects_blank_national_id() {
    let mut draft: ApplicationDraft = create_test_draft();
    draft.applicant.national_id = String::from("   ");
    let documents: Vec<DocumentUpload> = vec![DocumentUpload::new("regbook.pdf")];

    assert_eq!(
        validate_draft(&draft, &documents),
        Err(DomainError::MissingField {
            field: "national_id"
        })
    );
}

#[test]
fn test_validate_draft_rejects_blank_registration() {
    let mut draft: ApplicationDraft = create_test_draft();
    draft.vehicle_reg_no = VehicleRegNo::new(" ");
    let documents: Vec<DocumentUpload> = vec![DocumentUpload::new("regbook.pdf")];

    assert_eq!(
        validate_draft(&draft, &documents),
        Err(DomainError::MissingField {
            field: "vehicle_reg_no"
        })
    );
}

#[test]
fn test_validate_draft_requires_documents() {
    assert_eq!(
        validate_draft(&create_test_draft(), &[]),
        Err(DomainError::NoDocuments)
    );
}

#[test]
fn test_validate_draft_rejects_blank_document_path() {
    let documents: Vec<DocumentUpload> =
        vec![DocumentUpload::new("a.pdf"), DocumentUpload::new("  ")];
    assert_eq!(
        validate_draft(&create_test_draft(), &documents),
        Err(DomainError::MissingField { field: "file_path" })
    );
}

#[test]
fn test_validate_reason() {
    assert_eq!(
        validate_reason(Some("  expired licence ")),
        Ok(String::from("expired licence"))
    );
    assert_eq!(validate_reason(Some("   ")), Err(DomainError::MissingReason));
    assert_eq!(validate_reason(None), Err(DomainError::MissingReason));
}

#[test]
fn test_validate_new_user() {
    assert!(validate_new_user("clerk@example.com", "Ada", "Clerk", "password1").is_ok());
    assert!(matches!(
        validate_new_user("not-an-email", "Ada", "Clerk", "password1"),
        Err(DomainError::InvalidEmail(_))
    ));
    assert!(matches!(
        validate_new_user("clerk@example.com", "Ada", "Clerk", "short"),
        Err(DomainError::WeakPassword { min_length: 8 })
    ));
    assert_eq!(
        validate_new_user("clerk@example.com", "", "Clerk", "password1"),
        Err(DomainError::MissingField {
            field: "first_name"
        })
    );
}

#[test]
fn test_validate_user_update_password_is_optional() {
    assert!(validate_user_update("clerk@example.com", "Ada", "Clerk", None).is_ok());
    assert!(validate_user_update("clerk@example.com", "Ada", "Clerk", Some("password2")).is_ok());
    assert!(matches!(
        validate_user_update("clerk@example.com", "Ada", "Clerk", Some("short")),
        Err(DomainError::WeakPassword { min_length: 8 })
    ));
    assert_eq!(
        validate_user_update("clerk@example.com", "Ada", " ", None),
        Err(DomainError::MissingField { field: "last_name" })
    );
}
