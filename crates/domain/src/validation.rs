// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::application::{ApplicationDraft, DocumentUpload};
use crate::error::DomainError;

/// Minimum accepted password length for staff accounts.
pub const MIN_PASSWORD_LENGTH: usize = 8;

fn require(value: &str, field: &'static str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::MissingField { field });
    }
    Ok(())
}

/// Validates an intake submission and its documents.
///
/// This function checks that every applicant field is present and that at
/// least one document with a usable path accompanies the submission.
/// It does NOT check for duplicates (that requires stored context).
///
/// # Errors
///
/// Returns an error if:
/// - The submitting user id is not positive
/// - The registration number or any applicant field is blank
/// - No documents were supplied
/// - A document has a blank file path
pub fn validate_draft(
    draft: &ApplicationDraft,
    documents: &[DocumentUpload],
) -> Result<(), DomainError> {
    if draft.user_id <= 0 {
        return Err(DomainError::MissingField { field: "user_id" });
    }

    require(draft.vehicle_reg_no.value(), "vehicle_reg_no")?;
    require(&draft.applicant.salutation, "salutation")?;
    require(&draft.applicant.first_name, "first_name")?;
    require(&draft.applicant.last_name, "last_name")?;
    require(&draft.applicant.address, "address")?;
    require(&draft.applicant.cell, "cell")?;
    require(&draft.applicant.national_id, "national_id")?;

    if documents.is_empty() {
        return Err(DomainError::NoDocuments);
    }

    for document in documents {
        require(&document.file_path, "file_path")?;
    }

    Ok(())
}

/// Validates a rejection reason and returns it trimmed.
///
/// # Errors
///
/// Returns `DomainError::MissingReason` if the reason is absent or blank.
pub fn validate_reason(reason: Option<&str>) -> Result<String, DomainError> {
    match reason.map(str::trim) {
        Some(r) if !r.is_empty() => Ok(r.to_string()),
        _ => Err(DomainError::MissingReason),
    }
}

fn validate_profile(email: &str, first_name: &str, last_name: &str) -> Result<(), DomainError> {
    let email: &str = email.trim();
    let well_formed: bool = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !well_formed {
        return Err(DomainError::InvalidEmail(email.to_string()));
    }

    require(first_name, "first_name")?;
    require(last_name, "last_name")
}

fn validate_password(password: &str) -> Result<(), DomainError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(DomainError::WeakPassword {
            min_length: MIN_PASSWORD_LENGTH,
        });
    }
    Ok(())
}

/// Validates a new staff account.
///
/// # Errors
///
/// Returns an error if:
/// - The email is blank or lacks a local part and domain
/// - The first or last name is blank
/// - The password is shorter than [`MIN_PASSWORD_LENGTH`]
pub fn validate_new_user(
    email: &str,
    first_name: &str,
    last_name: &str,
    password: &str,
) -> Result<(), DomainError> {
    validate_profile(email, first_name, last_name)?;
    validate_password(password)
}

/// Validates changes to an existing staff account.
///
/// The password is optional; when present it must meet the same minimum
/// length as for a new account.
///
/// # Errors
///
/// Returns the same errors as [`validate_new_user`].
pub fn validate_user_update(
    email: &str,
    first_name: &str,
    last_name: &str,
    password: Option<&str>,
) -> Result<(), DomainError> {
    validate_profile(email, first_name, last_name)?;
    password.map_or(Ok(()), validate_password)
}
