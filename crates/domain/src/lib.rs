// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod application;
mod error;
mod expiry;
mod status;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use application::{
    Application, ApplicationDraft, ApplicationView, Document, DocumentRef, DocumentUpload,
    aggregate_documents, file_extension,
};
pub use expiry::{DUE_SOON_WINDOW, ExpiryClass, classify, compute_expiry};
pub use status::ApplicationStatus;

// Re-export public types
pub use error::DomainError;
pub use types::{Applicant, ExemptionCategory, Role, User, Vehicle, VehicleRegNo};
pub use validation::{
    MIN_PASSWORD_LENGTH, validate_draft, validate_new_user, validate_reason, validate_user_update,
};
