// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Application mutations.
//!
//! Lifecycle writes are guarded: an update only lands if the stored status
//! still equals the status the transition was validated against.

use diesel::prelude::*;
use diesel::SqliteConnection;
use num_traits::ToPrimitive;
use time::OffsetDateTime;
use tracing::{info, warn};
use vex::{CoreError, IntakeResult, apply_intake};
use vex_audit::{Actor, Cause};
use vex_domain::{
    Application, ApplicationDraft, ApplicationStatus, DocumentUpload, User, validate_draft,
};

use crate::backend::PersistenceBackend;
use crate::data_models::{encode_optional_timestamp, encode_timestamp};
use crate::diesel_schema::applications;
use crate::error::PersistenceError;
use crate::mutations::audit::persist_audit_event;
use crate::mutations::documents::insert_document;
use crate::mutations::vehicles::resolve_vehicle;
use crate::queries::applications::find_open_duplicate;
use crate::queries::users::get_user;

/// Column values of an application row, shared by insert and update.
#[derive(Insertable, AsChangeset)]
#[diesel(table_name = applications)]
#[diesel(treat_none_as_null = true)]
struct ApplicationValues<'a> {
    vehicle_id: i64,
    user_id: i64,
    salutation: &'a str,
    first_name: &'a str,
    last_name: &'a str,
    national_id: &'a str,
    address: &'a str,
    cell: &'a str,
    status: &'a str,
    notes: Option<&'a str>,
    created_at: String,
    updated_at: Option<String>,
    updated_by: Option<i64>,
    approved_at: Option<String>,
    approved_by: Option<&'a str>,
    final_approved_at: Option<String>,
    final_approved_by: Option<&'a str>,
    rejected_at: Option<String>,
    rejected_by: Option<&'a str>,
    expiry_date: Option<String>,
    is_renewal: i32,
    renewal_count: i32,
}

impl<'a> ApplicationValues<'a> {
    fn from_application(application: &'a Application) -> Result<Self, PersistenceError> {
        let renewal_count: i32 = application.renewal_count.to_i32().ok_or_else(|| {
            PersistenceError::SerializationError(format!(
                "renewal_count {} does not fit a column",
                application.renewal_count
            ))
        })?;

        Ok(Self {
            vehicle_id: application.vehicle_id,
            user_id: application.user_id,
            salutation: &application.applicant.salutation,
            first_name: &application.applicant.first_name,
            last_name: &application.applicant.last_name,
            national_id: &application.applicant.national_id,
            address: &application.applicant.address,
            cell: &application.applicant.cell,
            status: application.status.as_str(),
            notes: application.notes.as_deref(),
            created_at: encode_timestamp(application.created_at)?,
            updated_at: encode_optional_timestamp(application.updated_at)?,
            updated_by: application.updated_by,
            approved_at: encode_optional_timestamp(application.approved_at)?,
            approved_by: application.approved_by.as_deref(),
            final_approved_at: encode_optional_timestamp(application.final_approved_at)?,
            final_approved_by: application.final_approved_by.as_deref(),
            rejected_at: encode_optional_timestamp(application.rejected_at)?,
            rejected_by: application.rejected_by.as_deref(),
            expiry_date: encode_optional_timestamp(application.expiry_date)?,
            is_renewal: i32::from(application.is_renewal),
            renewal_count,
        })
    }
}

/// Identifiers assigned by a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub application_id: i64,
    pub vehicle_id: i64,
    pub document_ids: Vec<i64>,
    pub event_id: i64,
}

/// Inserts a new application row.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_application(
    conn: &mut SqliteConnection,
    application: &Application,
) -> Result<i64, PersistenceError> {
    let values: ApplicationValues<'_> = ApplicationValues::from_application(application)?;

    diesel::insert_into(applications::table)
        .values(&values)
        .execute(conn)?;

    conn.get_last_insert_rowid()
}

/// Writes a transitioned application back, guarded on its previous status.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `application` - The application after the transition
/// * `expected` - The status the transition was validated against
///
/// # Errors
///
/// Returns an error if:
/// - The application has never been persisted, or no longer exists
/// - The stored status differs from `expected` (`StaleWrite`)
/// - The update fails
pub fn update_application(
    conn: &mut SqliteConnection,
    application: &Application,
    expected: ApplicationStatus,
) -> Result<(), PersistenceError> {
    let application_id: i64 = application.application_id.ok_or_else(|| {
        PersistenceError::Other(String::from("Cannot update an unsaved application"))
    })?;
    let values: ApplicationValues<'_> = ApplicationValues::from_application(application)?;

    let affected: usize = diesel::update(applications::table)
        .filter(applications::application_id.eq(application_id))
        .filter(applications::status.eq(expected.as_str()))
        .set(&values)
        .execute(conn)?;

    if affected == 0 {
        let exists: bool = diesel::select(diesel::dsl::exists(
            applications::table.filter(applications::application_id.eq(application_id)),
        ))
        .get_result(conn)?;

        if !exists {
            return Err(PersistenceError::ApplicationNotFound(application_id));
        }

        warn!(application_id, expected = expected.as_str(), "Guarded update lost a race");
        return Err(PersistenceError::StaleWrite {
            application_id,
            expected,
        });
    }

    info!(
        application_id,
        from = expected.as_str(),
        to = application.status.as_str(),
        "Updated application status"
    );
    Ok(())
}

/// Hard-deletes an application. Its documents and audit events remain.
///
/// # Errors
///
/// Returns `PersistenceError::ApplicationNotFound` if no row matched.
pub fn delete_application(
    conn: &mut SqliteConnection,
    application_id: i64,
) -> Result<(), PersistenceError> {
    let affected: usize = diesel::delete(applications::table)
        .filter(applications::application_id.eq(application_id))
        .execute(conn)?;

    if affected == 0 {
        return Err(PersistenceError::ApplicationNotFound(application_id));
    }

    info!(application_id, "Deleted application");
    Ok(())
}

/// Records a new submission: duplicate check, vehicle resolve-or-create,
/// application insert, document inserts and the intake audit event.
///
/// Must run inside a transaction; any error leaves the caller to roll back.
///
/// # Errors
///
/// Returns an error if:
/// - The draft or its documents fail validation (`Rejected`)
/// - The submitting user does not exist
/// - A non-rejected application exists for the same vehicle and national id
/// - Any insert fails
pub fn submit_application(
    conn: &mut SqliteConnection,
    draft: &ApplicationDraft,
    documents: &[DocumentUpload],
    cause: Cause,
    now: OffsetDateTime,
) -> Result<SubmitOutcome, PersistenceError> {
    validate_draft(draft, documents).map_err(CoreError::from)?;

    let submitter: User =
        get_user(conn, draft.user_id)?.ok_or(PersistenceError::UserNotFound(draft.user_id))?;

    let national_id: &str = &draft.applicant.national_id;
    if let Some(existing_application_id) =
        find_open_duplicate(conn, draft.vehicle_reg_no.value(), national_id)?
    {
        warn!(
            vehicle_reg_no = draft.vehicle_reg_no.value(),
            existing_application_id, "Duplicate submission refused"
        );
        return Err(PersistenceError::DuplicateApplication {
            vehicle_reg_no: draft.vehicle_reg_no.value().to_string(),
            national_id: national_id.to_string(),
            existing_application_id,
        });
    }

    let vehicle_id: i64 = resolve_vehicle(conn, &draft.vehicle_reg_no, draft.user_id, now)?;

    let actor: Actor = Actor::for_user(draft.user_id, &submitter.email, submitter.role);
    let intake: IntakeResult = apply_intake(draft, documents, vehicle_id, actor, cause, now)?;

    let application_id: i64 = insert_application(conn, &intake.application)?;

    let mut document_ids: Vec<i64> = Vec::with_capacity(documents.len());
    for document in documents {
        let document_id: i64 = insert_document(
            conn,
            application_id,
            &document.resolved_type(draft.category),
            &document.file_path,
            &document.file_type(),
            now,
        )?;
        document_ids.push(document_id);
    }

    let event_id: i64 =
        persist_audit_event(conn, &intake.audit_event.for_application(application_id))?;

    info!(
        application_id,
        vehicle_id,
        documents = document_ids.len(),
        "Application submitted"
    );

    Ok(SubmitOutcome {
        application_id,
        vehicle_id,
        document_ids,
        event_id,
    })
}
