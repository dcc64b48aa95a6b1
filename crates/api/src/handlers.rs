// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.
//!
//! Every lifecycle operation runs as one persistence transaction: resolve the
//! actor, read the application, validate and apply the command, write the
//! result guarded on the status it was read with, and record the audit event.

use std::str::FromStr;
use time::OffsetDateTime;
use tracing::{debug, info};
use vex::{Command, TransitionResult, apply, available_commands};
use vex_audit::{Actor, AuditEvent, Cause};
use vex_domain::{
    Applicant, Application, ApplicationDraft, ApplicationStatus, ApplicationView, Document,
    DocumentUpload, DomainError, ExemptionCategory, ExpiryClass, Role, User, Vehicle,
    VehicleRegNo, validate_new_user, validate_user_update,
};
use vex_persistence::{ApplicationSummary, SqlitePersistence, SubmitOutcome, Transaction};

use crate::error::ApiError;
use crate::request_response::{
    ApplicationFilter, ApplicationInfo, AuditEventInfo, AuditTimelineResponse, CreateUserRequest,
    CreateVehicleRequest, DeleteResponse, DocumentInfo, DocumentInput, GetSummaryResponse,
    ListApplicationsResponse, ListDocumentsResponse, ListUsersResponse, ListVehiclesResponse,
    RejectRequest, SubmitApplicationRequest, SubmitApplicationResponse, TransitionRequest,
    TransitionResponse, UpdateUserRequest, UserInfo, VehicleInfo,
};

// ============================================================================
// Shared transition plumbing
// ============================================================================

/// Resolves the acting user inside an open transaction.
///
/// An absent id yields [`Actor::unattributed`]; commands that need a staff
/// actor refuse it when applied.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` if the user does not exist.
pub(crate) fn resolve_actor(
    tx: &mut Transaction<'_>,
    actor_id: Option<i64>,
) -> Result<Actor, ApiError> {
    let Some(actor_id) = actor_id else {
        return Ok(Actor::unattributed());
    };
    let user: User = tx.require_user(actor_id)?;
    Ok(Actor::for_user(actor_id, &user.email, user.role))
}

/// Applies `command` to an application already read in this transaction and
/// writes the result, returning the new application and audit event ID.
///
/// # Errors
///
/// Returns an error if the command is refused, the stored status moved since
/// `current` was read, or a write fails.
pub(crate) fn apply_and_write(
    tx: &mut Transaction<'_>,
    current: &Application,
    command: Command,
    actor: Actor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<(Application, i64), ApiError> {
    let result: TransitionResult = apply(current, command, actor, cause, now)?;
    tx.update_application(&result.new_application, current.status)?;
    let event_id: i64 = tx.record_audit_event(&result.audit_event)?;
    Ok((result.new_application, event_id))
}

/// Reads an application and transitions it within `tx`.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` if the application does not exist,
/// or any error from [`apply_and_write`].
pub(crate) fn transition_in(
    tx: &mut Transaction<'_>,
    application_id: i64,
    command: Command,
    actor: Actor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<(Application, i64), ApiError> {
    let current: Application = tx.require_application(application_id)?;
    apply_and_write(tx, &current, command, actor, cause, now)
}

fn run_transition(
    persistence: &mut SqlitePersistence,
    application_id: i64,
    actor_id: Option<i64>,
    command: Command,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<TransitionResponse, ApiError> {
    let action: &'static str = command.action_name();

    let (application, event_id): (Application, i64) = persistence.transaction(|tx| {
        let actor: Actor = resolve_actor(tx, actor_id)?;
        transition_in(tx, application_id, command, actor, cause, now)
    })?;

    info!(
        application_id,
        action,
        status = application.status.as_str(),
        event_id,
        "Application transitioned"
    );

    Ok(TransitionResponse {
        application_id,
        status: application.status.as_str().to_string(),
        expiry_date: application.expiry_date,
        is_renewal: application.is_renewal,
        renewal_count: application.renewal_count,
        event_id,
        message: format!(
            "Application {application_id} is now {}",
            application.status.as_str()
        ),
    })
}

// ============================================================================
// Intake
// ============================================================================

fn to_upload(document: &DocumentInput) -> DocumentUpload {
    match document.doc_type.as_deref() {
        Some(doc_type) => DocumentUpload::labelled(&document.file_path, doc_type),
        None => DocumentUpload::new(&document.file_path),
    }
}

/// Submits a new exemption application with its documents.
///
/// The vehicle is registered on first use. Nothing is written when any step
/// fails.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The submission
/// * `cause` - The cause for this action
/// * `now` - The submission instant
///
/// # Returns
///
/// * `Ok(SubmitApplicationResponse)` with the new application id
/// * `Err(ApiError)` if the submission is refused
///
/// # Errors
///
/// Returns an error if:
/// - The category is not recognised
/// - A required field is blank or no documents were supplied
/// - The submitting user does not exist
/// - A non-rejected application exists for the same vehicle and national id
/// - Database operations fail
pub fn submit_application(
    persistence: &mut SqlitePersistence,
    request: &SubmitApplicationRequest,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<SubmitApplicationResponse, ApiError> {
    let category: ExemptionCategory = ExemptionCategory::from_str(&request.category)?;

    let draft: ApplicationDraft = ApplicationDraft {
        user_id: request.user_id,
        vehicle_reg_no: VehicleRegNo::new(&request.vehicle_reg_no),
        applicant: Applicant::new(
            &request.salutation,
            &request.first_name,
            &request.last_name,
            &request.national_id,
            &request.address,
            &request.cell,
        ),
        category,
    };
    let documents: Vec<DocumentUpload> = request.documents.iter().map(to_upload).collect();

    let outcome: SubmitOutcome = persistence.submit_application(&draft, &documents, cause, now)?;

    info!(
        application_id = outcome.application_id,
        vehicle_reg_no = draft.vehicle_reg_no.value(),
        category = category.as_str(),
        documents = outcome.document_ids.len(),
        "Application submitted"
    );

    Ok(SubmitApplicationResponse {
        application_id: outcome.application_id,
        vehicle_id: outcome.vehicle_id,
        status: ApplicationStatus::Pending.as_str().to_string(),
        document_count: outcome.document_ids.len(),
        event_id: outcome.event_id,
        message: format!(
            "Application {} submitted for vehicle {}",
            outcome.application_id,
            draft.vehicle_reg_no.value()
        ),
    })
}

// ============================================================================
// Lifecycle transitions
// ============================================================================

/// First-level approval of a pending application.
///
/// Sets the approval stamps and an expiry one year from `now`.
///
/// # Errors
///
/// Returns an error if the actor or application does not exist, no actor was
/// supplied, or the application is not `Pending`.
pub fn approve(
    persistence: &mut SqlitePersistence,
    request: TransitionRequest,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<TransitionResponse, ApiError> {
    run_transition(
        persistence,
        request.application_id,
        request.actor_id,
        Command::Approve,
        cause,
        now,
    )
}

/// Final approval of an approved application or a pending renewal.
///
/// The expiry is recomputed from `now`. Granting a renewal increments the
/// renewal count and closes the renewal.
///
/// # Errors
///
/// Returns an error if the actor or application does not exist, no actor was
/// supplied, or the status does not permit final approval.
pub fn final_approve(
    persistence: &mut SqlitePersistence,
    request: TransitionRequest,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<TransitionResponse, ApiError> {
    run_transition(
        persistence,
        request.application_id,
        request.actor_id,
        Command::FinalApprove,
        cause,
        now,
    )
}

/// Rejects a pending or approved application with a reason.
///
/// # Errors
///
/// Returns an error if:
/// - The reason is missing or blank
/// - No actor was supplied, or the actor does not exist
/// - The application does not exist
/// - The application is already rejected or final-approved
pub fn reject(
    persistence: &mut SqlitePersistence,
    request: RejectRequest,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<TransitionResponse, ApiError> {
    run_transition(
        persistence,
        request.application_id,
        request.actor_id,
        Command::Reject {
            reason: request.reason,
        },
        cause,
        now,
    )
}

/// Opens a renewal on an exemption whose expiry has passed.
///
/// The actor is optional. Without one the renewal is recorded as
/// unattributed.
///
/// # Errors
///
/// Returns an error if the application does not exist, a supplied actor does
/// not exist, or the exemption is not granted and expired.
pub fn renew(
    persistence: &mut SqlitePersistence,
    request: TransitionRequest,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<TransitionResponse, ApiError> {
    run_transition(
        persistence,
        request.application_id,
        request.actor_id,
        Command::Renew,
        cause,
        now,
    )
}

/// Rejects an open renewal.
///
/// # Errors
///
/// Returns `ApiError::InvalidInput` if the application is not a renewal, or
/// an error if the actor or application does not exist.
pub fn reject_renewal(
    persistence: &mut SqlitePersistence,
    request: TransitionRequest,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<TransitionResponse, ApiError> {
    run_transition(
        persistence,
        request.application_id,
        request.actor_id,
        Command::RejectRenewal,
        cause,
        now,
    )
}

// ============================================================================
// Application reads
// ============================================================================

fn application_info(view: ApplicationView, now: OffsetDateTime) -> ApplicationInfo {
    let available_actions: Vec<String> = available_commands(&view.application, now)
        .into_iter()
        .map(ToString::to_string)
        .collect();
    let expiry_class: Option<ExpiryClass> = view.application.expiry_class(now);
    let application: Application = view.application;

    ApplicationInfo {
        application_id: application.id_or_default(),
        vehicle_id: application.vehicle_id,
        vehicle_reg_no: view.vehicle_reg_no,
        user_id: application.user_id,
        salutation: application.applicant.salutation,
        first_name: application.applicant.first_name,
        last_name: application.applicant.last_name,
        national_id: application.applicant.national_id,
        address: application.applicant.address,
        cell: application.applicant.cell,
        status: application.status.as_str().to_string(),
        notes: application.notes,
        documents: view.documents,
        primary_type: view.primary_type,
        created_at: application.created_at,
        updated_at: application.updated_at,
        approved_at: application.approved_at,
        approved_by: application.approved_by,
        final_approved_at: application.final_approved_at,
        final_approved_by: application.final_approved_by,
        rejected_at: application.rejected_at,
        rejected_by: application.rejected_by,
        expiry_date: application.expiry_date,
        expiry_class,
        is_renewal: application.is_renewal,
        renewal_count: application.renewal_count,
        available_actions,
    }
}

/// Retrieves one application with its vehicle and aggregated documents.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` if the application does not exist.
pub fn get_application(
    persistence: &mut SqlitePersistence,
    application_id: i64,
    now: OffsetDateTime,
) -> Result<ApplicationInfo, ApiError> {
    let view: ApplicationView = persistence.get_application_view(application_id)?;
    Ok(application_info(view, now))
}

/// Lists applications ordered by id, narrowed by `filter`.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_applications(
    persistence: &mut SqlitePersistence,
    filter: &ApplicationFilter,
    now: OffsetDateTime,
) -> Result<ListApplicationsResponse, ApiError> {
    let views: Vec<ApplicationView> = persistence.list_applications()?;
    let total: usize = views.len();

    let applications: Vec<ApplicationInfo> = views
        .into_iter()
        .filter(|view| filter.matches(&view.application, now))
        .map(|view| application_info(view, now))
        .collect();

    debug!(total, matched = applications.len(), "Listed applications");

    Ok(ListApplicationsResponse { applications })
}

/// Lists granted exemptions whose expiry has passed.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_expired(
    persistence: &mut SqlitePersistence,
    now: OffsetDateTime,
) -> Result<ListApplicationsResponse, ApiError> {
    let applications: Vec<ApplicationInfo> = persistence
        .list_applications()?
        .into_iter()
        .filter(|view| view.application.status.is_granted() && view.application.is_expired(now))
        .map(|view| application_info(view, now))
        .collect();

    Ok(ListApplicationsResponse { applications })
}

/// Hard-deletes an application. Its documents and audit timeline are kept.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` if the application does not exist.
pub fn delete_application(
    persistence: &mut SqlitePersistence,
    application_id: i64,
) -> Result<DeleteResponse, ApiError> {
    persistence.delete_application(application_id)?;

    info!(application_id, "Application deleted");

    Ok(DeleteResponse {
        id: application_id,
        message: format!("Application {application_id} deleted"),
    })
}

/// Computes dashboard counts as of `now`.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_summary(
    persistence: &mut SqlitePersistence,
    now: OffsetDateTime,
) -> Result<GetSummaryResponse, ApiError> {
    let summary: ApplicationSummary = persistence.application_summary(now)?;
    Ok(GetSummaryResponse {
        as_of: now,
        summary,
    })
}

/// Retrieves the audit timeline for an application.
///
/// The timeline outlives the application, so an unknown or deleted id is not
/// an error.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_audit_timeline(
    persistence: &mut SqlitePersistence,
    application_id: i64,
) -> Result<AuditTimelineResponse, ApiError> {
    let events: Vec<AuditEventInfo> = persistence
        .get_audit_timeline(application_id)?
        .into_iter()
        .map(|event: AuditEvent| AuditEventInfo {
            event_id: event.event_id.unwrap_or_default(),
            actor_id: event.actor.id,
            actor_type: event.actor.actor_type,
            actor_email: event.actor.email,
            action: event.action.name,
            details: event.action.details,
            before: event.before.data,
            after: event.after.data,
            occurred_at: event.occurred_at,
        })
        .collect();

    Ok(AuditTimelineResponse {
        application_id,
        events,
    })
}

// ============================================================================
// Users
// ============================================================================

fn user_info(user: User) -> UserInfo {
    UserInfo {
        user_id: user.user_id.unwrap_or_default(),
        email: user.email,
        first_name: user.first_name,
        middle_name: user.middle_name,
        last_name: user.last_name,
        role: user.role.as_str().to_string(),
    }
}

/// Creates a staff account.
///
/// # Errors
///
/// Returns an error if:
/// - The role is not recognised
/// - The email is malformed, a name is blank, or the password is too short
/// - The email is already in use
/// - Database operations fail
pub fn create_user(
    persistence: &mut SqlitePersistence,
    request: &CreateUserRequest,
    now: OffsetDateTime,
) -> Result<UserInfo, ApiError> {
    let role: Role = Role::from_str(&request.role)?;
    validate_new_user(
        &request.email,
        &request.first_name,
        &request.last_name,
        &request.password,
    )?;

    let mut user: User = User::new(
        &request.email,
        &request.first_name,
        request.middle_name.as_deref(),
        &request.last_name,
        role,
    );
    let user_id: i64 = persistence.create_user(&user, &request.password, now)?;
    user.user_id = Some(user_id);

    Ok(user_info(user))
}

/// Replaces a staff account's profile, and its password when one is given.
///
/// # Errors
///
/// Returns an error if:
/// - The role is not recognised
/// - The email is malformed, a name is blank, or a new password is too short
/// - The account does not exist
/// - Another account already uses the email
/// - Database operations fail
pub fn update_user(
    persistence: &mut SqlitePersistence,
    user_id: i64,
    request: &UpdateUserRequest,
) -> Result<UserInfo, ApiError> {
    let role: Role = Role::from_str(&request.role)?;
    validate_user_update(
        &request.email,
        &request.first_name,
        &request.last_name,
        request.password.as_deref(),
    )?;

    let user: User = User::new(
        &request.email,
        &request.first_name,
        request.middle_name.as_deref(),
        &request.last_name,
        role,
    );
    let updated: User = persistence.transaction(|tx| {
        tx.update_user(user_id, &user, request.password.as_deref())?;
        tx.require_user(user_id)
    })?;

    info!(user_id, email = %updated.email, "User updated");

    Ok(user_info(updated))
}

/// Deletes a staff account that owns no vehicles or applications.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` if the account does not exist, or
/// `ApiError::Conflict` if vehicles or applications still reference it.
pub fn delete_user(
    persistence: &mut SqlitePersistence,
    user_id: i64,
) -> Result<DeleteResponse, ApiError> {
    persistence.delete_user(user_id)?;
    Ok(DeleteResponse {
        id: user_id,
        message: format!("User {user_id} deleted"),
    })
}

/// Lists staff accounts ordered by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_users(persistence: &mut SqlitePersistence) -> Result<ListUsersResponse, ApiError> {
    let users: Vec<UserInfo> = persistence
        .list_users()?
        .into_iter()
        .map(user_info)
        .collect();
    Ok(ListUsersResponse { users })
}

// ============================================================================
// Documents & Vehicles
// ============================================================================

fn document_info(document: Document) -> DocumentInfo {
    DocumentInfo {
        document_id: document.document_id,
        application_id: document.application_id,
        doc_type: document.doc_type,
        file_path: document.file_path,
        file_type: document.file_type,
        created_at: document.created_at,
        updated_at: document.updated_at,
    }
}

/// Lists document rows, optionally for one application.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_documents(
    persistence: &mut SqlitePersistence,
    application_id: Option<i64>,
) -> Result<ListDocumentsResponse, ApiError> {
    let documents: Vec<DocumentInfo> = persistence
        .list_documents(application_id)?
        .into_iter()
        .map(document_info)
        .collect();
    Ok(ListDocumentsResponse { documents })
}

/// Corrects the type label of a stored document.
///
/// # Errors
///
/// Returns `ApiError::InvalidInput` for a blank type, or
/// `ApiError::ResourceNotFound` if the document does not exist.
pub fn update_document_type(
    persistence: &mut SqlitePersistence,
    document_id: i64,
    doc_type: &str,
    now: OffsetDateTime,
) -> Result<DocumentInfo, ApiError> {
    let doc_type: &str = doc_type.trim();
    if doc_type.is_empty() {
        return Err(DomainError::MissingField { field: "doc_type" }.into());
    }

    let document: Document = persistence.transaction(|tx| {
        tx.update_document_type(document_id, doc_type, now)?;
        tx.require_document(document_id)
    })?;

    info!(document_id, doc_type, "Document type corrected");

    Ok(document_info(document))
}

/// Deletes a stored document row.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` if the document does not exist.
pub fn delete_document(
    persistence: &mut SqlitePersistence,
    document_id: i64,
) -> Result<DeleteResponse, ApiError> {
    persistence.transaction(|tx| tx.delete_document(document_id))?;
    Ok(DeleteResponse {
        id: document_id,
        message: format!("Document {document_id} deleted"),
    })
}

fn vehicle_info(vehicle: Vehicle) -> VehicleInfo {
    VehicleInfo {
        vehicle_id: vehicle.vehicle_id,
        vehicle_reg_no: vehicle.vehicle_reg_no.value().to_string(),
        user_id: vehicle.user_id,
        created_at: vehicle.created_at,
    }
}

fn parse_reg_no(raw: &str) -> Result<VehicleRegNo, ApiError> {
    let vehicle_reg_no: VehicleRegNo = VehicleRegNo::new(raw);
    if vehicle_reg_no.value().is_empty() {
        return Err(DomainError::MissingField {
            field: "vehicle_reg_no",
        }
        .into());
    }
    Ok(vehicle_reg_no)
}

/// Lists registered vehicles ordered by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_vehicles(
    persistence: &mut SqlitePersistence,
) -> Result<ListVehiclesResponse, ApiError> {
    let vehicles: Vec<VehicleInfo> = persistence
        .list_vehicles()?
        .into_iter()
        .map(vehicle_info)
        .collect();
    Ok(ListVehiclesResponse { vehicles })
}

/// Registers a vehicle to an existing user ahead of any application.
///
/// # Errors
///
/// Returns an error if:
/// - The registration number is blank
/// - The owning user does not exist
/// - The registration number is already registered
/// - Database operations fail
pub fn create_vehicle(
    persistence: &mut SqlitePersistence,
    request: &CreateVehicleRequest,
    now: OffsetDateTime,
) -> Result<VehicleInfo, ApiError> {
    let vehicle_reg_no: VehicleRegNo = parse_reg_no(&request.vehicle_reg_no)?;

    let vehicle: Vehicle = persistence.transaction(|tx| {
        let vehicle_id: i64 = tx.create_vehicle(&vehicle_reg_no, request.user_id, now)?;
        tx.require_vehicle(vehicle_id)
    })?;

    Ok(vehicle_info(vehicle))
}

/// Corrects the registration number of a vehicle. Its applications follow.
///
/// # Errors
///
/// Returns `ApiError::InvalidInput` for a blank number,
/// `ApiError::ResourceNotFound` if the vehicle does not exist, or
/// `ApiError::Conflict` if another vehicle already carries the number.
pub fn update_vehicle(
    persistence: &mut SqlitePersistence,
    vehicle_id: i64,
    vehicle_reg_no: &str,
) -> Result<VehicleInfo, ApiError> {
    let vehicle_reg_no: VehicleRegNo = parse_reg_no(vehicle_reg_no)?;

    let vehicle: Vehicle = persistence.transaction(|tx| {
        tx.update_vehicle(vehicle_id, &vehicle_reg_no)?;
        tx.require_vehicle(vehicle_id)
    })?;

    Ok(vehicle_info(vehicle))
}

/// Deletes a vehicle that carries no applications.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` if the vehicle does not exist, or
/// `ApiError::Conflict` if applications still reference it.
pub fn delete_vehicle(
    persistence: &mut SqlitePersistence,
    vehicle_id: i64,
) -> Result<DeleteResponse, ApiError> {
    persistence.delete_vehicle(vehicle_id)?;
    Ok(DeleteResponse {
        id: vehicle_id,
        message: format!("Vehicle {vehicle_id} deleted"),
    })
}
