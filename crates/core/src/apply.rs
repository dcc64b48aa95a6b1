// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use crate::error::CoreError;
use crate::state::{IntakeResult, TransitionResult};
use time::OffsetDateTime;
use vex_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use vex_domain::{
    Application, ApplicationDraft, ApplicationStatus, DocumentUpload, DomainError, compute_expiry,
    validate_draft, validate_reason,
};

/// Identity of a staff user stamped onto an application.
struct Stamp {
    user_id: i64,
    email: String,
}

/// Extracts the staff identity from the actor, if the command needs one.
fn resolve_stamp(command: &Command, actor: &Actor) -> Result<Option<Stamp>, DomainError> {
    match (actor.user_id, actor.email.as_ref()) {
        (Some(user_id), Some(email)) => Ok(Some(Stamp {
            user_id,
            email: email.clone(),
        })),
        _ if command.actor_optional() => Ok(None),
        _ => Err(DomainError::ActorRequired {
            action: command.action_name(),
        }),
    }
}

fn illegal(application: &Application, command: &Command, reason: &str) -> CoreError {
    CoreError::DomainViolation(DomainError::IllegalTransition {
        application_id: application.id_or_default(),
        from: application.status,
        action: command.verb(),
        reason: reason.to_string(),
    })
}

/// Checks the renewal preconditions without changing anything.
///
/// # Errors
///
/// Returns `DomainError::IllegalTransition` if the application is not a
/// granted exemption whose expiry date lies before `now`.
pub fn validate_renewable(application: &Application, now: OffsetDateTime) -> Result<(), DomainError> {
    let reason: Option<&str> = if !application.status.is_granted() {
        Some("only approved exemptions can be renewed")
    } else if application.expiry_date.is_none() {
        Some("the exemption has no expiry date")
    } else if !application.is_expired(now) {
        Some("the exemption has not expired yet")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(DomainError::IllegalTransition {
            application_id: application.id_or_default(),
            from: application.status,
            action: Command::Renew.verb(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

/// Accepts a new submission, producing a `Pending` application and its audit event.
///
/// Duplicate detection and vehicle resolution need stored context and are
/// left to the repository.
///
/// # Arguments
///
/// * `draft` - The submitted applicant and vehicle details
/// * `documents` - The supporting documents
/// * `vehicle_id` - The resolved vehicle
/// * `actor` - The submitting user
/// * `cause` - The cause or reason for this action
/// * `now` - The submission instant
///
/// # Errors
///
/// Returns an error if the draft or its documents fail validation.
pub fn apply_intake(
    draft: &ApplicationDraft,
    documents: &[DocumentUpload],
    vehicle_id: i64,
    actor: Actor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<IntakeResult, CoreError> {
    validate_draft(draft, documents)?;

    let application: Application =
        Application::new_pending(vehicle_id, draft.user_id, draft.applicant.clone(), now);

    let action: Action = Action::new(
        String::from("Submit"),
        Some(format!(
            "Submitted {} exemption for vehicle {} with {} document(s)",
            draft.category,
            draft.vehicle_reg_no.value(),
            documents.len()
        )),
    );
    let audit_event: AuditEvent = AuditEvent::new(
        None,
        actor,
        cause,
        action,
        StateSnapshot::new(String::from("status=none")),
        StateSnapshot::of_application(&application),
        now,
    );

    Ok(IntakeResult {
        application,
        audit_event,
    })
}

/// Applies a lifecycle command to an application, producing the new
/// application value and an audit event.
///
/// The input application is never modified. Every successful command stamps
/// `updated_at` with `now` and `updated_by` with the acting user's id.
///
/// # Arguments
///
/// * `application` - The current application (immutable)
/// * `command` - The command to apply
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
/// * `now` - The instant the command takes effect
///
/// # Returns
///
/// * `Ok(TransitionResult)` containing the new application and audit event
/// * `Err(CoreError)` if the command is not legal in the current state
///
/// # Errors
///
/// Returns an error if:
/// - The command requires a staff actor and none was supplied
/// - The current status does not permit the command
/// - A rejection has no reason
/// - A renewal rejection targets an application that is not a renewal
/// - The expiry date cannot be computed
#[allow(clippy::too_many_lines)]
pub fn apply(
    application: &Application,
    command: Command,
    actor: Actor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<TransitionResult, CoreError> {
    let stamp: Option<Stamp> = resolve_stamp(&command, &actor)?;
    let mut next: Application = application.clone();
    let details: Option<String>;

    match &command {
        Command::Approve => {
            if application.status != ApplicationStatus::Pending {
                return Err(illegal(
                    application,
                    &command,
                    "only pending applications can be approved",
                ));
            }

            next.status = ApplicationStatus::Approved;
            next.approved_at = Some(now);
            next.approved_by = stamp.as_ref().map(|s| s.email.clone());
            next.expiry_date = Some(compute_expiry(now)?);
            details = None;
        }
        Command::FinalApprove => {
            let legal: bool = match application.status {
                ApplicationStatus::Approved => true,
                ApplicationStatus::Pending => application.is_renewal,
                ApplicationStatus::Rejected | ApplicationStatus::FinalApproved => false,
            };
            if !legal {
                return Err(illegal(
                    application,
                    &command,
                    "only approved applications or pending renewals can be final-approved",
                ));
            }

            let email: Option<String> = stamp.as_ref().map(|s| s.email.clone());
            next.status = ApplicationStatus::FinalApproved;
            next.final_approved_at = Some(now);
            next.final_approved_by.clone_from(&email);
            if next.approved_at.is_none() {
                next.approved_at = Some(now);
            }
            if next.approved_by.is_none() {
                next.approved_by = email;
            }
            next.expiry_date = Some(compute_expiry(now)?);
            if application.is_renewal {
                next.renewal_count = application.renewal_count.saturating_add(1);
            }
            next.is_renewal = false;
            details = application
                .is_renewal
                .then(|| format!("Renewal {} granted", next.renewal_count));
        }
        Command::Reject { reason } => {
            let reason: String = validate_reason(reason.as_deref())?;
            if !matches!(
                application.status,
                ApplicationStatus::Pending | ApplicationStatus::Approved
            ) {
                return Err(illegal(
                    application,
                    &command,
                    "only pending or approved applications can be rejected",
                ));
            }

            next.status = ApplicationStatus::Rejected;
            next.rejected_at = Some(now);
            next.rejected_by = stamp.as_ref().map(|s| s.email.clone());
            next.notes = Some(reason.clone());
            details = Some(reason);
        }
        Command::Renew => {
            validate_renewable(application, now)?;

            next.status = ApplicationStatus::Pending;
            next.rejected_at = None;
            next.expiry_date = None;
            next.final_approved_by = None;
            next.is_renewal = true;
            details = None;
        }
        Command::RejectRenewal => {
            if !application.is_renewal {
                return Err(CoreError::DomainViolation(DomainError::NotARenewal {
                    application_id: application.id_or_default(),
                }));
            }
            if application.status == ApplicationStatus::Rejected {
                return Err(illegal(
                    application,
                    &command,
                    "the renewal has already been rejected",
                ));
            }

            next.status = ApplicationStatus::Rejected;
            next.rejected_at = Some(now);
            next.rejected_by = stamp.as_ref().map(|s| s.email.clone());
            details = None;
        }
    }

    next.updated_at = Some(now);
    next.updated_by = stamp.map(|s| s.user_id);

    let audit_event: AuditEvent = AuditEvent::new(
        application.application_id,
        actor,
        cause,
        Action::new(command.action_name().to_string(), details),
        StateSnapshot::of_application(application),
        StateSnapshot::of_application(&next),
        now,
    );

    Ok(TransitionResult {
        new_application: next,
        audit_event,
    })
}
