// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bulk lifecycle operations.
//!
//! A bulk operation runs in one outer transaction. The actor is resolved
//! before anything is written, so an unknown actor aborts the whole batch.
//! Each item then runs in its own savepoint: a refused or stale item rolls
//! back alone and is reported in the outcome while the others commit.
//! Every item shares the same `now`.

use time::OffsetDateTime;
use tracing::{info, warn};
use vex::Command;
use vex_audit::{Actor, Cause};
use vex_domain::{Application, validate_reason};
use vex_persistence::SqlitePersistence;

use crate::error::ApiError;
use crate::handlers::{apply_and_write, resolve_actor, transition_in};
use crate::request_response::RejectAllRequest;

/// One item that a bulk operation could not complete.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BulkFailure {
    pub application_id: i64,
    /// Why the item was refused.
    pub message: String,
}

/// Tally of a bulk operation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BulkOutcome {
    pub succeeded: usize,
    pub failed: usize,
    pub failures: Vec<BulkFailure>,
    /// The instant stamped on every item that succeeded.
    #[serde(with = "time::serde::rfc3339")]
    pub processed_at: OffsetDateTime,
}

impl BulkOutcome {
    const fn new(processed_at: OffsetDateTime) -> Self {
        Self {
            succeeded: 0,
            failed: 0,
            failures: Vec::new(),
            processed_at,
        }
    }

    fn record<T>(&mut self, application_id: i64, result: Result<T, ApiError>) {
        match result {
            Ok(_) => self.succeeded += 1,
            Err(err) => {
                warn!(application_id, error = %err, "Bulk item failed");
                self.failed += 1;
                self.failures.push(BulkFailure {
                    application_id,
                    message: err.to_string(),
                });
            }
        }
    }
}

/// Final-approves every `Approved` application not yet final-approved.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `actor_id` - The acting staff user
/// * `cause` - The cause recorded on every item's audit event
/// * `now` - The instant stamped on every item
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` if the actor does not exist, in which
/// case nothing is written, or a storage error if the batch cannot commit.
/// Per-item failures are reported in the outcome instead.
pub fn final_approve_all(
    persistence: &mut SqlitePersistence,
    actor_id: i64,
    cause: &Cause,
    now: OffsetDateTime,
) -> Result<BulkOutcome, ApiError> {
    let outcome: BulkOutcome = persistence.transaction(|tx| {
        let actor: Actor = resolve_actor(tx, Some(actor_id))?;
        let candidates: Vec<Application> = tx.list_awaiting_final_approval()?;

        let mut outcome: BulkOutcome = BulkOutcome::new(now);
        for application in &candidates {
            let result: Result<(Application, i64), ApiError> = tx.savepoint(|sp| {
                apply_and_write(
                    sp,
                    application,
                    Command::FinalApprove,
                    actor.clone(),
                    cause.clone(),
                    now,
                )
            });
            outcome.record(application.id_or_default(), result);
        }

        Ok::<_, ApiError>(outcome)
    })?;

    info!(
        actor_id,
        succeeded = outcome.succeeded,
        failed = outcome.failed,
        "Bulk final approval complete"
    );

    Ok(outcome)
}

/// Rejects every listed application with one shared reason.
///
/// Unknown ids and applications whose status does not permit rejection are
/// reported as failures.
///
/// # Errors
///
/// Returns `ApiError::InvalidInput` if the reason is missing or blank, or
/// `ApiError::ResourceNotFound` if the actor does not exist. Nothing is
/// written in either case.
pub fn reject_all(
    persistence: &mut SqlitePersistence,
    request: &RejectAllRequest,
    cause: &Cause,
    now: OffsetDateTime,
) -> Result<BulkOutcome, ApiError> {
    let reason: String = validate_reason(request.reason.as_deref())?;

    let outcome: BulkOutcome = persistence.transaction(|tx| {
        let actor: Actor = resolve_actor(tx, Some(request.actor_id))?;

        let mut outcome: BulkOutcome = BulkOutcome::new(now);
        for &application_id in &request.application_ids {
            let result: Result<(Application, i64), ApiError> = tx.savepoint(|sp| {
                transition_in(
                    sp,
                    application_id,
                    Command::Reject {
                        reason: Some(reason.clone()),
                    },
                    actor.clone(),
                    cause.clone(),
                    now,
                )
            });
            outcome.record(application_id, result);
        }

        Ok::<_, ApiError>(outcome)
    })?;

    info!(
        actor_id = request.actor_id,
        requested = request.application_ids.len(),
        succeeded = outcome.succeeded,
        failed = outcome.failed,
        "Bulk rejection complete"
    );

    Ok(outcome)
}
