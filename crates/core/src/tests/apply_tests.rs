// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Command, CoreError, TransitionResult, apply, available_commands};
use time::macros::datetime;
use time::{Duration, OffsetDateTime};
use vex_audit::Actor;
use vex_domain::{Application, ApplicationStatus, DomainError};

use super::helpers::{
    APPROVER_ID, FINAL_APPROVER_ID, application_in, approver, create_test_cause, final_approver,
    pending_application, t0,
};

fn expect_illegal(result: Result<TransitionResult, CoreError>, from: ApplicationStatus) {
    match result {
        Err(CoreError::DomainViolation(DomainError::IllegalTransition {
            from: actual, ..
        })) => assert_eq!(actual, from),
        other => panic!("expected IllegalTransition from {from}, got {other:?}"),
    }
}

fn expired_final_approved() -> Application {
    let mut application: Application = application_in(ApplicationStatus::FinalApproved);
    application.expiry_date = Some(datetime!(2026-01-01 00:00 UTC));
    application.final_approved_by = Some(String::from("final@example.com"));
    application.rejected_at = Some(datetime!(2025-06-01 00:00 UTC));
    application
}

#[test]
fn test_approve_pending_application() {
    let application: Application = pending_application();

    let result: TransitionResult = apply(
        &application,
        Command::Approve,
        approver(),
        create_test_cause(),
        t0(),
    )
    .unwrap();

    let next = result.new_application;
    assert_eq!(next.status, ApplicationStatus::Approved);
    assert_eq!(next.approved_at, Some(t0()));
    assert_eq!(next.approved_by.as_deref(), Some("approver@example.com"));
    assert_eq!(next.expiry_date, Some(datetime!(2027-03-10 09:30 UTC)));
    assert_eq!(next.updated_at, Some(t0()));
    assert_eq!(next.updated_by, Some(APPROVER_ID));

    // Input is untouched
    assert_eq!(application.status, ApplicationStatus::Pending);
}

#[test]
fn test_approve_rejects_non_pending_statuses() {
    for status in [
        ApplicationStatus::Approved,
        ApplicationStatus::Rejected,
        ApplicationStatus::FinalApproved,
    ] {
        let result = apply(
            &application_in(status),
            Command::Approve,
            approver(),
            create_test_cause(),
            t0(),
        );
        expect_illegal(result, status);
    }
}

#[test]
fn test_approve_requires_actor() {
    let result = apply(
        &pending_application(),
        Command::Approve,
        Actor::unattributed(),
        create_test_cause(),
        t0(),
    );

    assert_eq!(
        result.unwrap_err(),
        CoreError::DomainViolation(DomainError::ActorRequired { action: "Approve" })
    );
}

#[test]
fn test_final_approve_from_approved() {
    let mut application: Application = application_in(ApplicationStatus::Approved);
    application.approved_at = Some(t0());
    application.approved_by = Some(String::from("approver@example.com"));
    let later: OffsetDateTime = t0() + Duration::days(3);

    let next: Application = apply(
        &application,
        Command::FinalApprove,
        final_approver(),
        create_test_cause(),
        later,
    )
    .unwrap()
    .new_application;

    assert_eq!(next.status, ApplicationStatus::FinalApproved);
    assert_eq!(next.final_approved_at, Some(later));
    assert_eq!(next.final_approved_by.as_deref(), Some("final@example.com"));
    // Earlier approval stamps are kept
    assert_eq!(next.approved_at, Some(t0()));
    assert_eq!(next.approved_by.as_deref(), Some("approver@example.com"));
    assert_eq!(next.expiry_date, Some(datetime!(2027-03-13 09:30 UTC)));
    assert_eq!(next.renewal_count, 0);
    assert_eq!(next.updated_by, Some(FINAL_APPROVER_ID));
}

#[test]
fn test_final_approve_pending_non_renewal_is_illegal() {
    let result = apply(
        &pending_application(),
        Command::FinalApprove,
        final_approver(),
        create_test_cause(),
        t0(),
    );
    expect_illegal(result, ApplicationStatus::Pending);
}

#[test]
fn test_final_approve_pending_renewal_fills_approval_stamps() {
    let mut application: Application = pending_application();
    application.is_renewal = true;
    application.renewal_count = 2;

    let next: Application = apply(
        &application,
        Command::FinalApprove,
        final_approver(),
        create_test_cause(),
        t0(),
    )
    .unwrap()
    .new_application;

    assert_eq!(next.status, ApplicationStatus::FinalApproved);
    assert_eq!(next.approved_at, Some(t0()));
    assert_eq!(next.approved_by.as_deref(), Some("final@example.com"));
    assert_eq!(next.renewal_count, 3);
    assert!(!next.is_renewal);
}

#[test]
fn test_final_approve_rejected_or_granted_is_illegal() {
    for status in [ApplicationStatus::Rejected, ApplicationStatus::FinalApproved] {
        let result = apply(
            &application_in(status),
            Command::FinalApprove,
            final_approver(),
            create_test_cause(),
            t0(),
        );
        expect_illegal(result, status);
    }
}

#[test]
fn test_reject_sets_notes_and_stamps() {
    let next: Application = apply(
        &pending_application(),
        Command::Reject {
            reason: Some(String::from("  Documents illegible ")),
        },
        approver(),
        create_test_cause(),
        t0(),
    )
    .unwrap()
    .new_application;

    assert_eq!(next.status, ApplicationStatus::Rejected);
    assert_eq!(next.notes.as_deref(), Some("Documents illegible"));
    assert_eq!(next.rejected_at, Some(t0()));
    assert_eq!(next.rejected_by.as_deref(), Some("approver@example.com"));
}

#[test]
fn test_reject_approved_application() {
    let result = apply(
        &application_in(ApplicationStatus::Approved),
        Command::Reject {
            reason: Some(String::from("Fraud")),
        },
        approver(),
        create_test_cause(),
        t0(),
    );
    assert_eq!(
        result.unwrap().new_application.status,
        ApplicationStatus::Rejected
    );
}

#[test]
fn test_reject_requires_reason() {
    for reason in [None, Some(String::new()), Some(String::from("   "))] {
        let result = apply(
            &pending_application(),
            Command::Reject { reason },
            approver(),
            create_test_cause(),
            t0(),
        );
        assert_eq!(
            result.unwrap_err(),
            CoreError::DomainViolation(DomainError::MissingReason)
        );
    }
}

#[test]
fn test_reject_terminal_or_granted_is_illegal() {
    for status in [ApplicationStatus::Rejected, ApplicationStatus::FinalApproved] {
        let result = apply(
            &application_in(status),
            Command::Reject {
                reason: Some(String::from("late")),
            },
            approver(),
            create_test_cause(),
            t0(),
        );
        expect_illegal(result, status);
    }
}

#[test]
fn test_renew_expired_exemption_without_actor() {
    let application: Application = expired_final_approved();

    let next: Application = apply(
        &application,
        Command::Renew,
        Actor::unattributed(),
        create_test_cause(),
        t0(),
    )
    .unwrap()
    .new_application;

    assert_eq!(next.status, ApplicationStatus::Pending);
    assert!(next.is_renewal);
    assert_eq!(next.expiry_date, None);
    assert_eq!(next.rejected_at, None);
    assert_eq!(next.final_approved_by, None);
    assert_eq!(next.updated_at, Some(t0()));
    assert_eq!(next.updated_by, None);
}

#[test]
fn test_renew_with_actor_records_updated_by() {
    let next: Application = apply(
        &expired_final_approved(),
        Command::Renew,
        approver(),
        create_test_cause(),
        t0(),
    )
    .unwrap()
    .new_application;

    assert_eq!(next.updated_by, Some(APPROVER_ID));
}

#[test]
fn test_renew_before_expiry_is_illegal() {
    let mut application: Application = expired_final_approved();
    application.expiry_date = Some(t0() + Duration::days(10));

    let result = apply(
        &application,
        Command::Renew,
        Actor::unattributed(),
        create_test_cause(),
        t0(),
    );
    expect_illegal(result, ApplicationStatus::FinalApproved);
}

#[test]
fn test_renew_at_exact_expiry_is_illegal() {
    let mut application: Application = expired_final_approved();
    application.expiry_date = Some(t0());

    let result = apply(
        &application,
        Command::Renew,
        Actor::unattributed(),
        create_test_cause(),
        t0(),
    );
    expect_illegal(result, ApplicationStatus::FinalApproved);
}

#[test]
fn test_renew_rejected_application_is_illegal() {
    let mut application: Application = expired_final_approved();
    application.status = ApplicationStatus::Rejected;

    let result = apply(
        &application,
        Command::Renew,
        Actor::unattributed(),
        create_test_cause(),
        t0(),
    );
    expect_illegal(result, ApplicationStatus::Rejected);
}

#[test]
fn test_reject_renewal_of_non_renewal_fails_validation() {
    let result = apply(
        &pending_application(),
        Command::RejectRenewal,
        approver(),
        create_test_cause(),
        t0(),
    );

    assert_eq!(
        result.unwrap_err(),
        CoreError::DomainViolation(DomainError::NotARenewal { application_id: 1 })
    );
}

#[test]
fn test_reject_renewal_of_pending_renewal() {
    let mut application: Application = pending_application();
    application.is_renewal = true;

    let next: Application = apply(
        &application,
        Command::RejectRenewal,
        approver(),
        create_test_cause(),
        t0(),
    )
    .unwrap()
    .new_application;

    assert_eq!(next.status, ApplicationStatus::Rejected);
    assert_eq!(next.rejected_by.as_deref(), Some("approver@example.com"));
    assert_eq!(next.rejected_at, Some(t0()));
}

#[test]
fn test_reject_renewal_twice_is_illegal() {
    let mut application: Application = application_in(ApplicationStatus::Rejected);
    application.is_renewal = true;

    let result = apply(
        &application,
        Command::RejectRenewal,
        approver(),
        create_test_cause(),
        t0(),
    );
    expect_illegal(result, ApplicationStatus::Rejected);
}

#[test]
fn test_transition_audit_event() {
    let result: TransitionResult = apply(
        &pending_application(),
        Command::Reject {
            reason: Some(String::from("Incomplete")),
        },
        approver(),
        create_test_cause(),
        t0(),
    )
    .unwrap();

    let event = result.audit_event;
    assert_eq!(event.application_id, Some(1));
    assert_eq!(event.actor, approver());
    assert_eq!(event.action.name, "Reject");
    assert_eq!(event.action.details.as_deref(), Some("Incomplete"));
    assert!(event.before.data.starts_with("status=Pending"));
    assert!(event.after.data.starts_with("status=Rejected"));
    assert_eq!(event.occurred_at, t0());
}

#[test]
fn test_available_commands_by_status() {
    assert_eq!(
        available_commands(&pending_application(), t0()),
        vec!["Approve", "Reject"]
    );
    assert_eq!(
        available_commands(&application_in(ApplicationStatus::Approved), t0()),
        vec!["FinalApprove", "Reject"]
    );
    assert!(available_commands(&application_in(ApplicationStatus::Rejected), t0()).is_empty());
    assert_eq!(
        available_commands(&expired_final_approved(), t0()),
        vec!["Renew"]
    );

    let mut renewal: Application = pending_application();
    renewal.is_renewal = true;
    assert_eq!(
        available_commands(&renewal, t0()),
        vec!["Approve", "FinalApprove", "Reject", "RejectRenewal"]
    );
}
