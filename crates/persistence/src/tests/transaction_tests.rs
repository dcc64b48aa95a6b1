// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Transaction scope, guarded updates and deletion.

use time::Duration;
use vex::{Command, apply};
use vex_domain::{Application, ApplicationStatus};

use super::{create_test_cause, seed_staff, staff_actor, submit, t0, transition};
use crate::{PersistenceError, SqlitePersistence};

#[test]
fn test_transition_round_trips_lifecycle_fields() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let staff = seed_staff(&mut persistence);
    submit(&mut persistence, staff.clerk_id, "ABC123", "63-1234");

    let approver = staff_actor(&mut persistence, staff.approver_id);
    let approved: Application = transition(&mut persistence, 1, Command::Approve, approver, t0());

    let stored: Application = persistence.get_application(1).unwrap();
    assert_eq!(stored, approved);
    assert_eq!(stored.status, ApplicationStatus::Approved);
    assert_eq!(stored.approved_by.as_deref(), Some("approver@example.com"));
    assert_eq!(stored.updated_by, Some(staff.approver_id));
    assert!(stored.expiry_date.is_some());
}

#[test]
fn test_error_rolls_back_transaction() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let staff = seed_staff(&mut persistence);
    submit(&mut persistence, staff.clerk_id, "ABC123", "63-1234");
    let approver = staff_actor(&mut persistence, staff.approver_id);

    let result: Result<(), PersistenceError> = persistence.transaction(|tx| {
        let current = tx.require_application(1)?;
        let next = apply(&current, Command::Approve, approver, create_test_cause(), t0())?;
        tx.update_application(&next.new_application, current.status)?;
        Err(PersistenceError::Other(String::from("abort")))
    });

    assert!(result.is_err());
    assert_eq!(
        persistence.get_application(1).unwrap().status,
        ApplicationStatus::Pending
    );
}

#[test]
fn test_savepoint_failure_keeps_outer_work() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let staff = seed_staff(&mut persistence);
    submit(&mut persistence, staff.clerk_id, "AAA1", "1");
    submit(&mut persistence, staff.clerk_id, "BBB2", "2");
    let approver = staff_actor(&mut persistence, staff.approver_id);

    persistence
        .transaction(|tx| {
            for application_id in [1, 2] {
                let outcome: Result<(), PersistenceError> = tx.savepoint(|sp| {
                    let current = sp.require_application(application_id)?;
                    let next = apply(
                        &current,
                        Command::Approve,
                        approver.clone(),
                        create_test_cause(),
                        t0(),
                    )?;
                    sp.update_application(&next.new_application, current.status)?;
                    if application_id == 2 {
                        return Err(PersistenceError::Other(String::from("item failed")));
                    }
                    Ok(())
                });
                assert_eq!(outcome.is_ok(), application_id == 1);
            }
            Ok::<_, PersistenceError>(())
        })
        .unwrap();

    assert_eq!(
        persistence.get_application(1).unwrap().status,
        ApplicationStatus::Approved
    );
    assert_eq!(
        persistence.get_application(2).unwrap().status,
        ApplicationStatus::Pending
    );
}

#[test]
fn test_guarded_update_detects_stale_status() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let staff = seed_staff(&mut persistence);
    submit(&mut persistence, staff.clerk_id, "ABC123", "63-1234");
    let approver = staff_actor(&mut persistence, staff.approver_id);

    // Validate against the Pending row, then let another writer move it first
    let pending: Application = persistence.get_application(1).unwrap();
    let decided = apply(
        &pending,
        Command::Approve,
        approver.clone(),
        create_test_cause(),
        t0(),
    )
    .unwrap();
    transition(
        &mut persistence,
        1,
        Command::Reject {
            reason: Some(String::from("Withdrawn")),
        },
        approver,
        t0(),
    );

    let result = persistence.transaction(|tx| {
        tx.update_application(&decided.new_application, pending.status)
    });

    assert_eq!(
        result.unwrap_err(),
        PersistenceError::StaleWrite {
            application_id: 1,
            expected: ApplicationStatus::Pending,
        }
    );
    assert_eq!(
        persistence.get_application(1).unwrap().status,
        ApplicationStatus::Rejected
    );
}

#[test]
fn test_update_missing_application_is_not_found() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let staff = seed_staff(&mut persistence);
    submit(&mut persistence, staff.clerk_id, "ABC123", "63-1234");

    let mut ghost: Application = persistence.get_application(1).unwrap();
    ghost.application_id = Some(99);

    let result =
        persistence.transaction(|tx| tx.update_application(&ghost, ApplicationStatus::Pending));
    assert_eq!(result.unwrap_err(), PersistenceError::ApplicationNotFound(99));
}

#[test]
fn test_delete_application_keeps_documents_and_timeline() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let staff = seed_staff(&mut persistence);
    submit(&mut persistence, staff.clerk_id, "ABC123", "63-1234");

    persistence.delete_application(1).unwrap();

    assert_eq!(
        persistence.get_application(1).unwrap_err(),
        PersistenceError::ApplicationNotFound(1)
    );
    assert_eq!(persistence.list_documents(Some(1)).unwrap().len(), 4);
    assert_eq!(persistence.get_audit_timeline(1).unwrap().len(), 1);
    assert!(persistence.list_applications().unwrap().is_empty());
}

#[test]
fn test_delete_missing_application_is_not_found() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    assert_eq!(
        persistence.delete_application(5).unwrap_err(),
        PersistenceError::ApplicationNotFound(5)
    );
}

#[test]
fn test_awaiting_final_approval_selection() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let staff = seed_staff(&mut persistence);
    for (reg, nid) in [("AAA1", "1"), ("BBB2", "2"), ("CCC3", "3")] {
        submit(&mut persistence, staff.clerk_id, reg, nid);
    }
    let approver = staff_actor(&mut persistence, staff.approver_id);
    let final_approver = staff_actor(&mut persistence, staff.final_approver_id);

    transition(&mut persistence, 1, Command::Approve, approver.clone(), t0());
    transition(&mut persistence, 2, Command::Approve, approver, t0());
    transition(
        &mut persistence,
        2,
        Command::FinalApprove,
        final_approver,
        t0() + Duration::days(1),
    );

    let awaiting = persistence
        .transaction(|tx| tx.list_awaiting_final_approval())
        .unwrap();
    let ids: Vec<Option<i64>> = awaiting.iter().map(|a| a.application_id).collect();
    assert_eq!(ids, vec![Some(1)]);
}

#[test]
fn test_transition_timeline_is_ordered() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let staff = seed_staff(&mut persistence);
    submit(&mut persistence, staff.clerk_id, "ABC123", "63-1234");
    let approver = staff_actor(&mut persistence, staff.approver_id);
    let final_approver = staff_actor(&mut persistence, staff.final_approver_id);

    transition(&mut persistence, 1, Command::Approve, approver, t0());
    transition(&mut persistence, 1, Command::FinalApprove, final_approver, t0());

    let names: Vec<String> = persistence
        .get_audit_timeline(1)
        .unwrap()
        .into_iter()
        .map(|e| e.action.name)
        .collect();
    assert_eq!(names, vec!["Submit", "Approve", "FinalApprove"]);
}
