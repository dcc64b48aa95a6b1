// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bulk final approval and bulk rejection.

use time::{Duration, OffsetDateTime};

use super::helpers::{Fixture, create_test_cause, setup, t0};
use crate::{
    ApiError, ApplicationFilter, ApplicationInfo, BulkOutcome, RejectAllRequest, final_approve_all,
    get_application, list_applications, reject_all,
};

fn reject_all_request(fixture: &Fixture, ids: &[i64], reason: Option<&str>) -> RejectAllRequest {
    RejectAllRequest {
        application_ids: ids.to_vec(),
        actor_id: fixture.approver_id,
        reason: reason.map(ToString::to_string),
    }
}

#[test]
fn test_final_approve_all_shares_one_timestamp() {
    let mut fixture: Fixture = setup();
    for (reg, nid) in [("AAA1", "1"), ("BBB2", "2"), ("CCC3", "3")] {
        let id: i64 = fixture.submit(reg, nid);
        fixture.approve(id, t0());
    }
    let batch_at: OffsetDateTime = t0() + Duration::days(1);

    let outcome: BulkOutcome = final_approve_all(
        &mut fixture.persistence,
        fixture.final_approver_id,
        &create_test_cause(),
        batch_at,
    )
    .unwrap();

    assert_eq!(outcome.succeeded, 3);
    assert_eq!(outcome.failed, 0);
    assert!(outcome.failures.is_empty());
    assert_eq!(outcome.processed_at, batch_at);

    let applications: Vec<ApplicationInfo> = list_applications(
        &mut fixture.persistence,
        &ApplicationFilter::default(),
        batch_at,
    )
    .unwrap()
    .applications;
    assert_eq!(applications.len(), 3);
    for application in applications {
        assert_eq!(application.status, "finalApproved");
        assert_eq!(application.final_approved_at, Some(batch_at));
        assert_eq!(
            application.final_approved_by.as_deref(),
            Some("final@example.com")
        );
    }
}

#[test]
fn test_final_approve_all_skips_other_statuses() {
    let mut fixture: Fixture = setup();
    let pending: i64 = fixture.submit("AAA1", "1");
    let approved: i64 = fixture.submit("BBB2", "2");
    let granted: i64 = fixture.submit("CCC3", "3");
    fixture.approve(approved, t0());
    fixture.grant(granted, t0());

    let outcome: BulkOutcome = final_approve_all(
        &mut fixture.persistence,
        fixture.final_approver_id,
        &create_test_cause(),
        t0() + Duration::days(1),
    )
    .unwrap();
    assert_eq!(outcome.succeeded, 1);

    let info: ApplicationInfo = get_application(&mut fixture.persistence, pending, t0()).unwrap();
    assert_eq!(info.status, "Pending");
    let info: ApplicationInfo = get_application(&mut fixture.persistence, granted, t0()).unwrap();
    assert_eq!(info.final_approved_at, Some(t0()));
}

#[test]
fn test_final_approve_all_with_nothing_waiting() {
    let mut fixture: Fixture = setup();

    let outcome: BulkOutcome = final_approve_all(
        &mut fixture.persistence,
        fixture.final_approver_id,
        &create_test_cause(),
        t0(),
    )
    .unwrap();
    assert_eq!((outcome.succeeded, outcome.failed), (0, 0));
}

#[test]
fn test_unknown_actor_aborts_before_any_write() {
    let mut fixture: Fixture = setup();
    let id: i64 = fixture.submit("AAA1", "1");
    fixture.approve(id, t0());

    let result = final_approve_all(&mut fixture.persistence, 77, &create_test_cause(), t0());
    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));

    let info: ApplicationInfo = get_application(&mut fixture.persistence, id, t0()).unwrap();
    assert_eq!(info.status, "Approved");
}

#[test]
fn test_reject_all_reports_per_item_failures() {
    let mut fixture: Fixture = setup();
    let pending: i64 = fixture.submit("AAA1", "1");
    let approved: i64 = fixture.submit("BBB2", "2");
    let granted: i64 = fixture.submit("CCC3", "3");
    fixture.approve(approved, t0());
    fixture.grant(granted, t0());

    let request: RejectAllRequest =
        reject_all_request(&fixture, &[pending, approved, granted, 99], Some("Audit sweep"));
    let outcome: BulkOutcome =
        reject_all(&mut fixture.persistence, &request, &create_test_cause(), t0()).unwrap();

    assert_eq!(outcome.succeeded, 2);
    assert_eq!(outcome.failed, 2);
    let failed_ids: Vec<i64> = outcome.failures.iter().map(|f| f.application_id).collect();
    assert_eq!(failed_ids, vec![granted, 99]);

    for id in [pending, approved] {
        let info: ApplicationInfo = get_application(&mut fixture.persistence, id, t0()).unwrap();
        assert_eq!(info.status, "Rejected");
        assert_eq!(info.notes.as_deref(), Some("Audit sweep"));
    }
    let info: ApplicationInfo = get_application(&mut fixture.persistence, granted, t0()).unwrap();
    assert_eq!(info.status, "finalApproved");
}

#[test]
fn test_reject_all_requires_reason() {
    let mut fixture: Fixture = setup();
    let id: i64 = fixture.submit("AAA1", "1");

    let request: RejectAllRequest = reject_all_request(&fixture, &[id], None);
    let result = reject_all(&mut fixture.persistence, &request, &create_test_cause(), t0());
    assert!(matches!(result, Err(ApiError::InvalidInput { field, .. }) if field == "reason"));

    let info: ApplicationInfo = get_application(&mut fixture.persistence, id, t0()).unwrap();
    assert_eq!(info.status, "Pending");
}

#[test]
fn test_reject_all_repeated_id_fails_second_time() {
    let mut fixture: Fixture = setup();
    let id: i64 = fixture.submit("AAA1", "1");

    let request: RejectAllRequest = reject_all_request(&fixture, &[id, id], Some("Duplicate entry"));
    let outcome: BulkOutcome =
        reject_all(&mut fixture.persistence, &request, &create_test_cause(), t0()).unwrap();

    assert_eq!((outcome.succeeded, outcome.failed), (1, 1));
}
