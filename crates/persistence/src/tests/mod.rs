// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod transaction_tests;

use time::OffsetDateTime;
use time::macros::datetime;
use vex::{Command, TransitionResult, apply};
use vex_audit::{Actor, Cause};
use vex_domain::{
    Applicant, Application, ApplicationDraft, DocumentUpload, ExemptionCategory, Role, User,
    VehicleRegNo,
};

use crate::{PersistenceError, SqlitePersistence, SubmitOutcome};

/// Staff accounts seeded by [`seed_staff`].
pub struct Staff {
    pub clerk_id: i64,
    pub approver_id: i64,
    pub final_approver_id: i64,
}

pub fn t0() -> OffsetDateTime {
    datetime!(2026-03-10 09:30 UTC)
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("test-cause"), String::from("Test operation"))
}

pub fn seed_staff(persistence: &mut SqlitePersistence) -> Staff {
    let mut create = |email: &str, role: Role| {
        persistence
            .create_user(&User::new(email, "Test", None, "User", role), "password1", t0())
            .unwrap()
    };
    Staff {
        clerk_id: create("clerk@example.com", Role::Clerk),
        approver_id: create("approver@example.com", Role::Approver),
        final_approver_id: create("final@example.com", Role::FinalApprover),
    }
}

pub fn create_test_draft(user_id: i64, reg_no: &str, national_id: &str) -> ApplicationDraft {
    ApplicationDraft {
        user_id,
        vehicle_reg_no: VehicleRegNo::new(reg_no),
        applicant: Applicant::new("Mr", "John", "Doe", national_id, "1 Main St", "0771234567"),
        category: ExemptionCategory::WarVeteran,
    }
}

pub fn war_veteran_documents() -> Vec<DocumentUpload> {
    vec![
        DocumentUpload::labelled("uploads/regbook.pdf", "RegBook"),
        DocumentUpload::labelled("uploads/license.jpg", "License"),
        DocumentUpload::labelled("uploads/warvet.png", "WarVetId"),
        DocumentUpload::labelled("uploads/residence.pdf", "ProofOfResidence"),
    ]
}

pub fn submit(
    persistence: &mut SqlitePersistence,
    user_id: i64,
    reg_no: &str,
    national_id: &str,
) -> SubmitOutcome {
    persistence
        .submit_application(
            &create_test_draft(user_id, reg_no, national_id),
            &war_veteran_documents(),
            create_test_cause(),
            t0(),
        )
        .unwrap()
}

pub fn staff_actor(persistence: &mut SqlitePersistence, user_id: i64) -> Actor {
    let user: User = persistence.get_user(user_id).unwrap();
    Actor::for_user(user_id, &user.email, user.role)
}

/// Applies a command and writes the result back in one transaction.
pub fn transition(
    persistence: &mut SqlitePersistence,
    application_id: i64,
    command: Command,
    actor: Actor,
    now: OffsetDateTime,
) -> Application {
    persistence
        .transaction(|tx| {
            let current: Application = tx.require_application(application_id)?;
            let result: TransitionResult =
                apply(&current, command, actor, create_test_cause(), now)?;
            tx.update_application(&result.new_application, current.status)?;
            tx.record_audit_event(&result.audit_event)?;
            Ok::<_, PersistenceError>(result.new_application)
        })
        .unwrap()
}
