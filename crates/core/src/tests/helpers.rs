// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::OffsetDateTime;
use time::macros::datetime;
use vex_audit::{Actor, Cause};
use vex_domain::{
    Applicant, Application, ApplicationDraft, ApplicationStatus, ExemptionCategory, Role,
    VehicleRegNo,
};

pub const APPROVER_ID: i64 = 2;
pub const FINAL_APPROVER_ID: i64 = 3;

pub fn approver() -> Actor {
    Actor::for_user(APPROVER_ID, "approver@example.com", Role::Approver)
}

pub fn final_approver() -> Actor {
    Actor::for_user(FINAL_APPROVER_ID, "final@example.com", Role::FinalApprover)
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-456"), String::from("Staff request"))
}

pub fn t0() -> OffsetDateTime {
    datetime!(2026-03-10 09:30 UTC)
}

pub fn create_test_applicant() -> Applicant {
    Applicant::new("Mr", "John", "Doe", "63-1234", "1 Main St", "0771234567")
}

pub fn create_test_draft() -> ApplicationDraft {
    ApplicationDraft {
        user_id: 1,
        vehicle_reg_no: VehicleRegNo::new("abc123"),
        applicant: create_test_applicant(),
        category: ExemptionCategory::WarVeteran,
    }
}

pub fn pending_application() -> Application {
    let mut application: Application = Application::new_pending(1, 1, create_test_applicant(), t0());
    application.application_id = Some(1);
    application
}

pub fn application_in(status: ApplicationStatus) -> Application {
    let mut application: Application = pending_application();
    application.status = status;
    application
}
