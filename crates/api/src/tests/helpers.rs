// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use time::OffsetDateTime;
use time::macros::datetime;
use vex_audit::Cause;
use vex_persistence::SqlitePersistence;

use crate::{
    CreateUserRequest, DocumentInput, SubmitApplicationRequest, TransitionRequest,
    TransitionResponse, approve, create_user, final_approve, submit_application,
};

/// An in-memory database seeded with one account per role.
pub struct Fixture {
    pub persistence: SqlitePersistence,
    pub clerk_id: i64,
    pub approver_id: i64,
    pub final_approver_id: i64,
}

pub fn t0() -> OffsetDateTime {
    datetime!(2026-03-10 09:30 UTC)
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("api-req-456"), String::from("API request"))
}

pub fn create_user_request(email: &str, role: &str) -> CreateUserRequest {
    CreateUserRequest {
        email: email.to_string(),
        first_name: String::from("Test"),
        middle_name: None,
        last_name: String::from("User"),
        role: role.to_string(),
        password: String::from("password1"),
    }
}

pub fn setup() -> Fixture {
    let mut persistence: SqlitePersistence = SqlitePersistence::new_in_memory().unwrap();
    let mut create = |email: &str, role: &str| {
        create_user(&mut persistence, &create_user_request(email, role), t0())
            .unwrap()
            .user_id
    };
    let clerk_id: i64 = create("clerk@example.com", "Clerk");
    let approver_id: i64 = create("approver@example.com", "Approver");
    let final_approver_id: i64 = create("final@example.com", "FinalApprover");

    Fixture {
        persistence,
        clerk_id,
        approver_id,
        final_approver_id,
    }
}

pub fn submission_request(user_id: i64, reg_no: &str, national_id: &str) -> SubmitApplicationRequest {
    let document = |path: &str, doc_type: &str| DocumentInput {
        file_path: path.to_string(),
        doc_type: Some(doc_type.to_string()),
    };
    SubmitApplicationRequest {
        user_id,
        vehicle_reg_no: reg_no.to_string(),
        salutation: String::from("Mr"),
        first_name: String::from("John"),
        last_name: String::from("Doe"),
        national_id: national_id.to_string(),
        address: String::from("1 Main St"),
        cell: String::from("0771234567"),
        category: String::from("War Veteran"),
        documents: vec![
            document("uploads/regbook.pdf", "RegBook"),
            document("uploads/license.jpg", "License"),
            document("uploads/warvet.png", "WarVetId"),
            document("uploads/residence.pdf", "ProofOfResidence"),
        ],
    }
}

impl Fixture {
    /// Submits a standard War Veteran application and returns its id.
    pub fn submit(&mut self, reg_no: &str, national_id: &str) -> i64 {
        submit_application(
            &mut self.persistence,
            &submission_request(self.clerk_id, reg_no, national_id),
            create_test_cause(),
            t0(),
        )
        .unwrap()
        .application_id
    }

    pub const fn as_approver(&self, application_id: i64) -> TransitionRequest {
        TransitionRequest {
            application_id,
            actor_id: Some(self.approver_id),
        }
    }

    pub const fn as_final_approver(&self, application_id: i64) -> TransitionRequest {
        TransitionRequest {
            application_id,
            actor_id: Some(self.final_approver_id),
        }
    }

    /// Approves an application at `now`.
    pub fn approve(&mut self, application_id: i64, now: OffsetDateTime) -> TransitionResponse {
        let request: TransitionRequest = self.as_approver(application_id);
        approve(&mut self.persistence, request, create_test_cause(), now).unwrap()
    }

    /// Approves and final-approves an application at `now`.
    pub fn grant(&mut self, application_id: i64, now: OffsetDateTime) -> TransitionResponse {
        self.approve(application_id, now);
        let request: TransitionRequest = self.as_final_approver(application_id);
        final_approve(&mut self.persistence, request, create_test_cause(), now).unwrap()
    }
}
