// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::str::FromStr;

use crate::{Applicant, DomainError, ExemptionCategory, Role, User, VehicleRegNo};

#[test]
fn test_vehicle_reg_no_normalized_to_uppercase() {
    let lower: VehicleRegNo = VehicleRegNo::new("abc123");
    let padded: VehicleRegNo = VehicleRegNo::new("  AbC123 ");

    assert_eq!(lower.value(), "ABC123");
    assert_eq!(lower, padded);
}

#[test]
fn test_category_parses_display_and_loose_forms() {
    assert_eq!(
        ExemptionCategory::from_str("War Veteran"),
        Ok(ExemptionCategory::WarVeteran)
    );
    assert_eq!(
        ExemptionCategory::from_str("senior_citizen"),
        Ok(ExemptionCategory::SeniorCitizen)
    );
    assert_eq!(
        ExemptionCategory::from_str("Disabled"),
        Err(DomainError::InvalidCategory(String::from("Disabled")))
    );
}

#[test]
fn test_role_ids_round_trip() {
    for role in [Role::Clerk, Role::Approver, Role::FinalApprover] {
        assert_eq!(Role::from_id(role.id()), Ok(role));
    }
    assert!(Role::from_id(4).is_err());
    assert_eq!(Role::from_str("final approver"), Ok(Role::FinalApprover));
}

#[test]
fn test_applicant_fields_are_trimmed() {
    let applicant: Applicant = Applicant::new(" Mr ", "John", " Doe", "63-1234 ", "1 Main", "0771");
    assert_eq!(applicant.salutation, "Mr");
    assert_eq!(applicant.last_name, "Doe");
    assert_eq!(applicant.national_id, "63-1234");
    assert_eq!(applicant.full_name(), "John Doe");
}

#[test]
fn test_user_email_normalized_and_blank_middle_name_dropped() {
    let user: User = User::new(" Admin@Example.com ", "Ada", Some("  "), "Admin", Role::Clerk);
    assert_eq!(user.email, "admin@example.com");
    assert_eq!(user.middle_name, None);
    assert_eq!(user.user_id, None);
}
