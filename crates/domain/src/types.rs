// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// Folds a label to lowercase ASCII alphanumerics for lenient matching.
fn fold_label(value: &str) -> String {
    value
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Exemption category claimed by an applicant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExemptionCategory {
    /// War veteran exemption.
    #[serde(rename = "War Veteran")]
    WarVeteran,
    /// Senior citizen exemption.
    #[serde(rename = "Senior Citizen")]
    SeniorCitizen,
}

impl ExemptionCategory {
    /// Returns the display label, which is also the stored document type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::WarVeteran => "War Veteran",
            Self::SeniorCitizen => "Senior Citizen",
        }
    }
}

impl FromStr for ExemptionCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match fold_label(s).as_str() {
            "warveteran" => Ok(Self::WarVeteran),
            "seniorcitizen" => Ok(Self::SeniorCitizen),
            _ => Err(DomainError::InvalidCategory(s.to_string())),
        }
    }
}

impl std::fmt::Display for ExemptionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Staff roles. The numeric identifiers are the stored role ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Intake, user administration, reporting and renewals.
    Clerk,
    /// Moves Pending applications to Approved or Rejected.
    Approver,
    /// Moves Approved applications to finalApproved.
    FinalApprover,
}

impl Role {
    /// Returns the stored role identifier.
    #[must_use]
    pub const fn id(&self) -> i32 {
        match self {
            Self::Clerk => 1,
            Self::Approver => 2,
            Self::FinalApprover => 3,
        }
    }

    /// Resolves a stored role identifier.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidRole` for unknown identifiers.
    pub fn from_id(id: i32) -> Result<Self, DomainError> {
        match id {
            1 => Ok(Self::Clerk),
            2 => Ok(Self::Approver),
            3 => Ok(Self::FinalApprover),
            _ => Err(DomainError::InvalidRole(id.to_string())),
        }
    }

    /// Returns the role name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Clerk => "Clerk",
            Self::Approver => "Approver",
            Self::FinalApprover => "FinalApprover",
        }
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match fold_label(s).as_str() {
            "clerk" | "1" => Ok(Self::Clerk),
            "approver" | "2" => Ok(Self::Approver),
            "finalapprover" | "3" => Ok(Self::FinalApprover),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

/// A vehicle registration number.
///
/// Registration numbers are trimmed and normalized to uppercase so that
/// duplicate detection is case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VehicleRegNo {
    value: String,
}

impl VehicleRegNo {
    /// Creates a new `VehicleRegNo`.
    ///
    /// # Arguments
    ///
    /// * `value` - The raw registration number (will be trimmed and uppercased)
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self {
            value: value.trim().to_uppercase(),
        }
    }

    /// Returns the normalized registration number.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Applicant identity captured on each application.
///
/// These are free-form strings; there is no cross-application identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Applicant {
    pub salutation: String,
    pub first_name: String,
    pub last_name: String,
    pub national_id: String,
    pub address: String,
    pub cell: String,
}

impl Applicant {
    /// Creates a new `Applicant`, trimming surrounding whitespace.
    #[must_use]
    pub fn new(
        salutation: &str,
        first_name: &str,
        last_name: &str,
        national_id: &str,
        address: &str,
        cell: &str,
    ) -> Self {
        Self {
            salutation: salutation.trim().to_string(),
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            national_id: national_id.trim().to_string(),
            address: address.trim().to_string(),
            cell: cell.trim().to_string(),
        }
    }

    /// Returns `first last`.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A staff user who may act on applications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Canonical identifier. `None` before the user is persisted.
    pub user_id: Option<i64>,
    /// Login email, stored lowercase and unique.
    pub email: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub role: Role,
}

impl User {
    /// Creates a new `User` without a persisted `user_id`.
    #[must_use]
    pub fn new(
        email: &str,
        first_name: &str,
        middle_name: Option<&str>,
        last_name: &str,
        role: Role,
    ) -> Self {
        Self {
            user_id: None,
            email: email.trim().to_lowercase(),
            first_name: first_name.trim().to_string(),
            middle_name: middle_name
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(ToString::to_string),
            last_name: last_name.trim().to_string(),
            role,
        }
    }
}

/// A registered vehicle. One vehicle may carry many applications over time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub vehicle_id: i64,
    pub vehicle_reg_no: VehicleRegNo,
    /// The user who first submitted an application for this vehicle.
    pub user_id: i64,
    pub created_at: OffsetDateTime,
}
