// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Application status values.
//!
//! Storage and the wire always carry the canonical spellings returned by
//! [`ApplicationStatus::as_str`]. Parsing is lenient about casing and
//! separators so legacy rows such as `Final Approved` or `finalapproved`
//! normalise to the same variant.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The status of an exemption application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicationStatus {
    /// Submitted (or renewed) and awaiting approval.
    Pending,
    /// Approved by an approver, awaiting final approval.
    Approved,
    /// Rejected. Terminal.
    Rejected,
    /// Approved by a final approver. Terminal except via renewal.
    #[serde(rename = "finalApproved")]
    FinalApproved,
}

impl ApplicationStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::Approved,
        Self::Rejected,
        Self::FinalApproved,
    ];

    /// Returns the canonical string representation of the status.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::FinalApproved => "finalApproved",
        }
    }

    /// Parses a status from any of its historical spellings.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatus` if the string is not a known status.
    fn parse_str(s: &str) -> Result<Self, DomainError> {
        let folded: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match folded.as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "finalapproved" => Ok(Self::FinalApproved),
            _ => Err(DomainError::InvalidStatus(s.to_string())),
        }
    }

    /// Returns true if no lifecycle action can leave this status.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected)
    }

    /// Returns true if the application holds a granted exemption.
    #[must_use]
    pub const fn is_granted(&self) -> bool {
        matches!(self, Self::Approved | Self::FinalApproved)
    }
}

impl FromStr for ApplicationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_strings_parse_back() {
        for status in ApplicationStatus::ALL {
            match ApplicationStatus::parse_str(status.as_str()) {
                Ok(parsed) => assert_eq!(status, parsed),
                Err(e) => panic!("Failed to parse status string {}: {e}", status.as_str()),
            }
        }
    }

    #[test]
    fn test_legacy_final_approved_spellings_normalise() {
        for legacy in ["Final Approved", "finalapproved", "FINAL_APPROVED", "finalApproved"] {
            assert_eq!(
                ApplicationStatus::from_str(legacy),
                Ok(ApplicationStatus::FinalApproved),
                "{legacy} should parse as finalApproved"
            );
        }
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        assert_eq!(
            ApplicationStatus::from_str("Archived"),
            Err(DomainError::InvalidStatus(String::from("Archived")))
        );
    }

    #[test]
    fn test_only_rejected_is_terminal() {
        assert!(ApplicationStatus::Rejected.is_terminal());
        assert!(!ApplicationStatus::Pending.is_terminal());
        assert!(!ApplicationStatus::Approved.is_terminal());
        assert!(!ApplicationStatus::FinalApproved.is_terminal());
    }
}
