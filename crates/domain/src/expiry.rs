// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Exemption expiry policy.
//!
//! An exemption is valid for one calendar year from the instant it is
//! granted. When the anniversary falls on a day the target month does not
//! have (29 February), the expiry moves back to the last valid day of
//! that month. Time of day and offset are preserved.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use time::{Date, Duration, OffsetDateTime};

/// Applications expiring within this window of `now` are due soon.
pub const DUE_SOON_WINDOW: Duration = Duration::days(30);

/// Expiry classification relative to a reference instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryClass {
    /// Expiry is at least 30 days away.
    Active,
    /// Expiry is within the next 30 days.
    DueSoon,
    /// Expiry has passed.
    Expired,
}

impl ExpiryClass {
    /// Returns the string representation of the class.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::DueSoon => "due_soon",
            Self::Expired => "expired",
        }
    }
}

/// Last year an expiry may fall in. RFC 3339 timestamps have four-digit years.
const MAX_EXPIRY_YEAR: i32 = 9999;

/// Computes the expiry instant for an exemption granted at `granted_at`.
///
/// # Errors
///
/// Returns `DomainError::DateArithmeticOverflow` if the following year is
/// past 9999.
pub fn compute_expiry(granted_at: OffsetDateTime) -> Result<OffsetDateTime, DomainError> {
    let date: Date = granted_at.date();
    let overflow = || DomainError::DateArithmeticOverflow {
        operation: format!("adding one year to {date}"),
    };

    let target_year: i32 = date.year().checked_add(1).ok_or_else(overflow)?;
    if target_year > MAX_EXPIRY_YEAR {
        return Err(overflow());
    }
    let mut day: u8 = date.day();

    // Only the month-end days can be missing from the target month.
    let target: Date = loop {
        match Date::from_calendar_date(target_year, date.month(), day) {
            Ok(target) => break target,
            Err(_) if day > 28 => day -= 1,
            Err(_) => return Err(overflow()),
        }
    };

    Ok(granted_at.replace_date(target))
}

/// Classifies an expiry instant against `now`.
///
/// `Expired` iff `expiry < now`; `DueSoon` iff `now <= expiry < now + 30 days`;
/// otherwise `Active`.
#[must_use]
pub fn classify(expiry: OffsetDateTime, now: OffsetDateTime) -> ExpiryClass {
    if expiry < now {
        return ExpiryClass::Expired;
    }

    match now.checked_add(DUE_SOON_WINDOW) {
        Some(horizon) if expiry >= horizon => ExpiryClass::Active,
        _ => ExpiryClass::DueSoon,
    }
}
