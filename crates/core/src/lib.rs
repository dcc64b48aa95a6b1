// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

//! The exemption lifecycle state machine.
//!
//! Pure decision logic: given an application, a command, an actor and the
//! current instant, produce the next application value and one audit event.
//! Nothing here touches storage.

mod apply;
mod command;
mod error;
mod state;

#[cfg(test)]
mod tests;

use time::OffsetDateTime;
use vex_domain::{Application, ApplicationStatus};

// Re-export public types and functions
pub use apply::{apply, apply_intake, validate_renewable};
pub use command::Command;
pub use error::CoreError;
pub use state::{IntakeResult, TransitionResult};

/// Lists the commands that would currently pass their status guards.
///
/// Actor and reason requirements are not considered. The result is the set of
/// actions a client may offer for this application at `now`.
#[must_use]
pub fn available_commands(application: &Application, now: OffsetDateTime) -> Vec<&'static str> {
    let mut commands: Vec<&'static str> = Vec::new();

    if application.status == ApplicationStatus::Pending {
        commands.push(Command::Approve.action_name());
    }
    if application.status == ApplicationStatus::Approved
        || (application.status == ApplicationStatus::Pending && application.is_renewal)
    {
        commands.push(Command::FinalApprove.action_name());
    }
    if matches!(
        application.status,
        ApplicationStatus::Pending | ApplicationStatus::Approved
    ) {
        commands.push(Command::Reject { reason: None }.action_name());
    }
    if validate_renewable(application, now).is_ok() {
        commands.push(Command::Renew.action_name());
    }
    if application.is_renewal && application.status != ApplicationStatus::Rejected {
        commands.push(Command::RejectRenewal.action_name());
    }

    commands
}
