// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// A command represents staff or citizen intent as data only.
///
/// Commands are the only way to request a lifecycle change on an existing
/// application. Intake is handled separately by [`crate::apply_intake`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Move a `Pending` application to `Approved`.
    Approve,
    /// Grant the exemption. Legal from `Approved`, or from `Pending` for a renewal.
    FinalApprove,
    /// Reject a `Pending` or `Approved` application.
    Reject {
        /// Mandatory, non-blank rejection reason. Stored as the notes.
        reason: Option<String>,
    },
    /// Re-open an expired, granted application as a renewal.
    Renew,
    /// Reject an application that is awaiting renewal.
    RejectRenewal,
}

impl Command {
    /// The human-readable verb used in error messages.
    #[must_use]
    pub const fn verb(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::FinalApprove => "final-approve",
            Self::Reject { .. } => "reject",
            Self::Renew => "renew",
            Self::RejectRenewal => "reject the renewal of",
        }
    }

    /// The audit action name recorded for this command.
    #[must_use]
    pub const fn action_name(&self) -> &'static str {
        match self {
            Self::Approve => "Approve",
            Self::FinalApprove => "FinalApprove",
            Self::Reject { .. } => "Reject",
            Self::Renew => "Renew",
            Self::RejectRenewal => "RejectRenewal",
        }
    }

    /// Returns true if the command may be issued without an acting user.
    #[must_use]
    pub const fn actor_optional(&self) -> bool {
        matches!(self, Self::Renew)
    }
}
