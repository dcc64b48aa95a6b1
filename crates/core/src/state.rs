// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use vex_audit::AuditEvent;
use vex_domain::Application;

/// The result of a successful lifecycle transition.
///
/// Transitions are atomic: they either succeed completely or fail without side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The application after the transition.
    pub new_application: Application,
    /// The audit event recording this transition.
    pub audit_event: AuditEvent,
}

/// The result of accepting a new submission.
///
/// The application is not yet persisted; its audit event is bound to the
/// assigned id when it is saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeResult {
    /// The new `Pending` application.
    pub application: Application,
    /// The audit event recording the submission.
    pub audit_event: AuditEvent,
}
