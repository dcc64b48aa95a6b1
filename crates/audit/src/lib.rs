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
    clippy::all
)]

use time::OffsetDateTime;
use vex_domain::{Application, Role};

/// Represents the entity performing an action.
///
/// Staff actors carry their user id and email. Actor-less operations
/// (public renewals) are recorded with [`Actor::unattributed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// The unique identifier for this actor.
    pub id: String,
    /// The type of actor (a role name, or `"public"`).
    pub actor_type: String,
    /// The staff user id, when the actor is a user.
    pub user_id: Option<i64>,
    /// The staff user's email, when the actor is a user.
    pub email: Option<String>,
}

impl Actor {
    /// Creates a new Actor that is not tied to a staff user.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this actor
    /// * `actor_type` - The type of actor
    #[must_use]
    pub const fn new(id: String, actor_type: String) -> Self {
        Self {
            id,
            actor_type,
            user_id: None,
            email: None,
        }
    }

    /// Creates an Actor for a resolved staff user.
    #[must_use]
    pub fn for_user(user_id: i64, email: &str, role: Role) -> Self {
        Self {
            id: format!("user-{user_id}"),
            actor_type: role.as_str().to_string(),
            user_id: Some(user_id),
            email: Some(email.to_string()),
        }
    }

    /// The actor recorded when no acting user was supplied.
    #[must_use]
    pub fn unattributed() -> Self {
        Self::new(String::from("anonymous"), String::from("public"))
    }
}

/// Represents the reason or trigger for an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cause {
    /// A unique identifier for this cause (e.g., request ID, batch ID).
    pub id: String,
    /// A description of the cause.
    pub description: String,
}

impl Cause {
    /// Creates a new Cause.
    #[must_use]
    pub const fn new(id: String, description: String) -> Self {
        Self { id, description }
    }
}

/// Represents the specific action performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// The name of the action (e.g., "`Approve`", "`FinalApprove`").
    pub name: String,
    /// Optional additional details about the action.
    pub details: Option<String>,
}

impl Action {
    /// Creates a new Action.
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// The lifecycle-relevant slice of an application at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSnapshot {
    /// A compact `key=value` rendering of the lifecycle fields.
    pub data: String,
}

impl StateSnapshot {
    /// Creates a new `StateSnapshot`.
    #[must_use]
    pub const fn new(data: String) -> Self {
        Self { data }
    }

    /// Captures the lifecycle fields of an application.
    #[must_use]
    pub fn of_application(application: &Application) -> Self {
        let expiry: String = application
            .expiry_date
            .map_or_else(|| String::from("none"), |e| e.date().to_string());
        Self::new(format!(
            "status={},is_renewal={},renewal_count={},expiry={expiry}",
            application.status.as_str(),
            application.is_renewal,
            application.renewal_count,
        ))
    }
}

/// An immutable audit event representing one application lifecycle change.
///
/// Every successful transition produces exactly one audit event capturing
/// who acted, why, what was done, and the application before and after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// The event ID assigned by persistence. `None` until persisted.
    pub event_id: Option<i64>,
    /// The application this event belongs to. `None` until the application
    /// itself has been persisted (intake events are bound at save time).
    pub application_id: Option<i64>,
    /// The actor who initiated this change.
    pub actor: Actor,
    /// The cause or reason for this change.
    pub cause: Cause,
    /// The action that was performed.
    pub action: Action,
    /// The application state before the transition.
    pub before: StateSnapshot,
    /// The application state after the transition.
    pub after: StateSnapshot,
    /// When the transition happened.
    pub occurred_at: OffsetDateTime,
}

impl AuditEvent {
    /// Creates a new, unpersisted `AuditEvent`.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        application_id: Option<i64>,
        actor: Actor,
        cause: Cause,
        action: Action,
        before: StateSnapshot,
        after: StateSnapshot,
        occurred_at: OffsetDateTime,
    ) -> Self {
        Self {
            event_id: None,
            application_id,
            actor,
            cause,
            action,
            before,
            after,
            occurred_at,
        }
    }

    /// Attaches the persisted event ID.
    #[must_use]
    pub const fn with_id(mut self, event_id: i64) -> Self {
        self.event_id = Some(event_id);
        self
    }

    /// Binds the event to an application id assigned after creation.
    #[must_use]
    pub const fn for_application(mut self, application_id: i64) -> Self {
        self.application_id = Some(application_id);
        self
    }
}
