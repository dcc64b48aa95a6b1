// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use vex_audit::{Action, Actor, Cause, StateSnapshot};

use crate::error::PersistenceError;

/// Serializable representation of an Actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorData {
    pub id: String,
    pub actor_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl From<&Actor> for ActorData {
    fn from(actor: &Actor) -> Self {
        Self {
            id: actor.id.clone(),
            actor_type: actor.actor_type.clone(),
            user_id: actor.user_id,
            email: actor.email.clone(),
        }
    }
}

impl From<ActorData> for Actor {
    fn from(data: ActorData) -> Self {
        let mut actor: Self = Self::new(data.id, data.actor_type);
        actor.user_id = data.user_id;
        actor.email = data.email;
        actor
    }
}

/// Serializable representation of a Cause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CauseData {
    pub id: String,
    pub description: String,
}

/// Serializable representation of an Action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionData {
    pub name: String,
    pub details: Option<String>,
}

/// Serializable representation of a `StateSnapshot`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshotData {
    pub data: String,
}

impl From<CauseData> for Cause {
    fn from(data: CauseData) -> Self {
        Self::new(data.id, data.description)
    }
}

impl From<ActionData> for Action {
    fn from(data: ActionData) -> Self {
        Self::new(data.name, data.details)
    }
}

impl From<StateSnapshotData> for StateSnapshot {
    fn from(data: StateSnapshotData) -> Self {
        Self::new(data.data)
    }
}

/// Dashboard counts over every stored application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationSummary {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
    pub final_approved: usize,
    /// Granted applications whose expiry date has passed.
    pub expired: usize,
    /// Granted applications expiring within the due-soon window.
    pub due_soon: usize,
    /// Pending applications that are renewals.
    pub awaiting_renewal: usize,
}

/// Formats an instant for a `TEXT` column.
///
/// # Errors
///
/// Returns an error if the instant cannot be rendered as RFC 3339.
pub fn encode_timestamp(value: OffsetDateTime) -> Result<String, PersistenceError> {
    value
        .format(&Rfc3339)
        .map_err(|e| PersistenceError::SerializationError(format!("timestamp {value}: {e}")))
}

/// Formats an optional instant for a nullable `TEXT` column.
///
/// # Errors
///
/// Returns an error if the instant cannot be rendered as RFC 3339.
pub fn encode_optional_timestamp(
    value: Option<OffsetDateTime>,
) -> Result<Option<String>, PersistenceError> {
    value.map(encode_timestamp).transpose()
}

/// Parses an RFC 3339 `TEXT` column.
///
/// # Errors
///
/// Returns an error if the stored value is not RFC 3339.
pub fn decode_timestamp(value: &str) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(value, &Rfc3339)
        .map_err(|e| PersistenceError::SerializationError(format!("timestamp '{value}': {e}")))
}

/// Parses a nullable RFC 3339 `TEXT` column.
///
/// # Errors
///
/// Returns an error if the stored value is not RFC 3339.
pub fn decode_optional_timestamp(
    value: Option<&str>,
) -> Result<Option<OffsetDateTime>, PersistenceError> {
    value.map(decode_timestamp).transpose()
}
