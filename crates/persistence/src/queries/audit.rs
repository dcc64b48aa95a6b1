// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit timeline queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::debug;
use vex_audit::AuditEvent;

use crate::data_models::{
    ActionData, ActorData, CauseData, StateSnapshotData, decode_timestamp,
};
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;

/// Diesel Queryable struct for audit event rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = audit_events)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct AuditEventRow {
    event_id: i64,
    application_id: Option<i64>,
    actor_json: String,
    cause_json: String,
    action_json: String,
    before_snapshot_json: String,
    after_snapshot_json: String,
    occurred_at: String,
}

impl AuditEventRow {
    fn into_domain(self) -> Result<AuditEvent, PersistenceError> {
        let actor: ActorData = serde_json::from_str(&self.actor_json)?;
        let cause: CauseData = serde_json::from_str(&self.cause_json)?;
        let action: ActionData = serde_json::from_str(&self.action_json)?;
        let before: StateSnapshotData = serde_json::from_str(&self.before_snapshot_json)?;
        let after: StateSnapshotData = serde_json::from_str(&self.after_snapshot_json)?;

        let event: AuditEvent = AuditEvent::new(
            self.application_id,
            actor.into(),
            cause.into(),
            action.into(),
            before.into(),
            after.into(),
            decode_timestamp(&self.occurred_at)?,
        );
        Ok(event.with_id(self.event_id))
    }
}

/// Retrieves the audit timeline of one application, oldest first.
///
/// The timeline survives deletion of the application.
///
/// # Errors
///
/// Returns an error if the database query fails or an event cannot be deserialized.
pub fn get_audit_timeline(
    conn: &mut SqliteConnection,
    application_id: i64,
) -> Result<Vec<AuditEvent>, PersistenceError> {
    debug!(application_id, "Loading audit timeline");

    audit_events::table
        .filter(audit_events::application_id.eq(application_id))
        .order(audit_events::event_id.asc())
        .select(AuditEventRow::as_select())
        .load(conn)?
        .into_iter()
        .map(AuditEventRow::into_domain)
        .collect()
}
