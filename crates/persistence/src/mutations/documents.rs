// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::data_models::encode_timestamp;
use crate::diesel_schema::documents;
use crate::error::PersistenceError;

/// Inserts one document row for an application.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_document(
    conn: &mut SqliteConnection,
    application_id: i64,
    doc_type: &str,
    file_path: &str,
    file_type: &str,
    now: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(documents::table)
        .values((
            documents::application_id.eq(application_id),
            documents::doc_type.eq(doc_type),
            documents::file_path.eq(file_path),
            documents::file_type.eq(file_type),
            documents::created_at.eq(encode_timestamp(now)?),
        ))
        .execute(conn)?;

    let document_id: i64 = conn.get_last_insert_rowid()?;
    debug!(document_id, application_id, doc_type, "Inserted document");

    Ok(document_id)
}

/// Corrects the type label of a document.
///
/// # Errors
///
/// Returns `PersistenceError::DocumentNotFound` if no row matched.
pub fn update_document_type(
    conn: &mut SqliteConnection,
    document_id: i64,
    doc_type: &str,
    now: OffsetDateTime,
) -> Result<(), PersistenceError> {
    let affected: usize = diesel::update(documents::table)
        .filter(documents::document_id.eq(document_id))
        .set((
            documents::doc_type.eq(doc_type),
            documents::updated_at.eq(Some(encode_timestamp(now)?)),
        ))
        .execute(conn)?;

    if affected == 0 {
        return Err(PersistenceError::DocumentNotFound(document_id));
    }

    info!(document_id, doc_type, "Updated document type");
    Ok(())
}

/// Deletes a document row. The application is left untouched.
///
/// # Errors
///
/// Returns `PersistenceError::DocumentNotFound` if no row matched.
pub fn delete_document(conn: &mut SqliteConnection, document_id: i64) -> Result<(), PersistenceError> {
    let affected: usize = diesel::delete(documents::table)
        .filter(documents::document_id.eq(document_id))
        .execute(conn)?;

    if affected == 0 {
        return Err(PersistenceError::DocumentNotFound(document_id));
    }

    info!(document_id, "Deleted document");
    Ok(())
}
