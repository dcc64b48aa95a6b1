// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use vex_domain::Document;

use crate::data_models::{decode_optional_timestamp, decode_timestamp};
use crate::diesel_schema::documents;
use crate::error::PersistenceError;

/// Diesel Queryable struct for document rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = documents)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct DocumentRow {
    document_id: i64,
    application_id: i64,
    doc_type: String,
    file_path: String,
    file_type: String,
    created_at: String,
    updated_at: Option<String>,
}

impl DocumentRow {
    fn into_domain(self) -> Result<Document, PersistenceError> {
        Ok(Document {
            document_id: self.document_id,
            application_id: self.application_id,
            doc_type: self.doc_type,
            file_path: self.file_path,
            file_type: self.file_type,
            created_at: decode_timestamp(&self.created_at)?,
            updated_at: decode_optional_timestamp(self.updated_at.as_deref())?,
        })
    }
}

/// Retrieves documents ordered by ID, optionally for one application only.
///
/// Documents of deleted applications are still returned.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is malformed.
pub fn list_documents(
    conn: &mut SqliteConnection,
    application_id: Option<i64>,
) -> Result<Vec<Document>, PersistenceError> {
    let rows: Vec<DocumentRow> = match application_id {
        Some(application_id) => documents::table
            .filter(documents::application_id.eq(application_id))
            .order(documents::document_id.asc())
            .select(DocumentRow::as_select())
            .load(conn)?,
        None => documents::table
            .order(documents::document_id.asc())
            .select(DocumentRow::as_select())
            .load(conn)?,
    };

    rows.into_iter()
        .map(DocumentRow::into_domain)
        .collect()
}

/// Retrieves the documents of one application, ordered by ID.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is malformed.
pub fn documents_for_application(
    conn: &mut SqliteConnection,
    application_id: i64,
) -> Result<Vec<Document>, PersistenceError> {
    list_documents(conn, Some(application_id))
}

/// Retrieves a document by ID.
///
/// # Errors
///
/// Returns an error if the database query fails or the row is malformed.
/// Returns `Ok(None)` if the document is not found.
pub fn get_document(
    conn: &mut SqliteConnection,
    document_id: i64,
) -> Result<Option<Document>, PersistenceError> {
    documents::table
        .filter(documents::document_id.eq(document_id))
        .select(DocumentRow::as_select())
        .first(conn)
        .optional()?
        .map(DocumentRow::into_domain)
        .transpose()
}
