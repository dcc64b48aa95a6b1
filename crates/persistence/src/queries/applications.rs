// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Application queries and read-path assembly.

use std::collections::HashMap;
use std::str::FromStr;

use diesel::prelude::*;
use diesel::SqliteConnection;
use num_traits::ToPrimitive;
use time::OffsetDateTime;
use tracing::debug;
use vex_domain::{
    Applicant, Application, ApplicationStatus, ApplicationView, Document, ExpiryClass,
};

use crate::data_models::{ApplicationSummary, decode_optional_timestamp, decode_timestamp};
use crate::diesel_schema::{applications, vehicles};
use crate::error::PersistenceError;
use crate::queries::documents::{documents_for_application, list_documents};

/// Diesel Queryable struct for application rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = applications)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ApplicationRow {
    application_id: i64,
    vehicle_id: i64,
    user_id: i64,
    salutation: String,
    first_name: String,
    last_name: String,
    national_id: String,
    address: String,
    cell: String,
    status: String,
    notes: Option<String>,
    created_at: String,
    updated_at: Option<String>,
    updated_by: Option<i64>,
    approved_at: Option<String>,
    approved_by: Option<String>,
    final_approved_at: Option<String>,
    final_approved_by: Option<String>,
    rejected_at: Option<String>,
    rejected_by: Option<String>,
    expiry_date: Option<String>,
    is_renewal: i32,
    renewal_count: i32,
}

impl ApplicationRow {
    /// Converts a stored row into the domain application.
    ///
    /// # Errors
    ///
    /// Returns an error if a stored value (status, timestamp, counter) is malformed.
    pub fn into_domain(self) -> Result<Application, PersistenceError> {
        let status: ApplicationStatus = ApplicationStatus::from_str(&self.status)
            .map_err(|e| PersistenceError::SerializationError(e.to_string()))?;
        let renewal_count: u32 = self.renewal_count.to_u32().ok_or_else(|| {
            PersistenceError::SerializationError(format!(
                "renewal_count {} of application {}",
                self.renewal_count, self.application_id
            ))
        })?;

        Ok(Application {
            application_id: Some(self.application_id),
            vehicle_id: self.vehicle_id,
            user_id: self.user_id,
            applicant: Applicant {
                salutation: self.salutation,
                first_name: self.first_name,
                last_name: self.last_name,
                national_id: self.national_id,
                address: self.address,
                cell: self.cell,
            },
            status,
            notes: self.notes,
            created_at: decode_timestamp(&self.created_at)?,
            updated_at: decode_optional_timestamp(self.updated_at.as_deref())?,
            updated_by: self.updated_by,
            approved_at: decode_optional_timestamp(self.approved_at.as_deref())?,
            approved_by: self.approved_by,
            final_approved_at: decode_optional_timestamp(self.final_approved_at.as_deref())?,
            final_approved_by: self.final_approved_by,
            rejected_at: decode_optional_timestamp(self.rejected_at.as_deref())?,
            rejected_by: self.rejected_by,
            expiry_date: decode_optional_timestamp(self.expiry_date.as_deref())?,
            is_renewal: self.is_renewal != 0,
            renewal_count,
        })
    }
}

/// Retrieves an application by ID.
///
/// # Errors
///
/// Returns an error if the database query fails or the row is malformed.
/// Returns `Ok(None)` if the application is not found.
pub fn get_application(
    conn: &mut SqliteConnection,
    application_id: i64,
) -> Result<Option<Application>, PersistenceError> {
    debug!(application_id, "Looking up application");

    applications::table
        .filter(applications::application_id.eq(application_id))
        .select(ApplicationRow::as_select())
        .first(conn)
        .optional()?
        .map(ApplicationRow::into_domain)
        .transpose()
}

/// Retrieves every application, ordered by ID.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is malformed.
pub fn list_applications(conn: &mut SqliteConnection) -> Result<Vec<Application>, PersistenceError> {
    applications::table
        .order(applications::application_id.asc())
        .select(ApplicationRow::as_select())
        .load(conn)?
        .into_iter()
        .map(ApplicationRow::into_domain)
        .collect()
}

/// Retrieves the assembled view of one application.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is malformed.
/// Returns `Ok(None)` if the application is not found.
pub fn get_application_view(
    conn: &mut SqliteConnection,
    application_id: i64,
) -> Result<Option<ApplicationView>, PersistenceError> {
    let row: Option<(ApplicationRow, String)> = applications::table
        .inner_join(vehicles::table)
        .filter(applications::application_id.eq(application_id))
        .select((ApplicationRow::as_select(), vehicles::vehicle_reg_no))
        .first(conn)
        .optional()?;

    let Some((row, vehicle_reg_no)) = row else {
        return Ok(None);
    };

    let documents: Vec<Document> = documents_for_application(conn, application_id)?;
    Ok(Some(ApplicationView::assemble(
        row.into_domain()?,
        vehicle_reg_no,
        &documents,
    )))
}

/// Retrieves the assembled view of every application, ordered by ID.
///
/// Documents are loaded in one query and grouped in memory.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is malformed.
pub fn list_application_views(
    conn: &mut SqliteConnection,
) -> Result<Vec<ApplicationView>, PersistenceError> {
    let rows: Vec<(ApplicationRow, String)> = applications::table
        .inner_join(vehicles::table)
        .order(applications::application_id.asc())
        .select((ApplicationRow::as_select(), vehicles::vehicle_reg_no))
        .load(conn)?;

    let mut documents_by_application: HashMap<i64, Vec<Document>> = HashMap::new();
    for document in list_documents(conn, None)? {
        documents_by_application
            .entry(document.application_id)
            .or_default()
            .push(document);
    }

    debug!(count = rows.len(), "Assembling application views");

    rows.into_iter()
        .map(|(row, vehicle_reg_no)| {
            let application: Application = row.into_domain()?;
            let documents: &[Document] = application
                .application_id
                .and_then(|id| documents_by_application.get(&id))
                .map_or(&[][..], Vec::as_slice);
            Ok(ApplicationView::assemble(
                application,
                vehicle_reg_no,
                documents,
            ))
        })
        .collect()
}

/// Retrieves every `Approved` application that has not been final-approved.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is malformed.
pub fn list_awaiting_final_approval(
    conn: &mut SqliteConnection,
) -> Result<Vec<Application>, PersistenceError> {
    applications::table
        .filter(applications::status.eq(ApplicationStatus::Approved.as_str()))
        .filter(applications::final_approved_by.is_null())
        .order(applications::application_id.asc())
        .select(ApplicationRow::as_select())
        .load(conn)?
        .into_iter()
        .map(ApplicationRow::into_domain)
        .collect()
}

/// Finds a non-rejected application for the same vehicle and national id.
///
/// `vehicle_reg_no` must already be normalised.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn find_open_duplicate(
    conn: &mut SqliteConnection,
    vehicle_reg_no: &str,
    national_id: &str,
) -> Result<Option<i64>, PersistenceError> {
    Ok(applications::table
        .inner_join(vehicles::table)
        .filter(vehicles::vehicle_reg_no.eq(vehicle_reg_no))
        .filter(applications::national_id.eq(national_id))
        .filter(applications::status.ne(ApplicationStatus::Rejected.as_str()))
        .select(applications::application_id)
        .first::<i64>(conn)
        .optional()?)
}

/// Counts applications by status and expiry class as of `now`.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is malformed.
pub fn application_summary(
    conn: &mut SqliteConnection,
    now: OffsetDateTime,
) -> Result<ApplicationSummary, PersistenceError> {
    let mut summary: ApplicationSummary = ApplicationSummary::default();

    for application in list_applications(conn)? {
        summary.total += 1;
        match application.status {
            ApplicationStatus::Pending => {
                summary.pending += 1;
                if application.is_renewal {
                    summary.awaiting_renewal += 1;
                }
            }
            ApplicationStatus::Approved => summary.approved += 1,
            ApplicationStatus::Rejected => summary.rejected += 1,
            ApplicationStatus::FinalApproved => summary.final_approved += 1,
        }
        if !application.status.is_granted() {
            continue;
        }
        match application.expiry_class(now) {
            Some(ExpiryClass::Expired) => summary.expired += 1,
            Some(ExpiryClass::DueSoon) => summary.due_soon += 1,
            Some(ExpiryClass::Active) | None => {}
        }
    }

    Ok(summary)
}
