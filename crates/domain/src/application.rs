// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The exemption application and its documents.

use crate::expiry::{ExpiryClass, classify};
use crate::status::ApplicationStatus;
use crate::types::{Applicant, ExemptionCategory, VehicleRegNo};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use time::OffsetDateTime;

/// A single exemption request progressing through the approval lifecycle.
///
/// Actor stamps (`approved_by`, `final_approved_by`, `rejected_by`) hold the
/// acting user's email. `updated_by` holds the acting user's id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    /// Canonical identifier. `None` before the application is persisted.
    pub application_id: Option<i64>,
    pub vehicle_id: i64,
    /// The user who submitted the application.
    pub user_id: i64,
    pub applicant: Applicant,
    pub status: ApplicationStatus,
    /// Free text. Holds the rejection reason when rejected.
    pub notes: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: Option<OffsetDateTime>,
    pub updated_by: Option<i64>,
    pub approved_at: Option<OffsetDateTime>,
    pub approved_by: Option<String>,
    pub final_approved_at: Option<OffsetDateTime>,
    pub final_approved_by: Option<String>,
    pub rejected_at: Option<OffsetDateTime>,
    pub rejected_by: Option<String>,
    pub expiry_date: Option<OffsetDateTime>,
    pub is_renewal: bool,
    pub renewal_count: u32,
}

impl Application {
    /// Creates a freshly submitted application in `Pending` status.
    #[must_use]
    pub const fn new_pending(
        vehicle_id: i64,
        user_id: i64,
        applicant: Applicant,
        created_at: OffsetDateTime,
    ) -> Self {
        Self {
            application_id: None,
            vehicle_id,
            user_id,
            applicant,
            status: ApplicationStatus::Pending,
            notes: None,
            created_at,
            updated_at: None,
            updated_by: None,
            approved_at: None,
            approved_by: None,
            final_approved_at: None,
            final_approved_by: None,
            rejected_at: None,
            rejected_by: None,
            expiry_date: None,
            is_renewal: false,
            renewal_count: 0,
        }
    }

    /// Returns the persisted id, or 0 for an unsaved application.
    #[must_use]
    pub fn id_or_default(&self) -> i64 {
        self.application_id.unwrap_or_default()
    }

    /// Classifies the expiry date against `now`. `None` when no expiry is set.
    #[must_use]
    pub fn expiry_class(&self, now: OffsetDateTime) -> Option<ExpiryClass> {
        self.expiry_date.map(|expiry| classify(expiry, now))
    }

    /// Returns true if the expiry date exists and lies before `now`.
    #[must_use]
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.expiry_class(now) == Some(ExpiryClass::Expired)
    }
}

/// An intake submission before it is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationDraft {
    /// The submitting user.
    pub user_id: i64,
    pub vehicle_reg_no: VehicleRegNo,
    pub applicant: Applicant,
    pub category: ExemptionCategory,
}

/// A supporting document supplied with a submission.
///
/// The binary lives in external storage; only its retrievable path is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentUpload {
    /// Stable path of the stored file.
    pub file_path: String,
    /// Optional document label. Defaults to the submission category.
    pub doc_type: Option<String>,
}

impl DocumentUpload {
    /// Creates an upload labelled with the submission category.
    #[must_use]
    pub fn new(file_path: &str) -> Self {
        Self {
            file_path: file_path.trim().to_string(),
            doc_type: None,
        }
    }

    /// Creates an upload with an explicit label.
    #[must_use]
    pub fn labelled(file_path: &str, doc_type: &str) -> Self {
        Self {
            file_path: file_path.trim().to_string(),
            doc_type: Some(doc_type.trim().to_string()),
        }
    }

    /// Returns the lowercase file extension, or an empty string.
    #[must_use]
    pub fn file_type(&self) -> String {
        file_extension(&self.file_path)
    }

    /// Resolves the stored label for this document.
    #[must_use]
    pub fn resolved_type(&self, category: ExemptionCategory) -> String {
        self.doc_type
            .as_deref()
            .filter(|t| !t.is_empty())
            .map_or_else(|| category.as_str().to_string(), ToString::to_string)
    }
}

/// Returns the lowercase extension of a file path, without the dot.
#[must_use]
pub fn file_extension(path: &str) -> String {
    let file_name: &str = path.rsplit(['/', '\\']).next().unwrap_or(path);
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => ext.to_lowercase(),
        _ => String::new(),
    }
}

/// A persisted document row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub document_id: i64,
    pub application_id: i64,
    pub doc_type: String,
    pub file_path: String,
    pub file_type: String,
    pub created_at: OffsetDateTime,
    pub updated_at: Option<OffsetDateTime>,
}

/// A `(type, path)` pair in an aggregated application view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    pub doc_type: String,
    pub file_path: String,
}

/// Read-side view of an application with its vehicle and documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationView {
    pub application: Application,
    pub vehicle_reg_no: String,
    /// Documents deduplicated by file path, in upload order.
    pub documents: Vec<DocumentRef>,
    /// Type of the first aggregated document, if any.
    pub primary_type: Option<String>,
}

impl ApplicationView {
    /// Assembles a view from an application and its raw document rows.
    #[must_use]
    pub fn assemble(
        application: Application,
        vehicle_reg_no: String,
        documents: &[Document],
    ) -> Self {
        let documents: Vec<DocumentRef> = aggregate_documents(documents);
        let primary_type: Option<String> = documents.first().map(|d| d.doc_type.clone());
        Self {
            application,
            vehicle_reg_no,
            documents,
            primary_type,
        }
    }

    /// Returns the distinct document types in aggregation order.
    #[must_use]
    pub fn document_types(&self) -> Vec<&str> {
        let mut seen: HashSet<&str> = HashSet::new();
        self.documents
            .iter()
            .map(|d| d.doc_type.as_str())
            .filter(|t| seen.insert(*t))
            .collect()
    }
}

/// Aggregates document rows into `(type, path)` pairs.
///
/// Rows are ordered by document id and deduplicated by file path, keeping the
/// first occurrence.
#[must_use]
pub fn aggregate_documents(documents: &[Document]) -> Vec<DocumentRef> {
    let mut ordered: Vec<&Document> = documents.iter().collect();
    ordered.sort_by_key(|d| d.document_id);

    let mut seen_paths: HashSet<&str> = HashSet::new();
    ordered
        .into_iter()
        .filter(|d| seen_paths.insert(d.file_path.as_str()))
        .map(|d| DocumentRef {
            doc_type: d.doc_type.clone(),
            file_path: d.file_path.clone(),
        })
        .collect()
}
