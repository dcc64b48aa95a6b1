// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.

use time::OffsetDateTime;
use vex_domain::{Application, ApplicationStatus, DocumentRef, ExpiryClass};
use vex_persistence::ApplicationSummary;

/// A supporting document in a submission request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentInput {
    /// The stored file path.
    pub file_path: String,
    /// Optional label. The category label is used when absent.
    pub doc_type: Option<String>,
}

/// API request to submit a new exemption application.
///
/// This DTO is distinct from domain types and represents the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitApplicationRequest {
    /// The submitting staff user.
    pub user_id: i64,
    pub vehicle_reg_no: String,
    pub salutation: String,
    pub first_name: String,
    pub last_name: String,
    pub national_id: String,
    pub address: String,
    pub cell: String,
    /// The exemption category (`War Veteran` or `Senior Citizen`).
    pub category: String,
    pub documents: Vec<DocumentInput>,
}

/// API response for a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SubmitApplicationResponse {
    /// The canonical application identifier.
    pub application_id: i64,
    /// The vehicle the application was filed against.
    pub vehicle_id: i64,
    /// The status of the new application.
    pub status: String,
    /// The number of document rows stored.
    pub document_count: usize,
    /// The event ID of the persisted audit event.
    pub event_id: i64,
    /// A success message.
    pub message: String,
}

/// API request for a single-application transition that needs no reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRequest {
    /// The application to act on.
    pub application_id: i64,
    /// The acting staff user. Only a renewal may omit it.
    pub actor_id: Option<i64>,
}

/// API request to reject an application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectRequest {
    /// The application to reject.
    pub application_id: i64,
    /// The acting staff user.
    pub actor_id: Option<i64>,
    /// The rejection reason. Required.
    pub reason: Option<String>,
}

/// API request to reject several applications at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectAllRequest {
    /// The applications to reject.
    pub application_ids: Vec<i64>,
    /// The acting staff user.
    pub actor_id: i64,
    /// The rejection reason shared by every item. Required.
    pub reason: Option<String>,
}

/// API response for a successful transition.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TransitionResponse {
    /// The canonical application identifier.
    pub application_id: i64,
    /// The status after the transition.
    pub status: String,
    /// The expiry after the transition, if any.
    #[serde(with = "time::serde::rfc3339::option")]
    pub expiry_date: Option<OffsetDateTime>,
    /// Whether the application is an open renewal.
    pub is_renewal: bool,
    /// Completed renewals.
    pub renewal_count: u32,
    /// The event ID of the persisted audit event.
    pub event_id: i64,
    /// A success message.
    pub message: String,
}

/// Criteria for narrowing an application listing.
///
/// Unset criteria match everything. Filtering is applied after retrieval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplicationFilter {
    /// Only applications in this status.
    pub status: Option<ApplicationStatus>,
    /// Only applications whose expiry falls in this class.
    pub expiry: Option<ExpiryClass>,
    /// Only open renewals.
    pub renewals_only: bool,
}

impl ApplicationFilter {
    /// Returns true if `application` satisfies every set criterion at `now`.
    #[must_use]
    pub fn matches(&self, application: &Application, now: OffsetDateTime) -> bool {
        self.status.is_none_or(|status| application.status == status)
            && self
                .expiry
                .is_none_or(|class| application.expiry_class(now) == Some(class))
            && (!self.renewals_only || application.is_renewal)
    }
}

/// Full application information for reads.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ApplicationInfo {
    /// The canonical application identifier.
    pub application_id: i64,
    pub vehicle_id: i64,
    pub vehicle_reg_no: String,
    /// The submitting staff user.
    pub user_id: i64,
    pub salutation: String,
    pub first_name: String,
    pub last_name: String,
    pub national_id: String,
    pub address: String,
    pub cell: String,
    pub status: String,
    /// Free text. Holds the rejection reason when rejected.
    pub notes: Option<String>,
    /// Aggregated `(type, path)` pairs in upload order.
    pub documents: Vec<DocumentRef>,
    /// Type of the first aggregated document.
    pub primary_type: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub approved_at: Option<OffsetDateTime>,
    pub approved_by: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub final_approved_at: Option<OffsetDateTime>,
    pub final_approved_by: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub rejected_at: Option<OffsetDateTime>,
    pub rejected_by: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub expiry_date: Option<OffsetDateTime>,
    /// The expiry classification at the time of the read.
    pub expiry_class: Option<ExpiryClass>,
    pub is_renewal: bool,
    pub renewal_count: u32,
    /// Actions whose status guards currently pass.
    pub available_actions: Vec<String>,
}

/// API response for listing applications.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListApplicationsResponse {
    /// The matching applications, ordered by id.
    pub applications: Vec<ApplicationInfo>,
}

/// API response for a deletion.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DeleteResponse {
    /// The identifier of the deleted row.
    pub id: i64,
    /// A success message.
    pub message: String,
}

/// API response for the dashboard summary.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GetSummaryResponse {
    /// The instant the expiry counts were computed against.
    #[serde(with = "time::serde::rfc3339")]
    pub as_of: OffsetDateTime,
    pub summary: ApplicationSummary,
}

/// A single audit event in a timeline.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AuditEventInfo {
    pub event_id: i64,
    pub actor_id: String,
    pub actor_type: String,
    pub actor_email: Option<String>,
    pub action: String,
    pub details: Option<String>,
    pub before: String,
    pub after: String,
    #[serde(with = "time::serde::rfc3339")]
    pub occurred_at: OffsetDateTime,
}

/// API response for an application's audit timeline.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AuditTimelineResponse {
    pub application_id: i64,
    /// Events in the order they were recorded.
    pub events: Vec<AuditEventInfo>,
}

/// API request to create a staff account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUserRequest {
    pub email: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    /// `Clerk`, `Approver` or `FinalApprover`.
    pub role: String,
    pub password: String,
}

/// API request to replace a staff account's profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateUserRequest {
    pub email: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    /// `Clerk`, `Approver` or `FinalApprover`.
    pub role: String,
    /// A new password. The stored one is kept when absent.
    pub password: Option<String>,
}

/// Staff account information. Never includes the password hash.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UserInfo {
    pub user_id: i64,
    pub email: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub role: String,
}

/// API response for listing staff accounts.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListUsersResponse {
    pub users: Vec<UserInfo>,
}

/// A stored document row.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DocumentInfo {
    pub document_id: i64,
    pub application_id: i64,
    pub doc_type: String,
    pub file_path: String,
    pub file_type: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

/// API response for listing documents.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListDocumentsResponse {
    pub documents: Vec<DocumentInfo>,
}

/// A registered vehicle.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct VehicleInfo {
    pub vehicle_id: i64,
    pub vehicle_reg_no: String,
    pub user_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// API request to register a vehicle to a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateVehicleRequest {
    pub vehicle_reg_no: String,
    pub user_id: i64,
}

/// API response for listing vehicles.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListVehiclesResponse {
    pub vehicles: Vec<VehicleInfo>,
}
