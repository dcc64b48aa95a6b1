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
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

//! API boundary for the vehicle exemption workflow.
//!
//! Handlers translate request DTOs into domain values, run the lifecycle
//! inside persistence transactions and translate every lower-layer error
//! into [`ApiError`]. Callers supply `now` so the clock stays outside.

mod bulk;
mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use bulk::{BulkFailure, BulkOutcome, final_approve_all, reject_all};
pub use error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
pub use handlers::{
    approve, create_user, create_vehicle, delete_application, delete_document, delete_user,
    delete_vehicle, final_approve, get_application, get_audit_timeline, get_summary,
    list_applications, list_documents, list_expired, list_users, list_vehicles, reject,
    reject_renewal, renew, submit_application, update_document_type, update_user, update_vehicle,
};
pub use request_response::{
    ApplicationFilter, ApplicationInfo, AuditEventInfo, AuditTimelineResponse, CreateUserRequest,
    CreateVehicleRequest, DeleteResponse, DocumentInfo, DocumentInput, GetSummaryResponse,
    ListApplicationsResponse, ListDocumentsResponse, ListUsersResponse, ListVehiclesResponse,
    RejectAllRequest, RejectRequest, SubmitApplicationRequest, SubmitApplicationResponse,
    TransitionRequest, TransitionResponse, UpdateUserRequest, UserInfo, VehicleInfo,
};
