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

mod live;

use axum::{
    Json, Router,
    extract::{FromRef, Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use vex_api::{
    ApiError, ApplicationFilter, ApplicationInfo, AuditTimelineResponse, BulkOutcome,
    CreateUserRequest, CreateVehicleRequest, DeleteResponse, DocumentInfo, DocumentInput,
    GetSummaryResponse, ListApplicationsResponse, ListDocumentsResponse, ListUsersResponse,
    ListVehiclesResponse, RejectAllRequest, RejectRequest, SubmitApplicationRequest,
    SubmitApplicationResponse, TransitionRequest, TransitionResponse, UpdateUserRequest,
    UserInfo, VehicleInfo,
};
use vex_audit::Cause;
use vex_domain::{ApplicationStatus, ExpiryClass};
use vex_persistence::{PersistenceError, SqlitePersistence};

use crate::live::{LiveEvent, LiveEventBroadcaster, live_events_handler};

/// VEX Server - HTTP server for the vehicle exemption workflow
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Address to bind the server to
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: String,

    /// Email of a Clerk account to create at startup if it does not exist
    #[arg(long, requires = "seed_password")]
    seed_admin: Option<String>,

    /// Password for the seeded Clerk account
    #[arg(long, requires = "seed_admin")]
    seed_password: Option<String>,
}

/// Errors that stop the server from starting.
#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("failed to open database: {0}")]
    Persistence(#[from] PersistenceError),
    #[error("failed to seed account: {0}")]
    Seed(#[from] ApiError),
    #[error("invalid bind address: {0}")]
    Address(#[from] std::net::AddrParseError),
    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Application state shared across handlers.
///
/// The single connection is serialised behind a mutex; every API call holds
/// it for the length of one transaction.
#[derive(Clone)]
struct AppState {
    persistence: Arc<Mutex<SqlitePersistence>>,
    live_events: Arc<LiveEventBroadcaster>,
}

impl FromRef<AppState> for Arc<LiveEventBroadcaster> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.live_events)
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Clone, Deserialize, Serialize)]
struct DocumentApiInput {
    file_path: String,
    #[serde(default)]
    doc_type: Option<String>,
}

/// API request for submitting an application.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct SubmitApplicationApiRequest {
    user_id: i64,
    vehicle_reg_no: String,
    salutation: String,
    first_name: String,
    last_name: String,
    national_id: String,
    address: String,
    cell: String,
    category: String,
    documents: Vec<DocumentApiInput>,
}

/// API request body for a lifecycle action.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
struct ActionApiRequest {
    #[serde(default)]
    actor_id: Option<i64>,
    #[serde(default)]
    reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct FinalApproveAllApiRequest {
    actor_id: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct RejectAllApiRequest {
    application_ids: Vec<i64>,
    actor_id: i64,
    #[serde(default)]
    reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct CreateUserApiRequest {
    email: String,
    first_name: String,
    #[serde(default)]
    middle_name: Option<String>,
    last_name: String,
    role: String,
    password: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct UpdateUserApiRequest {
    email: String,
    first_name: String,
    #[serde(default)]
    middle_name: Option<String>,
    last_name: String,
    role: String,
    /// Omitted to keep the current password.
    #[serde(default)]
    password: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct UpdateDocumentApiRequest {
    doc_type: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct CreateVehicleApiRequest {
    vehicle_reg_no: String,
    user_id: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct UpdateVehicleApiRequest {
    vehicle_reg_no: String,
}

/// Query parameters for listing applications.
#[derive(Debug, Default, Deserialize)]
struct ApplicationListQuery {
    status: Option<String>,
    expiry: Option<ExpiryClass>,
    #[serde(default)]
    renewals_only: bool,
}

#[derive(Debug, Default, Deserialize)]
struct DocumentListQuery {
    application_id: Option<i64>,
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match err {
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::DuplicateApplication { .. }
            | ApiError::IllegalTransition { .. }
            | ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

fn http_cause(action: &str) -> Cause {
    Cause::new(String::from("http"), format!("{action} via HTTP"))
}

// ============================================================================
// Applications
// ============================================================================

/// Handler for POST `/applications`.
async fn handle_submit_application(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<SubmitApplicationApiRequest>,
) -> Result<Json<SubmitApplicationResponse>, HttpError> {
    info!(
        user_id = req.user_id,
        vehicle_reg_no = %req.vehicle_reg_no,
        "Handling submit_application request"
    );

    let request: SubmitApplicationRequest = SubmitApplicationRequest {
        user_id: req.user_id,
        vehicle_reg_no: req.vehicle_reg_no,
        salutation: req.salutation,
        first_name: req.first_name,
        last_name: req.last_name,
        national_id: req.national_id,
        address: req.address,
        cell: req.cell,
        category: req.category,
        documents: req
            .documents
            .into_iter()
            .map(|d| DocumentInput {
                file_path: d.file_path,
                doc_type: d.doc_type,
            })
            .collect(),
    };

    let mut persistence = app_state.persistence.lock().await;
    let response: SubmitApplicationResponse = vex_api::submit_application(
        &mut persistence,
        &request,
        http_cause("Submit"),
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    app_state
        .live_events
        .broadcast(&LiveEvent::ApplicationSubmitted {
            application_id: response.application_id,
            vehicle_reg_no: request.vehicle_reg_no,
        });

    Ok(Json(response))
}

/// Handler for GET `/applications`.
async fn handle_list_applications(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<ApplicationListQuery>,
) -> Result<Json<ListApplicationsResponse>, HttpError> {
    let status: Option<ApplicationStatus> = query
        .status
        .as_deref()
        .map(ApplicationStatus::from_str)
        .transpose()
        .map_err(ApiError::from)?;
    let filter: ApplicationFilter = ApplicationFilter {
        status,
        expiry: query.expiry,
        renewals_only: query.renewals_only,
    };

    let mut persistence = app_state.persistence.lock().await;
    let response: ListApplicationsResponse =
        vex_api::list_applications(&mut persistence, &filter, OffsetDateTime::now_utc())?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/applications/expired`.
async fn handle_list_expired(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<ListApplicationsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListApplicationsResponse =
        vex_api::list_expired(&mut persistence, OffsetDateTime::now_utc())?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/applications/{application_id}`.
async fn handle_get_application(
    AxumState(app_state): AxumState<AppState>,
    Path(application_id): Path<i64>,
) -> Result<Json<ApplicationInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ApplicationInfo =
        vex_api::get_application(&mut persistence, application_id, OffsetDateTime::now_utc())?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for DELETE `/applications/{application_id}`.
async fn handle_delete_application(
    AxumState(app_state): AxumState<AppState>,
    Path(application_id): Path<i64>,
) -> Result<Json<DeleteResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: DeleteResponse = vex_api::delete_application(&mut persistence, application_id)?;
    drop(persistence);

    app_state
        .live_events
        .broadcast(&LiveEvent::ApplicationDeleted { application_id });

    Ok(Json(response))
}

/// Handler for GET `/applications/{application_id}/audit`.
async fn handle_get_audit_timeline(
    AxumState(app_state): AxumState<AppState>,
    Path(application_id): Path<i64>,
) -> Result<Json<AuditTimelineResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: AuditTimelineResponse =
        vex_api::get_audit_timeline(&mut persistence, application_id)?;
    drop(persistence);

    Ok(Json(response))
}

// ============================================================================
// Lifecycle actions
// ============================================================================

/// Handler for POST `/applications/{application_id}/{action}`.
///
/// `action` is one of `approve`, `final_approve`, `reject`, `renew` or
/// `reject_renewal`. The body is optional for `renew`.
async fn handle_lifecycle_action(
    AxumState(app_state): AxumState<AppState>,
    Path((application_id, action)): Path<(i64, String)>,
    body: Option<Json<ActionApiRequest>>,
) -> Result<Json<TransitionResponse>, HttpError> {
    let req: ActionApiRequest = body.map(|Json(req)| req).unwrap_or_default();
    info!(
        application_id,
        action = %action,
        actor_id = ?req.actor_id,
        "Handling lifecycle request"
    );

    let request: TransitionRequest = TransitionRequest {
        application_id,
        actor_id: req.actor_id,
    };
    let now: OffsetDateTime = OffsetDateTime::now_utc();

    let mut persistence = app_state.persistence.lock().await;
    let (action_name, result): (&str, Result<TransitionResponse, ApiError>) =
        match action.as_str() {
            "approve" => (
                "Approve",
                vex_api::approve(&mut persistence, request, http_cause("Approve"), now),
            ),
            "final_approve" => (
                "FinalApprove",
                vex_api::final_approve(&mut persistence, request, http_cause("FinalApprove"), now),
            ),
            "reject" => (
                "Reject",
                vex_api::reject(
                    &mut persistence,
                    RejectRequest {
                        application_id,
                        actor_id: req.actor_id,
                        reason: req.reason,
                    },
                    http_cause("Reject"),
                    now,
                ),
            ),
            "renew" => (
                "Renew",
                vex_api::renew(&mut persistence, request, http_cause("Renew"), now),
            ),
            "reject_renewal" => (
                "RejectRenewal",
                vex_api::reject_renewal(
                    &mut persistence,
                    request,
                    http_cause("RejectRenewal"),
                    now,
                ),
            ),
            _ => {
                return Err(HttpError {
                    status: StatusCode::NOT_FOUND,
                    message: format!("Unknown action '{action}'"),
                });
            }
        };
    drop(persistence);

    let response: TransitionResponse = result?;
    app_state
        .live_events
        .broadcast(&LiveEvent::ApplicationTransitioned {
            application_id,
            action: action_name.to_string(),
            status: response.status.clone(),
        });

    Ok(Json(response))
}

/// Handler for POST `/bulk/final_approve`.
async fn handle_final_approve_all(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<FinalApproveAllApiRequest>,
) -> Result<Json<BulkOutcome>, HttpError> {
    info!(actor_id = req.actor_id, "Handling bulk final approval");

    let mut persistence = app_state.persistence.lock().await;
    let outcome: BulkOutcome = vex_api::final_approve_all(
        &mut persistence,
        req.actor_id,
        &http_cause("FinalApproveAll"),
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    app_state.live_events.broadcast(&LiveEvent::BulkCompleted {
        action: String::from("FinalApprove"),
        succeeded: outcome.succeeded,
        failed: outcome.failed,
    });

    Ok(Json(outcome))
}

/// Handler for POST `/bulk/reject`.
async fn handle_reject_all(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<RejectAllApiRequest>,
) -> Result<Json<BulkOutcome>, HttpError> {
    info!(
        actor_id = req.actor_id,
        count = req.application_ids.len(),
        "Handling bulk rejection"
    );

    let request: RejectAllRequest = RejectAllRequest {
        application_ids: req.application_ids,
        actor_id: req.actor_id,
        reason: req.reason,
    };

    let mut persistence = app_state.persistence.lock().await;
    let outcome: BulkOutcome = vex_api::reject_all(
        &mut persistence,
        &request,
        &http_cause("RejectAll"),
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    app_state.live_events.broadcast(&LiveEvent::BulkCompleted {
        action: String::from("Reject"),
        succeeded: outcome.succeeded,
        failed: outcome.failed,
    });

    Ok(Json(outcome))
}

// ============================================================================
// Dashboard & supporting resources
// ============================================================================

/// Handler for GET `/summary`.
async fn handle_get_summary(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<GetSummaryResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: GetSummaryResponse =
        vex_api::get_summary(&mut persistence, OffsetDateTime::now_utc())?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/users`.
async fn handle_create_user(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateUserApiRequest>,
) -> Result<Json<UserInfo>, HttpError> {
    info!(email = %req.email, role = %req.role, "Handling create_user request");

    let request: CreateUserRequest = CreateUserRequest {
        email: req.email,
        first_name: req.first_name,
        middle_name: req.middle_name,
        last_name: req.last_name,
        role: req.role,
        password: req.password,
    };

    let mut persistence = app_state.persistence.lock().await;
    let response: UserInfo =
        vex_api::create_user(&mut persistence, &request, OffsetDateTime::now_utc())?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for PATCH `/users/{user_id}`.
async fn handle_update_user(
    AxumState(app_state): AxumState<AppState>,
    Path(user_id): Path<i64>,
    Json(req): Json<UpdateUserApiRequest>,
) -> Result<Json<UserInfo>, HttpError> {
    info!(user_id, email = %req.email, role = %req.role, "Handling update_user request");

    let request: UpdateUserRequest = UpdateUserRequest {
        email: req.email,
        first_name: req.first_name,
        middle_name: req.middle_name,
        last_name: req.last_name,
        role: req.role,
        password: req.password,
    };

    let mut persistence = app_state.persistence.lock().await;
    let response: UserInfo = vex_api::update_user(&mut persistence, user_id, &request)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for DELETE `/users/{user_id}`.
async fn handle_delete_user(
    AxumState(app_state): AxumState<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<DeleteResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: DeleteResponse = vex_api::delete_user(&mut persistence, user_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/users`.
async fn handle_list_users(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<ListUsersResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListUsersResponse = vex_api::list_users(&mut persistence)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/documents`.
async fn handle_list_documents(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<DocumentListQuery>,
) -> Result<Json<ListDocumentsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListDocumentsResponse =
        vex_api::list_documents(&mut persistence, query.application_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for PATCH `/documents/{document_id}`.
async fn handle_update_document(
    AxumState(app_state): AxumState<AppState>,
    Path(document_id): Path<i64>,
    Json(req): Json<UpdateDocumentApiRequest>,
) -> Result<Json<DocumentInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: DocumentInfo = vex_api::update_document_type(
        &mut persistence,
        document_id,
        &req.doc_type,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for DELETE `/documents/{document_id}`.
async fn handle_delete_document(
    AxumState(app_state): AxumState<AppState>,
    Path(document_id): Path<i64>,
) -> Result<Json<DeleteResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: DeleteResponse = vex_api::delete_document(&mut persistence, document_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/vehicles`.
async fn handle_list_vehicles(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<ListVehiclesResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListVehiclesResponse = vex_api::list_vehicles(&mut persistence)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/vehicles`.
async fn handle_create_vehicle(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateVehicleApiRequest>,
) -> Result<Json<VehicleInfo>, HttpError> {
    let request: CreateVehicleRequest = CreateVehicleRequest {
        vehicle_reg_no: req.vehicle_reg_no,
        user_id: req.user_id,
    };

    let mut persistence = app_state.persistence.lock().await;
    let response: VehicleInfo =
        vex_api::create_vehicle(&mut persistence, &request, OffsetDateTime::now_utc())?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for PATCH `/vehicles/{vehicle_id}`.
async fn handle_update_vehicle(
    AxumState(app_state): AxumState<AppState>,
    Path(vehicle_id): Path<i64>,
    Json(req): Json<UpdateVehicleApiRequest>,
) -> Result<Json<VehicleInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: VehicleInfo =
        vex_api::update_vehicle(&mut persistence, vehicle_id, &req.vehicle_reg_no)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for DELETE `/vehicles/{vehicle_id}`.
async fn handle_delete_vehicle(
    AxumState(app_state): AxumState<AppState>,
    Path(vehicle_id): Path<i64>,
) -> Result<Json<DeleteResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: DeleteResponse = vex_api::delete_vehicle(&mut persistence, vehicle_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/applications",
            post(handle_submit_application).get(handle_list_applications),
        )
        .route("/applications/expired", get(handle_list_expired))
        .route(
            "/applications/{application_id}",
            get(handle_get_application).delete(handle_delete_application),
        )
        .route(
            "/applications/{application_id}/audit",
            get(handle_get_audit_timeline),
        )
        .route(
            "/applications/{application_id}/{action}",
            post(handle_lifecycle_action),
        )
        .route("/bulk/final_approve", post(handle_final_approve_all))
        .route("/bulk/reject", post(handle_reject_all))
        .route("/summary", get(handle_get_summary))
        .route("/users", post(handle_create_user).get(handle_list_users))
        .route(
            "/users/{user_id}",
            patch(handle_update_user).delete(handle_delete_user),
        )
        .route("/documents", get(handle_list_documents))
        .route(
            "/documents/{document_id}",
            patch(handle_update_document).delete(handle_delete_document),
        )
        .route(
            "/vehicles",
            post(handle_create_vehicle).get(handle_list_vehicles),
        )
        .route(
            "/vehicles/{vehicle_id}",
            patch(handle_update_vehicle).delete(handle_delete_vehicle),
        )
        .route("/live", get(live_events_handler))
        .with_state(app_state)
}

/// Creates the seed Clerk account unless the email is already registered.
fn seed_admin(
    persistence: &mut SqlitePersistence,
    email: &str,
    password: &str,
) -> Result<(), StartupError> {
    let request: CreateUserRequest = CreateUserRequest {
        email: email.to_string(),
        first_name: String::from("System"),
        middle_name: None,
        last_name: String::from("Administrator"),
        role: String::from("Clerk"),
        password: password.to_string(),
    };

    match vex_api::create_user(persistence, &request, OffsetDateTime::now_utc()) {
        Ok(user) => {
            info!(user_id = user.user_id, email = %user.email, "Seeded Clerk account");
            Ok(())
        }
        Err(ApiError::Conflict { .. }) => {
            warn!(email, "Seed account already exists, skipping");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing VEX Server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let mut persistence: SqlitePersistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        SqlitePersistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        SqlitePersistence::new_in_memory()?
    };

    if let (Some(email), Some(password)) = (&args.seed_admin, &args.seed_password) {
        seed_admin(&mut persistence, email, password).inspect_err(|e| {
            error!(error = %e, "Failed to seed Clerk account");
        })?;
    }

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        live_events: Arc::new(LiveEventBroadcaster::new()),
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
