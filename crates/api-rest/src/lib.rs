//! # API REST
//!
//! REST API implementation for CareLink.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, bearer tokens)
//!
//! Uses `api-shared` for the wire types and `carelink-core` for all business
//! logic; no authorization decisions are made here.

#![warn(rust_2018_idioms)]

pub mod handlers;

use std::sync::Arc;

use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{delete, get, post, put};
use axum::Router;
use serde::Serialize;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use carelink_core::{AuthContext, AuthService, CareLinkError, CoreConfig, Database};

/// Response header carrying the re-issued session token. Every authenticated
/// response returns one; clients replace their stored token with it, which is
/// what makes the session expiry slide.
pub const TOKEN_HEADER: &str = "x-carelink-token";

/// Application state shared by all request handlers.
///
/// The SQLite connection is not `Sync`, so the database sits behind an async
/// mutex; handlers hold the lock only for the duration of a core service
/// call.
#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<CoreConfig>,
    pub db: Arc<Mutex<Database>>,
}

/// Maps core errors onto HTTP statuses.
///
/// Internal errors are logged and reported with a generic body; everything
/// the caller can act on keeps its message.
pub struct ApiError(CareLinkError);

impl From<CareLinkError> for ApiError {
    fn from(e: CareLinkError) -> Self {
        Self(e)
    }
}

impl ApiError {
    pub(crate) fn bad_request(message: impl Into<String>) -> Self {
        Self(CareLinkError::Validation(message.into()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            CareLinkError::Unauthorized => (StatusCode::UNAUTHORIZED, self.0.to_string()),
            CareLinkError::Forbidden => (StatusCode::FORBIDDEN, self.0.to_string()),
            CareLinkError::NotFound(_) => (StatusCode::NOT_FOUND, self.0.to_string()),
            CareLinkError::Validation(_) => (StatusCode::BAD_REQUEST, self.0.to_string()),
            CareLinkError::InvalidTransition(_) | CareLinkError::Conflict(_) => {
                (StatusCode::CONFLICT, self.0.to_string())
            }
            other => {
                tracing::error!("Internal error: {other:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal error".to_string(),
                )
            }
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// A JSON response body plus the refreshed session token header.
pub struct Authed<T> {
    token: String,
    body: T,
}

impl<T> Authed<T> {
    pub fn new(token: String, body: T) -> Self {
        Self { token, body }
    }
}

impl<T: Serialize> IntoResponse for Authed<T> {
    fn into_response(self) -> Response {
        let mut res = Json(self.body).into_response();
        if let Ok(value) = HeaderValue::from_str(&self.token) {
            res.headers_mut().insert(TOKEN_HEADER, value);
        }
        res
    }
}

/// Resolve the request's bearer token into an [`AuthContext`] and a
/// refreshed token. Missing or malformed headers report exactly like bad
/// tokens.
pub(crate) async fn authorize(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<(AuthContext, String), ApiError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(ApiError(CareLinkError::Unauthorized))?;

    let db = state.db.lock().await;
    let (ctx, refreshed) = AuthService::new(&db, &state.cfg).authenticate(token)?;
    Ok((ctx, refreshed))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::auth::login,
        handlers::auth::activate,
        handlers::auth::me,
        handlers::hospitals::list_hospitals,
        handlers::hospitals::create_hospital,
        handlers::hospitals::set_hospital_status,
        handlers::hospitals::list_departments,
        handlers::hospitals::create_department,
        handlers::staff::list_staff,
        handlers::staff::invite_staff,
        handlers::staff::remove_staff,
        handlers::patients::list_patients,
        handlers::patients::create_patient,
        handlers::patients::get_patient,
        handlers::patients::update_patient,
        handlers::patients::list_records,
        handlers::patients::add_record,
        handlers::patients::upload_document,
        handlers::patients::list_documents,
        handlers::referrals::create_referral,
        handlers::referrals::incoming_referrals,
        handlers::referrals::outgoing_referrals,
        handlers::referrals::get_referral,
        handlers::referrals::referral_events,
        handlers::referrals::accept_referral,
        handlers::referrals::reject_referral,
        handlers::emergency::open_emergency_access,
        handlers::emergency::close_emergency_access,
        handlers::emergency::list_emergency_access,
        handlers::emergency::active_emergency_count,
        handlers::emergency::list_audit_logs,
        handlers::messaging::send_message,
        handlers::messaging::list_messages,
        handlers::messaging::mark_message_read,
        handlers::messaging::create_task,
        handlers::messaging::list_tasks,
        handlers::messaging::complete_task,
    ),
    components(schemas(
        api_shared::HealthRes,
        api_shared::LoginReq,
        api_shared::LoginRes,
        api_shared::ActivateReq,
        api_shared::CreateHospitalReq,
        api_shared::SetHospitalStatusReq,
        api_shared::InviteStaffReq,
        api_shared::InviteStaffRes,
        api_shared::CreateDepartmentReq,
        api_shared::CreatePatientReq,
        api_shared::UpdatePatientReq,
        api_shared::AddMedicalRecordReq,
        api_shared::CreateReferralReq,
        api_shared::RejectReferralReq,
        api_shared::OpenEmergencyAccessReq,
        api_shared::ActiveEmergencyCountRes,
        api_shared::SendMessageReq,
        api_shared::CreateTaskReq,
        api_shared::Role,
        api_shared::HospitalStatus,
        api_shared::ReferralStatus,
        api_shared::ReferralPriority,
        api_shared::ReferralEventType,
        api_shared::EmergencyStatus,
        api_shared::TaskStatus,
        api_shared::Hospital,
        api_shared::UserProfile,
        api_shared::Department,
        api_shared::Patient,
        api_shared::MedicalRecord,
        api_shared::MedicalDocument,
        api_shared::Referral,
        api_shared::ReferralEvent,
        api_shared::EmergencyAccessLog,
        api_shared::AuditLogEntry,
        api_shared::Message,
        api_shared::Task,
    ))
)]
pub struct ApiDoc;

/// Build the full CareLink router over the given state.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/activate", post(handlers::auth::activate))
        .route("/api/auth/me", get(handlers::auth::me))
        .route(
            "/hospitals",
            get(handlers::hospitals::list_hospitals).post(handlers::hospitals::create_hospital),
        )
        .route(
            "/hospitals/:id/status",
            put(handlers::hospitals::set_hospital_status),
        )
        .route(
            "/departments",
            get(handlers::hospitals::list_departments)
                .post(handlers::hospitals::create_department),
        )
        .route("/staff", get(handlers::staff::list_staff))
        .route("/staff/invite", post(handlers::staff::invite_staff))
        .route("/staff/:id", delete(handlers::staff::remove_staff))
        .route(
            "/patients",
            get(handlers::patients::list_patients).post(handlers::patients::create_patient),
        )
        .route(
            "/patients/:id",
            get(handlers::patients::get_patient).put(handlers::patients::update_patient),
        )
        .route(
            "/patients/:id/records",
            get(handlers::patients::list_records).post(handlers::patients::add_record),
        )
        .route(
            "/patients/:id/documents",
            get(handlers::patients::list_documents),
        )
        .route(
            "/api/documents/upload",
            post(handlers::patients::upload_document),
        )
        .route("/referrals", post(handlers::referrals::create_referral))
        .route(
            "/referrals/incoming",
            get(handlers::referrals::incoming_referrals),
        )
        .route(
            "/referrals/outgoing",
            get(handlers::referrals::outgoing_referrals),
        )
        .route("/referrals/:id", get(handlers::referrals::get_referral))
        .route(
            "/referrals/:id/events",
            get(handlers::referrals::referral_events),
        )
        .route(
            "/referrals/:id/accept",
            post(handlers::referrals::accept_referral),
        )
        .route(
            "/referrals/:id/reject",
            post(handlers::referrals::reject_referral),
        )
        .route(
            "/emergency-access",
            get(handlers::emergency::list_emergency_access)
                .post(handlers::emergency::open_emergency_access),
        )
        .route(
            "/emergency-access/active-count",
            get(handlers::emergency::active_emergency_count),
        )
        .route(
            "/emergency-access/:id/close",
            post(handlers::emergency::close_emergency_access),
        )
        .route(
            "/messages",
            get(handlers::messaging::list_messages).post(handlers::messaging::send_message),
        )
        .route(
            "/messages/:id/read",
            post(handlers::messaging::mark_message_read),
        )
        .route(
            "/tasks",
            get(handlers::messaging::list_tasks).post(handlers::messaging::create_task),
        )
        .route("/tasks/:id/complete", post(handlers::messaging::complete_task))
        .route("/audit-logs", get(handlers::emergency::list_audit_logs))
        .merge(
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
