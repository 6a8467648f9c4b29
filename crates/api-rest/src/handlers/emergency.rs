//! Break-glass emergency access and the audit log.

use axum::extract::{Path as AxumPath, Query, State};
use axum::http::HeaderMap;
use axum::response::Json;
use serde::Deserialize;
use uuid::Uuid;

use api_shared::{
    ActiveEmergencyCountRes, AuditLogEntry, EmergencyAccessLog, OpenEmergencyAccessReq,
};
use carelink_core::{AuditService, EmergencyService};

use crate::{authorize, ApiError, AppState, Authed};

#[derive(Debug, Deserialize)]
pub struct AuditLogParams {
    /// Optional exact-match action filter, e.g. `OPEN_EMERGENCY_ACCESS`.
    pub action: Option<String>,
}

#[utoipa::path(
    post,
    path = "/emergency-access",
    request_body = OpenEmergencyAccessReq,
    responses(
        (status = 200, description = "Break-glass session opened", body = EmergencyAccessLog),
        (status = 400, description = "No reason given"),
        (status = 403, description = "Clinical staff only")
    )
)]
/// Open a break-glass session against any patient on the network. The
/// session is audited for after-the-fact review.
#[axum::debug_handler]
pub async fn open_emergency_access(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<OpenEmergencyAccessReq>,
) -> Result<Authed<EmergencyAccessLog>, ApiError> {
    let (ctx, token) = authorize(&state, &headers).await?;
    let db = state.db.lock().await;
    let log = EmergencyService::new(&db).open(&ctx, req.patient_id, &req.reason)?;
    Ok(Authed::new(token, log))
}

#[utoipa::path(
    post,
    path = "/emergency-access/{id}/close",
    responses(
        (status = 200, description = "Session closed", body = EmergencyAccessLog),
        (status = 403, description = "Only the opener may close a session"),
        (status = 409, description = "Session already closed")
    )
)]
#[axum::debug_handler]
pub async fn close_emergency_access(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath(id): AxumPath<Uuid>,
) -> Result<Authed<EmergencyAccessLog>, ApiError> {
    let (ctx, token) = authorize(&state, &headers).await?;
    let db = state.db.lock().await;
    let log = EmergencyService::new(&db).close(&ctx, id)?;
    Ok(Authed::new(token, log))
}

#[utoipa::path(
    get,
    path = "/emergency-access",
    responses(
        (status = 200, description = "Sessions for review, newest first", body = [EmergencyAccessLog]),
        (status = 403, description = "Administrators only")
    )
)]
/// Review break-glass sessions: hospital admins see sessions touching their
/// own patients, system admins see the whole network.
#[axum::debug_handler]
pub async fn list_emergency_access(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Authed<Vec<EmergencyAccessLog>>, ApiError> {
    let (ctx, token) = authorize(&state, &headers).await?;
    let db = state.db.lock().await;
    let logs = EmergencyService::new(&db).list(&ctx)?;
    Ok(Authed::new(token, logs))
}

#[utoipa::path(
    get,
    path = "/emergency-access/active-count",
    responses(
        (status = 200, description = "Open sessions touching the caller's hospital's patients", body = ActiveEmergencyCountRes),
        (status = 401, description = "Unauthorized")
    )
)]
#[axum::debug_handler]
pub async fn active_emergency_count(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Authed<ActiveEmergencyCountRes>, ApiError> {
    let (ctx, token) = authorize(&state, &headers).await?;
    let db = state.db.lock().await;
    let active = EmergencyService::new(&db).active_count(&ctx)?;
    Ok(Authed::new(token, ActiveEmergencyCountRes { active }))
}

#[utoipa::path(
    get,
    path = "/audit-logs",
    responses(
        (status = 200, description = "Audit entries, newest first", body = [AuditLogEntry]),
        (status = 403, description = "Administrators only")
    )
)]
/// The append-only audit log: hospital admins see their own staff's
/// entries, system admins see everything.
#[axum::debug_handler]
pub async fn list_audit_logs(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<AuditLogParams>,
) -> Result<Authed<Vec<AuditLogEntry>>, ApiError> {
    let (ctx, token) = authorize(&state, &headers).await?;
    let db = state.db.lock().await;
    let entries = AuditService::new(&db).list(&ctx, params.action.as_deref())?;
    Ok(Authed::new(token, entries))
}
