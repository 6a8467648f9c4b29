//! Staff listing, invitations and removal.

use axum::extract::{Path as AxumPath, Query, State};
use axum::http::HeaderMap;
use axum::response::Json;
use serde::Deserialize;
use uuid::Uuid;

use api_shared::{InviteStaffReq, InviteStaffRes, UserProfile};
use carelink_core::StaffService;

use crate::{authorize, ApiError, AppState, Authed};

#[derive(Debug, Deserialize)]
pub struct ListStaffParams {
    /// Defaults to the caller's own hospital.
    pub hospital_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct InviteStaffParams {
    /// System admins may invite into any hospital; defaults to the caller's.
    pub hospital_id: Option<Uuid>,
}

#[utoipa::path(
    get,
    path = "/staff",
    responses(
        (status = 200, description = "Staff of the hospital", body = [UserProfile]),
        (status = 403, description = "Another hospital's staff list")
    )
)]
/// Staff of a hospital: the caller's own, unless a system administrator
/// names another via `?hospital_id=`.
#[axum::debug_handler]
pub async fn list_staff(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ListStaffParams>,
) -> Result<Authed<Vec<UserProfile>>, ApiError> {
    let (ctx, token) = authorize(&state, &headers).await?;
    let hospital_id = params.hospital_id.unwrap_or(ctx.hospital_id);
    let db = state.db.lock().await;
    let staff = StaffService::new(&db).list(&ctx, hospital_id)?;
    Ok(Authed::new(token, staff))
}

#[utoipa::path(
    post,
    path = "/staff/invite",
    request_body = InviteStaffReq,
    responses(
        (status = 200, description = "Invitation created; the token is shown once", body = InviteStaffRes),
        (status = 403, description = "Caller may not invite into this hospital"),
        (status = 409, description = "Email already in use")
    )
)]
/// Invite a staff member. The account starts without a password; the
/// returned one-time token is redeemed via `POST /api/auth/activate`.
#[axum::debug_handler]
pub async fn invite_staff(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<InviteStaffParams>,
    Json(req): Json<InviteStaffReq>,
) -> Result<Authed<InviteStaffRes>, ApiError> {
    let (ctx, token) = authorize(&state, &headers).await?;
    let hospital_id = params.hospital_id.unwrap_or(ctx.hospital_id);
    let db = state.db.lock().await;
    let invitation = StaffService::new(&db).invite(
        &ctx,
        hospital_id,
        &req.name,
        &req.email,
        req.role,
        &req.department,
    )?;
    Ok(Authed::new(
        token,
        InviteStaffRes {
            user_id: invitation.profile.id,
            invite_token: invitation.invite_token,
        },
    ))
}

#[utoipa::path(
    delete,
    path = "/staff/{id}",
    responses(
        (status = 200, description = "Account removed"),
        (status = 400, description = "Cannot remove your own account"),
        (status = 404, description = "No such user")
    )
)]
/// Remove a staff account.
#[axum::debug_handler]
pub async fn remove_staff(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath(id): AxumPath<Uuid>,
) -> Result<Authed<serde_json::Value>, ApiError> {
    let (ctx, token) = authorize(&state, &headers).await?;
    let db = state.db.lock().await;
    StaffService::new(&db).remove(&ctx, id)?;
    Ok(Authed::new(token, serde_json::json!({ "success": true })))
}
