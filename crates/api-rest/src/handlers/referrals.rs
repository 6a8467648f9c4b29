//! The referral lifecycle over HTTP.

use axum::extract::{Path as AxumPath, State};
use axum::http::HeaderMap;
use axum::response::Json;
use uuid::Uuid;

use api_shared::{CreateReferralReq, Referral, ReferralEvent, RejectReferralReq};
use carelink_core::ReferralService;

use crate::{authorize, ApiError, AppState, Authed};

#[utoipa::path(
    post,
    path = "/referrals",
    request_body = CreateReferralReq,
    responses(
        (status = 200, description = "Referral created in SENT", body = Referral),
        (status = 400, description = "Destination is the patient's own hospital, or no reason given"),
        (status = 403, description = "Doctors only")
    )
)]
/// Refer a patient of the caller's hospital to another hospital.
#[axum::debug_handler]
pub async fn create_referral(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateReferralReq>,
) -> Result<Authed<Referral>, ApiError> {
    let (ctx, token) = authorize(&state, &headers).await?;
    let db = state.db.lock().await;
    let referral = ReferralService::new(&db).create(
        &ctx,
        req.patient_id,
        req.to_hospital_id,
        req.priority,
        &req.reason,
        req.notes,
        req.share_documents,
    )?;
    Ok(Authed::new(token, referral))
}

#[utoipa::path(
    get,
    path = "/referrals/incoming",
    responses(
        (status = 200, description = "Referrals into the caller's hospital, most urgent first", body = [Referral]),
        (status = 401, description = "Unauthorized")
    )
)]
/// The incoming worklist: EMERGENCY before URGENT before NORMAL, newest
/// first within each band.
#[axum::debug_handler]
pub async fn incoming_referrals(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Authed<Vec<Referral>>, ApiError> {
    let (ctx, token) = authorize(&state, &headers).await?;
    let db = state.db.lock().await;
    let referrals = ReferralService::new(&db).incoming(&ctx)?;
    Ok(Authed::new(token, referrals))
}

#[utoipa::path(
    get,
    path = "/referrals/outgoing",
    responses(
        (status = 200, description = "Referrals out of the caller's hospital, newest first", body = [Referral]),
        (status = 401, description = "Unauthorized")
    )
)]
#[axum::debug_handler]
pub async fn outgoing_referrals(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Authed<Vec<Referral>>, ApiError> {
    let (ctx, token) = authorize(&state, &headers).await?;
    let db = state.db.lock().await;
    let referrals = ReferralService::new(&db).outgoing(&ctx)?;
    Ok(Authed::new(token, referrals))
}

#[utoipa::path(
    get,
    path = "/referrals/{id}",
    responses(
        (status = 200, description = "The referral", body = Referral),
        (status = 404, description = "Unknown, or the caller's hospital is not an endpoint")
    )
)]
#[axum::debug_handler]
pub async fn get_referral(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath(id): AxumPath<Uuid>,
) -> Result<Authed<Referral>, ApiError> {
    let (ctx, token) = authorize(&state, &headers).await?;
    let db = state.db.lock().await;
    let referral = ReferralService::new(&db).get(&ctx, id)?;
    Ok(Authed::new(token, referral))
}

#[utoipa::path(
    get,
    path = "/referrals/{id}/events",
    responses(
        (status = 200, description = "The referral's timeline, oldest first", body = [ReferralEvent]),
        (status = 404, description = "Unknown, or the caller's hospital is not an endpoint")
    )
)]
#[axum::debug_handler]
pub async fn referral_events(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath(id): AxumPath<Uuid>,
) -> Result<Authed<Vec<ReferralEvent>>, ApiError> {
    let (ctx, token) = authorize(&state, &headers).await?;
    let db = state.db.lock().await;
    let events = ReferralService::new(&db).timeline(&ctx, id)?;
    Ok(Authed::new(token, events))
}

#[utoipa::path(
    post,
    path = "/referrals/{id}/accept",
    responses(
        (status = 200, description = "Referral accepted", body = Referral),
        (status = 403, description = "Not a doctor at the destination hospital"),
        (status = 409, description = "Referral already resolved")
    )
)]
/// Accept a referral. Doctors at the destination hospital only; the caller
/// becomes the receiving doctor.
#[axum::debug_handler]
pub async fn accept_referral(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath(id): AxumPath<Uuid>,
) -> Result<Authed<Referral>, ApiError> {
    let (ctx, token) = authorize(&state, &headers).await?;
    let db = state.db.lock().await;
    let referral = ReferralService::new(&db).accept(&ctx, id)?;
    Ok(Authed::new(token, referral))
}

#[utoipa::path(
    post,
    path = "/referrals/{id}/reject",
    request_body = RejectReferralReq,
    responses(
        (status = 200, description = "Referral rejected", body = Referral),
        (status = 400, description = "No rejection reason given"),
        (status = 403, description = "Not a doctor at the destination hospital"),
        (status = 409, description = "Referral already resolved")
    )
)]
/// Reject a referral with a reason.
#[axum::debug_handler]
pub async fn reject_referral(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath(id): AxumPath<Uuid>,
    Json(req): Json<RejectReferralReq>,
) -> Result<Authed<Referral>, ApiError> {
    let (ctx, token) = authorize(&state, &headers).await?;
    let db = state.db.lock().await;
    let referral = ReferralService::new(&db).reject(&ctx, id, &req.reason)?;
    Ok(Authed::new(token, referral))
}
