//! Login, invitation activation and the caller's own profile.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Json;

use api_shared::{ActivateReq, LoginReq, LoginRes, UserProfile};
use carelink_core::AuthService;

use crate::{authorize, ApiError, AppState, Authed};

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginReq,
    responses(
        (status = 200, description = "Session token and profile", body = LoginRes),
        (status = 401, description = "Bad credentials or un-activated account")
    )
)]
/// Exchange credentials for a session token.
///
/// Unknown emails, wrong passwords and accounts still awaiting activation
/// all report the same 401.
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginReq>,
) -> Result<Json<LoginRes>, ApiError> {
    let db = state.db.lock().await;
    let (token, profile) = AuthService::new(&db, &state.cfg).login(&req.email, &req.password)?;
    Ok(Json(LoginRes { token, profile }))
}

#[utoipa::path(
    post,
    path = "/api/auth/activate",
    request_body = ActivateReq,
    responses(
        (status = 200, description = "Account activated", body = UserProfile),
        (status = 400, description = "Password too short"),
        (status = 401, description = "Unknown or already-used invitation token")
    )
)]
/// Redeem a one-time invitation token, setting the account's first password.
#[axum::debug_handler]
pub async fn activate(
    State(state): State<AppState>,
    Json(req): Json<ActivateReq>,
) -> Result<Json<UserProfile>, ApiError> {
    let db = state.db.lock().await;
    let profile = AuthService::new(&db, &state.cfg).activate(&req.invite_token, &req.password)?;
    Ok(Json(profile))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "The caller's profile", body = UserProfile),
        (status = 401, description = "Unauthorized")
    )
)]
/// Profile of the authenticated caller.
#[axum::debug_handler]
pub async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Authed<UserProfile>, ApiError> {
    let (ctx, token) = authorize(&state, &headers).await?;
    let db = state.db.lock().await;
    let profile = AuthService::new(&db, &state.cfg).profile(&ctx)?;
    Ok(Authed::new(token, profile))
}
