//! Hospital directory and departments.

use axum::extract::{Path as AxumPath, State};
use axum::http::HeaderMap;
use axum::response::Json;
use uuid::Uuid;

use api_shared::{
    CreateDepartmentReq, CreateHospitalReq, Department, Hospital, SetHospitalStatusReq,
};
use carelink_core::{DepartmentService, HospitalService};

use crate::{authorize, ApiError, AppState, Authed};

#[utoipa::path(
    get,
    path = "/hospitals",
    responses(
        (status = 200, description = "All hospitals on the network", body = [Hospital]),
        (status = 401, description = "Unauthorized")
    )
)]
/// The hospital directory, visible to any authenticated staff member.
#[axum::debug_handler]
pub async fn list_hospitals(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Authed<Vec<Hospital>>, ApiError> {
    let (ctx, token) = authorize(&state, &headers).await?;
    let db = state.db.lock().await;
    let hospitals = HospitalService::new(&db).list(&ctx)?;
    Ok(Authed::new(token, hospitals))
}

#[utoipa::path(
    post,
    path = "/hospitals",
    request_body = CreateHospitalReq,
    responses(
        (status = 200, description = "Hospital registered, initially PENDING", body = Hospital),
        (status = 403, description = "Not a system administrator")
    )
)]
/// Register a hospital on the network. System administrators only.
#[axum::debug_handler]
pub async fn create_hospital(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateHospitalReq>,
) -> Result<Authed<Hospital>, ApiError> {
    let (ctx, token) = authorize(&state, &headers).await?;
    let db = state.db.lock().await;
    let hospital =
        HospitalService::new(&db).create(&ctx, &req.name, &req.kind, &req.location, req.specialties)?;
    Ok(Authed::new(token, hospital))
}

#[utoipa::path(
    put,
    path = "/hospitals/{id}/status",
    request_body = SetHospitalStatusReq,
    responses(
        (status = 200, description = "Status updated"),
        (status = 403, description = "Not a system administrator"),
        (status = 404, description = "No such hospital")
    )
)]
/// Change a hospital's connection status. System administrators only.
#[axum::debug_handler]
pub async fn set_hospital_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath(id): AxumPath<Uuid>,
    Json(req): Json<SetHospitalStatusReq>,
) -> Result<Authed<serde_json::Value>, ApiError> {
    let (ctx, token) = authorize(&state, &headers).await?;
    let db = state.db.lock().await;
    HospitalService::new(&db).set_status(&ctx, id, req.status)?;
    Ok(Authed::new(token, serde_json::json!({ "success": true })))
}

#[utoipa::path(
    get,
    path = "/departments",
    responses(
        (status = 200, description = "Departments of the caller's hospital", body = [Department]),
        (status = 401, description = "Unauthorized")
    )
)]
#[axum::debug_handler]
pub async fn list_departments(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Authed<Vec<Department>>, ApiError> {
    let (ctx, token) = authorize(&state, &headers).await?;
    let db = state.db.lock().await;
    let departments = DepartmentService::new(&db).list(&ctx)?;
    Ok(Authed::new(token, departments))
}

#[utoipa::path(
    post,
    path = "/departments",
    request_body = CreateDepartmentReq,
    responses(
        (status = 200, description = "Department created", body = Department),
        (status = 403, description = "Not a hospital administrator")
    )
)]
/// Create a department at the caller's hospital. Hospital administrators
/// only.
#[axum::debug_handler]
pub async fn create_department(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateDepartmentReq>,
) -> Result<Authed<Department>, ApiError> {
    let (ctx, token) = authorize(&state, &headers).await?;
    let db = state.db.lock().await;
    let department = DepartmentService::new(&db).create(&ctx, &req.name, req.head_user_id)?;
    Ok(Authed::new(token, department))
}
