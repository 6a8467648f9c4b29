//! Patient records, clinical notes and document uploads.

use axum::extract::{Multipart, Path as AxumPath, State};
use axum::http::HeaderMap;
use axum::response::Json;
use uuid::Uuid;

use api_shared::{
    AddMedicalRecordReq, CreatePatientReq, MedicalDocument, MedicalRecord, Patient,
    UpdatePatientReq,
};
use carelink_core::{DocumentService, PatientService};

use crate::{authorize, ApiError, AppState, Authed};

#[utoipa::path(
    get,
    path = "/patients",
    responses(
        (status = 200, description = "Patients of the caller's hospital", body = [Patient]),
        (status = 403, description = "Role may not read patients")
    )
)]
#[axum::debug_handler]
pub async fn list_patients(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Authed<Vec<Patient>>, ApiError> {
    let (ctx, token) = authorize(&state, &headers).await?;
    let db = state.db.lock().await;
    let patients = PatientService::new(&db).list(&ctx)?;
    Ok(Authed::new(token, patients))
}

#[utoipa::path(
    post,
    path = "/patients",
    request_body = CreatePatientReq,
    responses(
        (status = 200, description = "Patient registered", body = Patient),
        (status = 403, description = "Clinical staff only")
    )
)]
/// Register a patient at the caller's hospital.
#[axum::debug_handler]
pub async fn create_patient(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreatePatientReq>,
) -> Result<Authed<Patient>, ApiError> {
    let (ctx, token) = authorize(&state, &headers).await?;
    let db = state.db.lock().await;
    let patient = PatientService::new(&db).create(
        &ctx,
        &req.first_name,
        &req.last_name,
        &req.birth_date,
        &req.gender,
        req.blood_type,
        req.allergies,
        req.diagnosis,
    )?;
    Ok(Authed::new(token, patient))
}

#[utoipa::path(
    get,
    path = "/patients/{id}",
    responses(
        (status = 200, description = "The patient", body = Patient),
        (status = 404, description = "No such patient at the caller's hospital")
    )
)]
#[axum::debug_handler]
pub async fn get_patient(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath(id): AxumPath<Uuid>,
) -> Result<Authed<Patient>, ApiError> {
    let (ctx, token) = authorize(&state, &headers).await?;
    let db = state.db.lock().await;
    let patient = PatientService::new(&db).get(&ctx, id)?;
    Ok(Authed::new(token, patient))
}

#[utoipa::path(
    put,
    path = "/patients/{id}",
    request_body = UpdatePatientReq,
    responses(
        (status = 200, description = "Updated patient", body = Patient),
        (status = 403, description = "Clinical staff only"),
        (status = 404, description = "No such patient at the caller's hospital")
    )
)]
/// Update a patient's clinical summary fields.
#[axum::debug_handler]
pub async fn update_patient(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath(id): AxumPath<Uuid>,
    Json(req): Json<UpdatePatientReq>,
) -> Result<Authed<Patient>, ApiError> {
    let (ctx, token) = authorize(&state, &headers).await?;
    let db = state.db.lock().await;
    let patient =
        PatientService::new(&db).update(&ctx, id, req.blood_type, req.allergies, req.diagnosis)?;
    Ok(Authed::new(token, patient))
}

#[utoipa::path(
    get,
    path = "/patients/{id}/records",
    responses(
        (status = 200, description = "Clinical notes, newest first", body = [MedicalRecord]),
        (status = 404, description = "No such patient at the caller's hospital")
    )
)]
#[axum::debug_handler]
pub async fn list_records(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath(id): AxumPath<Uuid>,
) -> Result<Authed<Vec<MedicalRecord>>, ApiError> {
    let (ctx, token) = authorize(&state, &headers).await?;
    let db = state.db.lock().await;
    let records = PatientService::new(&db).list_records(&ctx, id)?;
    Ok(Authed::new(token, records))
}

#[utoipa::path(
    post,
    path = "/patients/{id}/records",
    request_body = AddMedicalRecordReq,
    responses(
        (status = 200, description = "Note added", body = MedicalRecord),
        (status = 403, description = "Clinical staff only")
    )
)]
/// Attach a clinical note to a patient.
#[axum::debug_handler]
pub async fn add_record(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath(id): AxumPath<Uuid>,
    Json(req): Json<AddMedicalRecordReq>,
) -> Result<Authed<MedicalRecord>, ApiError> {
    let (ctx, token) = authorize(&state, &headers).await?;
    let db = state.db.lock().await;
    let record = PatientService::new(&db).add_record(&ctx, id, &req.title, &req.body)?;
    Ok(Authed::new(token, record))
}

#[utoipa::path(
    post,
    path = "/api/documents/upload",
    responses(
        (status = 200, description = "Stored document metadata", body = MedicalDocument),
        (status = 400, description = "Missing patient_id or file field"),
        (status = 403, description = "Clinical staff only")
    )
)]
/// Upload a document for a patient.
///
/// Multipart form with a `patient_id` text field and a `file` part. The
/// bytes go to the configured document directory under the document's own
/// UUID; the client-supplied filename is stored as metadata only.
#[axum::debug_handler]
pub async fn upload_document(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Authed<MedicalDocument>, ApiError> {
    let (ctx, token) = authorize(&state, &headers).await?;

    let mut patient_id: Option<Uuid> = None;
    let mut file: Option<(String, String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("malformed multipart body: {e}")))?
    {
        match field.name() {
            Some("patient_id") => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("unreadable patient_id: {e}")))?;
                patient_id = Some(
                    Uuid::parse_str(raw.trim())
                        .map_err(|_| ApiError::bad_request("patient_id is not a UUID"))?,
                );
            }
            Some("file") => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("unreadable file part: {e}")))?;
                file = Some((file_name, content_type, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let patient_id = patient_id.ok_or_else(|| ApiError::bad_request("patient_id is required"))?;
    let (file_name, content_type, bytes) =
        file.ok_or_else(|| ApiError::bad_request("file part is required"))?;

    let db = state.db.lock().await;
    let document = DocumentService::new(&db, &state.cfg).store(
        &ctx,
        patient_id,
        &file_name,
        &content_type,
        &bytes,
    )?;
    Ok(Authed::new(token, document))
}

#[utoipa::path(
    get,
    path = "/patients/{id}/documents",
    responses(
        (status = 200, description = "Document metadata, newest first", body = [MedicalDocument]),
        (status = 404, description = "No such patient at the caller's hospital")
    )
)]
#[axum::debug_handler]
pub async fn list_documents(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath(id): AxumPath<Uuid>,
) -> Result<Authed<Vec<MedicalDocument>>, ApiError> {
    let (ctx, token) = authorize(&state, &headers).await?;
    let db = state.db.lock().await;
    let documents = DocumentService::new(&db, &state.cfg).list(&ctx, id)?;
    Ok(Authed::new(token, documents))
}
