//! Patient records, clinical notes and uploaded documents.
//!
//! Every read and write is scoped to the caller's hospital. A patient
//! belonging to another hospital reports as not found rather than forbidden,
//! so cross-hospital probing cannot confirm a record exists.

use std::fs;
use uuid::Uuid;

use api_shared::{MedicalDocument, MedicalRecord, Patient, Role};

use crate::auth::AuthContext;
use crate::config::CoreConfig;
use crate::db::{now_rfc3339, Database};
use crate::error::{CareLinkError, CareLinkResult};
use crate::services::audit;

const CLINICAL_ROLES: &[Role] = &[Role::Doctor, Role::Nurse];
const PATIENT_READ_ROLES: &[Role] = &[Role::Doctor, Role::Nurse, Role::HospitalAdmin];

pub struct PatientService<'a> {
    db: &'a Database,
}

impl<'a> PatientService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Fetch a patient, enforcing hospital scope.
    fn scoped_patient(&self, ctx: &AuthContext, patient_id: Uuid) -> CareLinkResult<Patient> {
        let patient = self
            .db
            .get_patient(patient_id)?
            .ok_or(CareLinkError::NotFound("patient"))?;
        if patient.hospital_id != ctx.hospital_id {
            return Err(CareLinkError::NotFound("patient"));
        }
        Ok(patient)
    }

    pub fn list(&self, ctx: &AuthContext) -> CareLinkResult<Vec<Patient>> {
        ctx.require_role(PATIENT_READ_ROLES)?;
        self.db.list_patients(ctx.hospital_id)
    }

    pub fn get(&self, ctx: &AuthContext, patient_id: Uuid) -> CareLinkResult<Patient> {
        ctx.require_role(PATIENT_READ_ROLES)?;
        self.scoped_patient(ctx, patient_id)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn create(
        &self,
        ctx: &AuthContext,
        first_name: &str,
        last_name: &str,
        birth_date: &str,
        gender: &str,
        blood_type: Option<String>,
        allergies: Option<String>,
        diagnosis: Option<String>,
    ) -> CareLinkResult<Patient> {
        ctx.require_role(CLINICAL_ROLES)?;
        if first_name.trim().is_empty() || last_name.trim().is_empty() {
            return Err(CareLinkError::Validation(
                "first_name and last_name are required".into(),
            ));
        }

        let patient = Patient {
            id: Uuid::new_v4(),
            hospital_id: ctx.hospital_id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            birth_date: birth_date.to_string(),
            gender: gender.to_string(),
            blood_type,
            allergies,
            diagnosis,
            created_at: now_rfc3339(),
        };
        self.db.insert_patient(&patient)?;
        audit::record_best_effort(
            self.db,
            ctx.user_id,
            "CREATE_PATIENT",
            "patient",
            &patient.id.to_string(),
        );

        Ok(patient)
    }

    /// Update the clinical summary fields.
    pub fn update(
        &self,
        ctx: &AuthContext,
        patient_id: Uuid,
        blood_type: Option<String>,
        allergies: Option<String>,
        diagnosis: Option<String>,
    ) -> CareLinkResult<Patient> {
        ctx.require_role(CLINICAL_ROLES)?;
        self.scoped_patient(ctx, patient_id)?;

        if !self.db.update_patient_clinical_summary(
            patient_id,
            blood_type.as_deref(),
            allergies.as_deref(),
            diagnosis.as_deref(),
        )? {
            return Err(CareLinkError::NotFound("patient"));
        }

        self.scoped_patient(ctx, patient_id)
    }

    pub fn add_record(
        &self,
        ctx: &AuthContext,
        patient_id: Uuid,
        title: &str,
        body: &str,
    ) -> CareLinkResult<MedicalRecord> {
        ctx.require_role(CLINICAL_ROLES)?;
        self.scoped_patient(ctx, patient_id)?;
        if title.trim().is_empty() {
            return Err(CareLinkError::Validation("record title is required".into()));
        }

        let record = MedicalRecord {
            id: Uuid::new_v4(),
            patient_id,
            author_id: ctx.user_id,
            title: title.to_string(),
            body: body.to_string(),
            created_at: now_rfc3339(),
        };
        self.db.insert_medical_record(&record)?;

        Ok(record)
    }

    pub fn list_records(
        &self,
        ctx: &AuthContext,
        patient_id: Uuid,
    ) -> CareLinkResult<Vec<MedicalRecord>> {
        ctx.require_role(PATIENT_READ_ROLES)?;
        self.scoped_patient(ctx, patient_id)?;
        self.db.list_medical_records(patient_id)
    }
}

/// Uploaded document storage: bytes on the local filesystem under the
/// configured document dir, metadata in the database.
pub struct DocumentService<'a> {
    db: &'a Database,
    cfg: &'a CoreConfig,
}

impl<'a> DocumentService<'a> {
    pub fn new(db: &'a Database, cfg: &'a CoreConfig) -> Self {
        Self { db, cfg }
    }

    pub fn store(
        &self,
        ctx: &AuthContext,
        patient_id: Uuid,
        file_name: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> CareLinkResult<MedicalDocument> {
        ctx.require_role(CLINICAL_ROLES)?;
        PatientService::new(self.db).scoped_patient(ctx, patient_id)?;
        if file_name.trim().is_empty() {
            return Err(CareLinkError::Validation("file name is required".into()));
        }

        let id = Uuid::new_v4();
        fs::create_dir_all(self.cfg.document_dir()).map_err(CareLinkError::StorageDirCreation)?;
        // Stored under the document's own UUID; the client-supplied name is
        // metadata only and never touches the filesystem.
        let stored_path = self.cfg.document_dir().join(id.simple().to_string());
        fs::write(&stored_path, bytes).map_err(CareLinkError::FileWrite)?;

        let document = MedicalDocument {
            id,
            patient_id,
            uploaded_by: ctx.user_id,
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
            size_bytes: bytes.len() as u64,
            created_at: now_rfc3339(),
        };
        self.db
            .insert_medical_document(&document, &stored_path.to_string_lossy())?;
        audit::record_best_effort(
            self.db,
            ctx.user_id,
            "UPLOAD_DOCUMENT",
            "medical_document",
            file_name,
        );

        Ok(document)
    }

    pub fn list(
        &self,
        ctx: &AuthContext,
        patient_id: Uuid,
    ) -> CareLinkResult<Vec<MedicalDocument>> {
        ctx.require_role(PATIENT_READ_ROLES)?;
        PatientService::new(self.db).scoped_patient(ctx, patient_id)?;
        self.db.list_medical_documents(patient_id)
    }
}
