//! Patient, medical record and document metadata queries.

use rusqlite::{params, OptionalExtension, Row};
use uuid::Uuid;

use api_shared::{MedicalDocument, MedicalRecord, Patient};

use super::{uuid_col, Database};
use crate::error::CareLinkResult;

const PATIENT_COLS: &str = "id, hospital_id, first_name, last_name, birth_date, gender, \
                            blood_type, allergies, diagnosis, created_at";

fn map_patient(row: &Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        id: uuid_col(row, 0)?,
        hospital_id: uuid_col(row, 1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        birth_date: row.get(4)?,
        gender: row.get(5)?,
        blood_type: row.get(6)?,
        allergies: row.get(7)?,
        diagnosis: row.get(8)?,
        created_at: row.get(9)?,
    })
}

fn map_record(row: &Row<'_>) -> rusqlite::Result<MedicalRecord> {
    Ok(MedicalRecord {
        id: uuid_col(row, 0)?,
        patient_id: uuid_col(row, 1)?,
        author_id: uuid_col(row, 2)?,
        title: row.get(3)?,
        body: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn map_document(row: &Row<'_>) -> rusqlite::Result<MedicalDocument> {
    Ok(MedicalDocument {
        id: uuid_col(row, 0)?,
        patient_id: uuid_col(row, 1)?,
        uploaded_by: uuid_col(row, 2)?,
        file_name: row.get(3)?,
        content_type: row.get(4)?,
        size_bytes: row.get(5)?,
        created_at: row.get(6)?,
    })
}

impl Database {
    pub fn insert_patient(&self, patient: &Patient) -> CareLinkResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO patients (id, hospital_id, first_name, last_name, birth_date,
                                  gender, blood_type, allergies, diagnosis, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                patient.id.to_string(),
                patient.hospital_id.to_string(),
                patient.first_name,
                patient.last_name,
                patient.birth_date,
                patient.gender,
                patient.blood_type,
                patient.allergies,
                patient.diagnosis,
                patient.created_at,
            ],
        )?;
        Ok(())
    }

    pub fn get_patient(&self, id: Uuid) -> CareLinkResult<Option<Patient>> {
        self.conn
            .query_row(
                &format!("SELECT {PATIENT_COLS} FROM patients WHERE id = ?"),
                [id.to_string()],
                map_patient,
            )
            .optional()
            .map_err(Into::into)
    }

    pub fn list_patients(&self, hospital_id: Uuid) -> CareLinkResult<Vec<Patient>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PATIENT_COLS} FROM patients WHERE hospital_id = ? \
             ORDER BY last_name, first_name"
        ))?;
        let rows = stmt.query_map([hospital_id.to_string()], map_patient)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Returns false if the patient does not exist.
    pub fn update_patient_clinical_summary(
        &self,
        id: Uuid,
        blood_type: Option<&str>,
        allergies: Option<&str>,
        diagnosis: Option<&str>,
    ) -> CareLinkResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE patients SET blood_type = ?2, allergies = ?3, diagnosis = ?4
            WHERE id = ?1
            "#,
            params![id.to_string(), blood_type, allergies, diagnosis],
        )?;
        Ok(rows_affected > 0)
    }

    pub fn insert_medical_record(&self, record: &MedicalRecord) -> CareLinkResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO medical_records (id, patient_id, author_id, title, body, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                record.id.to_string(),
                record.patient_id.to_string(),
                record.author_id.to_string(),
                record.title,
                record.body,
                record.created_at,
            ],
        )?;
        Ok(())
    }

    pub fn list_medical_records(&self, patient_id: Uuid) -> CareLinkResult<Vec<MedicalRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, patient_id, author_id, title, body, created_at
            FROM medical_records
            WHERE patient_id = ?
            ORDER BY created_at DESC
            "#,
        )?;
        let rows = stmt.query_map([patient_id.to_string()], map_record)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn insert_medical_document(
        &self,
        document: &MedicalDocument,
        stored_path: &str,
    ) -> CareLinkResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO medical_documents (id, patient_id, uploaded_by, file_name,
                                           content_type, size_bytes, stored_path, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                document.id.to_string(),
                document.patient_id.to_string(),
                document.uploaded_by.to_string(),
                document.file_name,
                document.content_type,
                document.size_bytes,
                stored_path,
                document.created_at,
            ],
        )?;
        Ok(())
    }

    pub fn list_medical_documents(
        &self,
        patient_id: Uuid,
    ) -> CareLinkResult<Vec<MedicalDocument>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, patient_id, uploaded_by, file_name, content_type, size_bytes, created_at
            FROM medical_documents
            WHERE patient_id = ?
            ORDER BY created_at DESC
            "#,
        )?;
        let rows = stmt.query_map([patient_id.to_string()], map_document)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}
