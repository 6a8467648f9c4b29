//! Hospital and department queries.

use rusqlite::{params, OptionalExtension, Row};
use uuid::Uuid;

use api_shared::{Department, Hospital, HospitalStatus};

use super::{enum_col, opt_uuid_col, uuid_col, Database};
use crate::error::CareLinkResult;

fn map_hospital(row: &Row<'_>) -> rusqlite::Result<Hospital> {
    let specialties_raw: String = row.get(5)?;
    let specialties: Vec<String> = serde_json::from_str(&specialties_raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Hospital {
        id: uuid_col(row, 0)?,
        name: row.get(1)?,
        kind: row.get(2)?,
        location: row.get(3)?,
        status: enum_col(row, 4, HospitalStatus::parse)?,
        specialties,
        created_at: row.get(6)?,
    })
}

const HOSPITAL_COLS: &str = "id, name, kind, location, status, specialties, created_at";

fn map_department(row: &Row<'_>) -> rusqlite::Result<Department> {
    Ok(Department {
        id: uuid_col(row, 0)?,
        hospital_id: uuid_col(row, 1)?,
        name: row.get(2)?,
        head_user_id: opt_uuid_col(row, 3)?,
        created_at: row.get(4)?,
    })
}

impl Database {
    pub fn insert_hospital(&self, hospital: &Hospital) -> CareLinkResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO hospitals (id, name, kind, location, status, specialties, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                hospital.id.to_string(),
                hospital.name,
                hospital.kind,
                hospital.location,
                hospital.status.as_str(),
                serde_json::to_string(&hospital.specialties)?,
                hospital.created_at,
            ],
        )?;
        Ok(())
    }

    pub fn get_hospital(&self, id: Uuid) -> CareLinkResult<Option<Hospital>> {
        self.conn
            .query_row(
                &format!("SELECT {HOSPITAL_COLS} FROM hospitals WHERE id = ?"),
                [id.to_string()],
                map_hospital,
            )
            .optional()
            .map_err(Into::into)
    }

    pub fn list_hospitals(&self) -> CareLinkResult<Vec<Hospital>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {HOSPITAL_COLS} FROM hospitals ORDER BY name"))?;
        let rows = stmt.query_map([], map_hospital)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Returns false if the hospital does not exist.
    pub fn set_hospital_status(&self, id: Uuid, status: HospitalStatus) -> CareLinkResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE hospitals SET status = ?2 WHERE id = ?1",
            params![id.to_string(), status.as_str()],
        )?;
        Ok(rows_affected > 0)
    }

    pub fn insert_department(&self, department: &Department) -> CareLinkResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO departments (id, hospital_id, name, head_user_id, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                department.id.to_string(),
                department.hospital_id.to_string(),
                department.name,
                department.head_user_id.map(|u| u.to_string()),
                department.created_at,
            ],
        )?;
        Ok(())
    }

    pub fn list_departments(&self, hospital_id: Uuid) -> CareLinkResult<Vec<Department>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, hospital_id, name, head_user_id, created_at
            FROM departments
            WHERE hospital_id = ?
            ORDER BY name
            "#,
        )?;
        let rows = stmt.query_map([hospital_id.to_string()], map_department)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}
