//! Break-glass access session queries.

use rusqlite::{params, OptionalExtension, Row};
use uuid::Uuid;

use api_shared::{EmergencyAccessLog, EmergencyStatus};

use super::{enum_col, uuid_col, Database};
use crate::error::CareLinkResult;

const EMERGENCY_COLS: &str = "id, user_id, patient_id, reason, start_time, end_time, status";

fn map_log(row: &Row<'_>) -> rusqlite::Result<EmergencyAccessLog> {
    Ok(EmergencyAccessLog {
        id: uuid_col(row, 0)?,
        user_id: uuid_col(row, 1)?,
        patient_id: uuid_col(row, 2)?,
        reason: row.get(3)?,
        start_time: row.get(4)?,
        end_time: row.get(5)?,
        status: enum_col(row, 6, EmergencyStatus::parse)?,
    })
}

impl Database {
    pub fn insert_emergency_access(&self, log: &EmergencyAccessLog) -> CareLinkResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO emergency_access_logs (id, user_id, patient_id, reason,
                                               start_time, end_time, status)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                log.id.to_string(),
                log.user_id.to_string(),
                log.patient_id.to_string(),
                log.reason,
                log.start_time,
                log.end_time,
                log.status.as_str(),
            ],
        )?;
        Ok(())
    }

    pub fn get_emergency_access(&self, id: Uuid) -> CareLinkResult<Option<EmergencyAccessLog>> {
        self.conn
            .query_row(
                &format!("SELECT {EMERGENCY_COLS} FROM emergency_access_logs WHERE id = ?"),
                [id.to_string()],
                map_log,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Close a session, conditional on it still being OPEN. `end_time` and
    /// CLOSED are set exactly once; a second close matches no row and returns
    /// false.
    pub fn close_emergency_access(&self, id: Uuid, end_time: &str) -> CareLinkResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE emergency_access_logs
            SET end_time = ?2, status = 'CLOSED'
            WHERE id = ?1 AND status = 'OPEN'
            "#,
            params![id.to_string(), end_time],
        )?;
        Ok(rows_affected > 0)
    }

    /// Count of OPEN sessions touching a hospital's patients.
    pub fn count_open_emergency_access(&self, hospital_id: Uuid) -> CareLinkResult<u64> {
        let count: u64 = self.conn.query_row(
            r#"
            SELECT COUNT(*)
            FROM emergency_access_logs e
            JOIN patients p ON p.id = e.patient_id
            WHERE e.status = 'OPEN' AND p.hospital_id = ?
            "#,
            [hospital_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Sessions touching a hospital's patients, newest first.
    pub fn list_emergency_access_for_hospital(
        &self,
        hospital_id: Uuid,
    ) -> CareLinkResult<Vec<EmergencyAccessLog>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT e.id, e.user_id, e.patient_id, e.reason, e.start_time, e.end_time, e.status
            FROM emergency_access_logs e
            JOIN patients p ON p.id = e.patient_id
            WHERE p.hospital_id = ?
            ORDER BY e.start_time DESC
            "#,
        )?;
        let rows = stmt.query_map([hospital_id.to_string()], map_log)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// All sessions across the network, newest first.
    pub fn list_all_emergency_access(&self) -> CareLinkResult<Vec<EmergencyAccessLog>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {EMERGENCY_COLS} FROM emergency_access_logs ORDER BY start_time DESC"
        ))?;
        let rows = stmt.query_map([], map_log)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}
