//! Audit log queries. Insert and select only — the schema's triggers abort
//! any UPDATE or DELETE.

use rusqlite::{params, Row};
use uuid::Uuid;

use api_shared::AuditLogEntry;

use super::{uuid_col, Database};
use crate::error::CareLinkResult;

fn map_entry(row: &Row<'_>) -> rusqlite::Result<AuditLogEntry> {
    Ok(AuditLogEntry {
        id: uuid_col(row, 0)?,
        user_id: uuid_col(row, 1)?,
        action: row.get(2)?,
        resource: row.get(3)?,
        details: row.get(4)?,
        created_at: row.get(5)?,
    })
}

impl Database {
    pub fn insert_audit_log(&self, entry: &AuditLogEntry) -> CareLinkResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO audit_logs (id, user_id, action, resource, details, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                entry.id.to_string(),
                entry.user_id.to_string(),
                entry.action,
                entry.resource,
                entry.details,
                entry.created_at,
            ],
        )?;
        Ok(())
    }

    /// Audit entries written by staff of one hospital, newest first.
    pub fn list_audit_logs_for_hospital(
        &self,
        hospital_id: Uuid,
        action_filter: Option<&str>,
    ) -> CareLinkResult<Vec<AuditLogEntry>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT a.id, a.user_id, a.action, a.resource, a.details, a.created_at
            FROM audit_logs a
            JOIN users u ON u.id = a.user_id
            WHERE u.hospital_id = ?1 AND (?2 IS NULL OR a.action = ?2)
            ORDER BY a.created_at DESC
            "#,
        )?;
        let rows = stmt.query_map(params![hospital_id.to_string(), action_filter], map_entry)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// All audit entries, newest first.
    pub fn list_all_audit_logs(
        &self,
        action_filter: Option<&str>,
    ) -> CareLinkResult<Vec<AuditLogEntry>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, user_id, action, resource, details, created_at
            FROM audit_logs
            WHERE ?1 IS NULL OR action = ?1
            ORDER BY created_at DESC
            "#,
        )?;
        let rows = stmt.query_map(params![action_filter], map_entry)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}
