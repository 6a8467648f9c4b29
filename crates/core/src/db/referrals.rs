//! Referral and referral-event queries.
//!
//! Status changes go through [`Database::resolve_referral`], a conditional
//! update that only matches rows still in `SENT`. Terminal rows reject
//! further transitions at the storage layer, so two concurrent accepts
//! cannot both succeed.

use rusqlite::{params, OptionalExtension, Row};
use uuid::Uuid;

use api_shared::{Referral, ReferralEvent, ReferralEventType, ReferralPriority, ReferralStatus};

use super::{enum_col, opt_uuid_col, uuid_col, Database};
use crate::error::CareLinkResult;

const REFERRAL_COLS: &str = "id, patient_id, from_hospital_id, to_hospital_id, \
                             referring_doctor_id, receiving_doctor_id, status, priority, \
                             reason, notes, share_documents, rejection_reason, \
                             created_at, resolved_at";

fn map_referral(row: &Row<'_>) -> rusqlite::Result<Referral> {
    Ok(Referral {
        id: uuid_col(row, 0)?,
        patient_id: uuid_col(row, 1)?,
        from_hospital_id: uuid_col(row, 2)?,
        to_hospital_id: uuid_col(row, 3)?,
        referring_doctor_id: uuid_col(row, 4)?,
        receiving_doctor_id: opt_uuid_col(row, 5)?,
        status: enum_col(row, 6, ReferralStatus::parse)?,
        priority: enum_col(row, 7, ReferralPriority::parse)?,
        reason: row.get(8)?,
        notes: row.get(9)?,
        share_documents: row.get(10)?,
        rejection_reason: row.get(11)?,
        created_at: row.get(12)?,
        resolved_at: row.get(13)?,
    })
}

fn map_event(row: &Row<'_>) -> rusqlite::Result<ReferralEvent> {
    Ok(ReferralEvent {
        id: uuid_col(row, 0)?,
        referral_id: uuid_col(row, 1)?,
        event_type: enum_col(row, 2, ReferralEventType::parse)?,
        actor_id: uuid_col(row, 3)?,
        details: row.get(4)?,
        created_at: row.get(5)?,
    })
}

/// Outcome applied by [`Database::resolve_referral`].
pub enum ReferralResolution<'a> {
    Accept { receiving_doctor_id: Uuid },
    Reject { reason: &'a str },
}

impl Database {
    pub fn insert_referral(&self, referral: &Referral) -> CareLinkResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO referrals (id, patient_id, from_hospital_id, to_hospital_id,
                                   referring_doctor_id, receiving_doctor_id, status, priority,
                                   reason, notes, share_documents, rejection_reason,
                                   created_at, resolved_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            "#,
            params![
                referral.id.to_string(),
                referral.patient_id.to_string(),
                referral.from_hospital_id.to_string(),
                referral.to_hospital_id.to_string(),
                referral.referring_doctor_id.to_string(),
                referral.receiving_doctor_id.map(|u| u.to_string()),
                referral.status.as_str(),
                referral.priority.as_str(),
                referral.reason,
                referral.notes,
                referral.share_documents,
                referral.rejection_reason,
                referral.created_at,
                referral.resolved_at,
            ],
        )?;
        Ok(())
    }

    pub fn get_referral(&self, id: Uuid) -> CareLinkResult<Option<Referral>> {
        self.conn
            .query_row(
                &format!("SELECT {REFERRAL_COLS} FROM referrals WHERE id = ?"),
                [id.to_string()],
                map_referral,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Apply a terminal resolution, conditional on the row still being SENT.
    ///
    /// Returns false when no row matched — the referral does not exist or has
    /// already been resolved.
    pub fn resolve_referral(
        &self,
        id: Uuid,
        resolution: &ReferralResolution<'_>,
        resolved_at: &str,
    ) -> CareLinkResult<bool> {
        let rows_affected = match resolution {
            ReferralResolution::Accept {
                receiving_doctor_id,
            } => self.conn.execute(
                r#"
                UPDATE referrals
                SET status = 'ACCEPTED', receiving_doctor_id = ?2, resolved_at = ?3
                WHERE id = ?1 AND status = 'SENT'
                "#,
                params![
                    id.to_string(),
                    receiving_doctor_id.to_string(),
                    resolved_at
                ],
            )?,
            ReferralResolution::Reject { reason } => self.conn.execute(
                r#"
                UPDATE referrals
                SET status = 'REJECTED', rejection_reason = ?2, resolved_at = ?3
                WHERE id = ?1 AND status = 'SENT'
                "#,
                params![id.to_string(), reason, resolved_at],
            )?,
        };
        Ok(rows_affected > 0)
    }

    /// Referrals addressed to a hospital, most urgent first.
    ///
    /// Emergency incoming referrals must surface before anything else, so the
    /// ordering is priority-descending and recency-descending within each
    /// priority group.
    pub fn list_incoming_referrals(&self, hospital_id: Uuid) -> CareLinkResult<Vec<Referral>> {
        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT {REFERRAL_COLS} FROM referrals
            WHERE to_hospital_id = ?
            ORDER BY CASE priority
                         WHEN 'EMERGENCY' THEN 0
                         WHEN 'URGENT' THEN 1
                         ELSE 2
                     END,
                     created_at DESC
            "#
        ))?;
        let rows = stmt.query_map([hospital_id.to_string()], map_referral)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Referrals sent by a hospital, most recent first (no priority ordering;
    /// the asymmetry with incoming lists is deliberate).
    pub fn list_outgoing_referrals(&self, hospital_id: Uuid) -> CareLinkResult<Vec<Referral>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {REFERRAL_COLS} FROM referrals WHERE from_hospital_id = ? \
             ORDER BY created_at DESC"
        ))?;
        let rows = stmt.query_map([hospital_id.to_string()], map_referral)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn insert_referral_event(&self, event: &ReferralEvent) -> CareLinkResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO referral_events (id, referral_id, event_type, actor_id, details, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                event.id.to_string(),
                event.referral_id.to_string(),
                event.event_type.as_str(),
                event.actor_id.to_string(),
                event.details,
                event.created_at,
            ],
        )?;
        Ok(())
    }

    /// Timeline in insertion order; rowid breaks timestamp ties.
    pub fn list_referral_events(&self, referral_id: Uuid) -> CareLinkResult<Vec<ReferralEvent>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, referral_id, event_type, actor_id, details, created_at
            FROM referral_events
            WHERE referral_id = ?
            ORDER BY created_at ASC, rowid ASC
            "#,
        )?;
        let rows = stmt.query_map([referral_id.to_string()], map_event)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}
