//! Break-glass emergency access.
//!
//! Opening a session bypasses the usual hospital scoping on the patient —
//! that is the point of break-glass — so every open and close is written to
//! the audit log for after-the-fact review. There is no cap on concurrently
//! open sessions per user and no automatic timeout.

use uuid::Uuid;

use api_shared::{EmergencyAccessLog, EmergencyStatus, Role};

use crate::auth::AuthContext;
use crate::db::{now_rfc3339, Database};
use crate::error::{CareLinkError, CareLinkResult};
use crate::services::audit;

pub struct EmergencyService<'a> {
    db: &'a Database,
}

impl<'a> EmergencyService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Open a break-glass session against any existing patient.
    pub fn open(
        &self,
        ctx: &AuthContext,
        patient_id: Uuid,
        reason: &str,
    ) -> CareLinkResult<EmergencyAccessLog> {
        ctx.require_role(&[Role::Doctor, Role::Nurse])?;
        if reason.trim().is_empty() {
            return Err(CareLinkError::Validation(
                "an emergency access reason is required".into(),
            ));
        }
        if self.db.get_patient(patient_id)?.is_none() {
            return Err(CareLinkError::NotFound("patient"));
        }

        let log = EmergencyAccessLog {
            id: Uuid::new_v4(),
            user_id: ctx.user_id,
            patient_id,
            reason: reason.to_string(),
            start_time: now_rfc3339(),
            end_time: None,
            status: EmergencyStatus::Open,
        };
        self.db.insert_emergency_access(&log)?;
        audit::record_best_effort(
            self.db,
            ctx.user_id,
            "OPEN_EMERGENCY_ACCESS",
            "patient",
            reason,
        );

        Ok(log)
    }

    /// Close a session. Only its opener may close it, and only once:
    /// `end_time` and CLOSED are set by a conditional update that refuses
    /// already-closed rows.
    pub fn close(&self, ctx: &AuthContext, log_id: Uuid) -> CareLinkResult<EmergencyAccessLog> {
        let log = self
            .db
            .get_emergency_access(log_id)?
            .ok_or(CareLinkError::NotFound("emergency access session"))?;
        if log.user_id != ctx.user_id {
            return Err(CareLinkError::Forbidden);
        }

        if !self.db.close_emergency_access(log_id, &now_rfc3339())? {
            return Err(CareLinkError::InvalidTransition(
                "emergency access session is already closed".into(),
            ));
        }
        audit::record_best_effort(
            self.db,
            ctx.user_id,
            "CLOSE_EMERGENCY_ACCESS",
            "emergency_access",
            &log_id.to_string(),
        );

        self.db
            .get_emergency_access(log_id)?
            .ok_or(CareLinkError::NotFound("emergency access session"))
    }

    /// Count of open sessions touching the caller's hospital's patients.
    /// Feeds a UI indicator only.
    pub fn active_count(&self, ctx: &AuthContext) -> CareLinkResult<u64> {
        self.db.count_open_emergency_access(ctx.hospital_id)
    }

    /// Sessions for review: hospital admins see sessions touching their own
    /// patients, system admins see the whole network.
    pub fn list(&self, ctx: &AuthContext) -> CareLinkResult<Vec<EmergencyAccessLog>> {
        ctx.require_role(&[Role::HospitalAdmin, Role::SystemAdmin])?;

        if ctx.is_system_admin() {
            self.db.list_all_emergency_access()
        } else {
            self.db.list_emergency_access_for_hospital(ctx.hospital_id)
        }
    }
}
