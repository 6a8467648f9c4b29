//! Audit log access and the shared append helper.

use uuid::Uuid;

use api_shared::{AuditLogEntry, Role};

use crate::auth::AuthContext;
use crate::db::{now_rfc3339, Database};
use crate::error::CareLinkResult;

/// Append an audit entry for another service's operation.
///
/// Auditing must never fail the operation being audited; errors are logged
/// and swallowed.
pub(crate) fn record_best_effort(
    db: &Database,
    user_id: Uuid,
    action: &str,
    resource: &str,
    details: &str,
) {
    let entry = AuditLogEntry {
        id: Uuid::new_v4(),
        user_id,
        action: action.to_string(),
        resource: resource.to_string(),
        details: details.to_string(),
        created_at: now_rfc3339(),
    };
    if let Err(e) = db.insert_audit_log(&entry) {
        tracing::warn!("failed to write audit entry for {action}: {e}");
    }
}

/// Read access to the append-only audit log.
pub struct AuditService<'a> {
    db: &'a Database,
}

impl<'a> AuditService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Audit entries for review, newest first, optionally filtered by
    /// action. Hospital admins see their own hospital's staff; system
    /// admins see the whole network.
    pub fn list(
        &self,
        ctx: &AuthContext,
        action_filter: Option<&str>,
    ) -> CareLinkResult<Vec<AuditLogEntry>> {
        ctx.require_role(&[Role::HospitalAdmin, Role::SystemAdmin])?;

        if ctx.is_system_admin() {
            self.db.list_all_audit_logs(action_filter)
        } else {
            self.db
                .list_audit_logs_for_hospital(ctx.hospital_id, action_filter)
        }
    }
}
