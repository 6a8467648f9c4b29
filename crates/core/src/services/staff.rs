//! Staff accounts: listing, invitations, removal.
//!
//! Invited staff receive a one-time invitation token instead of a default
//! password; the account cannot log in until the token is redeemed via
//! [`AuthService::activate`](crate::auth::AuthService::activate).

use uuid::Uuid;

use api_shared::{Role, UserProfile};

use crate::auth::{new_invite_token, AuthContext};
use crate::db::{now_rfc3339, Database, UserRow};
use crate::error::{CareLinkError, CareLinkResult};
use crate::services::audit;

/// Result of inviting a staff member: the new account and its one-time
/// activation token. The token is returned exactly once.
#[derive(Clone, Debug)]
pub struct StaffInvitation {
    pub profile: UserProfile,
    pub invite_token: String,
}

pub struct StaffService<'a> {
    db: &'a Database,
}

impl<'a> StaffService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Staff of a hospital. Restricted to that hospital's own staff, plus
    /// system administrators.
    pub fn list(&self, ctx: &AuthContext, hospital_id: Uuid) -> CareLinkResult<Vec<UserProfile>> {
        if !ctx.is_system_admin() {
            ctx.require_hospital(hospital_id)?;
        }

        let staff = self.db.list_staff(hospital_id)?;
        Ok(staff.iter().map(UserRow::profile).collect())
    }

    /// Invite a staff member into a hospital.
    ///
    /// Hospital admins invite into their own hospital; system admins may
    /// invite into any hospital (including the first admin of a newly
    /// registered one). System-admin accounts cannot be created by
    /// invitation.
    pub fn invite(
        &self,
        ctx: &AuthContext,
        hospital_id: Uuid,
        name: &str,
        email: &str,
        role: Role,
        department: &str,
    ) -> CareLinkResult<StaffInvitation> {
        ctx.require_role(&[Role::HospitalAdmin, Role::SystemAdmin])?;
        if !ctx.is_system_admin() {
            ctx.require_hospital(hospital_id)?;
        }
        if role == Role::SystemAdmin {
            return Err(CareLinkError::Forbidden);
        }
        if name.trim().is_empty() || email.trim().is_empty() {
            return Err(CareLinkError::Validation(
                "name and email are required".into(),
            ));
        }
        if self.db.get_hospital(hospital_id)?.is_none() {
            return Err(CareLinkError::NotFound("hospital"));
        }
        if self.db.get_user_by_email(email)?.is_some() {
            return Err(CareLinkError::Conflict(
                "a user with this email already exists".into(),
            ));
        }

        let user = UserRow {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: None,
            role,
            hospital_id,
            department: department.to_string(),
            invite_token: Some(new_invite_token()),
            created_at: now_rfc3339(),
        };
        self.db.insert_user(&user)?;
        audit::record_best_effort(self.db, ctx.user_id, "INVITE_STAFF", "user", email);

        let invite_token = user
            .invite_token
            .clone()
            .ok_or(CareLinkError::NotFound("invite token"))?;
        Ok(StaffInvitation {
            profile: user.profile(),
            invite_token,
        })
    }

    /// Remove a staff account.
    ///
    /// Refused while clinical or workflow rows (referrals, records,
    /// documents, messages, tasks, break-glass sessions) still reference the
    /// account. Audit history does not block removal and survives it.
    pub fn remove(&self, ctx: &AuthContext, user_id: Uuid) -> CareLinkResult<()> {
        ctx.require_role(&[Role::HospitalAdmin, Role::SystemAdmin])?;

        let user = self
            .db
            .get_user_by_id(user_id)?
            .ok_or(CareLinkError::NotFound("user"))?;
        if !ctx.is_system_admin() {
            ctx.require_hospital(user.hospital_id)?;
        }
        if user.id == ctx.user_id {
            return Err(CareLinkError::Validation(
                "cannot remove your own account".into(),
            ));
        }

        if self.db.user_is_referenced(user_id)? {
            return Err(CareLinkError::Conflict(
                "account is still referenced by clinical or workflow records".into(),
            ));
        }

        if !self.db.delete_user(user_id)? {
            return Err(CareLinkError::NotFound("user"));
        }
        audit::record_best_effort(self.db, ctx.user_id, "REMOVE_STAFF", "user", &user.email);
        Ok(())
    }
}
