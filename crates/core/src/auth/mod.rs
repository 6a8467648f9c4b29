//! Session resolution and the authorization guard.
//!
//! Every data-access operation in `crate::services` takes an [`AuthContext`]
//! and checks a role allow-list plus hospital scope before reading or
//! writing. Resolution fails closed: no session means the caller is
//! unauthorized, and nothing distinguishes a bad password from an unknown
//! email or an un-activated invite.

pub mod password;
pub mod session;

use rand::RngCore;
use uuid::Uuid;

use api_shared::{Hospital, HospitalStatus, Role, UserProfile};

use crate::config::CoreConfig;
use crate::db::{now_rfc3339, Database, UserRow};
use crate::error::{CareLinkError, CareLinkResult};
use crate::services::audit;

/// The identity a request acts as, resolved from a verified session token.
#[derive(Clone, Copy, Debug)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub role: Role,
    pub hospital_id: Uuid,
}

impl AuthContext {
    /// Check the caller's role against an operation's allow-list.
    pub fn require_role(&self, allowed: &[Role]) -> CareLinkResult<()> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(CareLinkError::Forbidden)
        }
    }

    /// Check that the caller belongs to `hospital_id`. No role bypasses
    /// this; operations that grant system administrators cross-hospital
    /// reach check [`AuthContext::is_system_admin`] explicitly.
    pub fn require_hospital(&self, hospital_id: Uuid) -> CareLinkResult<()> {
        if self.hospital_id == hospital_id {
            Ok(())
        } else {
            Err(CareLinkError::Forbidden)
        }
    }

    pub fn is_system_admin(&self) -> bool {
        self.role == Role::SystemAdmin
    }
}

/// Generate a one-time invitation token (32 random bytes, hex).
pub(crate) fn new_invite_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

fn validate_new_password(password: &str) -> CareLinkResult<()> {
    if password.len() < password::MIN_PASSWORD_LEN {
        return Err(CareLinkError::Validation(format!(
            "password must be at least {} characters",
            password::MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

/// Login, session verification and invitation redemption.
pub struct AuthService<'a> {
    db: &'a Database,
    cfg: &'a CoreConfig,
}

impl<'a> AuthService<'a> {
    pub fn new(db: &'a Database, cfg: &'a CoreConfig) -> Self {
        Self { db, cfg }
    }

    /// Exchange credentials for a session token and profile.
    pub fn login(&self, email: &str, password: &str) -> CareLinkResult<(String, UserProfile)> {
        let user = self
            .db
            .get_user_by_email(email)?
            .ok_or(CareLinkError::Unauthorized)?;

        // An account awaiting activation has no password hash yet.
        let stored = user
            .password_hash
            .as_deref()
            .ok_or(CareLinkError::Unauthorized)?;
        if !password::verify_password(password, stored) {
            return Err(CareLinkError::Unauthorized);
        }

        let token = session::issue(
            self.cfg.session_secret(),
            &user.email,
            self.cfg.session_ttl_secs(),
        )?;
        audit::record_best_effort(self.db, user.id, "LOGIN", "session", "");

        Ok((token, user.profile()))
    }

    /// Resolve a bearer token to an [`AuthContext`], re-issuing a token with
    /// a fresh expiry window (the sliding part of the 24-hour expiry).
    pub fn authenticate(&self, token: &str) -> CareLinkResult<(AuthContext, String)> {
        let claims = session::verify(self.cfg.session_secret(), token)?;

        // The account may have been removed since the token was issued.
        let user = self
            .db
            .get_user_by_email(&claims.email)?
            .ok_or(CareLinkError::Unauthorized)?;

        let refreshed = session::issue(
            self.cfg.session_secret(),
            &user.email,
            self.cfg.session_ttl_secs(),
        )?;

        Ok((
            AuthContext {
                user_id: user.id,
                role: user.role,
                hospital_id: user.hospital_id,
            },
            refreshed,
        ))
    }

    /// Profile for the authenticated caller (`GET /api/auth/me`).
    pub fn profile(&self, ctx: &AuthContext) -> CareLinkResult<UserProfile> {
        let user = self
            .db
            .get_user_by_id(ctx.user_id)?
            .ok_or(CareLinkError::Unauthorized)?;
        Ok(user.profile())
    }

    /// Redeem a one-time invitation token, setting the account's first
    /// password. The token is consumed atomically; redeeming it twice fails.
    pub fn activate(&self, invite_token: &str, new_password: &str) -> CareLinkResult<UserProfile> {
        validate_new_password(new_password)?;

        let user = self
            .db
            .get_user_by_invite_token(invite_token)?
            .ok_or(CareLinkError::Unauthorized)?;

        let hash = password::hash_password(new_password);
        if !self.db.redeem_invite_token(invite_token, &hash)? {
            // Consumed between lookup and redemption.
            return Err(CareLinkError::Unauthorized);
        }
        audit::record_best_effort(self.db, user.id, "ACTIVATE_ACCOUNT", "user", &user.email);

        let user = self
            .db
            .get_user_by_id(user.id)?
            .ok_or(CareLinkError::NotFound("user"))?;
        Ok(user.profile())
    }

    /// Create the first system administrator on an empty database.
    ///
    /// The admin is attached to a network-operations hospital row created
    /// here, since every staff account belongs to a hospital. Fails once any
    /// user exists.
    pub fn bootstrap_system_admin(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> CareLinkResult<UserProfile> {
        validate_new_password(password)?;
        if self.db.count_users()? > 0 {
            return Err(CareLinkError::Conflict(
                "system is already bootstrapped".into(),
            ));
        }

        let hospital = Hospital {
            id: Uuid::new_v4(),
            name: "CareLink Network Operations".into(),
            kind: "Network".into(),
            location: "".into(),
            status: HospitalStatus::Connected,
            specialties: Vec::new(),
            created_at: now_rfc3339(),
        };
        let admin = UserRow {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: Some(password::hash_password(password)),
            role: Role::SystemAdmin,
            hospital_id: hospital.id,
            department: "".into(),
            invite_token: None,
            created_at: now_rfc3339(),
        };

        // The admin row references the hospital row; neither lands alone.
        let tx = self.db.conn().unchecked_transaction()?;
        self.db.insert_hospital(&hospital)?;
        self.db.insert_user(&admin)?;
        tx.commit()?;

        Ok(admin.profile())
    }
}
