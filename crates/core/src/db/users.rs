//! Staff account queries.
//!
//! `UserRow` carries the credential columns and therefore never leaves this
//! crate; the wire-facing projection is [`api_shared::UserProfile`].

use rusqlite::{params, OptionalExtension, Row};
use uuid::Uuid;

use api_shared::{Role, UserProfile};

use super::{enum_col, uuid_col, Database};
use crate::error::CareLinkResult;

/// A full staff row, credentials included.
#[derive(Clone, Debug)]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub role: Role,
    pub hospital_id: Uuid,
    pub department: String,
    pub invite_token: Option<String>,
    pub created_at: String,
}

impl UserRow {
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
            hospital_id: self.hospital_id,
            department: self.department.clone(),
            pending_activation: self.invite_token.is_some(),
        }
    }
}

const USER_COLS: &str =
    "id, name, email, password_hash, role, hospital_id, department, invite_token, created_at";

fn map_user(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: uuid_col(row, 0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        role: enum_col(row, 4, Role::parse)?,
        hospital_id: uuid_col(row, 5)?,
        department: row.get(6)?,
        invite_token: row.get(7)?,
        created_at: row.get(8)?,
    })
}

impl Database {
    pub(crate) fn insert_user(&self, user: &UserRow) -> CareLinkResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO users (id, name, email, password_hash, role, hospital_id,
                               department, invite_token, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                user.id.to_string(),
                user.name,
                user.email,
                user.password_hash,
                user.role.as_str(),
                user.hospital_id.to_string(),
                user.department,
                user.invite_token,
                user.created_at,
            ],
        )?;
        Ok(())
    }

    pub(crate) fn get_user_by_id(&self, id: Uuid) -> CareLinkResult<Option<UserRow>> {
        self.conn
            .query_row(
                &format!("SELECT {USER_COLS} FROM users WHERE id = ?"),
                [id.to_string()],
                map_user,
            )
            .optional()
            .map_err(Into::into)
    }

    pub(crate) fn get_user_by_email(&self, email: &str) -> CareLinkResult<Option<UserRow>> {
        self.conn
            .query_row(
                &format!("SELECT {USER_COLS} FROM users WHERE email = ?"),
                [email],
                map_user,
            )
            .optional()
            .map_err(Into::into)
    }

    pub(crate) fn get_user_by_invite_token(&self, token: &str) -> CareLinkResult<Option<UserRow>> {
        self.conn
            .query_row(
                &format!("SELECT {USER_COLS} FROM users WHERE invite_token = ?"),
                [token],
                map_user,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Consume an invitation token, setting the account's password hash.
    ///
    /// Conditional on the token still being present, so a token can only be
    /// redeemed once. Returns false if it was already consumed (or never
    /// existed).
    pub(crate) fn redeem_invite_token(
        &self,
        token: &str,
        password_hash: &str,
    ) -> CareLinkResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE users SET password_hash = ?2, invite_token = NULL
            WHERE invite_token = ?1
            "#,
            params![token, password_hash],
        )?;
        Ok(rows_affected > 0)
    }

    pub(crate) fn list_staff(&self, hospital_id: Uuid) -> CareLinkResult<Vec<UserRow>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {USER_COLS} FROM users WHERE hospital_id = ? ORDER BY name"
        ))?;
        let rows = stmt.query_map([hospital_id.to_string()], map_user)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Whether any clinical or workflow row still points at this account.
    ///
    /// Audit rows deliberately do not count: audit history outlives the
    /// account and never blocks removal.
    pub(crate) fn user_is_referenced(&self, id: Uuid) -> CareLinkResult<bool> {
        let referenced: bool = self.conn.query_row(
            r#"
            SELECT EXISTS (SELECT 1 FROM referrals
                           WHERE referring_doctor_id = ?1 OR receiving_doctor_id = ?1)
                OR EXISTS (SELECT 1 FROM referral_events WHERE actor_id = ?1)
                OR EXISTS (SELECT 1 FROM medical_records WHERE author_id = ?1)
                OR EXISTS (SELECT 1 FROM medical_documents WHERE uploaded_by = ?1)
                OR EXISTS (SELECT 1 FROM emergency_access_logs WHERE user_id = ?1)
                OR EXISTS (SELECT 1 FROM messages
                           WHERE sender_id = ?1 OR recipient_id = ?1)
                OR EXISTS (SELECT 1 FROM tasks WHERE assignee_id = ?1)
                OR EXISTS (SELECT 1 FROM departments WHERE head_user_id = ?1)
            "#,
            [id.to_string()],
            |row| row.get(0),
        )?;
        Ok(referenced)
    }

    pub(crate) fn delete_user(&self, id: Uuid) -> CareLinkResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM users WHERE id = ?", [id.to_string()])?;
        Ok(rows_affected > 0)
    }

    pub(crate) fn count_users(&self) -> CareLinkResult<u64> {
        let count: u64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count)
    }
}
