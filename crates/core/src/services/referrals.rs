//! The referral lifecycle.
//!
//! A referral enters SENT when a doctor at the patient's hospital creates
//! it, and leaves SENT exactly once, to ACCEPTED or REJECTED, at the hands
//! of a doctor at the destination hospital. Each transition (creation
//! included) appends one immutable event; the event log is the timeline's
//! source of truth.

use uuid::Uuid;

use api_shared::{
    Referral, ReferralEvent, ReferralEventType, ReferralPriority, ReferralStatus, Role,
};

use crate::auth::AuthContext;
use crate::db::{now_rfc3339, Database, ReferralResolution};
use crate::error::{CareLinkError, CareLinkResult};
use crate::services::audit;

pub struct ReferralService<'a> {
    db: &'a Database,
}

impl<'a> ReferralService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Create a referral for a patient of the caller's hospital.
    ///
    /// Doctors only. The destination must be a different, existing hospital.
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        &self,
        ctx: &AuthContext,
        patient_id: Uuid,
        to_hospital_id: Uuid,
        priority: ReferralPriority,
        reason: &str,
        notes: Option<String>,
        share_documents: bool,
    ) -> CareLinkResult<Referral> {
        ctx.require_role(&[Role::Doctor])?;

        let patient = self
            .db
            .get_patient(patient_id)?
            .ok_or(CareLinkError::NotFound("patient"))?;
        ctx.require_hospital(patient.hospital_id)?;

        if to_hospital_id == ctx.hospital_id {
            return Err(CareLinkError::Validation(
                "cannot refer a patient to their current hospital".into(),
            ));
        }
        if self.db.get_hospital(to_hospital_id)?.is_none() {
            return Err(CareLinkError::NotFound("destination hospital"));
        }
        if reason.trim().is_empty() {
            return Err(CareLinkError::Validation(
                "referral reason is required".into(),
            ));
        }

        let referral = Referral {
            id: Uuid::new_v4(),
            patient_id,
            from_hospital_id: ctx.hospital_id,
            to_hospital_id,
            referring_doctor_id: ctx.user_id,
            receiving_doctor_id: None,
            status: ReferralStatus::Sent,
            priority,
            reason: reason.to_string(),
            notes,
            share_documents,
            rejection_reason: None,
            created_at: now_rfc3339(),
            resolved_at: None,
        };

        let tx = self.db.conn().unchecked_transaction()?;
        self.db.insert_referral(&referral)?;
        self.db.insert_referral_event(&ReferralEvent {
            id: Uuid::new_v4(),
            referral_id: referral.id,
            event_type: ReferralEventType::Created,
            actor_id: ctx.user_id,
            details: None,
            created_at: now_rfc3339(),
        })?;
        tx.commit()?;
        audit::record_best_effort(
            self.db,
            ctx.user_id,
            "CREATE_REFERRAL",
            "referral",
            &referral.id.to_string(),
        );

        Ok(referral)
    }

    /// Fetch a referral the caller is allowed to see: staff at either
    /// endpoint hospital.
    pub fn get(&self, ctx: &AuthContext, referral_id: Uuid) -> CareLinkResult<Referral> {
        let referral = self
            .db
            .get_referral(referral_id)?
            .ok_or(CareLinkError::NotFound("referral"))?;
        if ctx.hospital_id != referral.from_hospital_id
            && ctx.hospital_id != referral.to_hospital_id
        {
            return Err(CareLinkError::NotFound("referral"));
        }
        Ok(referral)
    }

    pub fn accept(&self, ctx: &AuthContext, referral_id: Uuid) -> CareLinkResult<Referral> {
        self.resolve(
            ctx,
            referral_id,
            ReferralResolution::Accept {
                receiving_doctor_id: ctx.user_id,
            },
            ReferralEventType::Accepted,
            None,
        )
    }

    pub fn reject(
        &self,
        ctx: &AuthContext,
        referral_id: Uuid,
        reason: &str,
    ) -> CareLinkResult<Referral> {
        if reason.trim().is_empty() {
            return Err(CareLinkError::Validation(
                "rejection reason is required".into(),
            ));
        }
        self.resolve(
            ctx,
            referral_id,
            ReferralResolution::Reject { reason },
            ReferralEventType::Rejected,
            Some(reason.to_string()),
        )
    }

    /// Shared terminal transition: doctors at the destination hospital only.
    ///
    /// The status change is a conditional update matching `status = 'SENT'`;
    /// if the row has already reached a terminal state the update matches
    /// nothing and the whole operation fails with no event appended.
    fn resolve(
        &self,
        ctx: &AuthContext,
        referral_id: Uuid,
        resolution: ReferralResolution<'_>,
        event_type: ReferralEventType,
        event_details: Option<String>,
    ) -> CareLinkResult<Referral> {
        ctx.require_role(&[Role::Doctor])?;

        let referral = self
            .db
            .get_referral(referral_id)?
            .ok_or(CareLinkError::NotFound("referral"))?;
        ctx.require_hospital(referral.to_hospital_id)?;

        let tx = self.db.conn().unchecked_transaction()?;
        if !self
            .db
            .resolve_referral(referral_id, &resolution, &now_rfc3339())?
        {
            return Err(CareLinkError::InvalidTransition(format!(
                "referral is already {}",
                referral.status.as_str()
            )));
        }
        self.db.insert_referral_event(&ReferralEvent {
            id: Uuid::new_v4(),
            referral_id,
            event_type,
            actor_id: ctx.user_id,
            details: event_details,
            created_at: now_rfc3339(),
        })?;
        tx.commit()?;
        audit::record_best_effort(
            self.db,
            ctx.user_id,
            match event_type {
                ReferralEventType::Accepted => "ACCEPT_REFERRAL",
                _ => "REJECT_REFERRAL",
            },
            "referral",
            &referral_id.to_string(),
        );

        self.db
            .get_referral(referral_id)?
            .ok_or(CareLinkError::NotFound("referral"))
    }

    /// Incoming worklist: most urgent first, then most recent.
    pub fn incoming(&self, ctx: &AuthContext) -> CareLinkResult<Vec<Referral>> {
        self.db.list_incoming_referrals(ctx.hospital_id)
    }

    /// Outgoing list: most recent first.
    pub fn outgoing(&self, ctx: &AuthContext) -> CareLinkResult<Vec<Referral>> {
        self.db.list_outgoing_referrals(ctx.hospital_id)
    }

    /// The referral's event timeline in insertion order.
    pub fn timeline(
        &self,
        ctx: &AuthContext,
        referral_id: Uuid,
    ) -> CareLinkResult<Vec<ReferralEvent>> {
        self.get(ctx, referral_id)?;
        self.db.list_referral_events(referral_id)
    }
}
