//! Domain entities and status vocabularies.
//!
//! Every status-bearing field uses one of the enums below; they serialise as
//! uppercase strings (`DOCTOR`, `SENT`, ...) on the wire and in storage. One
//! convention everywhere — lowercase variants are not accepted anywhere.
//!
//! Timestamps are RFC 3339 strings, matching the TEXT columns they are
//! stored in.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Staff role. Determines which operations a caller may perform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Doctor,
    Nurse,
    HospitalAdmin,
    SystemAdmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Doctor => "DOCTOR",
            Role::Nurse => "NURSE",
            Role::HospitalAdmin => "HOSPITAL_ADMIN",
            Role::SystemAdmin => "SYSTEM_ADMIN",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "DOCTOR" => Some(Role::Doctor),
            "NURSE" => Some(Role::Nurse),
            "HOSPITAL_ADMIN" => Some(Role::HospitalAdmin),
            "SYSTEM_ADMIN" => Some(Role::SystemAdmin),
            _ => None,
        }
    }
}

/// Connection status of a hospital in the referral network.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HospitalStatus {
    Connected,
    Pending,
    Inactive,
}

impl HospitalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HospitalStatus::Connected => "CONNECTED",
            HospitalStatus::Pending => "PENDING",
            HospitalStatus::Inactive => "INACTIVE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "CONNECTED" => Some(HospitalStatus::Connected),
            "PENDING" => Some(HospitalStatus::Pending),
            "INACTIVE" => Some(HospitalStatus::Inactive),
            _ => None,
        }
    }
}

/// Referral lifecycle state. `Sent` is the only non-terminal state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReferralStatus {
    Sent,
    Accepted,
    Rejected,
}

impl ReferralStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferralStatus::Sent => "SENT",
            ReferralStatus::Accepted => "ACCEPTED",
            ReferralStatus::Rejected => "REJECTED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "SENT" => Some(ReferralStatus::Sent),
            "ACCEPTED" => Some(ReferralStatus::Accepted),
            "REJECTED" => Some(ReferralStatus::Rejected),
            _ => None,
        }
    }

    /// Terminal states reject further transitions.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ReferralStatus::Sent)
    }
}

/// Referral urgency. Orders incoming worklists: emergencies surface first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReferralPriority {
    Normal,
    Urgent,
    Emergency,
}

impl ReferralPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferralPriority::Normal => "NORMAL",
            ReferralPriority::Urgent => "URGENT",
            ReferralPriority::Emergency => "EMERGENCY",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "NORMAL" => Some(ReferralPriority::Normal),
            "URGENT" => Some(ReferralPriority::Urgent),
            "EMERGENCY" => Some(ReferralPriority::Emergency),
            _ => None,
        }
    }
}

/// Event appended to a referral's immutable timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReferralEventType {
    Created,
    Accepted,
    Rejected,
}

impl ReferralEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferralEventType::Created => "CREATED",
            ReferralEventType::Accepted => "ACCEPTED",
            ReferralEventType::Rejected => "REJECTED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "CREATED" => Some(ReferralEventType::Created),
            "ACCEPTED" => Some(ReferralEventType::Accepted),
            "REJECTED" => Some(ReferralEventType::Rejected),
            _ => None,
        }
    }
}

/// Break-glass session state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmergencyStatus {
    Open,
    Closed,
}

impl EmergencyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmergencyStatus::Open => "OPEN",
            EmergencyStatus::Closed => "CLOSED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "OPEN" => Some(EmergencyStatus::Open),
            "CLOSED" => Some(EmergencyStatus::Closed),
            _ => None,
        }
    }
}

/// Task completion state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Pending,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::Done => "DONE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(TaskStatus::Pending),
            "DONE" => Some(TaskStatus::Done),
            _ => None,
        }
    }
}

/// A hospital participating in the referral network.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Hospital {
    pub id: Uuid,
    pub name: String,
    /// Free-text classification, e.g. "General", "Specialist".
    pub kind: String,
    pub location: String,
    pub status: HospitalStatus,
    pub specialties: Vec<String>,
    pub created_at: String,
}

/// Public staff profile. Credentials never leave the core crate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub hospital_id: Uuid,
    pub department: String,
    /// True while the account still holds an unconsumed invitation token.
    pub pending_activation: bool,
}

/// A patient record, owned by exactly one hospital.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Patient {
    pub id: Uuid,
    pub hospital_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: String,
    pub gender: String,
    pub blood_type: Option<String>,
    pub allergies: Option<String>,
    pub diagnosis: Option<String>,
    pub created_at: String,
}

/// A clinical note attached to a patient.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MedicalRecord {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub body: String,
    pub created_at: String,
}

/// Metadata for an uploaded document; the bytes live on disk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MedicalDocument {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub uploaded_by: Uuid,
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: u64,
    pub created_at: String,
}

/// A request to transfer clinical responsibility for a patient between
/// hospitals.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Referral {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub from_hospital_id: Uuid,
    pub to_hospital_id: Uuid,
    pub referring_doctor_id: Uuid,
    pub receiving_doctor_id: Option<Uuid>,
    pub status: ReferralStatus,
    pub priority: ReferralPriority,
    pub reason: String,
    pub notes: Option<String>,
    /// Whether the destination hospital may see the patient's documents.
    pub share_documents: bool,
    pub rejection_reason: Option<String>,
    pub created_at: String,
    pub resolved_at: Option<String>,
}

/// One entry in a referral's append-only timeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReferralEvent {
    pub id: Uuid,
    pub referral_id: Uuid,
    pub event_type: ReferralEventType,
    pub actor_id: Uuid,
    pub details: Option<String>,
    pub created_at: String,
}

/// Record of a break-glass access session, kept for after-the-fact review.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EmergencyAccessLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub patient_id: Uuid,
    pub reason: String,
    pub start_time: String,
    pub end_time: Option<String>,
    pub status: EmergencyStatus,
}

/// Append-only compliance record of a user action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AuditLogEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub action: String,
    pub resource: String,
    pub details: String,
    pub created_at: String,
}

/// A message between two staff members.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Message {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    pub subject: String,
    pub body: String,
    pub read: bool,
    pub created_at: String,
}

/// A work item assigned to a staff member.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Task {
    pub id: Uuid,
    pub hospital_id: Uuid,
    pub assignee_id: Uuid,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub due_date: Option<String>,
    pub created_at: String,
}

/// An organisational unit within a hospital.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Department {
    pub id: Uuid,
    pub hospital_id: Uuid,
    pub name: String,
    pub head_user_id: Option<Uuid>,
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_use_the_uppercase_convention() {
        for role in [
            Role::Doctor,
            Role::Nurse,
            Role::HospitalAdmin,
            Role::SystemAdmin,
        ] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        // The legacy lowercase spelling is not a valid role.
        assert_eq!(Role::parse("doctor"), None);
    }

    #[test]
    fn referral_terminal_states() {
        assert!(!ReferralStatus::Sent.is_terminal());
        assert!(ReferralStatus::Accepted.is_terminal());
        assert!(ReferralStatus::Rejected.is_terminal());
    }

    #[test]
    fn enums_serialise_as_uppercase_strings() {
        assert_eq!(
            serde_json::to_string(&Role::HospitalAdmin).unwrap(),
            "\"HOSPITAL_ADMIN\""
        );
        assert_eq!(
            serde_json::to_string(&ReferralPriority::Emergency).unwrap(),
            "\"EMERGENCY\""
        );
    }
}
