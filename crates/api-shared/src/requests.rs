//! Request and response bodies for the REST surface.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::types::{
    HospitalStatus, ReferralPriority, Role, UserProfile,
};

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginReq {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRes {
    pub token: String,
    pub profile: UserProfile,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ActivateReq {
    pub invite_token: String,
    pub password: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateHospitalReq {
    pub name: String,
    pub kind: String,
    pub location: String,
    #[serde(default)]
    pub specialties: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct SetHospitalStatusReq {
    pub status: HospitalStatus,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct InviteStaffReq {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub department: String,
}

/// Response to a staff invitation. The token is shown once; the invitee
/// redeems it via `POST /api/auth/activate`.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct InviteStaffRes {
    pub user_id: Uuid,
    pub invite_token: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateDepartmentReq {
    pub name: String,
    pub head_user_id: Option<Uuid>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatePatientReq {
    pub first_name: String,
    pub last_name: String,
    pub birth_date: String,
    pub gender: String,
    pub blood_type: Option<String>,
    pub allergies: Option<String>,
    pub diagnosis: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdatePatientReq {
    pub blood_type: Option<String>,
    pub allergies: Option<String>,
    pub diagnosis: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct AddMedicalRecordReq {
    pub title: String,
    pub body: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateReferralReq {
    pub patient_id: Uuid,
    pub to_hospital_id: Uuid,
    pub priority: ReferralPriority,
    pub reason: String,
    pub notes: Option<String>,
    #[serde(default)]
    pub share_documents: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct RejectReferralReq {
    pub reason: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct OpenEmergencyAccessReq {
    pub patient_id: Uuid,
    pub reason: String,
}

/// Count of currently open break-glass sessions for the caller's hospital.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ActiveEmergencyCountRes {
    pub active: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct SendMessageReq {
    pub recipient_id: Uuid,
    pub subject: String,
    pub body: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateTaskReq {
    pub assignee_id: Uuid,
    pub title: String,
    pub description: String,
    pub due_date: Option<String>,
}
