//! Per-resource services.
//!
//! Each service wraps the shared [`Database`](crate::db::Database) and is the
//! authorization boundary: operations check the caller's role allow-list and
//! hospital scope first and fail without partial writes. Multi-row writes run
//! inside a transaction.

pub mod audit;
pub mod emergency;
pub mod hospitals;
pub mod messaging;
pub mod patients;
pub mod referrals;
pub mod staff;

pub use audit::AuditService;
pub use emergency::EmergencyService;
pub use hospitals::{DepartmentService, HospitalService};
pub use messaging::{MessageService, TaskService};
pub use patients::{DocumentService, PatientService};
pub use referrals::ReferralService;
pub use staff::StaffService;
