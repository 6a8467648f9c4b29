//! # CareLink Core
//!
//! Core business logic for the CareLink inter-hospital referral system.
//!
//! This crate contains the data and authorization layer:
//! - SQLite storage (`db`) with guarded status transitions and append-only
//!   audit/event tables
//! - Session tokens, password digests and the authorization guard (`auth`)
//! - Per-resource services (`services`) that enforce role allow-lists and
//!   hospital scoping before every read and write
//!
//! **No API concerns**: HTTP routing, token transport and OpenAPI belong in
//! `api-rest`; shared wire types live in `api-shared`.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod services;

pub use auth::{AuthContext, AuthService};
pub use config::{session_ttl_from_env_value, CoreConfig, DEFAULT_SESSION_TTL_SECS};
pub use db::Database;
pub use error::{CareLinkError, CareLinkResult};
pub use services::{
    AuditService, DepartmentService, DocumentService, EmergencyService, HospitalService,
    MessageService, PatientService, ReferralService, StaffService, TaskService,
};
