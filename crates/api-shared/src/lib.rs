//! # API Shared
//!
//! Shared type definitions for the CareLink APIs.
//!
//! Contains:
//! - Domain entities and their status vocabularies (`types` module)
//! - Request/response bodies for the REST surface (`requests` module)
//! - Shared services like `HealthService`
//!
//! Used by `carelink-core` for storage-facing models and by `api-rest` for
//! the wire surface, so the two never drift apart.

pub mod health;
pub mod requests;
pub mod types;

pub use health::{HealthRes, HealthService};
pub use requests::*;
pub use types::*;
