//! Request handlers, grouped by resource.
//!
//! Every protected handler follows the same shape: resolve the bearer token
//! through [`authorize`](crate::authorize), hold the database lock for one
//! core service call, and return the body wrapped in
//! [`Authed`](crate::Authed) so the refreshed token rides along.

pub mod auth;
pub mod emergency;
pub mod hospitals;
pub mod messaging;
pub mod patients;
pub mod referrals;
pub mod staff;

use axum::extract::State;
use axum::response::Json;

use api_shared::{HealthRes, HealthService};

use crate::AppState;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint, used for monitoring and load balancer checks.
#[axum::debug_handler]
pub async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}
