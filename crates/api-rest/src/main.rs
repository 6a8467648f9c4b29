//! CareLink REST API server binary.
//!
//! Resolves configuration from the environment once at startup, opens the
//! SQLite database, optionally bootstraps the first system administrator on
//! an empty database, and serves the router from `api_rest`.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{build_router, AppState};
use carelink_core::{session_ttl_from_env_value, AuthService, CoreConfig, Database};

/// Main entry point for the CareLink REST API server.
///
/// # Environment Variables
/// - `CARELINK_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `CARELINK_DB_PATH`: SQLite database file (default: "carelink.db")
/// - `CARELINK_DOCUMENT_DIR`: Uploaded document storage (default: "document_data")
/// - `CARELINK_SESSION_SECRET`: HMAC key for session tokens (required, ≥16 bytes)
/// - `CARELINK_SESSION_TTL_SECS`: Sliding session lifetime (default: 24h)
/// - `CARELINK_ADMIN_NAME` / `CARELINK_ADMIN_EMAIL` / `CARELINK_ADMIN_PASSWORD`:
///   if all three are set and the database is empty, the first system
///   administrator is created at startup.
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the configuration is incomplete or invalid,
/// - the database cannot be opened,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?)
                .add_directive("carelink_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("CARELINK_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let database_path = PathBuf::from(
        std::env::var("CARELINK_DB_PATH").unwrap_or_else(|_| "carelink.db".into()),
    );
    let document_dir = PathBuf::from(
        std::env::var("CARELINK_DOCUMENT_DIR").unwrap_or_else(|_| "document_data".into()),
    );
    let session_secret = std::env::var("CARELINK_SESSION_SECRET")
        .map_err(|_| anyhow::anyhow!("CARELINK_SESSION_SECRET must be set"))?
        .into_bytes();
    let session_ttl_secs =
        session_ttl_from_env_value(std::env::var("CARELINK_SESSION_TTL_SECS").ok())?;

    let cfg = Arc::new(CoreConfig::new(
        database_path,
        document_dir,
        session_secret,
        session_ttl_secs,
    )?);

    let db = Database::open(cfg.database_path())?;
    bootstrap_admin_from_env(&db, &cfg)?;

    let state = AppState {
        cfg,
        db: Arc::new(Mutex::new(db)),
    };

    tracing::info!("-- Starting CareLink REST API on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, build_router(state)).await?;

    Ok(())
}

/// Create the first system administrator if the admin env vars are set and
/// the database holds no users yet. A populated database is left untouched.
fn bootstrap_admin_from_env(db: &Database, cfg: &CoreConfig) -> anyhow::Result<()> {
    let (name, email, password) = match (
        std::env::var("CARELINK_ADMIN_NAME"),
        std::env::var("CARELINK_ADMIN_EMAIL"),
        std::env::var("CARELINK_ADMIN_PASSWORD"),
    ) {
        (Ok(name), Ok(email), Ok(password)) => (name, email, password),
        _ => return Ok(()),
    };

    match AuthService::new(db, cfg).bootstrap_system_admin(&name, &email, &password) {
        Ok(profile) => {
            tracing::info!("Bootstrapped system administrator {}", profile.email);
            Ok(())
        }
        Err(carelink_core::CareLinkError::Conflict(_)) => Ok(()),
        Err(e) => Err(e.into()),
    }
}
