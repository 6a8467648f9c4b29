//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into
//! core services. No environment variables are read during request handling,
//! which keeps behaviour consistent across multi-threaded runtimes and test
//! harnesses.

use crate::{CareLinkError, CareLinkResult};
use std::path::{Path, PathBuf};

/// Default sliding session lifetime: 24 hours.
pub const DEFAULT_SESSION_TTL_SECS: i64 = 24 * 60 * 60;

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    database_path: PathBuf,
    document_dir: PathBuf,
    session_secret: Vec<u8>,
    session_ttl_secs: i64,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// The session secret signs every session token, so a trivially short
    /// secret is rejected outright.
    pub fn new(
        database_path: PathBuf,
        document_dir: PathBuf,
        session_secret: Vec<u8>,
        session_ttl_secs: i64,
    ) -> CareLinkResult<Self> {
        if session_secret.len() < 16 {
            return Err(CareLinkError::Validation(
                "session secret must be at least 16 bytes".into(),
            ));
        }
        if session_ttl_secs <= 0 {
            return Err(CareLinkError::Validation(
                "session TTL must be positive".into(),
            ));
        }

        Ok(Self {
            database_path,
            document_dir,
            session_secret,
            session_ttl_secs,
        })
    }

    pub fn database_path(&self) -> &Path {
        &self.database_path
    }

    pub fn document_dir(&self) -> &Path {
        &self.document_dir
    }

    pub fn session_secret(&self) -> &[u8] {
        &self.session_secret
    }

    pub fn session_ttl_secs(&self) -> i64 {
        self.session_ttl_secs
    }
}

/// Parse the session TTL from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns
/// [`DEFAULT_SESSION_TTL_SECS`].
pub fn session_ttl_from_env_value(value: Option<String>) -> CareLinkResult<i64> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    match value {
        None => Ok(DEFAULT_SESSION_TTL_SECS),
        Some(v) => {
            let secs: i64 = v.parse().map_err(|_| {
                CareLinkError::Validation(format!("invalid session TTL: {v:?}"))
            })?;
            if secs <= 0 {
                return Err(CareLinkError::Validation(
                    "session TTL must be positive".into(),
                ));
            }
            Ok(secs)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_secret(secret: &[u8]) -> CareLinkResult<CoreConfig> {
        CoreConfig::new(
            PathBuf::from("carelink.db"),
            PathBuf::from("document_data"),
            secret.to_vec(),
            DEFAULT_SESSION_TTL_SECS,
        )
    }

    #[test]
    fn rejects_short_session_secret() {
        assert!(config_with_secret(b"short").is_err());
        assert!(config_with_secret(b"0123456789abcdef").is_ok());
    }

    #[test]
    fn session_ttl_defaults_when_unset() {
        assert_eq!(
            session_ttl_from_env_value(None).unwrap(),
            DEFAULT_SESSION_TTL_SECS
        );
        assert_eq!(
            session_ttl_from_env_value(Some("  ".into())).unwrap(),
            DEFAULT_SESSION_TTL_SECS
        );
        assert_eq!(session_ttl_from_env_value(Some("600".into())).unwrap(), 600);
        assert!(session_ttl_from_env_value(Some("0".into())).is_err());
        assert!(session_ttl_from_env_value(Some("abc".into())).is_err());
    }
}
