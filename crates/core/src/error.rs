#[derive(Debug, thiserror::Error)]
pub enum CareLinkError {
    /// No usable session: missing, forged or expired token, or bad
    /// credentials. Always reported identically to the caller.
    #[error("unauthorized")]
    Unauthorized,
    /// The caller is authenticated but the operation's role allow-list or
    /// hospital scope refuses them.
    #[error("forbidden")]
    Forbidden,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("invalid input: {0}")]
    Validation(String),
    /// A guarded status change did not apply because the row is no longer in
    /// the expected state (terminal referral, closed break-glass session,
    /// completed task).
    #[error("invalid transition: {0}")]
    InvalidTransition(String),
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to create storage directory: {0}")]
    StorageDirCreation(std::io::Error),
    #[error("failed to write document file: {0}")]
    FileWrite(std::io::Error),
}

pub type CareLinkResult<T> = std::result::Result<T, CareLinkError>;
