// Prune error types
use thiserror::Error;

/// Errors raised while listing or deleting remote resources.
///
/// Every variant is recoverable inside a prune job. Only kinds flagged as
/// phase-fatal let one of these escape into the phase and run results.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PruneError {
    #[error("Error fetching {kind}: {reason}")]
    List { kind: String, reason: String },

    #[error("Error deleting {kind} '{id}': {reason}")]
    Delete {
        kind: String,
        id: String,
        reason: String,
    },

    #[error("Invalid {kind} response: {reason}")]
    InvalidResponse { kind: String, reason: String },

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl PruneError {
    pub fn list(kind: impl Into<String>, reason: impl Into<String>) -> Self {
        PruneError::List {
            kind: kind.into(),
            reason: reason.into(),
        }
    }

    pub fn delete(kind: impl Into<String>, id: impl Into<String>, reason: impl Into<String>) -> Self {
        PruneError::Delete {
            kind: kind.into(),
            id: id.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_response(kind: impl Into<String>, reason: impl Into<String>) -> Self {
        PruneError::InvalidResponse {
            kind: kind.into(),
            reason: reason.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        PruneError::Config(message.into())
    }

    /// Short machine-readable code for JSON reports
    pub fn error_code(&self) -> &'static str {
        match self {
            PruneError::List { .. } => "LIST_ERROR",
            PruneError::Delete { .. } => "DELETE_ERROR",
            PruneError::InvalidResponse { .. } => "INVALID_RESPONSE",
            PruneError::Http(_) => "HTTP_ERROR",
            PruneError::Config(_) => "CONFIG_ERROR",
        }
    }
}

// reqwest errors are not Clone, keep the rendered message only
impl From<reqwest::Error> for PruneError {
    fn from(err: reqwest::Error) -> Self {
        PruneError::Http(err.to_string())
    }
}
