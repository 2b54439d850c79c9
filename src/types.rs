/// Shared types used across the codebase

use serde::{Deserialize, Serialize};

use crate::error::PruneError;

/// Settings for a single prune run. Built once and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Lowercased resource name prefix
    pub prefix: String,
    pub teams_disabled: bool,
    pub openshift_online: bool,
    /// Only consumed by environment deletion
    pub auth_token: Option<String>,
}

impl RunConfig {
    /// Validate and lowercase the prefix. A blank prefix would match every
    /// resource on the platform, so it is rejected. Surrounding whitespace is
    /// kept: it is part of what names must start with.
    pub fn new(prefix: &str) -> Result<Self, PruneError> {
        if prefix.trim().is_empty() {
            return Err(PruneError::config("prefix must not be empty"));
        }

        Ok(Self {
            prefix: prefix.to_lowercase(),
            teams_disabled: false,
            openshift_online: false,
            auth_token: None,
        })
    }

    pub fn with_teams_disabled(mut self, teams_disabled: bool) -> Self {
        self.teams_disabled = teams_disabled;
        self
    }

    pub fn with_openshift_online(mut self, openshift_online: bool) -> Self {
        self.openshift_online = openshift_online;
        self
    }

    pub fn with_auth_token(mut self, token: Option<String>) -> Self {
        self.auth_token = token.filter(|t| !t.is_empty());
        self
    }

    /// Token for calls that require one, empty when none was supplied
    pub fn token_or_empty(&self) -> &str {
        self.auth_token.as_deref().unwrap_or("")
    }
}

/// A remote resource that may be deleted
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Candidate {
    pub display_name: String,
    /// Opaque identifier handed back to the delete call (guid, username, ...)
    pub identifier: String,
    /// The record this entry points at no longer exists
    #[serde(default)]
    pub orphaned: bool,
}

impl Candidate {
    pub fn new(display_name: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            identifier: identifier.into(),
            orphaned: false,
        }
    }

    /// Entry whose backing record is gone; named by its identifier
    pub fn orphan(identifier: impl Into<String>) -> Self {
        let identifier = identifier.into();
        Self {
            display_name: identifier.clone(),
            identifier,
            orphaned: true,
        }
    }
}

/// Result of one delete attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure(PruneError),
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure(_))
    }
}

impl From<Result<(), PruneError>> for Outcome {
    fn from(result: Result<(), PruneError>) -> Self {
        match result {
            Ok(()) => Outcome::Success,
            Err(err) => Outcome::Failure(err),
        }
    }
}
