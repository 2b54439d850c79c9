//! Name matching for prune candidates.

use crate::types::Candidate;

/// Case-insensitive prefix test. Empty names never panic, they simply fail to
/// match any non-empty prefix.
pub fn matches(name: &str, prefix: &str) -> bool {
    name.to_lowercase().starts_with(&prefix.to_lowercase())
}

/// Sample projects are created per user as "Sample Project <username>..."
pub fn is_sample_project_of(name: &str, username: &str) -> bool {
    let needle = format!("sample project {}", username.to_lowercase());
    name.to_lowercase().contains(&needle)
}

/// Inputs shared by every filter evaluation in one run
#[derive(Debug, Clone, Copy)]
pub struct MatchContext<'a> {
    pub prefix: &'a str,
    pub username: Option<&'a str>,
}

/// Per-kind selection rules layered on top of the prefix test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateFilter {
    /// Also accept the current user's sample projects
    pub sample_projects: bool,
    /// Names starting with any of these are never deleted (case-sensitive)
    pub reserved_prefixes: &'static [&'static str],
    /// Accept entries whose backing record is already gone, whatever their name
    pub orphans: bool,
}

impl CandidateFilter {
    pub const fn prefix_only() -> Self {
        Self {
            sample_projects: false,
            reserved_prefixes: &[],
            orphans: false,
        }
    }

    pub const fn with_sample_projects() -> Self {
        Self {
            sample_projects: true,
            reserved_prefixes: &[],
            orphans: false,
        }
    }

    pub const fn excluding(reserved_prefixes: &'static [&'static str]) -> Self {
        Self {
            sample_projects: false,
            reserved_prefixes,
            orphans: false,
        }
    }

    pub const fn with_orphans() -> Self {
        Self {
            sample_projects: false,
            reserved_prefixes: &[],
            orphans: true,
        }
    }

    /// Name rules, plus orphaned entries when the kind sweeps them
    pub fn admits(&self, candidate: &Candidate, ctx: &MatchContext<'_>) -> bool {
        (self.orphans && candidate.orphaned) || self.accepts(&candidate.display_name, ctx)
    }

    pub fn accepts(&self, name: &str, ctx: &MatchContext<'_>) -> bool {
        if self
            .reserved_prefixes
            .iter()
            .any(|reserved| name.starts_with(reserved))
        {
            return false;
        }

        if matches(name, ctx.prefix) {
            return true;
        }

        match (self.sample_projects, ctx.username) {
            (true, Some(user)) if !user.is_empty() => is_sample_project_of(name, user),
            _ => false,
        }
    }
}

impl Default for CandidateFilter {
    fn default() -> Self {
        Self::prefix_only()
    }
}
