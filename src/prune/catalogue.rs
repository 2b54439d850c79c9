//! The resource kinds swept by a prune run, grouped into dependency phases.
//!
//! Phase 1 clears leaf artifacts that identity and infrastructure objects may
//! still reference. Phase 2 removes users and environments. Phase 3 tears down
//! the services and backends those environments provisioned.

use std::fmt;
use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::prune::matcher::CandidateFilter;
use crate::types::RunConfig;

/// SSH keys provisioned by the platform itself
pub const RESERVED_SSH_KEY_PREFIXES: &[&str] = &["openshift3_", "private_"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Projects,
    Teams,
    Forms,
    AuthPolicies,
    StoreItems,
    StoreItemGroups,
    SshKeys,
    Users,
    DataSources,
    Themes,
    Environments,
    AppStoreItems,
    Services,
    Mbaas,
}

impl Kind {
    pub const ALL: [Kind; 14] = [
        Kind::Projects,
        Kind::Teams,
        Kind::Forms,
        Kind::AuthPolicies,
        Kind::StoreItems,
        Kind::StoreItemGroups,
        Kind::SshKeys,
        Kind::Users,
        Kind::DataSources,
        Kind::Themes,
        Kind::Environments,
        Kind::AppStoreItems,
        Kind::Services,
        Kind::Mbaas,
    ];

    /// Singular label used in log lines
    pub fn label(&self) -> &'static str {
        match self {
            Kind::Projects => "Project",
            Kind::Teams => "Team",
            Kind::Forms => "Form",
            Kind::AuthPolicies => "Policy",
            Kind::StoreItems => "Store Item",
            Kind::StoreItemGroups => "Store Group",
            Kind::SshKeys => "SSH Key",
            Kind::Users => "User",
            Kind::DataSources => "Data Source",
            Kind::Themes => "Theme",
            Kind::Environments => "Environment",
            Kind::AppStoreItems => "App Store Item",
            Kind::Services => "Service",
            Kind::Mbaas => "Mbaas",
        }
    }

    /// Plural name used in reports
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Projects => "Projects",
            Kind::Teams => "Teams",
            Kind::Forms => "Forms",
            Kind::AuthPolicies => "Auth Policies",
            Kind::StoreItems => "Store Items",
            Kind::StoreItemGroups => "Store Item Groups",
            Kind::SshKeys => "SSH Keys",
            Kind::Users => "Users",
            Kind::DataSources => "Data Sources",
            Kind::Themes => "Themes",
            Kind::Environments => "Environments",
            Kind::AppStoreItems => "App Store Items",
            Kind::Services => "Services",
            Kind::Mbaas => "Mbaases",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    First = 1,
    Second = 2,
    Third = 3,
}

impl Phase {
    pub const ORDER: [Phase; 3] = [Phase::First, Phase::Second, Phase::Third];

    pub fn number(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::First => f.write_str("First"),
            Phase::Second => f.write_str("Second"),
            Phase::Third => f.write_str("Third"),
        }
    }
}

/// How many deletions of one kind may be in flight at once
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Concurrency {
    Unbounded,
    Limit(NonZeroUsize),
}

impl Concurrency {
    pub const SERIAL: Concurrency = Concurrency::Limit(NonZeroUsize::MIN);

    pub const fn limit(n: usize) -> Self {
        match NonZeroUsize::new(n) {
            Some(n) => Concurrency::Limit(n),
            None => Concurrency::SERIAL,
        }
    }

    /// Effective in-flight cap for a batch of `pending` deletions
    pub fn width(&self, pending: usize) -> usize {
        match self {
            Concurrency::Unbounded => pending.max(1),
            Concurrency::Limit(n) => n.get(),
        }
    }
}

impl fmt::Display for Concurrency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Concurrency::Unbounded => f.write_str("unbounded"),
            Concurrency::Limit(n) if n.get() == 1 => f.write_str("serial"),
            Concurrency::Limit(n) => write!(f, "{}", n),
        }
    }
}

/// Static description of how one kind is pruned
#[derive(Debug, Clone, Copy)]
pub struct ResourceKind {
    pub kind: Kind,
    pub phase: Phase,
    pub concurrency: Concurrency,
    pub filter: CandidateFilter,
    /// List and delete errors escape to the phase result instead of being absorbed
    pub phase_fatal: bool,
    pub enabled: fn(&RunConfig) -> bool,
}

impl ResourceKind {
    pub fn is_enabled(&self, config: &RunConfig) -> bool {
        (self.enabled)(config)
    }
}

fn always(_: &RunConfig) -> bool {
    true
}

fn not_openshift_online(config: &RunConfig) -> bool {
    !config.openshift_online
}

fn teams_available(config: &RunConfig) -> bool {
    !config.teams_disabled && !config.openshift_online
}

const fn entry(kind: Kind, phase: Phase, enabled: fn(&RunConfig) -> bool) -> ResourceKind {
    ResourceKind {
        kind,
        phase,
        concurrency: Concurrency::Unbounded,
        filter: CandidateFilter::prefix_only(),
        phase_fatal: false,
        enabled,
    }
}

/// The full kind table. Phase order is the order of `Phase::ORDER`; order
/// within a phase carries no meaning.
pub fn catalogue() -> Vec<ResourceKind> {
    vec![
        // Phase 1: leaf artifacts
        ResourceKind {
            concurrency: Concurrency::limit(2),
            filter: CandidateFilter::with_sample_projects(),
            ..entry(Kind::Projects, Phase::First, always)
        },
        entry(Kind::Teams, Phase::First, teams_available),
        entry(Kind::Forms, Phase::First, always),
        entry(Kind::AuthPolicies, Phase::First, not_openshift_online),
        entry(Kind::StoreItems, Phase::First, not_openshift_online),
        entry(Kind::StoreItemGroups, Phase::First, not_openshift_online),
        ResourceKind {
            filter: CandidateFilter::excluding(RESERVED_SSH_KEY_PREFIXES),
            ..entry(Kind::SshKeys, Phase::First, always)
        },
        // Phase 2: identity and environments
        entry(Kind::Users, Phase::Second, not_openshift_online),
        entry(Kind::DataSources, Phase::Second, always),
        entry(Kind::Themes, Phase::Second, always),
        ResourceKind {
            phase_fatal: true,
            ..entry(Kind::Environments, Phase::Second, always)
        },
        // The app store list is rewritten by every removal. Entries whose
        // store item went in phase 1 are removed regardless of name.
        ResourceKind {
            concurrency: Concurrency::SERIAL,
            filter: CandidateFilter::with_orphans(),
            ..entry(Kind::AppStoreItems, Phase::Second, not_openshift_online)
        },
        // Phase 3: provisioned infrastructure
        entry(Kind::Services, Phase::Third, always),
        entry(Kind::Mbaas, Phase::Third, always),
    ]
}

/// Catalogue entries belonging to one phase
pub fn phase_kinds(catalogue: &[ResourceKind], phase: Phase) -> Vec<ResourceKind> {
    catalogue.iter().filter(|k| k.phase == phase).copied().collect()
}
