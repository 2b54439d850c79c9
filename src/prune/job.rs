use std::collections::HashSet;

use futures::stream::{self, StreamExt};
use serde::Serialize;

use crate::error::PruneError;
use crate::prune::adapter::AdapterBox;
use crate::prune::catalogue::{Kind, ResourceKind};
use crate::prune::matcher::MatchContext;
use crate::types::{Candidate, Outcome, RunConfig};

/// Summary of one kind's sweep
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobResult {
    pub kind: Kind,
    pub attempted: usize,
    pub failed: usize,
    /// Kind was disabled for this run and never contacted
    pub skipped: bool,
    pub deleted: Vec<String>,
    pub failures: Vec<String>,
    /// Only populated for phase-fatal kinds
    #[serde(skip)]
    pub error: Option<PruneError>,
}

impl JobResult {
    pub fn empty(kind: Kind) -> Self {
        Self {
            kind,
            attempted: 0,
            failed: 0,
            skipped: false,
            deleted: Vec::new(),
            failures: Vec::new(),
            error: None,
        }
    }

    pub fn skipped(kind: Kind) -> Self {
        Self {
            skipped: true,
            ..Self::empty(kind)
        }
    }

    fn list_failed(kind: Kind, error: Option<PruneError>) -> Self {
        Self {
            error,
            ..Self::empty(kind)
        }
    }

    fn from_outcomes(kind: Kind, outcomes: Vec<(Candidate, Outcome)>, phase_fatal: bool) -> Self {
        let mut result = Self::empty(kind);
        result.attempted = outcomes.len();

        for (candidate, outcome) in outcomes {
            match outcome {
                Outcome::Success => result.deleted.push(candidate.display_name),
                Outcome::Failure(err) => {
                    result.failed += 1;
                    result.failures.push(candidate.display_name);
                    if phase_fatal && result.error.is_none() {
                        result.error = Some(err);
                    }
                }
            }
        }

        result
    }

    pub fn succeeded(&self) -> usize {
        self.attempted - self.failed
    }
}

/// One kind's sweep: list, filter, then delete with the kind's concurrency cap
pub struct PruneJob {
    spec: ResourceKind,
    adapter: AdapterBox,
}

impl PruneJob {
    pub fn new(spec: ResourceKind, adapter: AdapterBox) -> Self {
        Self { spec, adapter }
    }

    pub fn kind(&self) -> Kind {
        self.spec.kind
    }

    /// Run the sweep. Never fails; errors end up in the returned counts, and
    /// in `JobResult::error` when the kind is phase-fatal.
    pub async fn run(&self, config: &RunConfig, username: Option<&str>) -> JobResult {
        let kind = self.spec.kind;

        if !self.spec.is_enabled(config) {
            tracing::info!("Skipping {}: disabled for this run", kind);
            return JobResult::skipped(kind);
        }

        tracing::info!("Deleting {}", kind);

        let listed = match self.adapter.list().await {
            Ok(candidates) => candidates,
            Err(err) => {
                tracing::error!("Error fetching {}: {}", kind, err);
                return JobResult::list_failed(kind, self.spec.phase_fatal.then_some(err));
            }
        };

        let matched = self.select(listed, config, username);
        tracing::debug!("{}: {} candidate(s) matched prefix '{}'", kind, matched.len(), config.prefix);

        let width = self.spec.concurrency.width(matched.len());
        let adapter = &self.adapter;
        let label = kind.label();

        let outcomes: Vec<(Candidate, Outcome)> = stream::iter(matched)
            .map(move |candidate| async move {
                tracing::info!("Deleting {}: {} {}", label, candidate.display_name, candidate.identifier);

                let outcome = Outcome::from(adapter.delete_one(&candidate, config).await);
                match &outcome {
                    Outcome::Success => tracing::info!(
                        "Deleted {} OK: {} {}",
                        label, candidate.display_name, candidate.identifier
                    ),
                    Outcome::Failure(err) => tracing::error!(
                        "Error Deleting {}: {} {} {}",
                        label, err, candidate.display_name, candidate.identifier
                    ),
                }

                (candidate, outcome)
            })
            .buffer_unordered(width)
            .collect()
            .await;

        let result = JobResult::from_outcomes(kind, outcomes, self.spec.phase_fatal);
        tracing::info!(
            "Finished {}: attempted={}, failed={}",
            kind, result.attempted, result.failed
        );
        result
    }

    /// Apply the kind's filter and drop repeated identifiers
    fn select(&self, listed: Vec<Candidate>, config: &RunConfig, username: Option<&str>) -> Vec<Candidate> {
        let ctx = MatchContext {
            prefix: &config.prefix,
            username,
        };
        let mut seen = HashSet::new();

        listed
            .into_iter()
            .filter(|c| self.spec.filter.admits(c, &ctx))
            .filter(|c| seen.insert(c.identifier.clone()))
            .collect()
    }
}
