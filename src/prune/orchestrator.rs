use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::Instrument;

use crate::error::PruneError;
use crate::prune::adapter::AdapterProvider;
use crate::prune::catalogue::{self, Phase, ResourceKind};
use crate::prune::job::PruneJob;
use crate::prune::phase::{PhaseResult, PhaseRunner};
use crate::types::RunConfig;

/// Resolves the username whose sample projects are also pruned
#[async_trait]
pub trait CurrentUser: Send + Sync {
    async fn username(&self) -> Option<String>;
}

/// Fixed username, or none at all
#[derive(Debug, Clone, Default)]
pub struct StaticUser(pub Option<String>);

#[async_trait]
impl CurrentUser for StaticUser {
    async fn username(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Everything one run did, phase by phase
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub prefix: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub phases: Vec<PhaseResult>,
}

impl RunResult {
    /// The run-level error: the first phase-fatal error in phase order
    pub fn error(&self) -> Option<&PruneError> {
        self.phases.iter().find_map(|p| p.error.as_ref())
    }

    pub fn is_success(&self) -> bool {
        self.error().is_none()
    }

    /// (attempted, failed) across all phases
    pub fn totals(&self) -> (usize, usize) {
        self.phases
            .iter()
            .fold((0, 0), |(a, f), p| (a + p.attempted(), f + p.failed()))
    }

    pub fn into_result(self) -> Result<RunResult, PruneError> {
        match self.error().cloned() {
            Some(err) => Err(err),
            None => Ok(self),
        }
    }
}

/// Runs the catalogue phase by phase. A phase only starts once every job of
/// the previous one has returned.
pub struct Orchestrator {
    provider: Arc<dyn AdapterProvider>,
    user: Arc<dyn CurrentUser>,
    catalogue: Vec<ResourceKind>,
}

impl Orchestrator {
    pub fn new(provider: Arc<dyn AdapterProvider>, user: Arc<dyn CurrentUser>) -> Self {
        Self {
            provider,
            user,
            catalogue: catalogue::catalogue(),
        }
    }

    /// Replace the kind table, mostly for tests
    pub fn with_catalogue(mut self, catalogue: Vec<ResourceKind>) -> Self {
        self.catalogue = catalogue;
        self
    }

    pub fn catalogue(&self) -> &[ResourceKind] {
        &self.catalogue
    }

    /// Execute all three phases. Always runs to the end; the returned future
    /// resolving is the completion signal.
    #[must_use = "the run result carries the environment deletion error"]
    pub async fn execute(&self, config: &RunConfig) -> RunResult {
        let span = tracing::info_span!("prune_run", prefix = %config.prefix);
        self.execute_phases(config).instrument(span).await
    }

    async fn execute_phases(&self, config: &RunConfig) -> RunResult {
        let started_at = Utc::now();
        tracing::info!("Cleanup prefix: {}", config.prefix);

        let username = self.user.username().await;
        match &username {
            Some(user) => tracing::debug!("Sample projects of '{}' will be pruned", user),
            None => tracing::debug!("No current user, sample project rule disabled"),
        }

        let mut phases = Vec::with_capacity(Phase::ORDER.len());
        for phase in Phase::ORDER {
            let runner = self.runner(phase);
            phases.push(runner.run(config, username.as_deref()).await);
        }

        let result = RunResult {
            prefix: config.prefix.clone(),
            started_at,
            finished_at: Utc::now(),
            phases,
        };

        let (attempted, failed) = result.totals();
        match result.error() {
            Some(err) => tracing::error!(
                "Cleanup finished with error: {} (attempted={}, failed={})",
                err, attempted, failed
            ),
            None => tracing::info!("Cleanup finished: attempted={}, failed={}", attempted, failed),
        }

        result
    }

    fn runner(&self, phase: Phase) -> PhaseRunner {
        let jobs = catalogue::phase_kinds(&self.catalogue, phase)
            .into_iter()
            .map(|spec| PruneJob::new(spec, self.provider.adapter(spec.kind)))
            .collect();
        PhaseRunner::new(phase, jobs)
    }
}
