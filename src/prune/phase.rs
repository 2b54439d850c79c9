use futures::future::join_all;
use serde::Serialize;
use tracing::Instrument;

use crate::error::PruneError;
use crate::prune::catalogue::Phase;
use crate::prune::job::{JobResult, PruneJob};
use crate::types::RunConfig;

/// Outcome of every job in one phase
#[derive(Debug, Clone, Serialize)]
pub struct PhaseResult {
    pub phase: Phase,
    pub jobs: Vec<JobResult>,
    /// First error reported by a phase-fatal job
    #[serde(skip)]
    pub error: Option<PruneError>,
}

impl PhaseResult {
    pub fn attempted(&self) -> usize {
        self.jobs.iter().map(|j| j.attempted).sum()
    }

    pub fn failed(&self) -> usize {
        self.jobs.iter().map(|j| j.failed).sum()
    }
}

/// Fan-out/fan-in over the jobs of a phase
pub struct PhaseRunner {
    phase: Phase,
    jobs: Vec<PruneJob>,
}

impl PhaseRunner {
    pub fn new(phase: Phase, jobs: Vec<PruneJob>) -> Self {
        Self { phase, jobs }
    }

    /// Start every job at once and wait for all of them. A failing job never
    /// cancels its siblings; a phase-fatal error only shows up in the result.
    pub async fn run(&self, config: &RunConfig, username: Option<&str>) -> PhaseResult {
        tracing::info!("{} phase starting with {} job(s)", self.phase, self.jobs.len());

        let jobs = self.jobs.iter().map(|job| {
            let span = tracing::info_span!("prune_job", kind = %job.kind());
            job.run(config, username).instrument(span)
        });
        let results = join_all(jobs).await;

        let error = results.iter().find_map(|r| r.error.clone());
        if let Some(err) = &error {
            tracing::error!("{} phase failed: {}", self.phase, err);
        }

        tracing::info!("{} phase complete", self.phase);

        PhaseResult {
            phase: self.phase,
            jobs: results,
            error,
        }
    }
}
