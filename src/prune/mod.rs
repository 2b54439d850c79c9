//! Phased, concurrency-bounded pruning of prefix-named resources.
//!
//! `Orchestrator` → `PhaseRunner` (one per phase, sequential) → `PruneJob`
//! (one per kind, concurrent) → `ResourceKindAdapter` (remote calls).

pub mod adapter;
pub mod catalogue;
pub mod job;
pub mod matcher;
pub mod orchestrator;
pub mod phase;

pub use adapter::{AdapterBox, AdapterProvider, ResourceKindAdapter};
pub use catalogue::{catalogue, Concurrency, Kind, Phase, ResourceKind};
pub use job::{JobResult, PruneJob};
pub use matcher::{matches, CandidateFilter, MatchContext};
pub use orchestrator::{CurrentUser, Orchestrator, RunResult, StaticUser};
pub use phase::{PhaseResult, PhaseRunner};
