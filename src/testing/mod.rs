use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::PruneError;
use crate::prune::adapter::{AdapterBox, AdapterProvider, ResourceKindAdapter};
use crate::prune::catalogue::{catalogue, Kind, Phase};
use crate::types::{Candidate, RunConfig};

/// One remote call seen by a mock adapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub phase: Phase,
    pub kind: Kind,
    pub action: &'static str,
    pub id: Option<String>,
}

/// Shared, ordered record of calls across adapters
#[derive(Debug, Default)]
pub struct EventLog {
    events: Mutex<Vec<Event>>,
}

impl EventLog {
    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }
}

/// Scripted adapter: fixed listing, optional list failure, per-id delete
/// failures and an artificial delay to make concurrency observable
pub struct MockAdapter {
    kind: Kind,
    phase: Phase,
    log: Option<Arc<EventLog>>,
    candidates: Vec<Candidate>,
    fail_list: bool,
    fail_ids: HashSet<String>,
    delay: Duration,
    list_calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    deleted: Mutex<Vec<String>>,
    attempts: AtomicUsize,
}

impl MockAdapter {
    pub fn with_candidates(candidates: Vec<Candidate>) -> Self {
        Self {
            kind: Kind::Forms,
            phase: Phase::First,
            log: None,
            candidates,
            fail_list: false,
            fail_ids: HashSet::new(),
            delay: Duration::ZERO,
            list_calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            deleted: Mutex::new(Vec::new()),
            attempts: AtomicUsize::new(0),
        }
    }

    /// Candidates whose identifier is `<name>-id`
    pub fn with_names(names: &[&str]) -> Self {
        Self::with_candidates(
            names
                .iter()
                .map(|n| Candidate::new(*n, format!("{n}-id")))
                .collect(),
        )
    }

    pub fn empty() -> Self {
        Self::with_candidates(Vec::new())
    }

    pub fn failing_list() -> Self {
        Self {
            fail_list: true,
            ..Self::empty()
        }
    }

    pub fn fail_delete(mut self, id: &str) -> Self {
        self.fail_ids.insert(id.to_string());
        self
    }

    pub fn with_delay_ms(mut self, ms: u64) -> Self {
        self.delay = Duration::from_millis(ms);
        self
    }

    fn tagged(mut self, kind: Kind, log: Arc<EventLog>) -> Self {
        self.kind = kind;
        self.phase = catalogue()
            .iter()
            .find(|k| k.kind == kind)
            .map(|k| k.phase)
            .unwrap_or(Phase::First);
        self.log = Some(log);
        self
    }

    fn record(&self, action: &'static str, id: Option<&str>) {
        if let Some(log) = &self.log {
            log.push(Event {
                phase: self.phase,
                kind: self.kind,
                action,
                id: id.map(String::from),
            });
        }
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Identifiers successfully deleted, in completion order
    pub fn deleted_ids(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResourceKindAdapter for MockAdapter {
    async fn list(&self) -> Result<Vec<Candidate>, PruneError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.record("list", None);

        if self.fail_list {
            return Err(PruneError::list(self.kind.label(), "connection refused"));
        }
        Ok(self.candidates.clone())
    }

    async fn delete_one(&self, candidate: &Candidate, _config: &RunConfig) -> Result<(), PruneError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.record("delete", Some(&candidate.identifier));

        if self.fail_ids.contains(&candidate.identifier) {
            return Err(PruneError::delete(self.kind.label(), &candidate.identifier, "500 Internal Server Error"));
        }

        self.deleted.lock().unwrap().push(candidate.identifier.clone());
        Ok(())
    }
}

/// Provider backed by mock adapters; unregistered kinds list nothing
pub struct MockProvider {
    log: Arc<EventLog>,
    adapters: HashMap<Kind, Arc<MockAdapter>>,
}

impl MockProvider {
    pub fn new() -> Self {
        let log = Arc::new(EventLog::default());
        let adapters = Kind::ALL
            .into_iter()
            .map(|kind| (kind, Arc::new(MockAdapter::empty().tagged(kind, log.clone()))))
            .collect();
        Self { log, adapters }
    }

    pub fn with(mut self, kind: Kind, adapter: MockAdapter) -> Self {
        let adapter = adapter.tagged(kind, self.log.clone());
        self.adapters.insert(kind, Arc::new(adapter));
        self
    }

    pub fn log(&self) -> Arc<EventLog> {
        self.log.clone()
    }

    pub fn adapters(&self) -> HashMap<Kind, Arc<MockAdapter>> {
        self.adapters.clone()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl AdapterProvider for MockProvider {
    fn adapter(&self, kind: Kind) -> AdapterBox {
        match self.adapters.get(&kind) {
            Some(adapter) => adapter.clone() as AdapterBox,
            None => Arc::new(MockAdapter::empty().tagged(kind, self.log.clone())),
        }
    }
}
