use std::sync::Arc;

use async_trait::async_trait;

use crate::error::PruneError;
use crate::prune::catalogue::Kind;
use crate::types::{Candidate, RunConfig};

/// Remote operations for one resource kind
#[async_trait]
pub trait ResourceKindAdapter: Send + Sync {
    /// Fetch every resource of this kind, matching or not
    async fn list(&self) -> Result<Vec<Candidate>, PruneError>;

    /// Delete a single resource. A returned error is recorded as a failed
    /// outcome and never aborts sibling deletions.
    async fn delete_one(&self, candidate: &Candidate, config: &RunConfig) -> Result<(), PruneError>;
}

pub type AdapterBox = Arc<dyn ResourceKindAdapter>;

/// Hands out the adapter backing each catalogue kind
pub trait AdapterProvider: Send + Sync {
    fn adapter(&self, kind: Kind) -> AdapterBox;
}
