//! Ownership of temporary artifacts
//!
//! Every view or table a comparison creates is recorded here, in creation
//! order. Release drops them newest first, ignoring failures, and leaves
//! the ledger empty so a second release is a no-op.

use versus_core::log_artifact;
use versus_core_types::schema::{
    EVENT_ARTIFACT_DROPPED, EVENT_ARTIFACT_DROP_FAILED, EVENT_ARTIFACT_RECORDED,
};
use versus_core_types::{ArtifactKind, ArtifactName};
use versus_store::Substrate;

/// Artifacts created by one comparison, oldest first
#[derive(Debug, Default)]
pub struct ArtifactLedger {
    entries: Vec<(ArtifactName, ArtifactKind)>,
}

impl ArtifactLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, name: ArtifactName, kind: ArtifactKind) {
        log_artifact!(EVENT_ARTIFACT_RECORDED, name.as_str(), kind);
        self.entries.push((name, kind));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Drop every recorded artifact, newest first
    ///
    /// Drop failures are logged and skipped. Returns how many drops
    /// succeeded.
    pub fn release<S: Substrate + ?Sized>(&mut self, substrate: &S) -> usize {
        let mut dropped = 0;
        while let Some((name, kind)) = self.entries.pop() {
            match substrate.drop_artifact(name.as_str(), kind) {
                Ok(()) => {
                    log_artifact!(EVENT_ARTIFACT_DROPPED, name.as_str(), kind);
                    dropped += 1;
                }
                Err(err) => {
                    log_artifact!(EVENT_ARTIFACT_DROP_FAILED, name.as_str(), kind, error = %err);
                }
            }
        }
        dropped
    }
}
