//! Cached derived artifacts, keyed by source identity.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use cppma_core::SourceId;

use crate::path::TokenView;

/// Token streams the analyser derived from one translation unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivedArtifact {
    /// Fully macro-expanded preprocessor tokens.
    pub pp_tokens: Vec<String>,
    /// Post-preprocessing token stream handed to the parser.
    pub tokens: Vec<String>,
}

impl DerivedArtifact {
    /// Flattened rendering of the requested view: the tokens joined by
    /// single spaces.
    pub fn render(&self, view: TokenView) -> String {
        let tokens = match view {
            TokenView::PpTokens => &self.pp_tokens,
            TokenView::Preprocessed => &self.tokens,
        };
        tokens.join(" ")
    }
}

/// Latest derived artifact per source document.
///
/// At most one artifact per source; an update replaces it wholesale. The map
/// is unbounded: artifacts leave only when the analyser disowns them via a
/// pending event. The open-document lifecycle lives elsewhere and never
/// evicts artifacts.
#[derive(Debug, Clone, Default)]
pub struct DerivedDocStore {
    inner: Arc<Mutex<HashMap<SourceId, DerivedArtifact>>>,
}

impl DerivedDocStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[track_caller]
    fn lock_inner(&self) -> MutexGuard<'_, HashMap<SourceId, DerivedArtifact>> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                let caller = std::panic::Location::caller();
                tracing::error!(
                    target = "cppma.vfs",
                    file = caller.file(),
                    line = caller.line(),
                    column = caller.column(),
                    "derived artifact mutex poisoned; continuing with recovered guard"
                );
                poisoned.into_inner()
            }
        }
    }

    pub fn insert(&self, source: SourceId, artifact: DerivedArtifact) {
        self.lock_inner().insert(source, artifact);
    }

    pub fn remove(&self, source: &SourceId) -> bool {
        self.lock_inner().remove(source).is_some()
    }

    pub fn get(&self, source: &SourceId) -> Option<DerivedArtifact> {
        self.lock_inner().get(source).cloned()
    }

    pub fn contains(&self, source: &SourceId) -> bool {
        self.lock_inner().contains_key(source)
    }

    pub fn len(&self) -> usize {
        self.lock_inner().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_inner().is_empty()
    }
}
