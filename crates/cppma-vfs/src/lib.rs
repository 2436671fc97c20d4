//! Derived-document layer for the cppma client.
//!
//! The analyser pushes per-translation-unit token artifacts; the host reads
//! them back through virtual documents addressed by source + representation.
//! This crate owns that exchange: the artifact store, the virtual addressing
//! scheme, the set of currently open processed documents, and the change
//! notifications that tell the host to re-resolve an open document.

mod open_docs;
mod path;
mod store;

pub use open_docs::OpenProcessedDocs;
pub use path::{ProcessedPath, TokenView, PROCESSED_SCHEME};
pub use store::{DerivedArtifact, DerivedDocStore};

use cppma_core::SourceId;
use crossbeam_channel as channel;

/// A translation-unit push event, as applied to the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationUnitEvent {
    /// The analyser finished (re)processing the unit; this replaces any
    /// previous artifact wholesale.
    Update(DerivedArtifact),
    /// Recomputation is in flight (or preprocessing failed); the previous
    /// artifact must no longer be shown.
    Pending,
}

/// The derived-document cache.
///
/// Applies translation-unit events, resolves processed-document addresses to
/// rendered text, and emits one change notification per open address whose
/// source changed. Addresses nobody has open are never notified.
#[derive(Debug)]
pub struct DerivedDocs {
    store: DerivedDocStore,
    open_docs: OpenProcessedDocs,
    changes_tx: channel::Sender<ProcessedPath>,
    changes_rx: channel::Receiver<ProcessedPath>,
}

impl DerivedDocs {
    pub fn new() -> DerivedDocs {
        let (changes_tx, changes_rx) = channel::unbounded();
        DerivedDocs {
            store: DerivedDocStore::new(),
            open_docs: OpenProcessedDocs::new(),
            changes_tx,
            changes_rx,
        }
    }

    /// Change notifications for open processed documents. The host drains
    /// this receiver and re-resolves each address it is handed.
    pub fn changes(&self) -> &channel::Receiver<ProcessedPath> {
        &self.changes_rx
    }

    pub fn store(&self) -> &DerivedDocStore {
        &self.store
    }

    pub fn open_docs(&self) -> &OpenProcessedDocs {
        &self.open_docs
    }

    /// Applies a push event for `source`, then notifies every open address
    /// derived from it (each representation separately).
    pub fn on_translation_unit_event(&self, source: &SourceId, event: TranslationUnitEvent) {
        match event {
            TranslationUnitEvent::Update(artifact) => {
                self.store.insert(source.clone(), artifact);
            }
            TranslationUnitEvent::Pending => {
                if self.store.remove(source) {
                    tracing::debug!(
                        target = "cppma.vfs",
                        source = %source,
                        "dropped derived artifact pending recomputation"
                    );
                }
            }
        }
        for open in self.open_docs.snapshot() {
            if open.source() == source {
                let _ = self.changes_tx.send(open);
            }
        }
    }

    /// Resolves a processed-document address to its rendered text.
    ///
    /// A well-formed address is marked open even when no artifact exists
    /// yet, so that a later update notifies the host to re-resolve and pick
    /// up the now-available content. A malformed address is never tracked.
    pub fn resolve(&self, uri: &str) -> Option<String> {
        let path = ProcessedPath::parse_uri(uri)?;
        self.open_docs.open(path.clone());
        match self.store.get(path.source()) {
            Some(artifact) => Some(artifact.render(path.view())),
            None => {
                tracing::debug!(
                    target = "cppma.vfs",
                    uri,
                    "no derived artifact for processed document"
                );
                None
            }
        }
    }

    /// Host signal that a processed document was closed. Unconditional
    /// removal from the open set; unknown and malformed addresses are a
    /// no-op. This is the only eviction path for the open set.
    pub fn on_document_closed(&self, uri: &str) {
        if let Some(path) = ProcessedPath::parse_uri(uri) {
            self.open_docs.close(&path);
        }
    }
}

impl Default for DerivedDocs {
    fn default() -> Self {
        Self::new()
    }
}
