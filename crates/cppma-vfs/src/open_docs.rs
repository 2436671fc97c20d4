//! Tracks which processed documents the host currently has open.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::path::ProcessedPath;

/// Set of processed-document addresses with a live consumer.
///
/// Only addresses in this set receive change notifications; every other
/// address is inert even while its underlying artifact changes. Addresses
/// enter when the host resolves them and leave only on its close signal.
#[derive(Debug, Clone, Default)]
pub struct OpenProcessedDocs {
    inner: Arc<Mutex<HashSet<ProcessedPath>>>,
}

impl OpenProcessedDocs {
    pub fn new() -> Self {
        Self::default()
    }

    #[track_caller]
    fn lock_inner(&self) -> MutexGuard<'_, HashSet<ProcessedPath>> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                let caller = std::panic::Location::caller();
                tracing::error!(
                    target = "cppma.vfs",
                    file = caller.file(),
                    line = caller.line(),
                    column = caller.column(),
                    "open documents mutex poisoned; continuing with recovered guard"
                );
                poisoned.into_inner()
            }
        }
    }

    /// Returns `true` when the address was not open before.
    pub fn open(&self, path: ProcessedPath) -> bool {
        self.lock_inner().insert(path)
    }

    /// Returns `true` when the address was open.
    pub fn close(&self, path: &ProcessedPath) -> bool {
        self.lock_inner().remove(path)
    }

    pub fn is_open(&self, path: &ProcessedPath) -> bool {
        self.lock_inner().contains(path)
    }

    pub fn snapshot(&self) -> Vec<ProcessedPath> {
        self.lock_inner().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock_inner().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_inner().is_empty()
    }
}
