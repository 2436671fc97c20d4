//! Workspace source enumeration.
//!
//! The analyser asks the client which documents exist in the workspace; the
//! answer is pure set algebra over two configured pattern lists: the union
//! of everything matched by the include patterns, minus the union of
//! everything matched by the exclude patterns. Pattern resolution goes
//! through an injectable search primitive so hosts can supply their own.

use std::collections::BTreeSet;
use std::io;
use std::path::PathBuf;

use cppma_core::SourceId;
use globset::Glob;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Debug, Error)]
pub enum SearchError {
    /// The pattern cannot be compiled. Enumeration degrades by skipping it.
    #[error("invalid file pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },
    /// The search root itself cannot be read. Enumeration fails as a whole.
    #[error("workspace root {root:?} is not searchable: {source}")]
    RootUnavailable {
        root: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// External search primitive resolving one glob-style pattern to matching
/// source documents.
///
/// Implementations are queried from several threads at once during an
/// enumeration and must not depend on call order.
pub trait DocumentSearch: Send + Sync {
    fn find_files(&self, pattern: &str) -> Result<Vec<SourceId>, SearchError>;
}

/// Searches a workspace root on the local file system.
///
/// Patterns are matched against paths relative to the root, with `**` and
/// `{a,b}` alternation supported.
#[derive(Debug, Clone)]
pub struct GlobSearch {
    root: PathBuf,
}

impl GlobSearch {
    pub fn new(root: impl Into<PathBuf>) -> GlobSearch {
        GlobSearch { root: root.into() }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    fn absolute_root(&self) -> Result<PathBuf, SearchError> {
        let root = if self.root.is_absolute() {
            self.root.clone()
        } else {
            let cwd = std::env::current_dir().map_err(|err| SearchError::RootUnavailable {
                root: self.root.clone(),
                source: err,
            })?;
            cwd.join(&self.root)
        };
        if let Err(err) = std::fs::metadata(&root) {
            return Err(SearchError::RootUnavailable { root, source: err });
        }
        Ok(root)
    }
}

impl DocumentSearch for GlobSearch {
    fn find_files(&self, pattern: &str) -> Result<Vec<SourceId>, SearchError> {
        let matcher = Glob::new(pattern)
            .map_err(|err| SearchError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: err.to_string(),
            })?
            .compile_matcher();
        let root = self.absolute_root()?;

        let mut out = Vec::new();
        for entry in WalkDir::new(&root).follow_links(true) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!(
                        target = "cppma.workspace",
                        error = %err,
                        "skipping unreadable directory entry"
                    );
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&root) else {
                continue;
            };
            if !matcher.is_match(relative) {
                continue;
            }
            if let Some(id) = SourceId::local(entry.path()) {
                out.push(id);
            }
        }
        Ok(out)
    }
}

/// Resolves the configured pattern lists into a deduplicated, sorted set of
/// source documents: the union of the include matches minus the union of the
/// exclude matches.
///
/// Pattern order never affects the result. An empty include list yields an
/// empty result; there is no implicit match-everything. Patterns that fail
/// to resolve contribute an empty set with a warning; only an unavailable
/// search root fails the enumeration itself.
pub fn enumerate(
    search: &dyn DocumentSearch,
    include: &[String],
    exclude: &[String],
) -> Result<Vec<SourceId>, SearchError> {
    if include.is_empty() {
        return Ok(Vec::new());
    }
    let (included, excluded) = resolve_pattern_sets(search, include, exclude)?;
    Ok(included.difference(&excluded).cloned().collect())
}

/// Resolves every pattern of both lists concurrently, one thread per
/// pattern, and combines the results only after all of them finished.
fn resolve_pattern_sets(
    search: &dyn DocumentSearch,
    include: &[String],
    exclude: &[String],
) -> Result<(BTreeSet<SourceId>, BTreeSet<SourceId>), SearchError> {
    let outcomes = std::thread::scope(|scope| {
        let mut handles = Vec::with_capacity(include.len() + exclude.len());
        for pattern in include {
            handles.push((false, pattern, scope.spawn(move || search.find_files(pattern))));
        }
        for pattern in exclude {
            handles.push((true, pattern, scope.spawn(move || search.find_files(pattern))));
        }
        handles
            .into_iter()
            .map(|(is_exclude, pattern, handle)| (is_exclude, pattern, handle.join()))
            .collect::<Vec<_>>()
    });

    let mut included = BTreeSet::new();
    let mut excluded = BTreeSet::new();
    for (is_exclude, pattern, joined) in outcomes {
        let target = if is_exclude { &mut excluded } else { &mut included };
        match joined {
            Ok(Ok(ids)) => target.extend(ids),
            Ok(Err(err @ SearchError::RootUnavailable { .. })) => return Err(err),
            Ok(Err(err)) => {
                tracing::warn!(
                    target = "cppma.workspace",
                    pattern = %pattern,
                    error = %err,
                    "skipping unresolvable file pattern"
                );
            }
            Err(_) => {
                tracing::error!(
                    target = "cppma.workspace",
                    pattern = %pattern,
                    "file pattern resolution panicked; treating it as empty"
                );
            }
        }
    }
    Ok((included, excluded))
}
