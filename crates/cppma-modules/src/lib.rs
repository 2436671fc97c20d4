//! C++ modules model, as published by the analyser.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

/// Name of a C++ module as written in a module declaration, e.g. `app.core`
/// or the partition form `app.core:io`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleName(String);

impl ModuleName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Partition names carry a `:` separating the owning module.
    pub fn is_partition(&self) -> bool {
        self.0.contains(':')
    }

    /// The module a partition belongs to; the name itself for non-partitions.
    pub fn owning_module(&self) -> &str {
        match self.0.split_once(':') {
            Some((module, _)) => module,
            None => &self.0,
        }
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One module unit in the published graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleUnit {
    pub name: ModuleName,
    /// Source document providing the unit, when the analyser knows it.
    #[serde(default)]
    pub source: Option<String>,
    /// Modules this unit imports.
    #[serde(default)]
    pub imports: Vec<ModuleName>,
}

/// A translation unit as seen by the analyser. Ordinary translation units
/// have no `provides`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationUnitEntry {
    pub source: String,
    #[serde(default)]
    pub provides: Option<ModuleName>,
    #[serde(default)]
    pub imports: Vec<ModuleName>,
}

/// Module dependency graph published by one analysis pass.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleGraph {
    pub modules: Vec<ModuleUnit>,
}

impl ModuleGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn get(&self, name: &ModuleName) -> Option<&ModuleUnit> {
        self.modules.iter().find(|unit| &unit.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModuleUnit> {
        self.modules.iter()
    }
}

/// Shared handle to the last committed analysis result.
///
/// Every view observes the same store. [`ModulesStore::update`] replaces the
/// committed state wholesale and recomputes the importer index; a failed
/// recomputation never reaches this type, so the committed state is always
/// the last good one.
#[derive(Debug, Clone, Default)]
pub struct ModulesStore {
    inner: Arc<Mutex<StoreInner>>,
}

#[derive(Debug, Default)]
struct StoreInner {
    graph: ModuleGraph,
    translation_units: Vec<TranslationUnitEntry>,
    importers: HashMap<ModuleName, Vec<ModuleName>>,
}

impl ModulesStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[track_caller]
    fn lock_inner(&self) -> MutexGuard<'_, StoreInner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                let caller = std::panic::Location::caller();
                tracing::error!(
                    target = "cppma.modules",
                    file = caller.file(),
                    line = caller.line(),
                    column = caller.column(),
                    "modules store mutex poisoned; continuing with recovered guard"
                );
                poisoned.into_inner()
            }
        }
    }

    /// Replaces the committed graph and translation units wholesale.
    pub fn update(&self, graph: ModuleGraph, translation_units: Vec<TranslationUnitEntry>) {
        let importers = importer_index(&graph);
        let mut inner = self.lock_inner();
        inner.graph = graph;
        inner.translation_units = translation_units;
        inner.importers = importers;
    }

    /// True until the first update carrying any module or translation unit.
    pub fn is_empty(&self) -> bool {
        let inner = self.lock_inner();
        inner.graph.is_empty() && inner.translation_units.is_empty()
    }

    pub fn graph(&self) -> ModuleGraph {
        self.lock_inner().graph.clone()
    }

    pub fn translation_units(&self) -> Vec<TranslationUnitEntry> {
        self.lock_inner().translation_units.clone()
    }

    /// Modules this unit imports, per the committed graph.
    pub fn imports_of(&self, name: &ModuleName) -> Vec<ModuleName> {
        let inner = self.lock_inner();
        inner
            .graph
            .get(name)
            .map(|unit| unit.imports.clone())
            .unwrap_or_default()
    }

    /// Module units importing `name`, sorted and deduplicated.
    pub fn importers_of(&self, name: &ModuleName) -> Vec<ModuleName> {
        let inner = self.lock_inner();
        inner.importers.get(name).cloned().unwrap_or_default()
    }
}

fn importer_index(graph: &ModuleGraph) -> HashMap<ModuleName, Vec<ModuleName>> {
    let mut sets: HashMap<ModuleName, BTreeSet<ModuleName>> = HashMap::new();
    for unit in graph.iter() {
        for import in &unit.imports {
            sets.entry(import.clone())
                .or_default()
                .insert(unit.name.clone());
        }
    }
    sets.into_iter()
        .map(|(name, importers)| (name, importers.into_iter().collect()))
        .collect()
}
