//! View coordination for the module views.
//!
//! The host shows one tree surface with three switchable modes (basic module
//! info, imports, importees). All three observe the same committed graph, so
//! a single staleness message is broadcast to every mode whenever the
//! analyser reports progress or failure; the active mode mirrors it onto the
//! visible surface immediately, inactive modes pick it up on activation.

use cppma_modules::{ModuleGraph, ModulesStore, TranslationUnitEntry};

/// Shown when the analyser reports it has no usable graph; the last good
/// graph stays on display underneath it.
pub const STALE_MESSAGE: &str =
    "⚠️ Below modules information is stale. Fix items in Problems window to refresh.";

const PENDING_BASE: &str = "Recalculating...";
const PENDING_OUTDATED_PREFIX: &str = "⚠️ Below modules information is out of date. ";

/// The pending text depends on whether committed data is already on display:
/// a first computation shows the bare text, a recomputation warns that the
/// displayed data is about to be replaced.
pub fn pending_message(has_committed_data: bool) -> String {
    if has_committed_data {
        format!("{PENDING_OUTDATED_PREFIX}{PENDING_BASE}")
    } else {
        PENDING_BASE.to_string()
    }
}

/// The closed set of module views. Exactly one is visible at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewModeId {
    Modules,
    Importers,
    Importees,
}

impl ViewModeId {
    pub const ALL: [ViewModeId; 3] = [
        ViewModeId::Modules,
        ViewModeId::Importers,
        ViewModeId::Importees,
    ];

    /// Name shown on the view surface while the mode is visible.
    pub fn display_name(self) -> &'static str {
        match self {
            ViewModeId::Modules => "Basic Info",
            ViewModeId::Importers => "Imports",
            ViewModeId::Importees => "Importees",
        }
    }

    /// Short name for mode pickers.
    pub fn label(self) -> &'static str {
        match self {
            ViewModeId::Modules => "Modules",
            ViewModeId::Importers => "Importers",
            ViewModeId::Importees => "Importees",
        }
    }

    /// One-line description for mode pickers.
    pub fn detail(self) -> &'static str {
        match self {
            ViewModeId::Modules => "Basic module information",
            ViewModeId::Importers => "Tree of module imports",
            ViewModeId::Importees => "Tree of module importees",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// A module-graph push event, as applied to the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModulesEvent {
    /// A finished analysis pass. `modules` is absent when the analyser could
    /// not produce a usable graph; the committed graph is then left alone
    /// and only the staleness message changes.
    Update {
        modules: Option<ModuleGraph>,
        translation_units: Option<Vec<TranslationUnitEntry>>,
    },
    /// Recomputation is in flight.
    Pending,
}

/// The host's visible view surface.
///
/// `Provider` is the host's presentation-provider handle; the coordinator
/// stores one per mode and hands it back on activation without inspecting
/// it.
pub trait ViewSurface {
    type Provider;

    /// Switch the surface to a mode: display name, current message, and the
    /// mode's presentation provider.
    fn present(&mut self, display_name: &str, message: Option<&str>, provider: &Self::Provider);

    /// Update the message of the currently presented mode in place.
    fn set_message(&mut self, message: Option<&str>);
}

#[derive(Debug)]
struct ViewModeState<P> {
    display_name: &'static str,
    provider: P,
    message: Option<String>,
}

/// One presentation provider per view mode, handed to the coordinator at
/// construction.
#[derive(Debug, Clone)]
pub struct ViewProviders<P> {
    pub modules: P,
    pub importers: P,
    pub importees: P,
}

/// Owns the view-mode table and the staleness state machine.
///
/// Every event writes one shared message value to all mode records through
/// a single broadcast, so the three stored messages are identical after any
/// event.
#[derive(Debug)]
pub struct ViewCoordinator<S: ViewSurface> {
    store: ModulesStore,
    modes: [ViewModeState<S::Provider>; 3],
    active: ViewModeId,
    surface: S,
}

impl<S: ViewSurface> ViewCoordinator<S> {
    /// Builds the coordinator and mirrors the initial mode (Modules) onto
    /// the surface. A fresh store is empty, so the initial message is the
    /// first-computation pending text.
    pub fn new(store: ModulesStore, surface: S, providers: ViewProviders<S::Provider>) -> Self {
        let initial = pending_message(!store.is_empty());
        let modes = [
            ViewModeState {
                display_name: ViewModeId::Modules.display_name(),
                provider: providers.modules,
                message: Some(initial.clone()),
            },
            ViewModeState {
                display_name: ViewModeId::Importers.display_name(),
                provider: providers.importers,
                message: Some(initial.clone()),
            },
            ViewModeState {
                display_name: ViewModeId::Importees.display_name(),
                provider: providers.importees,
                message: Some(initial),
            },
        ];
        let mut coordinator = ViewCoordinator {
            store,
            modes,
            active: ViewModeId::Modules,
            surface,
        };
        coordinator.present_active();
        coordinator
    }

    pub fn active_mode(&self) -> ViewModeId {
        self.active
    }

    /// The stored staleness message for a mode, whether or not it is active.
    pub fn message(&self, mode: ViewModeId) -> Option<&str> {
        self.modes[mode.index()].message.as_deref()
    }

    pub fn store(&self) -> &ModulesStore {
        &self.store
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Switches the visible surface to `mode`: its display name, its stored
    /// message (possibly fresh/`None`), and its provider. Strict no-op when
    /// `mode` is already active, so re-selecting never re-renders.
    pub fn activate(&mut self, mode: ViewModeId) {
        if self.active == mode {
            return;
        }
        self.active = mode;
        self.present_active();
    }

    /// Applies a module-graph push event: commits the graph when one is
    /// present and broadcasts the resulting staleness message to every mode.
    pub fn on_modules_event(&mut self, event: ModulesEvent) {
        let message = match event {
            ModulesEvent::Update {
                modules: Some(graph),
                translation_units,
            } => {
                tracing::debug!(
                    target = "cppma.views",
                    modules = graph.len(),
                    "committing module graph"
                );
                self.store
                    .update(graph, translation_units.unwrap_or_default());
                None
            }
            ModulesEvent::Update { modules: None, .. } => Some(STALE_MESSAGE.to_string()),
            ModulesEvent::Pending => Some(pending_message(!self.store.is_empty())),
        };
        self.broadcast_message(message);
    }

    fn present_active(&mut self) {
        let state = &self.modes[self.active.index()];
        self.surface
            .present(state.display_name, state.message.as_deref(), &state.provider);
    }

    /// Single write path for staleness: every mode record gets the same
    /// value, and the active mode pushes it to the surface.
    fn broadcast_message(&mut self, message: Option<String>) {
        for state in &mut self.modes {
            state.message = message.clone();
        }
        self.surface.set_message(message.as_deref());
    }
}
