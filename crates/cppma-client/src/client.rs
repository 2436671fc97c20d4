//! Client assembly: owns the three sync components and the dispatch that
//! feeds them from the wire.

use std::sync::Arc;

use cppma_core::SourceId;
use cppma_modules::ModulesStore;
use cppma_vfs::{DerivedArtifact, DerivedDocs, ProcessedPath, TokenView, TranslationUnitEvent};
use cppma_views::{ModulesEvent, ViewCoordinator, ViewModeId, ViewProviders, ViewSurface};
use cppma_workspace::{enumerate, DocumentSearch};

use crate::proto::{
    EnumerateWorkspaceFolderContentsParams, EnumerateWorkspaceFolderContentsResult,
    PublishModulesInfoParams, PublishTranslationUnitInfoParams, WorkspaceDocument,
};
use crate::{
    AnalyserConfig, ClientError, Result, ENUMERATE_WORKSPACE_FOLDER_CONTENTS_METHOD,
    PUBLISH_MODULES_INFO_METHOD, PUBLISH_TRANSLATION_UNIT_INFO_METHOD,
};

/// The editor-side face of the analyser: routes push notifications into the
/// view coordinator and the derived-document cache, serves enumeration
/// requests, and forwards the host's virtual-document lifecycle.
pub struct AnalyserClient<S: ViewSurface> {
    config: AnalyserConfig,
    views: ViewCoordinator<S>,
    docs: DerivedDocs,
    search: Arc<dyn DocumentSearch>,
}

impl<S: ViewSurface> AnalyserClient<S> {
    /// Assembles the client. The configuration is normalized on entry; use
    /// [`AnalyserClient::on_config_changed`] when the host needs the
    /// write-back signal for later settings updates.
    pub fn new(
        mut config: AnalyserConfig,
        surface: S,
        providers: ViewProviders<S::Provider>,
        search: Arc<dyn DocumentSearch>,
    ) -> AnalyserClient<S> {
        if config.normalize().is_some() {
            tracing::debug!(
                target = "cppma.client",
                "normalized sourceFileExtensions from host settings"
            );
        }
        AnalyserClient {
            config,
            views: ViewCoordinator::new(ModulesStore::new(), surface, providers),
            docs: DerivedDocs::new(),
            search,
        }
    }

    /// Routes one push notification from the analyser. Unknown methods and
    /// malformed payloads are logged and dropped; committed state stays as
    /// it was.
    pub fn handle_notification(&mut self, method: &str, params: serde_json::Value) {
        match method {
            PUBLISH_MODULES_INFO_METHOD => {
                match serde_json::from_value::<PublishModulesInfoParams>(params) {
                    Ok(params) => self.on_publish_modules_info(params),
                    Err(err) => warn_malformed(method, &err),
                }
            }
            PUBLISH_TRANSLATION_UNIT_INFO_METHOD => {
                match serde_json::from_value::<PublishTranslationUnitInfoParams>(params) {
                    Ok(params) => self.on_publish_translation_unit_info(params),
                    Err(err) => warn_malformed(method, &err),
                }
            }
            other => {
                tracing::debug!(
                    target = "cppma.client",
                    method = other,
                    "ignoring unknown notification"
                );
            }
        }
    }

    /// Serves one request from the analyser.
    pub fn handle_request(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value> {
        match method {
            ENUMERATE_WORKSPACE_FOLDER_CONTENTS_METHOD => {
                let params: EnumerateWorkspaceFolderContentsParams =
                    serde_json::from_value(params)
                        .map_err(|err| ClientError::InvalidParams(err.to_string()))?;
                let result = self.enumerate_workspace_folder_contents(&params)?;
                serde_json::to_value(result).map_err(|err| ClientError::Internal(err.to_string()))
            }
            other => Err(ClientError::MethodNotFound(other.to_string())),
        }
    }

    /// Resolves the configured include/exclude patterns into the documents
    /// the analyser should process. `folderUri` in the params is accepted
    /// but not consulted; the search primitive already scopes the workspace.
    pub fn enumerate_workspace_folder_contents(
        &self,
        _params: &EnumerateWorkspaceFolderContentsParams,
    ) -> Result<EnumerateWorkspaceFolderContentsResult> {
        let sources = enumerate(
            self.search.as_ref(),
            &self.config.cpp_sources.include,
            &self.config.cpp_sources.exclude,
        )?;
        let documents = sources
            .iter()
            .filter_map(WorkspaceDocument::from_source)
            .collect();
        Ok(EnumerateWorkspaceFolderContentsResult { documents })
    }

    /// Content for a `cpp-ma:` document the host is opening or refreshing.
    /// The address is tracked as open even when `None` is returned because
    /// no artifact is cached yet; a later update then notifies it.
    pub fn resolve(&self, uri: &str) -> Option<String> {
        self.docs.resolve(uri)
    }

    /// The host closed a `cpp-ma:` document; stop notifying it.
    pub fn document_closed(&self, uri: &str) {
        self.docs.on_document_closed(uri);
    }

    /// Address of the processed view of `source_uri`, for the host's
    /// open-beside commands. `None` when the source has no local path.
    pub fn processed_document_uri(&self, source_uri: &str, view: TokenView) -> Option<String> {
        ProcessedPath::new(SourceId::parse(source_uri), view)?.to_uri()
    }

    /// Switches the visible view mode. No-op when already active.
    pub fn activate_view(&mut self, mode: ViewModeId) {
        self.views.activate(mode);
    }

    /// Replaces the configuration after a host settings change. Returns the
    /// canonical extension list when the host should write the rewrite back
    /// to its settings store.
    pub fn on_config_changed(&mut self, config: AnalyserConfig) -> Option<Vec<String>> {
        self.config = config;
        self.config.normalize()
    }

    pub fn config(&self) -> &AnalyserConfig {
        &self.config
    }

    /// Shared handle to the committed module graph, for the host's
    /// presentation providers.
    pub fn modules(&self) -> ModulesStore {
        self.views.store().clone()
    }

    pub fn views(&self) -> &ViewCoordinator<S> {
        &self.views
    }

    pub fn docs(&self) -> &DerivedDocs {
        &self.docs
    }

    fn on_publish_modules_info(&mut self, params: PublishModulesInfoParams) {
        let event = match params {
            PublishModulesInfoParams::Update {
                modules,
                translation_units,
            } => ModulesEvent::Update {
                modules,
                translation_units,
            },
            PublishModulesInfoParams::Pending => ModulesEvent::Pending,
        };
        self.views.on_modules_event(event);
    }

    fn on_publish_translation_unit_info(&mut self, params: PublishTranslationUnitInfoParams) {
        match params {
            PublishTranslationUnitInfoParams::Update {
                uri,
                pp_tokens,
                tokens,
            } => {
                self.docs.on_translation_unit_event(
                    &uri,
                    TranslationUnitEvent::Update(DerivedArtifact { pp_tokens, tokens }),
                );
            }
            PublishTranslationUnitInfoParams::Pending { uri } => {
                self.docs
                    .on_translation_unit_event(&uri, TranslationUnitEvent::Pending);
            }
        }
    }
}

fn warn_malformed(method: &str, err: &serde_json::Error) {
    tracing::warn!(
        target = "cppma.client",
        method,
        error = %err,
        "dropping malformed notification payload"
    );
}
