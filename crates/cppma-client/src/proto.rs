//! Wire payloads for the analyser's custom protocol endpoints.
//!
//! Push payloads are `event`-tagged enums; an unrecognised tag fails
//! deserialization and the dispatcher drops the notification.

use cppma_core::SourceId;
use cppma_modules::{ModuleGraph, TranslationUnitEntry};
use serde::{Deserialize, Serialize};

/// `cppModulesAnalyser/publishModulesInfo` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum PublishModulesInfoParams {
    /// A finished analysis pass. Both fields are absent when the pass could
    /// not produce a usable graph.
    #[serde(rename_all = "camelCase")]
    Update {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        modules: Option<ModuleGraph>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        translation_units: Option<Vec<TranslationUnitEntry>>,
    },
    /// Recomputation is in flight.
    Pending,
}

/// `cppModulesAnalyser/publishTranslationUnitInfo` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum PublishTranslationUnitInfoParams {
    /// Fresh token streams for one translation unit.
    #[serde(rename_all = "camelCase")]
    Update {
        uri: SourceId,
        pp_tokens: Vec<String>,
        tokens: Vec<String>,
    },
    /// The unit is being reprocessed; its cached streams are no longer
    /// trustworthy.
    Pending { uri: SourceId },
}

/// `cppModulesAnalyser/enumerateWorkspaceFolderContents` request params.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumerateWorkspaceFolderContentsParams {
    /// Accepted for wire compatibility; enumeration is workspace-wide and
    /// the handler does not consult it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_uri: Option<String>,
}

/// `cppModulesAnalyser/enumerateWorkspaceFolderContents` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumerateWorkspaceFolderContentsResult {
    pub documents: Vec<WorkspaceDocument>,
}

/// One discovered workspace document, in the two spellings the analyser
/// wants: its URI and its plain file path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceDocument {
    pub uri: String,
    pub filepath: String,
}

impl WorkspaceDocument {
    /// `None` when the document has no UTF-8 representable address.
    pub fn from_source(source: &SourceId) -> Option<WorkspaceDocument> {
        let uri = source.to_uri()?;
        let filepath = match source.as_local_path() {
            Some(path) => path.to_str()?.to_string(),
            None => uri.clone(),
        };
        Some(WorkspaceDocument { uri, filepath })
    }
}
