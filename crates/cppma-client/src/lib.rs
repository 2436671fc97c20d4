//! Editor-side client for the C++ modules analyser.
//!
//! The analyser runs out of process and talks to the editor over a small
//! set of custom endpoints:
//!
//! - Push notifications (analyser to editor)
//!   - `cppModulesAnalyser/publishModulesInfo`
//!   - `cppModulesAnalyser/publishTranslationUnitInfo`
//! - Requests served by the editor (analyser to editor)
//!   - `cppModulesAnalyser/enumerateWorkspaceFolderContents`
//! - Dev-build notifications (editor to analyser)
//!   - `cppModulesAnalyser/dev/recompileToolchain`
//!
//! [`AnalyserClient`] glues the long-lived pieces together: the view
//! coordinator (`cppma-views`), the derived-document cache (`cppma-vfs`)
//! and the workspace enumerator (`cppma-workspace`).

mod client;
mod config;
mod proto;

pub use client::AnalyserClient;
pub use config::{
    normalize_source_file_extensions, AnalyserConfig, CppSources, DEFAULT_SOURCE_PATTERN,
};
pub use proto::{
    EnumerateWorkspaceFolderContentsParams, EnumerateWorkspaceFolderContentsResult,
    PublishModulesInfoParams, PublishTranslationUnitInfoParams, WorkspaceDocument,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid params: {0}")]
    InvalidParams(String),
    #[error("unknown method: {0}")]
    MethodNotFound(String),
    #[error(transparent)]
    Search(#[from] cppma_workspace::SearchError),
    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;

pub const PUBLISH_MODULES_INFO_METHOD: &str = "cppModulesAnalyser/publishModulesInfo";
pub const PUBLISH_TRANSLATION_UNIT_INFO_METHOD: &str =
    "cppModulesAnalyser/publishTranslationUnitInfo";
pub const ENUMERATE_WORKSPACE_FOLDER_CONTENTS_METHOD: &str =
    "cppModulesAnalyser/enumerateWorkspaceFolderContents";
// Dev builds only; the editor sends it, the analyser rebuilds itself.
pub const DEV_RECOMPILE_TOOLCHAIN_METHOD: &str = "cppModulesAnalyser/dev/recompileToolchain";
