//! Host-facing configuration for the analyser client.
//!
//! The host stores these settings under the `cppModulesAnalyser` section of
//! its configuration document. An absent `cppSources` block means "scan the
//! standard C++ source extensions"; an explicitly empty one disables
//! scanning entirely.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Glob matching every file extension the analyser treats as a C++ source
/// or module interface.
pub const DEFAULT_SOURCE_PATTERN: &str = "**/*.{cpp,cppm,cxx,cxxm,cc,ccm,ixx}";

fn default_include() -> Vec<String> {
    vec![DEFAULT_SOURCE_PATTERN.to_string()]
}

/// Include/exclude globs selecting the workspace documents offered to the
/// analyser, interpreted relative to the workspace root.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CppSources {
    /// A field missing from an explicit `cppSources` block means "include
    /// nothing"; only a wholly absent block falls back to
    /// [`DEFAULT_SOURCE_PATTERN`].
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl Default for CppSources {
    fn default() -> Self {
        CppSources {
            include: default_include(),
            exclude: Vec::new(),
        }
    }
}

/// The `cppModulesAnalyser` configuration section.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyserConfig {
    /// Extensions the analyser recognises as sources, stored dot-prefixed.
    /// Hosts may write bare extensions; [`AnalyserConfig::normalize`]
    /// canonicalises them.
    pub source_file_extensions: Vec<String>,
    pub cpp_sources: CppSources,
}

impl AnalyserConfig {
    /// Rewrites `source_file_extensions` into canonical form in place.
    ///
    /// Returns the rewritten list when anything changed so the host can
    /// persist it; `None` means the stored value was already canonical.
    pub fn normalize(&mut self) -> Option<Vec<String>> {
        let normalized = normalize_source_file_extensions(&self.source_file_extensions);
        if normalized == self.source_file_extensions {
            return None;
        }
        self.source_file_extensions = normalized.clone();
        Some(normalized)
    }
}

/// Canonical form of an extension list: entries trimmed, empties dropped and
/// a leading dot added where missing. Order is preserved.
pub fn normalize_source_file_extensions(extensions: &[String]) -> Vec<String> {
    extensions
        .iter()
        .map(|extension| extension.trim())
        .filter(|extension| !extension.is_empty())
        .map(|extension| {
            if extension.starts_with('.') {
                extension.to_string()
            } else {
                format!(".{extension}")
            }
        })
        .collect()
}
