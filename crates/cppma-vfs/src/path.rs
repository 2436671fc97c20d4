//! Virtual addresses for processed translation-unit views.
//!
//! A processed document is addressed by the source it derives from plus the
//! requested representation, encoded in a single URI:
//!
//! ```text
//! cpp-ma:///<percent-encoded-path>.processed?view=<pp-tokens|preprocessed>
//! ```
//!
//! Encoding the representation in the address rather than in a side channel
//! lets the host's own document-identity machinery keep the two views of one
//! source independent.

use cppma_core::{file_uri_to_path, path_to_file_uri, SourceId};

/// URI scheme under which processed documents are registered with the host.
pub const PROCESSED_SCHEME: &str = "cpp-ma";

/// Suffix appended to the source path inside a processed URI.
const PROCESSED_SUFFIX: &str = ".processed";

/// Query key selecting the representation.
const VIEW_QUERY_KEY: &str = "view";

/// Which derived representation of a translation unit to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenView {
    /// Fully macro-expanded preprocessor tokens.
    PpTokens,
    /// The token stream handed to the parser after preprocessing.
    Preprocessed,
}

impl TokenView {
    pub const ALL: [TokenView; 2] = [TokenView::PpTokens, TokenView::Preprocessed];

    pub fn query_value(self) -> &'static str {
        match self {
            TokenView::PpTokens => "pp-tokens",
            TokenView::Preprocessed => "preprocessed",
        }
    }

    pub fn from_query_value(value: &str) -> Option<TokenView> {
        match value {
            "pp-tokens" => Some(TokenView::PpTokens),
            "preprocessed" => Some(TokenView::Preprocessed),
            _ => None,
        }
    }
}

/// Address of one processed view of one source document.
///
/// Two addresses are equal iff they name the same source and view; the
/// spelling of the URI they were parsed from does not matter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProcessedPath {
    source: SourceId,
    view: TokenView,
}

impl ProcessedPath {
    /// Builds the address for a local source document. Only local paths have
    /// processed views; opaque URIs return `None`.
    pub fn new(source: SourceId, view: TokenView) -> Option<ProcessedPath> {
        source.as_local_path()?;
        Some(ProcessedPath { source, view })
    }

    pub fn source(&self) -> &SourceId {
        &self.source
    }

    pub fn view(&self) -> TokenView {
        self.view
    }

    /// Canonical URI form. `None` only when the source path is not valid
    /// UTF-8.
    pub fn to_uri(&self) -> Option<String> {
        let path = self.source.as_local_path()?;
        let file_uri = path_to_file_uri(path)?;
        let encoded = file_uri.strip_prefix("file://")?;
        Some(format!(
            "{PROCESSED_SCHEME}://{encoded}{PROCESSED_SUFFIX}?{VIEW_QUERY_KEY}={}",
            self.view.query_value()
        ))
    }

    /// Parses a processed-document URI.
    ///
    /// Only the canonical scheme + empty authority form (`cpp-ma:///...`) is
    /// accepted. Non-empty authorities, a missing `.processed` suffix, an
    /// absent or unrecognized `view` query, fragments, and `.`/`..` segments
    /// are all rejected.
    pub fn parse_uri(uri: &str) -> Option<ProcessedPath> {
        let rest = uri.strip_prefix(PROCESSED_SCHEME)?.strip_prefix("://")?;
        if !rest.starts_with('/') || rest.contains('#') {
            return None;
        }
        let (raw_path, query) = rest.split_once('?')?;
        let view = view_from_query(query)?;
        let raw_path = raw_path.strip_suffix(PROCESSED_SUFFIX)?;
        for segment in raw_path.split('/').skip(1) {
            if segment.is_empty() || segment == "." || segment == ".." {
                return None;
            }
        }
        let path = file_uri_to_path(&format!("file://{raw_path}"))?;
        Some(ProcessedPath {
            source: SourceId::Local(path),
            view,
        })
    }
}

fn view_from_query(query: &str) -> Option<TokenView> {
    query
        .split('&')
        .find_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            (key == VIEW_QUERY_KEY).then_some(value)
        })
        .and_then(TokenView::from_query_value)
}

#[cfg(feature = "lsp")]
impl ProcessedPath {
    /// Parses an LSP URI, with the same strictness as [`Self::parse_uri`].
    pub fn from_lsp_uri(uri: &lsp_types::Uri) -> Option<ProcessedPath> {
        ProcessedPath::parse_uri(uri.as_str())
    }

    pub fn to_lsp_uri(&self) -> Option<lsp_types::Uri> {
        self.to_uri()?.parse().ok()
    }
}
