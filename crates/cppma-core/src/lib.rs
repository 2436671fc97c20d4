//! Core types shared across the cppma workspace.
//!
//! This crate is intentionally small: document identity and the `file:` URI
//! conversions everything else is built on.

mod uri;

pub use uri::{file_uri_to_path, normalize_path, path_to_file_uri};

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identity of a real source document, derived from its location.
///
/// Local documents are stored as normalized absolute paths so that every
/// spelling of the same file (dot segments, `file://localhost` authorities,
/// percent-escapes) compares equal. Documents that do not live on the local
/// file system keep their URI verbatim and compare by it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceId {
    /// An absolute path on the local file system.
    Local(PathBuf),
    /// Any other document URI, kept opaque.
    Uri(String),
}

impl SourceId {
    /// Creates an identity for a local document. Relative paths have no
    /// stable identity and are rejected.
    pub fn local(path: impl Into<PathBuf>) -> Option<SourceId> {
        let path = path.into();
        if !path.is_absolute() {
            return None;
        }
        Some(SourceId::Local(normalize_path(&path)))
    }

    /// Parses a document URI. `file:` URIs become [`SourceId::Local`]; any
    /// other scheme (or a malformed `file:` URI) is kept as an opaque URI.
    pub fn parse(uri: &str) -> SourceId {
        match file_uri_to_path(uri) {
            Some(path) => SourceId::Local(path),
            None => SourceId::Uri(uri.to_string()),
        }
    }

    pub fn as_local_path(&self) -> Option<&Path> {
        match self {
            SourceId::Local(path) => Some(path),
            SourceId::Uri(_) => None,
        }
    }

    /// Canonical URI form: a `file:///` URI for local paths, the stored
    /// string otherwise. `None` only for local paths that are not valid
    /// UTF-8.
    pub fn to_uri(&self) -> Option<String> {
        match self {
            SourceId::Local(path) => path_to_file_uri(path),
            SourceId::Uri(uri) => Some(uri.clone()),
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceId::Local(path) => write!(f, "{}", path.display()),
            SourceId::Uri(uri) => f.write_str(uri),
        }
    }
}

impl Serialize for SourceId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.to_uri() {
            Some(uri) => serializer.serialize_str(&uri),
            None => Err(serde::ser::Error::custom("source path is not valid UTF-8")),
        }
    }
}

impl<'de> Deserialize<'de> for SourceId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let uri = String::deserialize(deserializer)?;
        Ok(SourceId::parse(&uri))
    }
}
