//! `file:` URI handling.
//!
//! Only the canonical forms produced by editors and language clients are
//! accepted: `file:///abs/path` and `file://localhost/abs/path`. A URI with
//! a real remote authority, a query, or a fragment does not name an on-disk
//! document and is rejected.

use std::path::{Component, Path, PathBuf};

/// Converts a `file:` URI into a normalized absolute path.
///
/// Percent-escapes are decoded and `.`/`..` segments are resolved lexically;
/// excess `..` segments clamp at the root. Returns `None` for non-`file:`
/// schemes, non-local authorities, queries, fragments, and invalid escapes.
pub fn file_uri_to_path(uri: &str) -> Option<PathBuf> {
    let rest = uri.strip_prefix("file://")?;
    let slash = rest.find('/')?;
    let (authority, raw_path) = rest.split_at(slash);
    if !authority.is_empty() && !authority.eq_ignore_ascii_case("localhost") {
        return None;
    }
    if raw_path.contains('?') || raw_path.contains('#') {
        return None;
    }
    let decoded = percent_decode_utf8(raw_path)?;
    let path = normalize_path(Path::new(strip_drive_slash(&decoded)));
    path.is_absolute().then_some(path)
}

/// Converts an absolute local path into its canonical `file:///` URI.
///
/// Returns `None` for relative paths and paths that are not valid UTF-8.
pub fn path_to_file_uri(path: &Path) -> Option<String> {
    if !path.is_absolute() {
        return None;
    }
    let normalized = normalize_path(path);
    let text = normalized.to_str()?;
    let mut text = if cfg!(windows) {
        text.replace('\\', "/")
    } else {
        text.to_string()
    };
    if !text.starts_with('/') {
        text.insert(0, '/');
    }
    Some(format!("file://{}", percent_encode_path(&text)))
}

/// Resolves `.` and `..` segments lexically, without touching the file
/// system. A `..` that would climb above the root is dropped.
pub fn normalize_path(path: &Path) -> PathBuf {
    let path = dunce::simplified(path);
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            Component::Normal(segment) => out.push(segment),
        }
    }
    out
}

/// `file:///C:/x` style URIs carry a Windows drive after the leading slash.
fn strip_drive_slash(decoded: &str) -> &str {
    if cfg!(windows) {
        let bytes = decoded.as_bytes();
        if bytes.len() >= 3 && bytes[0] == b'/' && bytes[1].is_ascii_alphabetic() && bytes[2] == b':'
        {
            return &decoded[1..];
        }
    }
    decoded
}

pub(crate) fn percent_decode_utf8(s: &str) -> Option<String> {
    if !s.as_bytes().contains(&b'%') {
        return Some(s.to_string());
    }

    fn hex_value(b: u8) -> Option<u8> {
        match b {
            b'0'..=b'9' => Some(b - b'0'),
            b'a'..=b'f' => Some(10 + b - b'a'),
            b'A'..=b'F' => Some(10 + b - b'A'),
            _ => None,
        }
    }

    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut rest = bytes;
    while let Some((&b, tail)) = rest.split_first() {
        if b == b'%' {
            let (&hi, tail) = tail.split_first()?;
            let (&lo, tail) = tail.split_first()?;
            out.push((hex_value(hi)? << 4) | hex_value(lo)?);
            rest = tail;
        } else {
            out.push(b);
            rest = tail;
        }
    }
    String::from_utf8(out).ok()
}

pub(crate) fn percent_encode_path(path: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";

    fn keep(b: u8) -> bool {
        b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~' | b'/' | b':')
    }

    let mut out = String::with_capacity(path.len());
    for &b in path.as_bytes() {
        if keep(b) {
            out.push(b as char);
        } else {
            out.push('%');
            out.push(HEX[usize::from(b >> 4)] as char);
            out.push(HEX[usize::from(b & 0x0f)] as char);
        }
    }
    out
}
