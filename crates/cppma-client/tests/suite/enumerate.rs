//! Wire-level enumeration: configured patterns against a real file tree.

use std::sync::Arc;

use cppma_client::{AnalyserConfig, CppSources};
use cppma_workspace::GlobSearch;
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;

use crate::support::{enumerate_documents, file_names, new_client, touch};

#[test]
fn enumerate_serves_workspace_documents_over_the_wire() {
    let dir = TempDir::new().expect("tempdir");
    touch(&dir, "src/a.cpp");
    touch(&dir, "src/b.cppm");
    touch(&dir, "build/gen.cpp");
    touch(&dir, "README.md");

    let mut config = AnalyserConfig::default();
    config.cpp_sources = CppSources {
        include: vec!["**/*.{cpp,cppm}".to_string()],
        exclude: vec!["build/**".to_string()],
    };
    let client = new_client(config, Arc::new(GlobSearch::new(dir.path())));

    let result = enumerate_documents(&client, json!({}));
    let filepaths: Vec<String> = result
        .documents
        .iter()
        .map(|doc| doc.filepath.clone())
        .collect();
    assert_eq!(
        filepaths,
        vec![
            dir.path()
                .join("src/a.cpp")
                .to_str()
                .expect("utf-8 path")
                .to_string(),
            dir.path()
                .join("src/b.cppm")
                .to_str()
                .expect("utf-8 path")
                .to_string(),
        ]
    );
    for doc in &result.documents {
        assert!(doc.uri.starts_with("file://"), "unexpected uri: {}", doc.uri);
    }
}

#[test]
fn default_patterns_cover_the_module_interface_extensions() {
    let dir = TempDir::new().expect("tempdir");
    touch(&dir, "main.cpp");
    touch(&dir, "iface.ixx");
    touch(&dir, "part.ccm");
    touch(&dir, "notes.txt");

    let client = new_client(
        AnalyserConfig::default(),
        Arc::new(GlobSearch::new(dir.path())),
    );
    let result = enumerate_documents(&client, json!({}));
    assert_eq!(file_names(&result), vec!["iface.ixx", "main.cpp", "part.ccm"]);
}

#[test]
fn documents_matched_by_multiple_includes_appear_once_and_excludes_win() {
    let dir = TempDir::new().expect("tempdir");
    touch(&dir, "a.cpp");
    touch(&dir, "a.h");
    touch(&dir, "generated.cpp");

    let mut config = AnalyserConfig::default();
    config.cpp_sources = CppSources {
        include: vec!["*.cpp".to_string(), "*.h".to_string(), "a.*".to_string()],
        exclude: vec!["generated.cpp".to_string()],
    };
    let client = new_client(config, Arc::new(GlobSearch::new(dir.path())));

    let result = enumerate_documents(&client, json!({}));
    assert_eq!(file_names(&result), vec!["a.cpp", "a.h"]);
}

#[test]
fn an_explicit_empty_include_list_yields_no_documents() {
    let dir = TempDir::new().expect("tempdir");
    touch(&dir, "main.cpp");

    let config: AnalyserConfig =
        serde_json::from_value(json!({ "cppSources": {} })).expect("valid config");
    let client = new_client(config, Arc::new(GlobSearch::new(dir.path())));

    let result = enumerate_documents(&client, json!({}));
    assert!(result.documents.is_empty());
}

#[test]
fn the_folder_uri_param_is_accepted_and_ignored() {
    let dir = TempDir::new().expect("tempdir");
    touch(&dir, "main.cpp");

    let client = new_client(
        AnalyserConfig::default(),
        Arc::new(GlobSearch::new(dir.path())),
    );
    let scoped = enumerate_documents(&client, json!({ "folderUri": "file:///somewhere/else" }));
    let unscoped = enumerate_documents(&client, json!({}));
    assert_eq!(scoped, unscoped);
    assert_eq!(scoped.documents.len(), 1);
}
