//! Shared harness for the client integration suite.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use cppma_client::{
    AnalyserClient, AnalyserConfig, EnumerateWorkspaceFolderContentsResult,
    ENUMERATE_WORKSPACE_FOLDER_CONTENTS_METHOD,
};
use cppma_core::SourceId;
use cppma_views::{ViewProviders, ViewSurface};
use cppma_workspace::{DocumentSearch, SearchError};
use tempfile::TempDir;
use tracing_subscriber::fmt::MakeWriter;

/// One observed surface mutation, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceCall {
    Present {
        display_name: String,
        message: Option<String>,
    },
    SetMessage(Option<String>),
}

/// Records every surface call so tests can assert on presentation order.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub calls: Vec<SurfaceCall>,
}

impl ViewSurface for RecordingSurface {
    type Provider = &'static str;

    fn present(&mut self, display_name: &str, message: Option<&str>, _provider: &&'static str) {
        self.calls.push(SurfaceCall::Present {
            display_name: display_name.to_string(),
            message: message.map(str::to_string),
        });
    }

    fn set_message(&mut self, message: Option<&str>) {
        self.calls
            .push(SurfaceCall::SetMessage(message.map(str::to_string)));
    }
}

pub fn providers() -> ViewProviders<&'static str> {
    ViewProviders {
        modules: "modules-provider",
        importers: "importers-provider",
        importees: "importees-provider",
    }
}

pub fn new_client(
    config: AnalyserConfig,
    search: Arc<dyn DocumentSearch>,
) -> AnalyserClient<RecordingSurface> {
    AnalyserClient::new(config, RecordingSurface::default(), providers(), search)
}

/// Search primitive for suites that never enumerate.
pub struct EmptySearch;

impl DocumentSearch for EmptySearch {
    fn find_files(&self, _pattern: &str) -> Result<Vec<SourceId>, SearchError> {
        Ok(Vec::new())
    }
}

pub fn touch(dir: &TempDir, relative: &str) -> PathBuf {
    let path = dir.path().join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dirs");
    }
    fs::write(&path, "// test file\n").expect("write file");
    path
}

/// Runs the enumeration request through the wire-level entry point and
/// parses the response back.
pub fn enumerate_documents(
    client: &AnalyserClient<RecordingSurface>,
    params: serde_json::Value,
) -> EnumerateWorkspaceFolderContentsResult {
    let value = client
        .handle_request(ENUMERATE_WORKSPACE_FOLDER_CONTENTS_METHOD, params)
        .expect("enumerate succeeds");
    serde_json::from_value(value).expect("valid response shape")
}

pub fn file_names(result: &EnumerateWorkspaceFolderContentsResult) -> Vec<String> {
    result
        .documents
        .iter()
        .filter_map(|doc| {
            Path::new(&doc.filepath)
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
        })
        .collect()
}

/// Captures emitted log lines for assertions.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn as_string(&self) -> String {
        let bytes = self.0.lock().expect("log buffer mutex poisoned");
        String::from_utf8_lossy(&bytes).to_string()
    }
}

pub struct LogWriter(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut out = self.0.lock().expect("log buffer mutex poisoned");
        out.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogWriter(self.0.clone())
    }
}
