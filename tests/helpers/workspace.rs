//! A host plus scheduler driven without a clock.

use std::time::Instant;

use mythic::project::SchedulerConfig;
use mythic::scheduler::{BatchReport, ReparseScheduler};
use mythic::{AnalysisHost, Diagnostic, DocumentUri};

pub fn uri(path: &str) -> DocumentUri {
    DocumentUri::new(format!("file:///ws/{path}"))
}

pub struct TestWorkspace {
    pub host: AnalysisHost,
    pub scheduler: ReparseScheduler,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            host: AnalysisHost::new(),
            scheduler: ReparseScheduler::new(SchedulerConfig::default()),
        }
    }

    /// Open (or replace) a document and queue it the way an editor edit does.
    pub fn open(&mut self, path: &str, text: &str) -> DocumentUri {
        let uri = uri(path);
        self.host.open(uri.clone(), text);
        self.touch(&uri);
        uri
    }

    pub fn edit(&mut self, path: &str, text: &str) -> DocumentUri {
        let uri = uri(path);
        self.host.change(&uri, text).expect("document is open");
        self.touch(&uri);
        uri
    }

    fn touch(&mut self, uri: &DocumentUri) {
        let now = Instant::now();
        self.scheduler.enqueue_partial(uri.clone(), now);
        self.scheduler.enqueue_full(uri.clone(), now);
    }

    pub fn flush(&mut self) -> BatchReport {
        self.scheduler.flush(&mut self.host)
    }

    pub fn diagnostics(&self, uri: &DocumentUri) -> Vec<Diagnostic> {
        self.host
            .document(uri)
            .map(|d| d.diagnostics().to_vec())
            .unwrap_or_default()
    }

    pub fn messages(&self, uri: &DocumentUri) -> Vec<String> {
        self.diagnostics(uri)
            .iter()
            .map(|d| d.message.to_string())
            .collect()
    }
}

/// Open every `(path, text)` pair and run one batch.
pub fn analyzed(files: &[(&str, &str)]) -> (TestWorkspace, Vec<DocumentUri>) {
    let mut workspace = TestWorkspace::new();
    let uris = files
        .iter()
        .map(|(path, text)| workspace.open(path, text))
        .collect();
    workspace.flush();
    (workspace, uris)
}
