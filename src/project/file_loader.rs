//! Workspace file discovery and loading.
//!
//! A client opens every matching file at startup so cross-file references
//! resolve before the user touches them.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::Config;
use crate::base::DocumentUri;
use crate::error::Result;
use crate::workspace::AnalysisHost;

/// Every file under `root` whose extension is configured, sorted by path.
///
/// Unreadable directory entries are skipped.
pub fn discover(root: &Path, config: &Config) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| config.accepts_extension(ext))
        })
        .map(|e| e.into_path())
        .collect();
    paths.sort();
    paths
}

/// `file://` URI of a path.
pub fn uri_for_path(path: &Path) -> DocumentUri {
    let path = path.to_string_lossy().replace('\\', "/");
    if path.starts_with('/') {
        DocumentUri::new(format!("file://{path}"))
    } else {
        DocumentUri::new(format!("file:///{path}"))
    }
}

/// Read one file.
///
/// # Errors
///
/// Returns `Error::Io` if the file cannot be read.
pub fn load_file(path: &Path) -> Result<(DocumentUri, String)> {
    let text = std::fs::read_to_string(path)?;
    Ok((uri_for_path(path), text))
}

/// Discover and open every workspace file in `host`.
///
/// Returns the opened URIs in discovery order.
///
/// # Errors
///
/// Returns `Error::Io` on the first file that cannot be read.
pub fn load_workspace(root: &Path, config: &Config, host: &mut AnalysisHost) -> Result<Vec<DocumentUri>> {
    let paths = discover(root, config);
    let mut opened = Vec::with_capacity(paths.len());
    for path in paths {
        let (uri, text) = load_file(&path)?;
        host.open(uri.clone(), text);
        opened.push(uri);
    }
    tracing::info!(root = %root.display(), files = opened.len(), "workspace loaded");
    Ok(opened)
}
