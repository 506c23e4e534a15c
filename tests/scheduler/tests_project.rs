//! Loading a workspace from disk.

use std::fs;

use mythic::project::{discover, load_workspace, Config, CONFIG_FILE};
use mythic::{AnalysisHost, Error};
use tempfile::TempDir;

use crate::helpers::fixtures::{FIRE_SKILLS, IMP_MOBS};
use crate::helpers::workspace::TestWorkspace;

fn write(dir: &TempDir, path: &str, text: &str) {
    let path = dir.path().join(path);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

fn load(dir: &TempDir, config: Config) -> TestWorkspace {
    let mut workspace = TestWorkspace::new();
    workspace.host = AnalysisHost::with_config(config.clone()).unwrap();
    let uris = load_workspace(dir.path(), &config, &mut workspace.host).unwrap();
    let now = std::time::Instant::now();
    for uri in uris {
        workspace.scheduler.enqueue_partial(uri.clone(), now);
        workspace.scheduler.enqueue_full(uri, now);
    }
    workspace.flush();
    workspace
}

#[test]
fn test_workspace_resolves_across_files() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir, "Skills/fire.yml", FIRE_SKILLS);
    write(&dir, "Mobs/imp.yml", IMP_MOBS);
    write(&dir, "README.md", "# not yaml");

    let config = Config::load(dir.path()).unwrap();
    assert_eq!(discover(dir.path(), &config).len(), 2);
    let workspace = load(&dir, config);

    let graph = workspace.host.graph();
    assert_eq!(graph.len(), 3);
    assert_eq!(graph.edge_count(), 2);
    for document in workspace.host.documents() {
        assert!(document.diagnostics().is_empty(), "{}", document.uri());
    }
}

#[test]
fn test_configured_globs_select_schema() {
    let dir = tempfile::tempdir().unwrap();
    write(
        &dir,
        CONFIG_FILE,
        "[schemas]\nskills = [\"**/abilities/**\"]\nmobs = []\n",
    );
    write(&dir, "abilities/a.yml", "A:\n  Cooldown: -1\n");
    write(&dir, "Skills/b.yml", "B:\n  Cooldown: -1\n");

    let config = Config::load(dir.path()).unwrap();
    let workspace = load(&dir, config);

    let flagged: Vec<String> = workspace
        .host
        .documents()
        .filter(|d| !d.diagnostics().is_empty())
        .map(|d| d.uri().path().to_string())
        .collect();
    assert_eq!(flagged.len(), 1);
    assert!(flagged[0].ends_with("abilities/a.yml"));
}

#[test]
fn test_invalid_configured_glob_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir, CONFIG_FILE, "[schemas]\nskills = [\"a/[\"]\n");
    let config = Config::load(dir.path()).unwrap();
    assert!(matches!(
        AnalysisHost::with_config(config),
        Err(Error::InvalidGlob { .. })
    ));
}
