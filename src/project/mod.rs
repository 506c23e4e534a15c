//! Workspace-level concerns: configuration and file discovery.

pub mod config;
pub mod file_loader;

pub use config::{Config, SchedulerConfig, SchemaConfig, CONFIG_FILE};
pub use file_loader::{discover, load_file, load_workspace, uri_for_path};
