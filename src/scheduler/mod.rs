//! Debounced reparse scheduling.
//!
//! ## Key Types
//!
//! - [`ReparseScheduler`] - partial/full queues, deadline and batch runner
//! - [`DocumentQueue`] - deduplicated, insertion-ordered set of documents
//! - [`EventLoop`] - channel-driven loop publishing through a [`Client`]
//!
//! [`pre_parse`] and [`post_parse`] are the per-document phases a batch is
//! made of.

mod driver;
mod pipeline;
mod queue;
#[allow(clippy::module_inception)]
mod scheduler;

pub use driver::{channel, Client, DocumentEvent, EventLoop};
pub use pipeline::{post_parse, pre_parse};
pub use queue::DocumentQueue;
pub use scheduler::{BatchReport, PublishDiagnostics, ReparseScheduler, SchedulerState};
