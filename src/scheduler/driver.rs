//! Event loop feeding document events into the scheduler.
//!
//! ```text
//! editor ──DocumentEvent──▶ channel ──▶ EventLoop ──▶ ReparseScheduler
//!                                          │ recv_timeout(deadline)
//!                                          ▼
//!                                  Client::publish_diagnostics
//! ```

use std::sync::Arc;
use std::time::Instant;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;

use super::scheduler::{PublishDiagnostics, ReparseScheduler};
use crate::base::DocumentUri;
use crate::error::Error;
use crate::project::SchedulerConfig;
use crate::workspace::AnalysisHost;

/// A change reported by the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentEvent {
    Opened { uri: DocumentUri, text: String },
    Changed { uri: DocumentUri, text: String },
    Closed { uri: DocumentUri },
    /// Re-resolve a document without a text change.
    ForceFull { uri: DocumentUri },
    Shutdown,
}

/// Receiver of batch results.
pub trait Client: Send {
    fn publish_diagnostics(&mut self, params: PublishDiagnostics);
}

impl Client for Sender<PublishDiagnostics> {
    fn publish_diagnostics(&mut self, params: PublishDiagnostics) {
        if self.send(params).is_err() {
            tracing::debug!("diagnostics receiver dropped");
        }
    }
}

pub fn channel() -> (Sender<DocumentEvent>, Receiver<DocumentEvent>) {
    crossbeam_channel::unbounded()
}

pub struct EventLoop<C: Client> {
    host: Arc<Mutex<AnalysisHost>>,
    scheduler: ReparseScheduler,
    events: Receiver<DocumentEvent>,
    client: C,
}

impl<C: Client> EventLoop<C> {
    pub fn new(
        host: Arc<Mutex<AnalysisHost>>,
        config: SchedulerConfig,
        events: Receiver<DocumentEvent>,
        client: C,
    ) -> Self {
        Self {
            host,
            scheduler: ReparseScheduler::new(config),
            events,
            client,
        }
    }

    /// Process events until `Shutdown` or until every sender is dropped.
    /// Pending work is flushed before returning.
    pub fn run(mut self) {
        tracing::info!("event loop started");
        loop {
            let event = match self.scheduler.deadline() {
                Some(deadline) => {
                    let timeout = deadline.saturating_duration_since(Instant::now());
                    match self.events.recv_timeout(timeout) {
                        Ok(event) => Some(event),
                        Err(RecvTimeoutError::Timeout) => None,
                        Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                None => match self.events.recv() {
                    Ok(event) => Some(event),
                    Err(_) => break,
                },
            };
            match event {
                Some(DocumentEvent::Shutdown) => break,
                Some(event) => self.handle(event),
                None => {}
            }
            self.fire_due();
        }
        let report = {
            let mut host = self.host.lock();
            self.scheduler.flush(&mut host)
        };
        for params in report.published {
            self.client.publish_diagnostics(params);
        }
        tracing::info!("event loop stopped");
    }

    fn handle(&mut self, event: DocumentEvent) {
        let now = Instant::now();
        let mut host = self.host.lock();
        match event {
            DocumentEvent::Opened { uri, text } => {
                host.open(uri.clone(), text);
                self.scheduler.enqueue_partial(uri.clone(), now);
                self.scheduler.enqueue_full(uri, now);
            }
            DocumentEvent::Changed { uri, text } => {
                if let Err(Error::UnknownDocument(_)) = host.change(&uri, text.as_str()) {
                    tracing::warn!(uri = %uri, "change for unopened document, opening it");
                    host.open(uri.clone(), text);
                }
                self.scheduler.enqueue_partial(uri.clone(), now);
                self.scheduler.enqueue_full(uri, now);
            }
            DocumentEvent::Closed { uri } => {
                self.scheduler.forget(&uri);
                if host.close(&uri) {
                    drop(host);
                    self.client.publish_diagnostics(PublishDiagnostics {
                        uri,
                        version: 0,
                        diagnostics: Vec::new(),
                    });
                }
            }
            DocumentEvent::ForceFull { uri } => {
                if host.contains(&uri) {
                    self.scheduler.enqueue_full(uri, now);
                }
            }
            DocumentEvent::Shutdown => {}
        }
    }

    fn fire_due(&mut self) {
        let report = {
            let mut host = self.host.lock();
            self.scheduler.poll(&mut host, Instant::now())
        };
        for params in report.into_iter().flat_map(|report| report.published) {
            self.client.publish_diagnostics(params);
        }
    }
}
