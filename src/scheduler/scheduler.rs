//! Debounced batch scheduler.
//!
//! Edits enqueue documents into two deduplicated sets. A batch fires once
//! the deadline passes:
//!
//! ```text
//! 1. pre-parse every partially queued document
//! 2. widen the full set with documents related through the graph
//! 3. rounds: pre-parse the round, then post-parse it, queueing
//!    related documents that did not complete yet
//! 4. publish diagnostics for every document touched, empty lists too
//! ```
//!
//! The scheduler never sleeps. Callers hand it the current instant and it
//! reports the next deadline, so tests drive it without a clock.

use std::time::Instant;

use indexmap::IndexSet;

use super::pipeline::{post_parse, pre_parse};
use super::queue::DocumentQueue;
use crate::base::DocumentUri;
use crate::hir::Diagnostic;
use crate::project::SchedulerConfig;
use crate::workspace::AnalysisHost;

/// Diagnostics to hand to the client for one document.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishDiagnostics {
    pub uri: DocumentUri,
    pub version: u64,
    pub diagnostics: Vec<Diagnostic>,
}

/// Where the scheduler is between edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Scheduled { deadline: Instant, generation: u64 },
    Running,
}

/// What one batch did.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub published: Vec<PublishDiagnostics>,
    pub pre_parses: usize,
    pub post_parses: usize,
    pub rounds: usize,
}

#[derive(Debug)]
pub struct ReparseScheduler {
    config: SchedulerConfig,
    partial: DocumentQueue,
    full: DocumentQueue,
    state: SchedulerState,
    generation: u64,
}

impl ReparseScheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            partial: DocumentQueue::new(),
            full: DocumentQueue::new(),
            state: SchedulerState::Idle,
            generation: 0,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Instant the pending batch fires at.
    pub fn deadline(&self) -> Option<Instant> {
        match self.state {
            SchedulerState::Scheduled { deadline, .. } => Some(deadline),
            _ => None,
        }
    }

    pub fn has_pending(&self) -> bool {
        !self.partial.is_empty() || !self.full.is_empty()
    }

    /// Queue a document for a local pre-parse.
    pub fn enqueue_partial(&mut self, uri: DocumentUri, now: Instant) -> bool {
        let added = self.partial.add(uri);
        if added {
            self.reschedule(now);
        }
        added
    }

    /// Queue a document for a full pass, cross-document resolution included.
    pub fn enqueue_full(&mut self, uri: DocumentUri, now: Instant) -> bool {
        let added = self.full.add(uri);
        if added {
            self.reschedule(now);
        }
        added
    }

    /// Drop a document from both queues.
    pub fn forget(&mut self, uri: &DocumentUri) {
        self.partial.remove(uri);
        self.full.remove(uri);
        if !self.has_pending() && self.state != SchedulerState::Running {
            self.state = SchedulerState::Idle;
        }
    }

    /// Every queued edit restarts the countdown, which grows with the
    /// number of fully queued documents.
    fn reschedule(&mut self, now: Instant) {
        if self.state == SchedulerState::Running {
            return;
        }
        self.generation += 1;
        self.state = SchedulerState::Scheduled {
            deadline: now + self.config.delay(self.full.len()),
            generation: self.generation,
        };
        tracing::trace!(generation = self.generation, pending = self.full.len(), "batch rescheduled");
    }

    /// Run the pending batch if its deadline has passed.
    pub fn poll(&mut self, host: &mut AnalysisHost, now: Instant) -> Option<BatchReport> {
        match self.state {
            SchedulerState::Scheduled { deadline, .. } if now >= deadline => Some(self.run_batch(host)),
            _ => None,
        }
    }

    /// Run whatever is queued immediately.
    pub fn flush(&mut self, host: &mut AnalysisHost) -> BatchReport {
        if !self.has_pending() {
            return BatchReport::default();
        }
        self.run_batch(host)
    }

    fn run_batch(&mut self, host: &mut AnalysisHost) -> BatchReport {
        self.state = SchedulerState::Running;
        let started = Instant::now();
        let mut report = BatchReport::default();
        let mut touched: IndexSet<DocumentUri> = IndexSet::new();
        let mut fresh: IndexSet<DocumentUri> = IndexSet::new();
        let mut completed: IndexSet<DocumentUri> = IndexSet::new();
        let mut deferred: Vec<DocumentUri> = Vec::new();
        let mut full = std::mem::take(&mut self.full);

        for uri in self.partial.drain() {
            if run_pre_parse(host, &uri, &mut report) {
                touched.insert(uri.clone());
                fresh.insert(uri);
            }
        }
        full.extend(host.graph_mut().take_woken());

        let seeds: Vec<DocumentUri> = full.iter().cloned().collect();
        for uri in &seeds {
            full.extend(host.graph().related_documents(uri));
        }

        while !full.is_empty() {
            report.rounds += 1;
            let round = full.drain();
            for uri in &round {
                if report.rounds == 1 && fresh.contains(uri) {
                    continue;
                }
                if run_pre_parse(host, uri, &mut report) {
                    touched.insert(uri.clone());
                }
            }
            let mut woken = host.graph_mut().take_woken();
            let mut related: IndexSet<DocumentUri> = IndexSet::new();
            for uri in &round {
                if !host.contains(uri) {
                    continue;
                }
                match post_parse(host, uri) {
                    Ok(()) => report.post_parses += 1,
                    Err(error) => tracing::warn!(uri = %uri, %error, "post-parse skipped"),
                }
                completed.insert(uri.clone());
                related.extend(host.graph().related_documents(uri));
            }
            woken.extend(host.graph_mut().take_woken());
            for uri in related {
                if !completed.contains(&uri) {
                    full.add(uri);
                }
            }
            // A completed document woken by a later declaration resolves
            // against it in the next batch.
            for uri in woken {
                if !completed.contains(&uri) {
                    full.add(uri);
                } else if !round.contains(&uri) {
                    deferred.push(uri);
                }
            }
        }

        report.published = touched
            .iter()
            .filter_map(|uri| host.document(uri))
            .map(|document| PublishDiagnostics {
                uri: document.uri().clone(),
                version: document.version(),
                diagnostics: document.diagnostics().to_vec(),
            })
            .collect();

        tracing::info!(
            documents = report.published.len(),
            pre_parses = report.pre_parses,
            post_parses = report.post_parses,
            rounds = report.rounds,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "batch finished"
        );

        self.state = SchedulerState::Idle;
        let now = Instant::now();
        for uri in deferred {
            self.enqueue_full(uri, now);
        }
        if self.has_pending() && self.state == SchedulerState::Idle {
            self.reschedule(now);
        }
        report
    }
}

fn run_pre_parse(host: &mut AnalysisHost, uri: &DocumentUri, report: &mut BatchReport) -> bool {
    match pre_parse(host, uri) {
        Ok(()) => {
            report.pre_parses += 1;
            true
        }
        Err(error) => {
            tracing::warn!(uri = %uri, %error, "pre-parse skipped");
            false
        }
    }
}
