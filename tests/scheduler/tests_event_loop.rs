//! The event loop driven from another thread.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::Receiver;
use mythic::project::SchedulerConfig;
use mythic::scheduler::{channel, DocumentEvent, EventLoop};
use mythic::{AnalysisHost, PublishDiagnostics};
use parking_lot::Mutex;

use crate::helpers::fixtures::SUMMONER_SKILLS;
use crate::helpers::workspace::uri;

struct Harness {
    host: Arc<Mutex<AnalysisHost>>,
    events: crossbeam_channel::Sender<DocumentEvent>,
    published: Receiver<PublishDiagnostics>,
    handle: thread::JoinHandle<()>,
}

fn start() -> Harness {
    let host = Arc::new(Mutex::new(AnalysisHost::new()));
    let (events, receiver) = channel();
    let (client, published) = crossbeam_channel::unbounded();
    let event_loop = EventLoop::new(Arc::clone(&host), SchedulerConfig::default(), receiver, client);
    let handle = thread::spawn(move || event_loop.run());
    Harness {
        host,
        events,
        published,
        handle,
    }
}

impl Harness {
    fn send(&self, event: DocumentEvent) {
        self.events.send(event).unwrap();
    }

    fn stop(self) -> (Arc<Mutex<AnalysisHost>>, Vec<PublishDiagnostics>) {
        self.events.send(DocumentEvent::Shutdown).unwrap();
        self.handle.join().unwrap();
        let published = self.published.try_iter().collect();
        (self.host, published)
    }
}

#[test]
fn test_batch_fires_after_delay() {
    let harness = start();
    harness.send(DocumentEvent::Opened {
        uri: uri("Skills/summoner.yml"),
        text: SUMMONER_SKILLS.into(),
    });
    let params = harness
        .published
        .recv_timeout(Duration::from_secs(5))
        .expect("batch fired without shutdown");
    assert_eq!(params.uri, uri("Skills/summoner.yml"));
    assert_eq!(params.diagnostics.len(), 1);
    harness.stop();
}

#[test]
fn test_change_of_unknown_document_opens_it() {
    let harness = start();
    harness.send(DocumentEvent::Changed {
        uri: uri("Skills/a.yml"),
        text: "A:\n  Cooldown: 1\n".into(),
    });
    let (host, published) = harness.stop();
    assert!(host.lock().contains(&uri("Skills/a.yml")));
    assert_eq!(published.len(), 1);
    assert!(published[0].diagnostics.is_empty());
}

#[test]
fn test_declaration_in_second_file_clears_error() {
    let harness = start();
    harness.send(DocumentEvent::Opened {
        uri: uri("Skills/summoner.yml"),
        text: SUMMONER_SKILLS.into(),
    });
    harness.send(DocumentEvent::Opened {
        uri: uri("Mobs/imp.yml"),
        text: "Imp:\n  Health: 1\n".into(),
    });
    let (_, published) = harness.stop();

    let last = published
        .iter()
        .rev()
        .find(|p| p.uri == uri("Skills/summoner.yml"))
        .unwrap();
    assert!(last.diagnostics.is_empty(), "{:?}", last.diagnostics);
}

#[test]
fn test_force_full_of_unknown_document_is_ignored() {
    let harness = start();
    harness.send(DocumentEvent::ForceFull {
        uri: uri("Skills/none.yml"),
    });
    let (host, published) = harness.stop();
    assert!(published.is_empty());
    assert!(!host.lock().contains(&uri("Skills/none.yml")));
}
