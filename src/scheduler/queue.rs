//! Deduplicated, insertion-ordered document sets.

use indexmap::IndexSet;

use crate::base::DocumentUri;

/// A set of documents waiting for a parse pass.
#[derive(Debug, Clone, Default)]
pub struct DocumentQueue {
    items: IndexSet<DocumentUri>,
}

impl DocumentQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `uri` unless already queued. Returns whether it was added.
    pub fn add(&mut self, uri: DocumentUri) -> bool {
        self.items.insert(uri)
    }

    pub fn remove(&mut self, uri: &DocumentUri) -> bool {
        self.items.shift_remove(uri)
    }

    pub fn contains(&self, uri: &DocumentUri) -> bool {
        self.items.contains(uri)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &DocumentUri> {
        self.items.iter()
    }

    /// Take every queued document, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<DocumentUri> {
        self.items.drain(..).collect()
    }
}

impl Extend<DocumentUri> for DocumentQueue {
    fn extend<I: IntoIterator<Item = DocumentUri>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}
