//! Entity registry and dependency graph.
//!
//! An arena keyed by [`EntityId`]. Edges are id pairs, so cycles across
//! documents need no shared ownership, and traversal is an explicit
//! breadth-first walk with a visited set.
//!
//! ## Reparse lifecycle
//!
//! ```text
//! invalidate_document(doc)   ← entities retired, outgoing edges dropped
//!     │
//!     ▼
//! register(entity) ...       ← same kind+name inherits retired dependents
//!     │
//!     ▼
//! settle_document(doc)       ← names that vanished wake their referrers
//!     │
//!     ▼
//! add_dependency(a, b) ...   ← post-parse edges, always mirrored
//! ```

use std::collections::VecDeque;

use indexmap::IndexSet;
use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;

use super::entity::{Entity, EntityId, EntityKind};
use crate::base::DocumentUri;

/// Direction of a graph walk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Follow `dependencies` (what an entity references).
    Dependencies,
    /// Follow `dependents` (what references an entity).
    Dependents,
}

/// A removed declaration waiting to be re-declared by its document.
#[derive(Clone, Debug)]
struct Retired {
    id: EntityId,
    kind: EntityKind,
    name: SmolStr,
    dependents: Vec<EntityId>,
}

/// Workspace-wide registry of skills and mobs.
#[derive(Debug, Default)]
pub struct EntityGraph {
    entities: FxHashMap<EntityId, Entity>,
    by_document: FxHashMap<DocumentUri, Vec<EntityId>>,
    by_name: FxHashMap<(EntityKind, SmolStr), Vec<EntityId>>,
    retired: FxHashMap<DocumentUri, Vec<Retired>>,
    unresolved: FxHashMap<(EntityKind, SmolStr), IndexSet<DocumentUri>>,
    woken: IndexSet<DocumentUri>,
}

impl EntityGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn get(&self, id: &EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.entities.contains_key(id)
    }

    /// First live declaration of `name`, in registration order.
    pub fn lookup(&self, kind: EntityKind, name: &str) -> Option<&Entity> {
        self.by_name
            .get(&(kind, SmolStr::new(name)))?
            .iter()
            .find_map(|id| self.entities.get(id))
    }

    /// Entities declared by a document, in declaration order.
    pub fn entities_in<'a>(&'a self, document: &DocumentUri) -> impl Iterator<Item = &'a Entity> {
        self.by_document
            .get(document)
            .into_iter()
            .flatten()
            .filter_map(|id| self.entities.get(id))
    }

    /// All live entities of one kind, in no particular order.
    pub fn all(&self, kind: EntityKind) -> impl Iterator<Item = &Entity> {
        self.entities.values().filter(move |e| e.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Number of dependency edges.
    pub fn edge_count(&self) -> usize {
        self.entities.values().map(|e| e.dependencies.len()).sum()
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Store an entity and index it by document and name.
    ///
    /// If the owning document retired an entity of the same kind and name,
    /// the new entity takes over its dependents and every referrer's
    /// dependency entry is rewritten to the new id. Documents waiting on
    /// this name are woken.
    pub fn register(&mut self, mut entity: Entity) -> EntityId {
        let id = entity.id.clone();
        let document = id.document.clone();

        if let Some(retired) = self.take_retired(&document, entity.kind, &entity.name) {
            for referrer in &retired.dependents {
                if let Some(referrer) = self.entities.get_mut(referrer) {
                    for dependency in referrer.dependencies.iter_mut() {
                        if *dependency == retired.id {
                            *dependency = id.clone();
                        }
                    }
                    if !entity.dependents.contains(&referrer.id) {
                        entity.dependents.push(referrer.id.clone());
                    }
                }
            }
        }

        let key = (entity.kind, entity.name.clone());
        if let Some(waiting) = self.unresolved.remove(&key) {
            for referrer in waiting {
                if referrer != document {
                    tracing::debug!(name = %key.1, referrer = %referrer, "awaited name registered");
                    self.woken.insert(referrer);
                }
            }
        }

        self.by_name.entry(key).or_default().push(id.clone());
        self.by_document.entry(document).or_default().push(id.clone());
        tracing::trace!(entity = %id, name = %entity.name, kind = entity.kind.display(), "registered");
        self.entities.insert(id.clone(), entity);
        id
    }

    /// Record that `from` references `to`, mirrored on both entities.
    ///
    /// Returns `false` if either entity is unknown. Repeated edges are
    /// stored once.
    pub fn add_dependency(&mut self, from: &EntityId, to: &EntityId) -> bool {
        if !self.contains(from) || !self.contains(to) {
            return false;
        }
        if let Some(source) = self.entities.get_mut(from) {
            if source.dependencies.contains(to) {
                return true;
            }
            source.dependencies.push(to.clone());
        }
        if let Some(target) = self.entities.get_mut(to) {
            target.dependents.push(from.clone());
        }
        tracing::debug!(from = %from, to = %to, "dependency added");
        true
    }

    /// Remember that `referrer` mentioned a name nobody declares yet.
    pub fn note_unresolved(&mut self, kind: EntityKind, name: &str, referrer: &DocumentUri) {
        self.unresolved
            .entry((kind, SmolStr::new(name)))
            .or_default()
            .insert(referrer.clone());
    }

    /// Documents woken since the last call.
    pub fn take_woken(&mut self) -> Vec<DocumentUri> {
        self.woken.drain(..).collect()
    }

    /// Drop a document's entities before it is parsed again.
    ///
    /// Outgoing edges are removed from their targets. Incoming edges stay on
    /// the referrers and are handed to a re-declaration by [`register`].
    ///
    /// [`register`]: Self::register
    pub fn invalidate_document(&mut self, document: &DocumentUri) {
        let Some(ids) = self.by_document.remove(document) else {
            return;
        };
        let mut retired = Vec::with_capacity(ids.len());
        for id in ids {
            let Some(entity) = self.entities.remove(&id) else {
                continue;
            };
            for target in &entity.dependencies {
                if let Some(target) = self.entities.get_mut(target) {
                    target.dependents.retain(|d| *d != id);
                }
            }
            self.unindex_name(&entity);
            retired.push(Retired {
                id,
                kind: entity.kind,
                name: entity.name,
                dependents: entity
                    .dependents
                    .into_iter()
                    .filter(|d| d.document != *document)
                    .collect(),
            });
        }
        tracing::trace!(document = %document, retired = retired.len(), "invalidated");
        self.retired.entry(document.clone()).or_default().extend(retired);
    }

    /// Finish a reparse: declarations that were not re-registered are gone
    /// for good, so documents referencing them are woken.
    pub fn settle_document(&mut self, document: &DocumentUri) {
        let Some(leftover) = self.retired.remove(document) else {
            return;
        };
        for retired in leftover {
            for referrer in retired.dependents {
                if self.entities.contains_key(&referrer) {
                    tracing::debug!(name = %retired.name, referrer = %referrer.document, "declaration removed");
                    self.woken.insert(referrer.document);
                }
            }
        }
    }

    /// Forget a closed document entirely.
    ///
    /// References held by other documents are left dangling; lookups and
    /// traversals skip them.
    pub fn remove_document(&mut self, document: &DocumentUri) {
        self.invalidate_document(document);
        self.retired.remove(document);
        for waiting in self.unresolved.values_mut() {
            waiting.shift_remove(document);
        }
        self.unresolved.retain(|_, waiting| !waiting.is_empty());
        self.woken.shift_remove(document);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn take_retired(
        &mut self,
        document: &DocumentUri,
        kind: EntityKind,
        name: &str,
    ) -> Option<Retired> {
        let retired = self.retired.get_mut(document)?;
        let index = retired
            .iter()
            .position(|r| r.kind == kind && r.name == name)?;
        Some(retired.swap_remove(index))
    }

    fn unindex_name(&mut self, entity: &Entity) {
        let key = (entity.kind, entity.name.clone());
        if let Some(ids) = self.by_name.get_mut(&key) {
            ids.retain(|id| *id != entity.id);
            if ids.is_empty() {
                self.by_name.remove(&key);
            }
        }
    }

    // ========================================================================
    // Traversal
    // ========================================================================

    /// Visit every entity reachable through `dependencies` from the
    /// entities declared in `document`.
    pub fn traverse_dependencies(&self, document: &DocumentUri, visit: impl FnMut(&Entity)) {
        let roots = self.entities_in(document).map(|e| e.id.clone()).collect::<Vec<_>>();
        self.traverse(roots, Direction::Dependencies, visit);
    }

    /// Visit every entity reachable through `dependents` from the entities
    /// declared in `document`, including referrers of its retired entities.
    pub fn traverse_dependents(&self, document: &DocumentUri, mut visit: impl FnMut(&Entity)) {
        let mut roots: Vec<EntityId> = self.entities_in(document).map(|e| e.id.clone()).collect();
        let mut seeds = Vec::new();
        if let Some(retired) = self.retired.get(document) {
            seeds.extend(retired.iter().flat_map(|r| r.dependents.iter().cloned()));
        }
        let mut visited = FxHashSet::default();
        for seed in &seeds {
            if let Some(entity) = self.entities.get(seed) {
                if visited.insert(seed.clone()) {
                    visit(entity);
                    roots.push(seed.clone());
                }
            }
        }
        self.walk(roots, Direction::Dependents, &mut visited, &mut visit);
    }

    /// Breadth-first walk from the edges of `roots`.
    ///
    /// Each reachable entity is visited exactly once, cycles included. Roots
    /// are only visited when some path leads back to them.
    pub fn traverse(
        &self,
        roots: impl IntoIterator<Item = EntityId>,
        direction: Direction,
        mut visit: impl FnMut(&Entity),
    ) {
        let mut visited = FxHashSet::default();
        self.walk(roots, direction, &mut visited, &mut visit);
    }

    fn walk(
        &self,
        roots: impl IntoIterator<Item = EntityId>,
        direction: Direction,
        visited: &mut FxHashSet<EntityId>,
        visit: &mut impl FnMut(&Entity),
    ) {
        let mut queue: VecDeque<EntityId> = VecDeque::new();
        for root in roots {
            if let Some(entity) = self.entities.get(&root) {
                queue.extend(edges(entity, direction).iter().cloned());
            }
        }
        while let Some(id) = queue.pop_front() {
            let Some(entity) = self.entities.get(&id) else {
                continue;
            };
            if !visited.insert(id) {
                continue;
            }
            visit(entity);
            queue.extend(edges(entity, direction).iter().cloned());
        }
    }

    /// Documents owning any entity reachable from `document` in either
    /// direction, excluding `document` itself.
    pub fn related_documents(&self, document: &DocumentUri) -> IndexSet<DocumentUri> {
        let mut documents = IndexSet::new();
        let mut collect = |entity: &Entity| {
            if entity.document() != document {
                documents.insert(entity.document().clone());
            }
        };
        self.traverse_dependencies(document, &mut collect);
        self.traverse_dependents(document, &mut collect);
        documents
    }
}

fn edges(entity: &Entity, direction: Direction) -> &[EntityId] {
    match direction {
        Direction::Dependencies => &entity.dependencies,
        Direction::Dependents => &entity.dependents,
    }
}
