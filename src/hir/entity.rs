//! Named entities declared by documents.

use std::fmt;

use smol_str::SmolStr;

use crate::base::{DocumentUri, Range};

/// Identity of an entity: its owning document and declaration range.
///
/// Two declarations can only share an id if they are the same key in the
/// same document, so ids stay stable across reparses of unchanged text.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId {
    pub document: DocumentUri,
    pub range: Range,
}

impl EntityId {
    pub fn new(document: DocumentUri, range: Range) -> Self {
        Self { document, range }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.document, self.range)
    }
}

/// The kind of a declared entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Skill,
    Mob,
}

impl EntityKind {
    pub fn display(&self) -> &'static str {
        match self {
            EntityKind::Skill => "skill",
            EntityKind::Mob => "mob",
        }
    }
}

/// A cached skill or mob together with its graph edges.
///
/// Edge lists are only mutated by [`EntityGraph`](super::EntityGraph), which
/// keeps `dependencies` and `dependents` mirrored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    /// Map key in the declaring YAML document.
    pub name: SmolStr,
    /// Text of the `##` comment lines directly above the declaration.
    pub description: String,
    /// Raw source slice of the declaration.
    pub source: String,
    pub(super) dependencies: Vec<EntityId>,
    pub(super) dependents: Vec<EntityId>,
}

impl Entity {
    pub fn new(id: EntityId, kind: EntityKind, name: impl Into<SmolStr>) -> Self {
        Self {
            id,
            kind,
            name: name.into(),
            description: String::new(),
            source: String::new(),
            dependencies: Vec::new(),
            dependents: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn document(&self) -> &DocumentUri {
        &self.id.document
    }

    /// Entities this one references.
    pub fn dependencies(&self) -> &[EntityId] {
        &self.dependencies
    }

    /// Entities referencing this one.
    pub fn dependents(&self) -> &[EntityId] {
        &self.dependents
    }
}
