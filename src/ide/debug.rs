//! Debug views: dependency edges and per-document statistics.

use std::fmt;

use smol_str::SmolStr;

use crate::base::DocumentUri;
use crate::hir::{EntityId, EntityKind};
use crate::workspace::{AnalysisHost, DocumentStats};

/// Edges of one declared entity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntityEdges {
    pub name: SmolStr,
    pub kind: EntityKind,
    pub dependencies: Vec<EntityId>,
    pub dependents: Vec<EntityId>,
}

/// Dependency edges of every entity a document declares.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DependencyReport {
    pub uri: DocumentUri,
    pub entities: Vec<EntityEdges>,
}

impl fmt::Display for DependencyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.uri)?;
        for entity in &self.entities {
            writeln!(f, "  {} {}", entity.kind.display(), entity.name)?;
            for id in &entity.dependencies {
                writeln!(f, "    -> {id}")?;
            }
            for id in &entity.dependents {
                writeln!(f, "    <- {id}")?;
            }
        }
        Ok(())
    }
}

pub fn dependency_report(host: &AnalysisHost, uri: &DocumentUri) -> Option<DependencyReport> {
    host.document(uri)?;
    let entities = host
        .graph()
        .entities_in(uri)
        .map(|entity| EntityEdges {
            name: entity.name.clone(),
            kind: entity.kind,
            dependencies: entity.dependencies().to_vec(),
            dependents: entity.dependents().to_vec(),
        })
        .collect();
    Some(DependencyReport {
        uri: uri.clone(),
        entities,
    })
}

pub fn document_stats(host: &AnalysisHost, uri: &DocumentUri) -> Option<DocumentStats> {
    host.document(uri).map(|document| document.stats())
}
