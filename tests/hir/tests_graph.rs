//! Entity graph tests.

use mythic::hir::{Direction, Entity, EntityGraph, EntityId, EntityKind};
use mythic::{DocumentUri, Range};
use rstest::rstest;

fn id(doc: &str, line: u32) -> EntityId {
    EntityId::new(
        DocumentUri::new(format!("file:///ws/{doc}")),
        Range::from_coords(line, 0, line, 1),
    )
}

fn skill(doc: &str, line: u32, name: &str) -> Entity {
    Entity::new(id(doc, line), EntityKind::Skill, name)
}

/// A → B → C → A, one entity per document.
fn cycle() -> EntityGraph {
    let mut graph = EntityGraph::new();
    graph.register(skill("a.yml", 0, "A"));
    graph.register(skill("b.yml", 0, "B"));
    graph.register(skill("c.yml", 0, "C"));
    assert!(graph.add_dependency(&id("a.yml", 0), &id("b.yml", 0)));
    assert!(graph.add_dependency(&id("b.yml", 0), &id("c.yml", 0)));
    assert!(graph.add_dependency(&id("c.yml", 0), &id("a.yml", 0)));
    graph
}

// =============================================================================
// TRAVERSAL
// =============================================================================

#[rstest]
#[case(Direction::Dependencies)]
#[case(Direction::Dependents)]
fn test_cycle_visits_each_entity_once(#[case] direction: Direction) {
    let graph = cycle();
    let mut visited = Vec::new();
    graph.traverse([id("a.yml", 0)], direction, |entity| {
        visited.push(entity.name.to_string())
    });
    visited.sort();
    assert_eq!(visited, vec!["A", "B", "C"]);
}

#[test]
fn test_document_traversals_on_cycle() {
    let graph = cycle();
    let a = DocumentUri::new("file:///ws/a.yml");
    let mut count = 0;
    graph.traverse_dependencies(&a, |_| count += 1);
    assert_eq!(count, 3);
    let mut count = 0;
    graph.traverse_dependents(&a, |_| count += 1);
    assert_eq!(count, 3);

    let related = graph.related_documents(&a);
    assert_eq!(related.len(), 2);
    assert!(!related.contains(&a));
}

#[test]
fn test_edges_are_mirrored_and_deduplicated() {
    let mut graph = cycle();
    assert!(graph.add_dependency(&id("a.yml", 0), &id("b.yml", 0)));
    assert_eq!(graph.edge_count(), 3);
    let b = graph.get(&id("b.yml", 0)).unwrap();
    assert_eq!(b.dependents(), &[id("a.yml", 0)]);
    assert_eq!(b.dependencies(), &[id("c.yml", 0)]);
    assert!(!graph.add_dependency(&id("a.yml", 0), &id("z.yml", 0)));
}

// =============================================================================
// REPARSE LIFECYCLE
// =============================================================================

#[test]
fn test_redeclaration_inherits_dependents() {
    let mut graph = cycle();
    let b = DocumentUri::new("file:///ws/b.yml");
    graph.invalidate_document(&b);
    assert!(graph.lookup(EntityKind::Skill, "B").is_none());

    // B moved down one line but kept its name.
    graph.register(skill("b.yml", 3, "B"));
    graph.settle_document(&b);
    assert!(graph.take_woken().is_empty());

    let a = graph.get(&id("a.yml", 0)).unwrap();
    assert_eq!(a.dependencies(), &[id("b.yml", 3)]);
    let moved = graph.get(&id("b.yml", 3)).unwrap();
    assert_eq!(moved.dependents(), &[id("a.yml", 0)]);
    // Outgoing edges are rebuilt by the next resolution pass.
    assert!(moved.dependencies().is_empty());
}

#[test]
fn test_removed_declaration_wakes_referrers() {
    let mut graph = cycle();
    let b = DocumentUri::new("file:///ws/b.yml");
    graph.invalidate_document(&b);
    graph.settle_document(&b);
    assert_eq!(graph.take_woken(), vec![DocumentUri::new("file:///ws/a.yml")]);
}

#[test]
fn test_unresolved_name_wakes_on_registration() {
    let mut graph = EntityGraph::new();
    let referrer = DocumentUri::new("file:///ws/caller.yml");
    graph.note_unresolved(EntityKind::Mob, "Imp", &referrer);
    graph.register(skill("skills.yml", 0, "Imp"));
    assert!(graph.take_woken().is_empty(), "kinds are separate namespaces");
    graph.register(Entity::new(id("mobs.yml", 0), EntityKind::Mob, "Imp"));
    assert_eq!(graph.take_woken(), vec![referrer]);
}

#[test]
fn test_remove_document_leaves_dangling_edges_skipped() {
    let mut graph = cycle();
    graph.remove_document(&DocumentUri::new("file:///ws/b.yml"));
    assert_eq!(graph.len(), 2);
    let mut visited = Vec::new();
    graph.traverse([id("a.yml", 0)], Direction::Dependencies, |e| visited.push(e.name.clone()));
    assert!(visited.is_empty());
}
