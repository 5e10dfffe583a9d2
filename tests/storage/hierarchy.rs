//! Integration tests for type declarations and hierarchies

use ontograph_foundation::{DataType, ErrorKind, Kind};
use ontograph_storage::Graph;

// =============================================================================
// Declarations
// =============================================================================

#[test]
fn declarations_are_idempotent() {
    let mut graph = Graph::new();
    let first = graph.put_entity_type("person").unwrap();
    let again = graph.put_entity_type("person").unwrap();

    assert_eq!(first, again);
    assert_eq!(graph.types().len(), 1);
    assert_eq!(graph.resolve("person").unwrap(), first);
}

#[test]
fn redeclaring_with_another_kind_conflicts() {
    let mut graph = Graph::new();
    graph.put_entity_type("person").unwrap();

    let err = graph.put_role_type("person").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::TypeConflict { .. }));
}

#[test]
fn redeclaring_resource_with_another_data_type_conflicts() {
    let mut graph = Graph::new();
    graph.put_resource_type("age", DataType::Long).unwrap();

    let err = graph.put_resource_type("age", DataType::String).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::TypeConflict { .. }));
}

#[test]
fn resolving_unknown_label_fails() {
    let graph = Graph::new();
    let err = graph.resolve("unicorn").unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnknownType("unicorn".to_string()));
}

// =============================================================================
// Hierarchy
// =============================================================================

#[test]
fn supertypes_must_share_kind() {
    let mut graph = Graph::new();
    let parent = graph.put_role_type("parent").unwrap();
    let person = graph.put_entity_type("person").unwrap();

    let err = graph.set_supertype(person, parent).unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::KindMismatch {
            expected: Kind::Entity,
            actual: Kind::Role,
            ..
        }
    ));
}

#[test]
fn cycles_are_rejected() {
    let mut graph = Graph::new();
    let a = graph.put_entity_type("a").unwrap();
    let b = graph.put_entity_type("b").unwrap();
    graph.set_supertype(a, b).unwrap();

    let err = graph.set_supertype(b, a).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::CyclicHierarchy { .. }));

    let err = graph.set_supertype(a, a).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::CyclicHierarchy { .. }));
}

#[test]
fn resource_hierarchies_share_data_type() {
    let mut graph = Graph::new();
    let name = graph.put_resource_type("name", DataType::String).unwrap();
    let degree = graph.put_resource_type("degree", DataType::Long).unwrap();

    let err = graph.set_supertype(degree, name).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::TypeMismatch { .. }));
}

#[test]
fn ancestors_walk_to_root() {
    let mut graph = Graph::new();
    let event = graph.put_entity_type("event").unwrap();
    let birth = graph.put_entity_type("birth").unwrap();
    let twin_birth = graph.put_entity_type("twin-birth").unwrap();
    graph.set_supertype(birth, event).unwrap();
    graph.set_supertype(twin_birth, birth).unwrap();

    let chain: Vec<_> = graph.types().ancestors(twin_birth).collect();
    assert_eq!(chain, vec![twin_birth, birth, event]);
    assert!(graph.types().is_subtype_of(twin_birth, event));
    assert!(!graph.types().is_subtype_of(event, birth));
    assert_eq!(graph.types().subtypes(event).collect::<Vec<_>>(), vec![birth]);
}

#[test]
fn reparenting_moves_subtype_index() {
    let mut graph = Graph::new();
    let event = graph.put_entity_type("event").unwrap();
    let ceremony = graph.put_entity_type("ceremony").unwrap();
    let wedding = graph.put_entity_type("wedding").unwrap();

    graph.set_supertype(wedding, event).unwrap();
    graph.set_supertype(wedding, ceremony).unwrap();

    assert_eq!(graph.types().subtypes(event).count(), 0);
    assert_eq!(graph.types().get(wedding).unwrap().supertype(), Some(ceremony));
}

#[test]
fn schema_building_checks_kinds() {
    let mut graph = Graph::new();
    let person = graph.put_entity_type("person").unwrap();
    let name = graph.put_resource_type("name", DataType::String).unwrap();

    assert!(matches!(
        graph.relates(person, name).unwrap_err().kind,
        ErrorKind::KindMismatch { .. }
    ));
    assert!(matches!(
        graph.plays(name, name).unwrap_err().kind,
        ErrorKind::KindMismatch { .. }
    ));
    assert!(matches!(
        graph.has_resource(person, person).unwrap_err().kind,
        ErrorKind::KindMismatch { .. }
    ));
}
