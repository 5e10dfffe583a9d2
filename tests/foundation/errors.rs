//! Integration tests for Error types
//!
//! Tests error construction, display, context, and violation batches.

use ontograph_foundation::{DataType, Error, ErrorContext, ErrorKind, InstanceId, Kind, ValidationErrors};

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn error_type_conflict() {
    let err = Error::type_conflict("person", Kind::Entity, Kind::Role);
    assert!(matches!(err.kind, ErrorKind::TypeConflict { .. }));
    let msg = format!("{err}");
    assert!(msg.contains("person"));
    assert!(msg.contains("entity"));
    assert!(msg.contains("role"));
}

#[test]
fn error_type_mismatch() {
    let err = Error::type_mismatch("age", DataType::Long, DataType::String);
    assert!(matches!(err.kind, ErrorKind::TypeMismatch { .. }));
    let msg = format!("{err}");
    assert!(msg.contains("long"));
    assert!(msg.contains("string"));
}

#[test]
fn error_cyclic_hierarchy() {
    let err = Error::cyclic_hierarchy("parent", "mother");
    let msg = format!("{err}");
    assert!(msg.contains("parent"));
    assert!(msg.contains("mother"));
}

#[test]
fn error_unknown_instance() {
    let err = Error::unknown_instance(InstanceId::new(42));
    assert_eq!(err.kind, ErrorKind::UnknownInstance(InstanceId::new(42)));
    assert!(format!("{err}").contains("#42"));
}

#[test]
fn error_unowned() {
    let err = Error::unowned("firstname", "Homer");
    assert_eq!(
        format!("{err}"),
        "no instance owns `firstname` Homer"
    );
}

#[test]
fn error_illegal_role_player() {
    let err = Error::illegal_role_player("daughter", "person");
    assert_eq!(
        format!("{err}"),
        "illegal role player: `person` may not play `daughter`"
    );
}

// =============================================================================
// Error Context
// =============================================================================

#[test]
fn error_with_context() {
    let err = Error::abstract_instantiation("relatives").with_context(
        ErrorContext::new()
            .with_keyspace("genealogy")
            .with_operation("add_relation"),
    );
    let context = err.context.clone().unwrap();
    assert_eq!(format!("{context}"), "in add_relation on keyspace `genealogy`");
    assert!(matches!(err.kind, ErrorKind::AbstractInstantiation(_)));
}

// =============================================================================
// Validation Batches
// =============================================================================

#[test]
fn validation_errors_collect_and_display() {
    let errors: ValidationErrors = [
        ErrorKind::IncompleteRelation {
            relation: InstanceId::new(7),
            relation_type: "marriage".to_string(),
            missing_role: "wife".to_string(),
        },
        ErrorKind::IllegalAttribute {
            owner: "person".to_string(),
            resource: "degree".to_string(),
        },
    ]
    .into_iter()
    .collect();

    assert_eq!(errors.len(), 2);
    let msg = format!("{errors}");
    assert!(msg.starts_with("validation failed with 2 error(s)"));
    assert!(msg.contains("wife"));
    assert!(msg.contains("degree"));

    let err: Error = errors.into();
    assert!(matches!(err.kind, ErrorKind::Validation(ref v) if v.len() == 2));
}
