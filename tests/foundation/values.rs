//! Integration tests for Value and identifiers

use std::collections::HashSet;

use ontograph_foundation::{DataType, InstanceId, TypeId, Value};

#[test]
fn value_data_types() {
    assert_eq!(Value::from("Homer").data_type(), DataType::String);
    assert_eq!(Value::from(42_i64).data_type(), DataType::Long);
    assert_eq!(Value::from(0.5).data_type(), DataType::Double);
    assert_eq!(Value::from(true).data_type(), DataType::Boolean);
}

#[test]
fn values_dedupe_in_sets() {
    let set: HashSet<Value> = ["Simpson", "Simpson", "Flanders"]
        .into_iter()
        .map(Value::from)
        .collect();
    assert_eq!(set.len(), 2);
}

#[test]
fn doubles_compare_by_bits() {
    assert_eq!(Value::Double(f64::NAN), Value::Double(f64::NAN));
    assert_ne!(Value::Double(0.0), Value::Double(-0.0));
}

#[test]
fn different_kinds_never_equal() {
    assert_ne!(Value::from(1_i64), Value::from(1.0));
    assert_ne!(Value::from("true"), Value::from(true));
}

#[test]
fn identifier_display() {
    assert_eq!(format!("{}", InstanceId::new(3)), "#3");
    assert_eq!(format!("{}", TypeId::new(3)), "Type(3)");
    assert!(InstanceId::new(1) < InstanceId::new(2));
}
