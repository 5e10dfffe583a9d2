//! The genealogy sample end to end

use ontograph::genealogy::{self, KEYSPACE};
use ontograph::{ErrorKind, Keyspace, Value};

#[test]
fn genealogy_round_trip() {
    let keyspace = Keyspace::new(KEYSPACE);
    let (sample, summary) = genealogy::populate(&keyspace).unwrap();

    assert_eq!(summary.version, 1);
    assert_eq!(summary.entities, 3);
    assert_eq!(summary.relations, 2);
    assert_eq!(summary.resources, 7);

    let graph = keyspace.snapshot();
    let homer_name = graph
        .find_resource(sample.ontology.resources.firstname, &Value::from("Homer"))
        .unwrap();
    assert_eq!(graph.owner(homer_name).unwrap(), Some(sample.marriage.homer));
}

#[test]
fn parentship_needs_parents_on_record() {
    let keyspace = Keyspace::new(KEYSPACE);
    let mut tx = keyspace.open_transaction();
    let ontology = genealogy::write_ontology(&mut tx).unwrap();

    let err = genealogy::write_sample_parentship(&mut tx, &ontology).unwrap_err();
    assert_eq!(
        err.kind,
        ErrorKind::Unowned {
            resource_type: "firstname".to_string(),
            value: "Homer".to_string(),
        }
    );
}

#[test]
fn shared_resources_have_many_owners() {
    let keyspace = Keyspace::new(KEYSPACE);
    let (sample, _) = genealogy::populate(&keyspace).unwrap();
    let graph = keyspace.snapshot();

    let simpson = graph
        .find_resource(sample.ontology.resources.surname, &Value::from("Simpson"))
        .unwrap();
    assert_eq!(
        graph.owners(simpson).collect::<Vec<_>>(),
        vec![
            sample.marriage.homer,
            sample.marriage.marge,
            sample.parentship.bart
        ]
    );
    assert!(matches!(
        graph.owner(simpson).unwrap_err().kind,
        ErrorKind::AmbiguousOwner { owners: 3, .. }
    ));
}

#[test]
fn parentship_players() {
    let keyspace = Keyspace::new(KEYSPACE);
    let (sample, _) = genealogy::populate(&keyspace).unwrap();
    let graph = keyspace.snapshot();
    let roles = sample.ontology.roles;

    let mut players: Vec<_> = graph.role_players(sample.parentship.parentship).collect();
    players.sort();
    let mut expected = vec![
        (roles.mother, sample.marriage.marge),
        (roles.father, sample.marriage.homer),
        (roles.son, sample.parentship.bart),
    ];
    expected.sort();
    assert_eq!(players, expected);

    assert_eq!(graph.relations_of(sample.marriage.homer).count(), 2);
}

#[test]
fn relatives_is_abstract() {
    let keyspace = Keyspace::new(KEYSPACE);
    let (sample, _) = genealogy::populate(&keyspace).unwrap();

    let mut tx = keyspace.open_transaction();
    let err = tx
        .add_relation(sample.ontology.relations.relatives)
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::AbstractInstantiation(_)));
}

#[test]
fn spouse_is_not_a_marriage_slot() {
    let keyspace = Keyspace::new(KEYSPACE);
    let (sample, _) = genealogy::populate(&keyspace).unwrap();

    let mut tx = keyspace.open_transaction();
    let ned = tx.add_entity(sample.ontology.entities.person).unwrap();
    let marriage = tx.add_relation(sample.ontology.relations.marriage).unwrap();
    let err = tx
        .put_role_player(marriage, sample.ontology.roles.spouse, ned)
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::IllegalRole { .. }));
}

#[test]
fn person_cannot_play_daughter() {
    let keyspace = Keyspace::new(KEYSPACE);
    let (sample, _) = genealogy::populate(&keyspace).unwrap();
    let ontology = sample.ontology;

    let mut tx = keyspace.open_transaction();
    let lisa = tx.add_entity(ontology.entities.person).unwrap();
    let parentship = tx.add_relation(ontology.relations.parentship).unwrap();
    let err = tx
        .put_role_player(parentship, ontology.roles.daughter, lisa)
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::IllegalRolePlayer { .. }));
}

#[test]
fn wedding_cannot_carry_a_death_date() {
    let keyspace = Keyspace::new(KEYSPACE);
    let (sample, _) = genealogy::populate(&keyspace).unwrap();
    let ontology = sample.ontology;

    let mut tx = keyspace.open_transaction();
    let wedding = tx.add_entity(ontology.entities.wedding).unwrap();
    let died = tx.put_resource(ontology.resources.death_date, "1999-01-01").unwrap();
    let err = tx.attach_resource(wedding, died).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::IllegalAttribute { .. }));

    let funeral = tx.add_entity(ontology.entities.funeral).unwrap();
    tx.attach_resource(funeral, died).unwrap();
}

#[test]
fn cyclic_role_hierarchy_is_rejected() {
    let keyspace = Keyspace::new(KEYSPACE);
    let (sample, _) = genealogy::populate(&keyspace).unwrap();
    let roles = sample.ontology.roles;

    let mut tx = keyspace.open_transaction();
    let err = tx.set_supertype(roles.parent, roles.mother).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::CyclicHierarchy { .. }));
}

#[test]
fn incomplete_marriage_leaves_keyspace_unchanged() {
    let keyspace = Keyspace::new(KEYSPACE);
    let (sample, _) = genealogy::populate(&keyspace).unwrap();
    let before = keyspace.snapshot();

    let mut tx = keyspace.open_transaction();
    let ned = tx.add_entity(sample.ontology.entities.person).unwrap();
    let marriage = tx.add_relation(sample.ontology.relations.marriage).unwrap();
    tx.put_role_player(marriage, sample.ontology.roles.husband, ned)
        .unwrap();
    let err = tx.commit().unwrap_err();

    assert!(matches!(err.kind, ErrorKind::Validation(_)));
    let after = keyspace.snapshot();
    assert_eq!(keyspace.version(), 1);
    assert_eq!(after.entity_count(), before.entity_count());
    assert_eq!(after.relation_count(), before.relation_count());
}

#[test]
fn events_carry_inherited_resources() {
    let keyspace = Keyspace::new(KEYSPACE);
    let (sample, _) = genealogy::populate(&keyspace).unwrap();
    let ontology = sample.ontology;

    let mut tx = keyspace.open_transaction();
    let wedding = tx.add_entity(ontology.entities.wedding).unwrap();
    let confidence = tx.put_resource(ontology.resources.confidence, 80_i64).unwrap();
    let when = tx.put_resource(ontology.resources.date, "1980-04-01").unwrap();
    tx.attach_resource(wedding, confidence).unwrap();
    tx.attach_resource(wedding, when).unwrap();

    let gender = tx.put_resource(ontology.resources.gender, "Male").unwrap();
    let err = tx.attach_resource(wedding, gender).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::IllegalAttribute { .. }));

    tx.commit().unwrap();
    assert_eq!(keyspace.version(), 2);
}
