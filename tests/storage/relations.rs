//! Integration tests for relations and role players

use ontograph_foundation::{ErrorKind, TypeId};
use ontograph_storage::Graph;

struct Parentship {
    graph: Graph,
    person: TypeId,
    parentship: TypeId,
    parent: TypeId,
    mother: TypeId,
    father: TypeId,
    child: TypeId,
    son: TypeId,
    daughter: TypeId,
}

fn parentship() -> Parentship {
    let mut graph = Graph::new();
    let parent = graph.put_role_type("parent").unwrap();
    let mother = graph.put_role_type("mother").unwrap();
    let father = graph.put_role_type("father").unwrap();
    graph.set_supertype(mother, parent).unwrap();
    graph.set_supertype(father, parent).unwrap();
    let child = graph.put_role_type("child").unwrap();
    let son = graph.put_role_type("son").unwrap();
    let daughter = graph.put_role_type("daughter").unwrap();
    graph.set_supertype(son, child).unwrap();
    graph.set_supertype(daughter, child).unwrap();

    let relation = graph.put_relation_type("parentship").unwrap();
    for role in [parent, mother, father, child, son, daughter] {
        graph.relates(relation, role).unwrap();
    }

    let person = graph.put_entity_type("person").unwrap();
    for role in [parent, child, mother, father, son] {
        graph.plays(person, role).unwrap();
    }

    Parentship {
        graph,
        person,
        parentship: relation,
        parent,
        mother,
        father,
        child,
        son,
        daughter,
    }
}

#[test]
fn mandatory_roles_are_group_roots() {
    let p = parentship();
    assert_eq!(
        p.graph.types().mandatory_roles(p.parentship),
        vec![p.parent, p.child]
    );
}

#[test]
fn descendant_roles_fill_their_group() {
    let mut p = parentship();
    let homer = p.graph.add_entity(p.person).unwrap();
    let marge = p.graph.add_entity(p.person).unwrap();
    let bart = p.graph.add_entity(p.person).unwrap();
    let rel = p.graph.add_relation(p.parentship).unwrap();

    p.graph.put_role_player(rel, p.mother, marge).unwrap();
    assert_eq!(p.graph.missing_roles(rel).unwrap(), vec![p.child]);

    p.graph.put_role_player(rel, p.father, homer).unwrap();
    p.graph.put_role_player(rel, p.son, bart).unwrap();
    assert!(p.graph.missing_roles(rel).unwrap().is_empty());

    assert_eq!(p.graph.role_players(rel).count(), 3);
    assert_eq!(
        p.graph.relations_of(bart).collect::<Vec<_>>(),
        vec![(rel, p.son)]
    );
}

#[test]
fn unplayable_role_is_rejected() {
    let mut p = parentship();
    let lisa = p.graph.add_entity(p.person).unwrap();
    let rel = p.graph.add_relation(p.parentship).unwrap();

    let err = p.graph.put_role_player(rel, p.daughter, lisa).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::IllegalRolePlayer { .. }));
    assert_eq!(p.graph.role_players(rel).count(), 0);
}

#[test]
fn relating_a_role_does_not_relate_its_subroles() {
    let mut p = parentship();
    let guardianship = p.graph.put_relation_type("guardianship").unwrap();
    p.graph.relates(guardianship, p.parent).unwrap();
    let marge = p.graph.add_entity(p.person).unwrap();
    let rel = p.graph.add_relation(guardianship).unwrap();

    let err = p.graph.put_role_player(rel, p.mother, marge).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::IllegalRole { .. }));

    p.graph.put_role_player(rel, p.parent, marge).unwrap();
    assert_eq!(p.graph.role_players(rel).count(), 1);
}

#[test]
fn unrelated_role_is_rejected() {
    let mut p = parentship();
    let spouse = p.graph.put_role_type("spouse").unwrap();
    p.graph.plays(p.person, spouse).unwrap();
    let homer = p.graph.add_entity(p.person).unwrap();
    let rel = p.graph.add_relation(p.parentship).unwrap();

    let err = p.graph.put_role_player(rel, spouse, homer).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::IllegalRole { .. }));
}

#[test]
fn putting_the_same_player_twice_is_a_noop() {
    let mut p = parentship();
    let homer = p.graph.add_entity(p.person).unwrap();
    let rel = p.graph.add_relation(p.parentship).unwrap();

    p.graph.put_role_player(rel, p.father, homer).unwrap();
    p.graph.put_role_player(rel, p.father, homer).unwrap();

    assert_eq!(p.graph.role_players(rel).count(), 1);
}

#[test]
fn relations_can_play_roles() {
    let mut p = parentship();
    let witness = p.graph.put_role_type("witnessed").unwrap();
    let record = p.graph.put_relation_type("record").unwrap();
    p.graph.relates(record, witness).unwrap();
    p.graph.plays(p.parentship, witness).unwrap();

    let homer = p.graph.add_entity(p.person).unwrap();
    let bart = p.graph.add_entity(p.person).unwrap();
    let rel = p.graph.add_relation(p.parentship).unwrap();
    p.graph.put_role_player(rel, p.father, homer).unwrap();
    p.graph.put_role_player(rel, p.son, bart).unwrap();

    let entry = p.graph.add_relation(record).unwrap();
    p.graph.put_role_player(entry, witness, rel).unwrap();
    assert!(p.graph.missing_roles(entry).unwrap().is_empty());
}
