//! The genealogy sample: a family ontology plus the Simpsons.
//!
//! Used by the `genealogy` binary and by the integration tests.

use ontograph_engine::{CommitSummary, Keyspace, Transaction};
use ontograph_foundation::{DataType, Error, InstanceId, Result, TypeId, Value};

/// Keyspace name used by the sample.
pub const KEYSPACE: &str = "genealogy";

/// Role types of the genealogy ontology.
#[derive(Clone, Copy, Debug)]
pub struct Roles {
    /// Abstract root of the marriage roles.
    pub spouse: TypeId,
    /// First spouse of an unordered marriage.
    pub spouse1: TypeId,
    /// Second spouse of an unordered marriage.
    pub spouse2: TypeId,
    /// Husband in a marriage.
    pub husband: TypeId,
    /// Wife in a marriage.
    pub wife: TypeId,
    /// Parent in a parentship.
    pub parent: TypeId,
    /// Mother in a parentship.
    pub mother: TypeId,
    /// Father in a parentship.
    pub father: TypeId,
    /// Child in a parentship.
    pub child: TypeId,
    /// Son in a parentship.
    pub son: TypeId,
    /// Daughter in a parentship.
    pub daughter: TypeId,
}

/// Resource types of the genealogy ontology.
#[derive(Clone, Copy, Debug)]
pub struct Resources {
    /// Gender label.
    pub gender: TypeId,
    /// Any date.
    pub date: TypeId,
    /// Date of birth.
    pub birth_date: TypeId,
    /// Date of death.
    pub death_date: TypeId,
    /// Any name.
    pub name: TypeId,
    /// First name.
    pub firstname: TypeId,
    /// Middle name.
    pub middlename: TypeId,
    /// Family name.
    pub surname: TypeId,
    /// External identifier.
    pub identifier: TypeId,
    /// Free-form notes.
    pub notes: TypeId,
    /// Degree of kinship.
    pub degree: TypeId,
    /// Confidence in a record.
    pub confidence: TypeId,
}

/// Relation types of the genealogy ontology.
#[derive(Clone, Copy, Debug)]
pub struct Relations {
    /// Abstract root of family relations.
    pub relatives: TypeId,
    /// Husband and wife.
    pub marriage: TypeId,
    /// Parents and their child.
    pub parentship: TypeId,
}

/// Entity types of the genealogy ontology.
#[derive(Clone, Copy, Debug)]
pub struct Entities {
    /// A person.
    pub person: TypeId,
    /// A recorded life event.
    pub event: TypeId,
    /// A wedding.
    pub wedding: TypeId,
    /// A funeral.
    pub funeral: TypeId,
    /// A christening.
    pub christening: TypeId,
    /// A birth.
    pub birth: TypeId,
    /// A death.
    pub death: TypeId,
}

/// Every type declared by [`write_ontology`].
#[derive(Clone, Copy, Debug)]
pub struct Ontology {
    /// Role types.
    pub roles: Roles,
    /// Resource types.
    pub resources: Resources,
    /// Relation types.
    pub relations: Relations,
    /// Entity types.
    pub entities: Entities,
}

/// Instances created by [`write_sample_marriage`].
#[derive(Clone, Copy, Debug)]
pub struct SampleMarriage {
    /// Homer J Simpson.
    pub homer: InstanceId,
    /// Marge J Simpson.
    pub marge: InstanceId,
    /// Their marriage.
    pub marriage: InstanceId,
}

/// Instances created by [`write_sample_parentship`].
#[derive(Clone, Copy, Debug)]
pub struct SampleParentship {
    /// Bart J Simpson.
    pub bart: InstanceId,
    /// Homer and Marge as father and mother of Bart.
    pub parentship: InstanceId,
}

/// Everything the sample writes.
#[derive(Clone, Copy, Debug)]
pub struct Genealogy {
    /// Declared types.
    pub ontology: Ontology,
    /// The marriage and its spouses.
    pub marriage: SampleMarriage,
    /// The parentship and its child.
    pub parentship: SampleParentship,
}

/// Declares the genealogy ontology.
///
/// `marriage` relates only `husband` and `wife`: `spouse1` and `spouse2`
/// are declared under `spouse` but left unrelated, since every related
/// role must be filled before a marriage can be committed.
pub fn write_ontology(tx: &mut Transaction<'_>) -> Result<Ontology> {
    let roles = write_roles(tx)?;
    let resources = write_resources(tx)?;

    let relatives = tx.put_relation_type("relatives")?;
    tx.set_abstract(relatives, true)?;

    let marriage = tx.put_relation_type("marriage")?;
    tx.set_supertype(marriage, relatives)?;
    tx.relates(marriage, roles.husband)?;
    tx.relates(marriage, roles.wife)?;
    tx.has_resource(marriage, resources.date)?;

    let parentship = tx.put_relation_type("parentship")?;
    tx.set_supertype(parentship, relatives)?;
    for role in [
        roles.parent,
        roles.mother,
        roles.father,
        roles.child,
        roles.son,
        roles.daughter,
    ] {
        tx.relates(parentship, role)?;
    }

    let entities = write_entities(tx, &roles, &resources)?;

    Ok(Ontology {
        roles,
        resources,
        relations: Relations {
            relatives,
            marriage,
            parentship,
        },
        entities,
    })
}

fn write_roles(tx: &mut Transaction<'_>) -> Result<Roles> {
    let spouse = tx.put_role_type("spouse")?;
    tx.set_abstract(spouse, true)?;
    let spouse1 = subtype(tx, "spouse1", spouse, Transaction::put_role_type)?;
    let spouse2 = subtype(tx, "spouse2", spouse, Transaction::put_role_type)?;
    let husband = subtype(tx, "husband", spouse, Transaction::put_role_type)?;
    let wife = subtype(tx, "wife", spouse, Transaction::put_role_type)?;

    let parent = tx.put_role_type("parent")?;
    let mother = subtype(tx, "mother", parent, Transaction::put_role_type)?;
    let father = subtype(tx, "father", parent, Transaction::put_role_type)?;

    let child = tx.put_role_type("child")?;
    let son = subtype(tx, "son", child, Transaction::put_role_type)?;
    let daughter = subtype(tx, "daughter", child, Transaction::put_role_type)?;

    Ok(Roles {
        spouse,
        spouse1,
        spouse2,
        husband,
        wife,
        parent,
        mother,
        father,
        child,
        son,
        daughter,
    })
}

fn write_resources(tx: &mut Transaction<'_>) -> Result<Resources> {
    let gender = put_string_type(tx, "gender")?;

    let date = put_string_type(tx, "date")?;
    let birth_date = subtype(tx, "birth-date", date, put_string_type)?;
    let death_date = subtype(tx, "death-date", date, put_string_type)?;

    let name = put_string_type(tx, "name")?;
    let firstname = subtype(tx, "firstname", name, put_string_type)?;
    let middlename = subtype(tx, "middlename", name, put_string_type)?;
    let surname = subtype(tx, "surname", name, put_string_type)?;

    let identifier = put_string_type(tx, "identifier")?;
    let notes = put_string_type(tx, "notes")?;
    let degree = tx.put_resource_type("degree", DataType::Long)?;
    let confidence = tx.put_resource_type("confidence", DataType::Long)?;

    Ok(Resources {
        gender,
        date,
        birth_date,
        death_date,
        name,
        firstname,
        middlename,
        surname,
        identifier,
        notes,
        degree,
        confidence,
    })
}

fn write_entities(
    tx: &mut Transaction<'_>,
    roles: &Roles,
    resources: &Resources,
) -> Result<Entities> {
    let person = tx.put_entity_type("person")?;
    for role in [
        roles.spouse,
        roles.parent,
        roles.child,
        roles.mother,
        roles.father,
        roles.son,
        roles.husband,
        roles.wife,
    ] {
        tx.plays(person, role)?;
    }
    for resource in [
        resources.gender,
        resources.birth_date,
        resources.death_date,
        resources.identifier,
        resources.firstname,
        resources.middlename,
        resources.surname,
    ] {
        tx.has_resource(person, resource)?;
    }

    let event = tx.put_entity_type("event")?;
    for resource in [
        resources.degree,
        resources.confidence,
        resources.notes,
        resources.date,
        resources.identifier,
    ] {
        tx.has_resource(event, resource)?;
    }

    let wedding = subtype(tx, "wedding", event, Transaction::put_entity_type)?;

    let funeral = subtype(tx, "funeral", event, Transaction::put_entity_type)?;
    tx.has_resource(funeral, resources.death_date)?;

    let christening = subtype(tx, "christening", event, Transaction::put_entity_type)?;
    tx.has_resource(christening, resources.death_date)?;

    let birth = subtype(tx, "birth", event, Transaction::put_entity_type)?;
    for resource in [
        resources.birth_date,
        resources.firstname,
        resources.middlename,
        resources.surname,
        resources.gender,
    ] {
        tx.has_resource(birth, resource)?;
    }

    let death = subtype(tx, "death", event, Transaction::put_entity_type)?;
    tx.has_resource(death, resources.death_date)?;

    Ok(Entities {
        person,
        event,
        wedding,
        funeral,
        christening,
        birth,
        death,
    })
}

fn put_string_type(tx: &mut Transaction<'_>, label: &str) -> Result<TypeId> {
    tx.put_resource_type(label, DataType::String)
}

/// Declares `label` with `declare` and places it under `parent`.
fn subtype<'k, F>(tx: &mut Transaction<'k>, label: &str, parent: TypeId, declare: F) -> Result<TypeId>
where
    F: Fn(&mut Transaction<'k>, &str) -> Result<TypeId>,
{
    let id = declare(tx, label)?;
    tx.set_supertype(id, parent)?;
    Ok(id)
}

/// Writes Homer and Marge and marries them.
///
/// The spouses share their middle name and surname resources.
pub fn write_sample_marriage(tx: &mut Transaction<'_>, ontology: &Ontology) -> Result<SampleMarriage> {
    let resources = &ontology.resources;
    let person = ontology.entities.person;

    let homer_first = tx.put_resource(resources.firstname, "Homer")?;
    let j_middle = tx.put_resource(resources.middlename, "J")?;
    let simpson = tx.put_resource(resources.surname, "Simpson")?;
    let male = tx.put_resource(resources.gender, "Male")?;

    let homer = tx.add_entity(person)?;
    for resource in [homer_first, j_middle, simpson, male] {
        tx.attach_resource(homer, resource)?;
    }

    let marge_first = tx.put_resource(resources.firstname, "Marge")?;
    let female = tx.put_resource(resources.gender, "Female")?;

    let marge = tx.add_entity(person)?;
    for resource in [marge_first, j_middle, simpson, female] {
        tx.attach_resource(marge, resource)?;
    }

    let marriage = tx.add_relation(ontology.relations.marriage)?;
    tx.put_role_player(marriage, ontology.roles.husband, homer)?;
    tx.put_role_player(marriage, ontology.roles.wife, marge)?;

    Ok(SampleMarriage {
        homer,
        marge,
        marriage,
    })
}

/// Writes Bart and records Homer and Marge as his parents.
///
/// The parents are found again through their unique first names.
pub fn write_sample_parentship(
    tx: &mut Transaction<'_>,
    ontology: &Ontology,
) -> Result<SampleParentship> {
    let resources = &ontology.resources;
    let roles = &ontology.roles;

    let bart_first = tx.put_resource(resources.firstname, "Bart")?;
    let j_middle = tx.put_resource(resources.middlename, "J")?;
    let simpson = tx.put_resource(resources.surname, "Simpson")?;
    let male = tx.put_resource(resources.gender, "Male")?;

    let bart = tx.add_entity(ontology.entities.person)?;
    for resource in [bart_first, j_middle, simpson, male] {
        tx.attach_resource(bart, resource)?;
    }

    let homer = owner_of_firstname(tx, ontology, "Homer")?;
    let marge = owner_of_firstname(tx, ontology, "Marge")?;

    let parentship = tx.add_relation(ontology.relations.parentship)?;
    tx.put_role_player(parentship, roles.mother, marge)?;
    tx.put_role_player(parentship, roles.father, homer)?;
    tx.put_role_player(parentship, roles.son, bart)?;

    Ok(SampleParentship { bart, parentship })
}

fn owner_of_firstname(tx: &Transaction<'_>, ontology: &Ontology, name: &str) -> Result<InstanceId> {
    let firstname = ontology.resources.firstname;
    let owner = match tx.graph().find_resource(firstname, &Value::from(name)) {
        Some(resource) => tx.owner(resource)?,
        None => None,
    };
    owner.ok_or_else(|| Error::unowned(tx.graph().types().label(firstname), name))
}

/// Writes the ontology and both samples in one transaction and commits it.
pub fn populate(keyspace: &Keyspace) -> Result<(Genealogy, CommitSummary)> {
    let mut tx = keyspace.open_transaction();
    let ontology = write_ontology(&mut tx)?;
    let marriage = write_sample_marriage(&mut tx, &ontology)?;
    let parentship = write_sample_parentship(&mut tx, &ontology)?;
    let summary = tx.commit()?;

    Ok((
        Genealogy {
            ontology,
            marriage,
            parentship,
        },
        summary,
    ))
}
