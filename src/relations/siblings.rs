use std::marker::PhantomData;
use crate::database::Database;
use crate::entity::{Entity, Record};
use crate::pivot::{Pivot, PivotError, PivotProtocol};
use crate::query::{Query, QueryRepresentable};

/// A many-to-many relation from a local record to every `Foreign` record
/// it shares a `Through` pivot row with.
///
/// Built on demand and never stored. `Siblings::new` binds the default
/// `Pivot<Local, Foreign>`; `Siblings::through` binds any other join entity.
pub struct Siblings<'a, Local, Foreign, Through = Pivot<Local, Foreign>>
where
    Local: Entity,
    Foreign: Entity,
    Through: PivotProtocol,
{
    db: &'a Database,
    local: &'a Local,
    _types: PhantomData<fn() -> (Foreign, Through)>,
}

impl<'a, Local: Entity, Foreign: Entity> Siblings<'a, Local, Foreign, Pivot<Local, Foreign>> {
    pub fn new(db: &'a Database, local: &'a Local) -> Self {
        Self::through(db, local)
    }
}

impl<'a, Local, Foreign, Through> Siblings<'a, Local, Foreign, Through>
where
    Local: Entity,
    Foreign: Entity,
    Through: PivotProtocol,
{
    /// Relation through an explicit join entity
    pub fn through(db: &'a Database, local: &'a Local) -> Self {
        Self {
            db,
            local,
            _types: PhantomData,
        }
    }

    /// See `PivotProtocol::related`
    pub fn related(&self, left: &dyn Record, right: &dyn Record) -> Result<bool, PivotError> {
        Through::related(self.db, left, right)
    }

    /// See `PivotProtocol::attach`
    pub fn attach(&self, left: &dyn Record, right: &dyn Record) -> Result<(), PivotError> {
        Through::attach(self.db, left, right)
    }

    /// See `PivotProtocol::detach`
    pub fn detach(&self, left: &dyn Record, right: &dyn Record) -> Result<(), PivotError> {
        Through::detach(self.db, left, right)
    }

    /// Foreign records joined through the pivot and filtered on the local
    /// id. The query is returned unexecuted.
    pub fn make_query(&self) -> Result<Query<'a, Foreign>, PivotError> {
        let local_id = self
            .local
            .id()
            .cloned()
            .ok_or_else(|| PivotError::id_required(self.local))?;

        Ok(Foreign::query(self.db)
            .join::<Through>()
            .filter_on::<Through>(Local::foreign_id_key(), local_id))
    }
}

impl<'a, Local, Foreign, Through> QueryRepresentable<'a, Foreign> for Siblings<'a, Local, Foreign, Through>
where
    Local: Entity,
    Foreign: Entity,
    Through: PivotProtocol,
{
    type Error = PivotError;

    fn make_query(&self) -> Result<Query<'a, Foreign>, PivotError> {
        Siblings::make_query(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::{Atom, Compound, Proton};
    use crate::driver::LastQueryDriver;
    use crate::entity::Storage;
    use crate::node::Node;
    use std::sync::Arc;

    fn chemistry() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.prepare::<Atom>().unwrap();
        db.prepare::<Compound>().unwrap();
        db.prepare::<Pivot<Atom, Compound>>().unwrap();
        db
    }

    fn saved<E: Entity>(db: &Database, mut entity: E) -> E {
        db.query::<E>().save(&mut entity).unwrap();
        entity
    }

    #[test]
    fn test_query_through_custom_pivot() {
        let lqd = Arc::new(LastQueryDriver::new());
        let db = Database::new(lqd.clone());
        let atom = Atom::saved(42, "Hydrogen");

        let compounds = Siblings::<Atom, Compound, Proton>::through(&db, &atom);
        let found = compounds.all().unwrap();
        assert!(found.is_empty());

        let (statement, values) = lqd.last_query().unwrap().serialize();
        assert_eq!(
            statement,
            "SELECT `compounds`.* FROM `compounds` JOIN `protons` ON `compounds`.`id` = `protons`.`compound_id` WHERE `protons`.`atom_id` = ?"
        );
        assert_eq!(values, vec![Node::Int(42)]);
    }

    #[test]
    fn test_default_pivot_query_shape() {
        let db = Database::new(LastQueryDriver::new());
        let atom = Atom::saved(42, "Hydrogen");

        let query = atom.siblings::<Compound>(&db).make_query().unwrap();
        let (statement, values) = query.select_sql().serialize();
        assert_eq!(
            statement,
            "SELECT `compounds`.* FROM `compounds` JOIN `atom_compound` ON `compounds`.`id` = `atom_compound`.`compound_id` WHERE `atom_compound`.`atom_id` = ?"
        );
        assert_eq!(values, vec![Node::Int(42)]);
    }

    #[test]
    fn test_make_query_requires_local_id() {
        let db = Database::new(LastQueryDriver::new());
        let atom = Atom::new("Hydrogen");

        let err = atom.siblings::<Compound>(&db).make_query().unwrap_err();
        assert!(matches!(err, PivotError::IdRequired(ref r) if r.name == "atom"));
    }

    #[test]
    fn test_siblings_fetch_related_compounds() {
        let db = chemistry();
        let hydrogen = saved(&db, Atom::new("Hydrogen"));
        let oxygen = saved(&db, Atom::new("Oxygen"));
        let water = saved(&db, Compound::new("Water"));
        let methane = saved(&db, Compound::new("Methane"));
        let ozone = saved(&db, Compound::new("Ozone"));

        let of_hydrogen = hydrogen.siblings::<Compound>(&db);
        of_hydrogen.attach(&hydrogen, &water).unwrap();
        of_hydrogen.attach(&hydrogen, &methane).unwrap();
        oxygen.siblings::<Compound>(&db).attach(&oxygen, &water).unwrap();
        oxygen.siblings::<Compound>(&db).attach(&oxygen, &ozone).unwrap();

        let mut names: Vec<String> = of_hydrogen.all().unwrap().into_iter().map(|c| c.name).collect();
        names.sort();
        assert_eq!(names, vec!["Methane", "Water"]);
        assert_eq!(of_hydrogen.count().unwrap(), 2);

        let first = of_hydrogen.first().unwrap().unwrap();
        assert!(first.storage.exists);

        // the reverse relation reads the same pivot table
        let atoms_of_water = water.siblings::<Atom>(&db);
        assert_eq!(atoms_of_water.count().unwrap(), 2);
    }

    #[test]
    fn test_delegation_round_trip() {
        let db = chemistry();
        let hydrogen = saved(&db, Atom::new("Hydrogen"));
        let water = saved(&db, Compound::new("Water"));
        let compounds = hydrogen.siblings::<Compound>(&db);

        assert!(!compounds.related(&hydrogen, &water).unwrap());
        compounds.attach(&hydrogen, &water).unwrap();
        assert!(compounds.related(&hydrogen, &water).unwrap());
        compounds.detach(&hydrogen, &water).unwrap();
        assert!(!compounds.related(&hydrogen, &water).unwrap());
        assert!(compounds.all().unwrap().is_empty());
    }

    #[test]
    fn test_delegation_propagates_errors() {
        let db = chemistry();
        let hydrogen = saved(&db, Atom::new("Hydrogen"));
        let unsaved = Compound::new("Water");

        let err = hydrogen.siblings::<Compound>(&db).attach(&hydrogen, &unsaved).unwrap_err();
        assert!(matches!(err, PivotError::ExistRequired(ref r) if r.name == "compound"));
        assert_eq!(unsaved.storage, Storage::new());
    }
}
