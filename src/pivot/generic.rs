use std::fmt;
use std::marker::PhantomData;
use super::{assert_saved, downcast, PivotError, PivotProtocol};
use crate::database::Database;
use crate::entity::{Entity, Record, Storage};
use crate::node::Node;
use crate::row::Row;
use crate::Result;

/// A basic pivot between two entities: left and right.
///
/// The pivot is itself an entity and can be prepared, queried and saved
/// like any other model. Its table name does not depend on the order of
/// the type parameters, so `Pivot<A, B>` and `Pivot<B, A>` share rows.
///
/// `Left` and `Right` must be distinct entities. A self pivot such as
/// `Pivot<A, A>` would declare the same foreign id column twice.
pub struct Pivot<Left: Entity, Right: Entity> {
    pub storage: Storage,
    pub left_id: Node,
    pub right_id: Node,
    _types: PhantomData<fn() -> (Left, Right)>,
}

impl<Left: Entity, Right: Entity> Pivot<Left, Right> {
    /// Unsaved pivot row between two saved records
    pub fn new(left: &Left, right: &Right) -> std::result::Result<Self, PivotError> {
        let (left_id, right_id) = assert_saved(left, right)?;
        Ok(Self {
            storage: Storage::new(),
            left_id,
            right_id,
            _types: PhantomData,
        })
    }
}

impl<Left: Entity, Right: Entity> fmt::Debug for Pivot<Left, Right> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pivot")
            .field("entity", &Self::entity())
            .field("storage", &self.storage)
            .field("left_id", &self.left_id)
            .field("right_id", &self.right_id)
            .finish()
    }
}

impl<Left: Entity, Right: Entity> Entity for Pivot<Left, Right> {
    fn name() -> String {
        Self::entity()
    }

    fn entity() -> String {
        let (left, right) = (Left::name(), Right::name());
        if left < right {
            format!("{}_{}", left, right)
        } else {
            format!("{}_{}", right, left)
        }
    }

    fn storage(&self) -> &Storage {
        &self.storage
    }

    fn storage_mut(&mut self) -> &mut Storage {
        &mut self.storage
    }

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            storage: Storage {
                id: row.extract(&Self::id_key())?,
                exists: false,
            },
            left_id: row.extract(&Left::foreign_id_key())?,
            right_id: row.extract(&Right::foreign_id_key())?,
            _types: PhantomData,
        })
    }

    fn to_row(&self) -> Result<Row> {
        Ok(Row::new()
            .with(Self::id_key(), self.storage.id.clone())
            .with(Left::foreign_id_key(), self.left_id.clone())
            .with(Right::foreign_id_key(), self.right_id.clone()))
    }

    fn prepare(db: &Database) -> Result<()> {
        db.create(&Self::entity(), |builder| {
            builder.id::<Self>().foreign_id::<Left>().foreign_id::<Right>();
        })
    }
}

impl<Left: Entity, Right: Entity> PivotProtocol for Pivot<Left, Right> {
    fn related(db: &Database, left: &dyn Record, right: &dyn Record) -> std::result::Result<bool, PivotError> {
        let (left_id, right_id) = assert_saved(left, right)?;

        let found = Self::query(db)
            .filter(left.record_foreign_id_key(), left_id)
            .filter(right.record_foreign_id_key(), right_id)
            .first()?;

        Ok(found.is_some())
    }

    fn attach(db: &Database, left: &dyn Record, right: &dyn Record) -> std::result::Result<(), PivotError> {
        assert_saved(left, right)?;

        let left = downcast::<Left>(left)?;
        let right = downcast::<Right>(right)?;

        let mut pivot = Pivot::<Left, Right>::new(left, right)?;
        Self::query(db).save(&mut pivot)?;
        Ok(())
    }

    fn detach(db: &Database, left: &dyn Record, right: &dyn Record) -> std::result::Result<(), PivotError> {
        let (left_id, right_id) = assert_saved(left, right)?;

        Self::query(db)
            .filter(Left::foreign_id_key(), left_id)
            .filter(Right::foreign_id_key(), right_id)
            .delete()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::{Atom, Compound, Nucleus};
    use crate::driver::LastQueryDriver;
    use crate::sql::Sql;
    use crate::Error;
    use std::sync::Arc;

    type AtomCompound = Pivot<Atom, Compound>;

    fn hydrogen() -> Atom {
        Atom::saved(42, "Hydrogen")
    }

    fn water() -> Compound {
        Compound::saved(1337, "Water")
    }

    fn sqlite() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.prepare::<AtomCompound>().unwrap();
        db
    }

    fn pivot_rows(db: &Database) -> Vec<AtomCompound> {
        db.query::<AtomCompound>().all().unwrap()
    }

    #[test]
    fn test_entity_name_is_order_independent() {
        assert_eq!(Pivot::<Atom, Compound>::entity(), "atom_compound");
        assert_eq!(Pivot::<Compound, Atom>::entity(), "atom_compound");
        assert_eq!(Pivot::<Nucleus, Atom>::entity(), "atom_nucleus");
        assert_eq!(AtomCompound::name(), AtomCompound::entity());
    }

    #[test]
    fn test_new_requires_saved_records() {
        let err = AtomCompound::new(&Atom::new("Hydrogen"), &Compound::new("Water")).unwrap_err();
        assert!(matches!(err, PivotError::ExistRequired(ref r) if r.name == "atom"));

        let pivot = AtomCompound::new(&hydrogen(), &water()).unwrap();
        assert_eq!(pivot.left_id, Node::Int(42));
        assert_eq!(pivot.right_id, Node::Int(1337));
        assert!(pivot.id().is_none());
        assert!(!pivot.exists());
    }

    #[test]
    fn test_row_codec() {
        let pivot = AtomCompound::new(&hydrogen(), &water()).unwrap();
        let row = pivot.to_row().unwrap();

        let keys: Vec<&str> = row.keys().collect();
        assert_eq!(keys, vec!["id", "atom_id", "compound_id"]);

        let decoded = AtomCompound::from_row(&row.with("id", 9i64)).unwrap();
        assert_eq!(decoded.storage.id, Some(Node::Int(9)));
        assert_eq!(decoded.right_id, Node::Int(1337));
    }

    #[test]
    fn test_from_row_missing_foreign_key() {
        let row = Row::new().with("id", 1i64).with("atom_id", 42i64);
        let err = AtomCompound::from_row(&row).unwrap_err();
        assert!(matches!(err, Error::MissingKey(ref k) if k == "compound_id"));
    }

    #[test]
    fn test_attach_sql() {
        let lqd = Arc::new(LastQueryDriver::new());
        let db = Database::new(lqd.clone());

        let atom = hydrogen();
        atom.siblings::<Compound>(&db).attach(&atom, &water()).unwrap();

        let (statement, values) = lqd.last_query().unwrap().serialize();
        assert_eq!(
            statement,
            "INSERT INTO `atom_compound` (`id`, `atom_id`, `compound_id`) VALUES (?, ?, ?)"
        );
        assert_eq!(values, vec![Node::Null, Node::Int(42), Node::Int(1337)]);
    }

    #[test]
    fn test_prepare_sql() {
        let lqd = Arc::new(LastQueryDriver::new());
        let db = Database::new(lqd.clone());

        AtomCompound::prepare(&db).unwrap();
        AtomCompound::revert(&db).unwrap();

        let queries: Vec<String> = lqd.queries().iter().map(|sql| sql.serialize().0).collect();
        assert_eq!(
            queries,
            vec![
                "CREATE TABLE IF NOT EXISTS `atom_compound` (`id` INTEGER PRIMARY KEY AUTOINCREMENT, `atom_id` INTEGER NOT NULL, `compound_id` INTEGER NOT NULL)".to_string(),
                "DROP TABLE IF EXISTS `atom_compound`".to_string(),
            ]
        );
    }

    #[test]
    fn test_attach_inserts_one_row() {
        let db = sqlite();
        AtomCompound::attach(&db, &hydrogen(), &water()).unwrap();

        let rows = pivot_rows(&db);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].left_id, Node::Int(42));
        assert_eq!(rows[0].right_id, Node::Int(1337));
        assert_eq!(rows[0].storage, Storage::saved(1));
    }

    #[test]
    fn test_related_then_detach() {
        let db = sqlite();
        let (atom, compound) = (hydrogen(), water());

        assert!(!AtomCompound::related(&db, &atom, &compound).unwrap());
        AtomCompound::attach(&db, &atom, &compound).unwrap();
        assert!(AtomCompound::related(&db, &atom, &compound).unwrap());
        assert!(AtomCompound::related(&db, &compound, &atom).unwrap());

        AtomCompound::detach(&db, &atom, &compound).unwrap();
        assert!(!AtomCompound::related(&db, &atom, &compound).unwrap());
        assert!(pivot_rows(&db).is_empty());
    }

    #[test]
    fn test_detach_without_rows_is_ok() {
        let db = sqlite();
        AtomCompound::detach(&db, &hydrogen(), &water()).unwrap();
    }

    #[test]
    fn test_attach_twice_duplicates() {
        let db = sqlite();
        let (atom, compound) = (hydrogen(), water());

        AtomCompound::attach(&db, &atom, &compound).unwrap();
        AtomCompound::attach(&db, &atom, &compound).unwrap();

        assert_eq!(pivot_rows(&db).len(), 2);
        assert!(AtomCompound::related(&db, &atom, &compound).unwrap());

        AtomCompound::detach(&db, &atom, &compound).unwrap();
        assert!(pivot_rows(&db).is_empty());
    }

    #[test]
    fn test_reversed_declaration_shares_rows() {
        let db = sqlite();
        Pivot::<Compound, Atom>::attach(&db, &water(), &hydrogen()).unwrap();
        assert!(AtomCompound::related(&db, &hydrogen(), &water()).unwrap());
    }

    #[test]
    fn test_attach_wrong_type_writes_nothing() {
        let lqd = Arc::new(LastQueryDriver::new());
        let db = Database::new(lqd.clone());

        let err = AtomCompound::attach(&db, &water(), &hydrogen()).unwrap_err();
        match err {
            PivotError::InvalidType { record, desired } => {
                assert_eq!(record.name, "compound");
                assert!(desired.ends_with("Atom"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(lqd.last_query().is_none());
    }

    #[test]
    fn test_attach_wrong_right_type_writes_nothing() {
        let db = sqlite();
        let atom = hydrogen();

        let err = AtomCompound::attach(&db, &atom, &atom).unwrap_err();
        match err {
            PivotError::InvalidType { record, desired } => {
                assert_eq!(record.name, "atom");
                assert!(desired.ends_with("Compound"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(db.query::<AtomCompound>().count().unwrap(), 0);
    }

    #[test]
    fn test_precondition_failure_runs_no_statement() {
        let lqd = Arc::new(LastQueryDriver::new());
        let db = Database::new(lqd.clone());
        let unsaved = Compound::new("Water");

        assert!(AtomCompound::attach(&db, &hydrogen(), &unsaved).is_err());
        assert!(AtomCompound::detach(&db, &hydrogen(), &unsaved).is_err());
        assert!(AtomCompound::related(&db, &hydrogen(), &unsaved).is_err());
        assert!(lqd.queries().is_empty());
    }

    #[test]
    fn test_missing_table_is_unspecified() {
        let db = Database::open_in_memory().unwrap();
        let err = AtomCompound::attach(&db, &hydrogen(), &water()).unwrap_err();
        assert!(matches!(err, PivotError::Unspecified(ref inner) if matches!(**inner, Error::Storage(_))));
    }

    #[test]
    fn test_detach_filters_by_both_keys() {
        let lqd = Arc::new(LastQueryDriver::new());
        let db = Database::new(lqd.clone());
        AtomCompound::detach(&db, &hydrogen(), &water()).unwrap();

        let sql = lqd.last_query().unwrap();
        assert!(matches!(sql, Sql::Delete { .. }));
        assert_eq!(
            sql.serialize().0,
            "DELETE FROM `atom_compound` WHERE `atom_compound`.`atom_id` = ? AND `atom_compound`.`compound_id` = ?"
        );
    }
}
