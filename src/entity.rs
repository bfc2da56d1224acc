//! Entity - the record capability every mapped type implements
//!
//! Two views of the same thing:
//! - `Entity` is static: table naming, key naming, row codec, schema hooks.
//! - `Record` is object-safe and blanket-implemented for every entity, so
//!   relation code can accept records of any type behind `&dyn Record`.

use crate::database::Database;
use crate::node::Node;
use crate::pivot::Pivot;
use crate::query::Query;
use crate::relations::Siblings;
use crate::row::Row;
use crate::Result;
use std::any::Any;
use std::fmt;

/// Column name used for primary keys unless an entity overrides it
pub const DEFAULT_ID_KEY: &str = "id";

/// Persistence state carried by every entity instance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Storage {
    /// Identifier assigned by the database once saved
    pub id: Option<Node>,
    /// True once saved and not deleted
    pub exists: bool,
}

impl Storage {
    pub fn new() -> Self {
        Self::default()
    }

    /// State of a record that has already been persisted under `id`
    pub fn saved(id: impl Into<Node>) -> Self {
        Self {
            id: Some(id.into()),
            exists: true,
        }
    }
}

/// A mapped record type.
pub trait Entity: fmt::Debug + Sized + 'static {
    /// Stable type-level name, e.g. `"atom"`
    fn name() -> String;

    /// Table name
    fn entity() -> String {
        format!("{}s", Self::name())
    }

    fn id_key() -> String {
        DEFAULT_ID_KEY.to_string()
    }

    /// Column name other tables use to reference this entity
    fn foreign_id_key() -> String {
        format!("{}_{}", Self::name(), Self::id_key())
    }

    fn storage(&self) -> &Storage;

    fn storage_mut(&mut self) -> &mut Storage;

    /// Decode an instance from a row. Persistence state is restored by the
    /// query layer, not here.
    fn from_row(row: &Row) -> Result<Self>;

    /// Encode an instance, including its id column
    fn to_row(&self) -> Result<Row>;

    /// Create this entity's table
    fn prepare(db: &Database) -> Result<()>;

    /// Drop this entity's table
    fn revert(db: &Database) -> Result<()> {
        db.delete(&Self::entity())
    }

    /// Base query scoped to this entity
    fn query(db: &Database) -> Query<'_, Self> {
        db.query::<Self>()
    }

    /// Sibling relation from this record to `Foreign` through the default
    /// pivot table.
    fn siblings<'a, Foreign: Entity>(
        &'a self,
        db: &'a Database,
    ) -> Siblings<'a, Self, Foreign, Pivot<Self, Foreign>> {
        Siblings::new(db, self)
    }
}

/// Type-erased view of an entity instance.
pub trait Record: fmt::Debug {
    /// `Entity::name` of the concrete type
    fn record_name(&self) -> String;

    /// `Entity::foreign_id_key` of the concrete type
    fn record_foreign_id_key(&self) -> String;

    fn id(&self) -> Option<&Node>;

    fn exists(&self) -> bool;

    /// Rust type name of the concrete type
    fn type_name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;

    fn snapshot(&self) -> RecordRef {
        RecordRef {
            type_name: self.type_name(),
            name: self.record_name(),
            id: self.id().cloned(),
            exists: self.exists(),
        }
    }
}

impl<E: Entity> Record for E {
    fn record_name(&self) -> String {
        E::name()
    }

    fn record_foreign_id_key(&self) -> String {
        E::foreign_id_key()
    }

    fn id(&self) -> Option<&Node> {
        self.storage().id.as_ref()
    }

    fn exists(&self) -> bool {
        self.storage().exists
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<E>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Owned snapshot of a record, carried by errors.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordRef {
    pub type_name: &'static str,
    pub name: String,
    pub id: Option<Node>,
    pub exists: bool,
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "{}(id: {}", self.name, id)?,
            None => write!(f, "{}(id: none", self.name)?,
        }
        if !self.exists {
            write!(f, ", unsaved")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::{Atom, Compound};

    #[test]
    fn test_default_naming() {
        assert_eq!(Atom::name(), "atom");
        assert_eq!(Atom::entity(), "atoms");
        assert_eq!(Atom::id_key(), "id");
        assert_eq!(Atom::foreign_id_key(), "atom_id");
        assert_eq!(Compound::foreign_id_key(), "compound_id");
    }

    #[test]
    fn test_record_view() {
        let atom = Atom::saved(42, "Hydrogen");
        let record: &dyn Record = &atom;

        assert_eq!(record.record_name(), "atom");
        assert_eq!(record.id(), Some(&Node::Int(42)));
        assert!(record.exists());
        assert!(record.as_any().downcast_ref::<Atom>().is_some());
        assert!(record.as_any().downcast_ref::<Compound>().is_none());
    }

    #[test]
    fn test_snapshot_display() {
        assert_eq!(Atom::saved(42, "Hydrogen").snapshot().to_string(), "atom(id: 42)");
        assert_eq!(Atom::new("Helium").snapshot().to_string(), "atom(id: none, unsaved)");
    }
}
