//! Demo schema - small chemistry models used by the CLI and the tests
//!
//! - `Atom` and `Compound` are plain entities related through the default
//!   `Pivot<Atom, Compound>` (table `atom_compound`)
//! - `Proton` is a hand-written join entity between the same two types
//! - `Nucleus` references a single atom

use crate::database::Database;
use crate::entity::{Entity, Record, Storage};
use crate::node::Node;
use crate::pivot::{assert_saved, downcast, PivotError, PivotProtocol};
use crate::row::Row;
use crate::Result;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub storage: Storage,
    pub name: String,
}

impl Atom {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            storage: Storage::new(),
            name: name.into(),
        }
    }

    /// An atom that is already persisted under `id`
    pub fn saved(id: impl Into<Node>, name: impl Into<String>) -> Self {
        Self {
            storage: Storage::saved(id),
            name: name.into(),
        }
    }
}

impl Entity for Atom {
    fn name() -> String {
        "atom".to_string()
    }

    fn storage(&self) -> &Storage {
        &self.storage
    }

    fn storage_mut(&mut self) -> &mut Storage {
        &mut self.storage
    }

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self::new(row.extract::<String>("name")?))
    }

    fn to_row(&self) -> Result<Row> {
        Ok(Row::new()
            .with(Self::id_key(), self.storage.id.clone())
            .with("name", self.name.as_str()))
    }

    fn prepare(db: &Database) -> Result<()> {
        db.create(&Self::entity(), |atoms| {
            atoms.id::<Self>().string("name");
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Compound {
    pub storage: Storage,
    pub name: String,
}

impl Compound {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            storage: Storage::new(),
            name: name.into(),
        }
    }

    pub fn saved(id: impl Into<Node>, name: impl Into<String>) -> Self {
        Self {
            storage: Storage::saved(id),
            name: name.into(),
        }
    }
}

impl Entity for Compound {
    fn name() -> String {
        "compound".to_string()
    }

    fn storage(&self) -> &Storage {
        &self.storage
    }

    fn storage_mut(&mut self) -> &mut Storage {
        &mut self.storage
    }

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self::new(row.extract::<String>("name")?))
    }

    fn to_row(&self) -> Result<Row> {
        Ok(Row::new()
            .with(Self::id_key(), self.storage.id.clone())
            .with("name", self.name.as_str()))
    }

    fn prepare(db: &Database) -> Result<()> {
        db.create(&Self::entity(), |compounds| {
            compounds.id::<Self>().string("name");
        })
    }
}

/// Join entity between atoms and compounds with its own table, `protons`.
#[derive(Debug, Clone, PartialEq)]
pub struct Proton {
    pub storage: Storage,
    pub atom_id: Node,
    pub compound_id: Node,
}

impl Entity for Proton {
    fn name() -> String {
        "proton".to_string()
    }

    fn storage(&self) -> &Storage {
        &self.storage
    }

    fn storage_mut(&mut self) -> &mut Storage {
        &mut self.storage
    }

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            storage: Storage::new(),
            atom_id: row.extract(&Atom::foreign_id_key())?,
            compound_id: row.extract(&Compound::foreign_id_key())?,
        })
    }

    fn to_row(&self) -> Result<Row> {
        Ok(Row::new()
            .with(Self::id_key(), self.storage.id.clone())
            .with(Atom::foreign_id_key(), self.atom_id.clone())
            .with(Compound::foreign_id_key(), self.compound_id.clone()))
    }

    fn prepare(db: &Database) -> Result<()> {
        db.create(&Self::entity(), |protons| {
            protons.id::<Self>().foreign_id::<Atom>().foreign_id::<Compound>();
        })
    }
}

impl PivotProtocol for Proton {
    fn related(db: &Database, left: &dyn Record, right: &dyn Record) -> std::result::Result<bool, PivotError> {
        let (left_id, right_id) = assert_saved(left, right)?;
        let found = Self::query(db)
            .filter(left.record_foreign_id_key(), left_id)
            .filter(right.record_foreign_id_key(), right_id)
            .first()?;
        Ok(found.is_some())
    }

    fn attach(db: &Database, left: &dyn Record, right: &dyn Record) -> std::result::Result<(), PivotError> {
        let (atom_id, compound_id) = assert_saved(left, right)?;
        downcast::<Atom>(left)?;
        downcast::<Compound>(right)?;

        let mut proton = Proton {
            storage: Storage::new(),
            atom_id,
            compound_id,
        };
        Self::query(db).save(&mut proton)?;
        Ok(())
    }

    fn detach(db: &Database, left: &dyn Record, right: &dyn Record) -> std::result::Result<(), PivotError> {
        let (left_id, right_id) = assert_saved(left, right)?;
        Self::query(db)
            .filter(left.record_foreign_id_key(), left_id)
            .filter(right.record_foreign_id_key(), right_id)
            .delete()?;
        Ok(())
    }
}

/// Nucleus of one atom; table `nuclei`.
#[derive(Debug, Clone, PartialEq)]
pub struct Nucleus {
    pub storage: Storage,
    pub atom_id: Node,
}

impl Entity for Nucleus {
    fn name() -> String {
        "nucleus".to_string()
    }

    fn entity() -> String {
        "nuclei".to_string()
    }

    fn storage(&self) -> &Storage {
        &self.storage
    }

    fn storage_mut(&mut self) -> &mut Storage {
        &mut self.storage
    }

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            storage: Storage::new(),
            atom_id: row.extract(&Atom::foreign_id_key())?,
        })
    }

    fn to_row(&self) -> Result<Row> {
        Ok(Row::new()
            .with(Self::id_key(), self.storage.id.clone())
            .with(Atom::foreign_id_key(), self.atom_id.clone()))
    }

    fn prepare(db: &Database) -> Result<()> {
        db.create(&Self::entity(), |nuclei| {
            nuclei.id::<Self>().foreign_id::<Atom>();
        })
    }
}

/// Flat view of a named demo record, for tables and JSON output
#[derive(Debug, Clone, Serialize, tabled::Tabled)]
pub struct NamedRecord {
    #[tabled(rename = "Id")]
    pub id: String,
    #[tabled(rename = "Name")]
    pub name: String,
}

impl From<&Atom> for NamedRecord {
    fn from(atom: &Atom) -> Self {
        Self {
            id: atom.id().map(ToString::to_string).unwrap_or_default(),
            name: atom.name.clone(),
        }
    }
}

impl From<&Compound> for NamedRecord {
    fn from(compound: &Compound) -> Self {
        Self {
            id: compound.id().map(ToString::to_string).unwrap_or_default(),
            name: compound.name.clone(),
        }
    }
}

/// Create every demo table
pub fn prepare_all(db: &Database) -> Result<()> {
    db.prepare::<Atom>()?;
    db.prepare::<Compound>()?;
    db.prepare::<crate::pivot::Pivot<Atom, Compound>>()?;
    db.prepare::<Proton>()?;
    db.prepare::<Nucleus>()?;
    Ok(())
}

/// Drop every demo table
pub fn revert_all(db: &Database) -> Result<()> {
    db.revert::<Nucleus>()?;
    db.revert::<Proton>()?;
    db.revert::<crate::pivot::Pivot<Atom, Compound>>()?;
    db.revert::<Compound>()?;
    db.revert::<Atom>()?;
    Ok(())
}
