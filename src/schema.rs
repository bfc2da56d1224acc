//! Schema definitions - column declarations for creating and dropping tables

use crate::entity::Entity;

/// Kind of a declared column
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Auto-incrementing primary key
    Id,
    /// Non-null reference to another entity's id
    ForeignId { entity: String },
    String,
    Int,
    Double,
    Bool,
}

impl FieldKind {
    /// SQLite column type, without nullability
    pub fn sql_type(&self) -> &'static str {
        match self {
            FieldKind::Id => "INTEGER PRIMARY KEY AUTOINCREMENT",
            FieldKind::ForeignId { .. } | FieldKind::Int | FieldKind::Bool => "INTEGER",
            FieldKind::String => "TEXT",
            FieldKind::Double => "REAL",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub kind: FieldKind,
    pub optional: bool,
}

/// Collects the columns of a table being created.
#[derive(Debug, Default)]
pub struct Builder {
    entity: String,
    fields: Vec<Field>,
}

impl Builder {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            fields: Vec::new(),
        }
    }

    fn push(&mut self, name: String, kind: FieldKind, optional: bool) -> &mut Self {
        self.fields.push(Field { name, kind, optional });
        self
    }

    /// Primary key column named after `E::id_key()`
    pub fn id<E: Entity>(&mut self) -> &mut Self {
        self.push(E::id_key(), FieldKind::Id, false)
    }

    /// Reference column named after `E::foreign_id_key()`
    pub fn foreign_id<E: Entity>(&mut self) -> &mut Self {
        self.push(E::foreign_id_key(), FieldKind::ForeignId { entity: E::entity() }, false)
    }

    pub fn string(&mut self, name: &str) -> &mut Self {
        self.push(name.to_string(), FieldKind::String, false)
    }

    pub fn int(&mut self, name: &str) -> &mut Self {
        self.push(name.to_string(), FieldKind::Int, false)
    }

    pub fn double(&mut self, name: &str) -> &mut Self {
        self.push(name.to_string(), FieldKind::Double, false)
    }

    pub fn bool(&mut self, name: &str) -> &mut Self {
        self.push(name.to_string(), FieldKind::Bool, false)
    }

    /// Mark the most recently declared column nullable
    pub fn optional(&mut self) -> &mut Self {
        if let Some(field) = self.fields.last_mut() {
            field.optional = true;
        }
        self
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn build(self) -> Schema {
        Schema::Create {
            entity: self.entity,
            fields: self.fields,
        }
    }
}

/// A schema change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schema {
    Create { entity: String, fields: Vec<Field> },
    Delete { entity: String },
}
