//! SQL statement model
//!
//! Queries and schema changes are first lowered to an `Sql` value, then
//! serialized to a statement string plus bound parameters:
//! - `Select` / `Count` with joins, equality filters and an optional limit
//! - `Insert` / `Update` / `Delete` over a single table
//! - `Schema` for create/drop table

pub mod serializer;

pub use serializer::GeneralSqlSerializer;

use crate::node::Node;
use crate::row::Row;
use crate::schema::Schema;

/// Equality restriction on a table-qualified column.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub entity: String,
    pub column: String,
    pub value: Node,
}

impl Filter {
    pub fn new(entity: impl Into<String>, column: impl Into<String>, value: impl Into<Node>) -> Self {
        Self {
            entity: entity.into(),
            column: column.into(),
            value: value.into(),
        }
    }
}

/// Inner join of `joined` onto `base` on `base.base_key = joined.joined_key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    pub base: String,
    pub joined: String,
    pub base_key: String,
    pub joined_key: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Sql {
    Select {
        table: String,
        joins: Vec<Join>,
        filters: Vec<Filter>,
        limit: Option<usize>,
    },
    Count {
        table: String,
        joins: Vec<Join>,
        filters: Vec<Filter>,
    },
    Insert {
        table: String,
        data: Row,
    },
    Update {
        table: String,
        filters: Vec<Filter>,
        data: Row,
    },
    Delete {
        table: String,
        filters: Vec<Filter>,
    },
    Schema(Schema),
}

impl Sql {
    /// Table the statement targets
    pub fn table(&self) -> &str {
        match self {
            Sql::Select { table, .. }
            | Sql::Count { table, .. }
            | Sql::Insert { table, .. }
            | Sql::Update { table, .. }
            | Sql::Delete { table, .. } => table,
            Sql::Schema(Schema::Create { entity, .. }) | Sql::Schema(Schema::Delete { entity }) => entity,
        }
    }

    /// Serialize with the general serializer
    pub fn serialize(&self) -> (String, Vec<Node>) {
        GeneralSqlSerializer::new(self).serialize()
    }
}
