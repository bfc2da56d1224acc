//! Driver Layer - executes lowered statements against a backend
//!
//! - `SqliteDriver`: rusqlite connection, file or in-memory
//! - `LastQueryDriver`: records statements without executing them

pub mod last_query;
pub mod sqlite;

pub use last_query::LastQueryDriver;
pub use sqlite::SqliteDriver;

use crate::node::Node;
use crate::row::Row;
use crate::sql::Sql;
use crate::Result;
use std::sync::Arc;

/// Outcome of one statement
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Execution {
    /// Rows produced by a select or count
    pub rows: Vec<Row>,
    /// Rows changed by an insert, update or delete
    pub affected: usize,
    /// Identifier generated by an insert
    pub inserted_id: Option<Node>,
}

impl Execution {
    pub fn rows(rows: Vec<Row>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    pub fn affected(affected: usize) -> Self {
        Self {
            affected,
            ..Self::default()
        }
    }
}

/// A storage backend.
pub trait Driver {
    fn execute(&self, sql: &Sql) -> Result<Execution>;
}

impl<D: Driver + ?Sized> Driver for Arc<D> {
    fn execute(&self, sql: &Sql) -> Result<Execution> {
        (**self).execute(sql)
    }
}
