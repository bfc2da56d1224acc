//! # Kinship - Many-to-many relations over pivot tables
//!
//! A small SQLite-backed object mapper whose interesting part is the
//! sibling relation: two entity types joined through an intermediate
//! pivot table.
//!
//! Kinship provides:
//! - `Node` and `Row` as the generic value/row encoding
//! - `Entity` for mapped record types, `Record` as its type-erased view
//! - A composable `Query` builder and a backtick-quoting SQL serializer
//! - `Pivot<Left, Right>` join tables with order-independent naming
//! - `Siblings` for attach/detach/related and join traversal queries

pub mod node;
pub mod row;
pub mod entity;
pub mod schema;
pub mod sql;
pub mod query;
pub mod driver;
pub mod database;
pub mod pivot;
pub mod relations;
pub mod demo;
pub mod config;
pub mod output;
pub mod ui;

// Re-exports for convenient access
pub use node::Node;
pub use row::{FromNode, Row};
pub use entity::{Entity, Record, RecordRef, Storage};
pub use schema::{Builder, Field, FieldKind, Schema};
pub use query::{Query, QueryRepresentable};
pub use driver::{Driver, Execution, LastQueryDriver, SqliteDriver};
pub use database::Database;
pub use pivot::{Pivot, PivotError, PivotProtocol};
pub use relations::Siblings;

/// Result type alias for Kinship operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Kinship operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Missing key `{0}` in row")]
    MissingKey(String),

    #[error("Key `{key}` holds {found}, expected {expected}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Query error: {0}")]
    Query(String),

    #[error(transparent)]
    Pivot(#[from] PivotError),
}
