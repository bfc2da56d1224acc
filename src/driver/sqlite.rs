//! SQLite driver implementation

use std::path::Path;
use rusqlite::{Connection, params_from_iter};
use super::{Driver, Execution};
use crate::node::Node;
use crate::row::Row;
use crate::sql::Sql;
use crate::Result;

/// Driver backed by a single rusqlite connection
pub struct SqliteDriver {
    conn: Connection,
}

impl SqliteDriver {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    fn fetch(&self, statement: &str, values: &[Node]) -> Result<Vec<Row>> {
        let mut stmt = self.conn.prepare(statement)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let rows = stmt
            .query_map(params_from_iter(values.iter()), |row| {
                let mut out = Row::new();
                for (index, column) in columns.iter().enumerate() {
                    out.set(column.as_str(), row.get::<_, Node>(index)?);
                }
                Ok(out)
            })?
            .collect::<rusqlite::Result<Vec<Row>>>()?;

        Ok(rows)
    }
}

impl Driver for SqliteDriver {
    fn execute(&self, sql: &Sql) -> Result<Execution> {
        let (statement, values) = sql.serialize();

        match sql {
            Sql::Select { .. } | Sql::Count { .. } => {
                Ok(Execution::rows(self.fetch(&statement, &values)?))
            }
            Sql::Insert { .. } => {
                let affected = self.conn.execute(&statement, params_from_iter(values.iter()))?;
                Ok(Execution {
                    rows: Vec::new(),
                    affected,
                    inserted_id: Some(Node::Int(self.conn.last_insert_rowid())),
                })
            }
            Sql::Update { .. } | Sql::Delete { .. } | Sql::Schema(_) => {
                let affected = self.conn.execute(&statement, params_from_iter(values.iter()))?;
                Ok(Execution::affected(affected))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Builder;
    use crate::sql::Filter;
    use crate::demo::Atom;

    fn atoms_table(driver: &SqliteDriver) {
        let mut builder = Builder::new("atoms");
        builder.id::<Atom>().string("name");
        driver.execute(&Sql::Schema(builder.build())).unwrap();
    }

    #[test]
    fn test_insert_returns_generated_id() {
        let driver = SqliteDriver::open_in_memory().unwrap();
        atoms_table(&driver);

        let data = Row::new().with("id", Node::Null).with("name", "Hydrogen");
        let first = driver.execute(&Sql::Insert { table: "atoms".into(), data: data.clone() }).unwrap();
        let second = driver.execute(&Sql::Insert { table: "atoms".into(), data }).unwrap();

        assert_eq!(first.affected, 1);
        assert_eq!(first.inserted_id, Some(Node::Int(1)));
        assert_eq!(second.inserted_id, Some(Node::Int(2)));
    }

    #[test]
    fn test_select_maps_columns_by_name() {
        let driver = SqliteDriver::open_in_memory().unwrap();
        atoms_table(&driver);
        driver
            .execute(&Sql::Insert {
                table: "atoms".into(),
                data: Row::new().with("name", "Helium"),
            })
            .unwrap();

        let result = driver
            .execute(&Sql::Select {
                table: "atoms".into(),
                joins: Vec::new(),
                filters: vec![Filter::new("atoms", "name", "Helium")],
                limit: Some(1),
            })
            .unwrap();

        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].get("id"), Some(&Node::Int(1)));
        assert_eq!(result.rows[0].get("name"), Some(&Node::from("Helium")));
    }

    #[test]
    fn test_missing_table_is_storage_error() {
        let driver = SqliteDriver::open_in_memory().unwrap();
        let err = driver
            .execute(&Sql::Delete { table: "nowhere".into(), filters: Vec::new() })
            .unwrap_err();
        assert!(matches!(err, crate::Error::Storage(_)));
    }

    #[test]
    fn test_open_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kinship.db");
        {
            let driver = SqliteDriver::open(&path).unwrap();
            atoms_table(&driver);
        }
        assert!(path.exists());
    }
}
