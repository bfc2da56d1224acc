//! Database - the handle every entity operation runs through

use std::path::Path;
use crate::driver::{Driver, Execution, SqliteDriver};
use crate::entity::Entity;
use crate::query::Query;
use crate::schema::{Builder, Schema};
use crate::sql::Sql;
use crate::Result;

/// Owns a driver and runs statements on it.
pub struct Database {
    driver: Box<dyn Driver>,
}

impl Database {
    pub fn new(driver: impl Driver + 'static) -> Self {
        Self {
            driver: Box::new(driver),
        }
    }

    /// SQLite database at `path` (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::new(SqliteDriver::open(path)?))
    }

    /// In-memory SQLite database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::new(SqliteDriver::open_in_memory()?))
    }

    pub fn execute(&self, sql: &Sql) -> Result<Execution> {
        if tracing::enabled!(tracing::Level::DEBUG) {
            let (statement, values) = sql.serialize();
            tracing::debug!(?values, "{}", statement);
        }
        self.driver.execute(sql)
    }

    pub fn query<E: Entity>(&self) -> Query<'_, E> {
        Query::new(self)
    }

    /// Create a table whose columns are declared by `build`
    pub fn create(&self, entity: &str, build: impl FnOnce(&mut Builder)) -> Result<()> {
        let mut builder = Builder::new(entity);
        build(&mut builder);
        self.execute(&Sql::Schema(builder.build()))?;
        tracing::info!("Prepared table {}", entity);
        Ok(())
    }

    /// Drop a table
    pub fn delete(&self, entity: &str) -> Result<()> {
        self.execute(&Sql::Schema(Schema::Delete {
            entity: entity.to_string(),
        }))?;
        tracing::info!("Reverted table {}", entity);
        Ok(())
    }

    pub fn prepare<E: Entity>(&self) -> Result<()> {
        E::prepare(self)
    }

    pub fn revert<E: Entity>(&self) -> Result<()> {
        E::revert(self)
    }
}
