//! Query builder
//!
//! A `Query<E>` collects filters and joins scoped to entity `E`. Builder
//! methods consume and return the query; terminal methods (`all`, `first`,
//! `count`, `delete`, `insert`, `save`) lower it to `Sql` and execute it.

use std::marker::PhantomData;
use crate::database::Database;
use crate::entity::{Entity, Storage};
use crate::node::Node;
use crate::row::Row;
use crate::sql::serializer::COUNT_KEY;
use crate::sql::{Filter, Join, Sql};
use crate::{Error, Result};

pub struct Query<'a, E: Entity> {
    db: &'a Database,
    filters: Vec<Filter>,
    joins: Vec<Join>,
    limit: Option<usize>,
    _entity: PhantomData<E>,
}

impl<'a, E: Entity> Clone for Query<'a, E> {
    fn clone(&self) -> Self {
        Self {
            db: self.db,
            filters: self.filters.clone(),
            joins: self.joins.clone(),
            limit: self.limit,
            _entity: PhantomData,
        }
    }
}

impl<'a, E: Entity> std::fmt::Debug for Query<'a, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Query")
            .field("entity", &E::entity())
            .field("filters", &self.filters)
            .field("joins", &self.joins)
            .field("limit", &self.limit)
            .finish()
    }
}

impl<'a, E: Entity> Query<'a, E> {
    pub fn new(db: &'a Database) -> Self {
        Self {
            db,
            filters: Vec::new(),
            joins: Vec::new(),
            limit: None,
            _entity: PhantomData,
        }
    }

    /// Restrict a column of `E` to equal `value`
    pub fn filter(self, column: impl Into<String>, value: impl Into<Node>) -> Self {
        let entity = E::entity();
        self.filter_table(entity, column, value)
    }

    /// Restrict a column of `T` (usually a joined table) to equal `value`
    pub fn filter_on<T: Entity>(self, column: impl Into<String>, value: impl Into<Node>) -> Self {
        self.filter_table(T::entity(), column, value)
    }

    fn filter_table(mut self, entity: String, column: impl Into<String>, value: impl Into<Node>) -> Self {
        self.filters.push(Filter::new(entity, column, value));
        self
    }

    /// Join `T` on `E.id_key = T.{E foreign id key}`
    pub fn join<T: Entity>(mut self) -> Self {
        self.joins.push(Join {
            base: E::entity(),
            joined: T::entity(),
            base_key: E::id_key(),
            joined_key: E::foreign_id_key(),
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    /// The select this query runs for `all`
    pub fn select_sql(&self) -> Sql {
        Sql::Select {
            table: E::entity(),
            joins: self.joins.clone(),
            filters: self.filters.clone(),
            limit: self.limit,
        }
    }

    pub fn all(&self) -> Result<Vec<E>> {
        self.fetch(self.select_sql())
    }

    pub fn first(&self) -> Result<Option<E>> {
        let sql = self.clone().limit(1).select_sql();
        Ok(self.fetch(sql)?.into_iter().next())
    }

    pub fn count(&self) -> Result<usize> {
        let sql = Sql::Count {
            table: E::entity(),
            joins: self.joins.clone(),
            filters: self.filters.clone(),
        };
        let execution = self.db.execute(&sql)?;
        match execution.rows.first() {
            Some(row) => Ok(row.extract::<i64>(COUNT_KEY)?.max(0) as usize),
            None => Ok(0),
        }
    }

    /// Delete every row matching the filters, returning how many went
    pub fn delete(&self) -> Result<usize> {
        if !self.joins.is_empty() {
            return Err(Error::Query(format!("cannot delete from joined query on {}", E::entity())));
        }
        let sql = Sql::Delete {
            table: E::entity(),
            filters: self.filters.clone(),
        };
        Ok(self.db.execute(&sql)?.affected)
    }

    /// Insert a raw row, returning the generated identifier
    pub fn insert(&self, data: Row) -> Result<Option<Node>> {
        let sql = Sql::Insert {
            table: E::entity(),
            data,
        };
        Ok(self.db.execute(&sql)?.inserted_id)
    }

    /// Insert a new entity, or update an existing one by id
    pub fn save(&self, entity: &mut E) -> Result<()> {
        let mut data = entity.to_row()?;

        if entity.storage().exists {
            let id = entity
                .storage()
                .id
                .clone()
                .ok_or_else(|| Error::Query(format!("cannot update {} without an id", E::name())))?;
            data.remove(&E::id_key());
            let sql = Sql::Update {
                table: E::entity(),
                filters: vec![Filter::new(E::entity(), E::id_key(), id)],
                data,
            };
            self.db.execute(&sql)?;
            return Ok(());
        }

        let inserted = self.insert(data)?;
        let storage = entity.storage_mut();
        if storage.id.is_none() {
            storage.id = inserted;
        }
        storage.exists = true;
        Ok(())
    }

    fn fetch(&self, sql: Sql) -> Result<Vec<E>> {
        let execution = self.db.execute(&sql)?;
        execution.rows.iter().map(decode::<E>).collect()
    }
}

/// Decode a fetched row and mark the entity as persisted
fn decode<E: Entity>(row: &Row) -> Result<E> {
    let mut entity = E::from_row(row)?;
    *entity.storage_mut() = Storage {
        id: row.extract::<Option<Node>>(&E::id_key())?,
        exists: true,
    };
    Ok(entity)
}

/// Anything that can be turned into a query over `E`.
pub trait QueryRepresentable<'a, E: Entity> {
    type Error: From<Error>;

    fn make_query(&self) -> std::result::Result<Query<'a, E>, Self::Error>;

    fn all(&self) -> std::result::Result<Vec<E>, Self::Error> {
        Ok(self.make_query()?.all()?)
    }

    fn first(&self) -> std::result::Result<Option<E>, Self::Error> {
        Ok(self.make_query()?.first()?)
    }

    fn count(&self) -> std::result::Result<usize, Self::Error> {
        Ok(self.make_query()?.count()?)
    }
}

impl<'a, E: Entity> QueryRepresentable<'a, E> for Query<'a, E> {
    type Error = Error;

    fn make_query(&self) -> Result<Query<'a, E>> {
        Ok(self.clone())
    }
}
