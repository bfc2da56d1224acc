//! Recording driver for asserting on generated SQL

use std::sync::Mutex;
use super::{Driver, Execution};
use crate::sql::Sql;
use crate::Result;

/// Keeps every statement it is handed and returns empty results.
///
/// Share it with a `Database` through an `Arc` to inspect the statements
/// afterwards.
#[derive(Debug, Default)]
pub struct LastQueryDriver {
    queries: Mutex<Vec<Sql>>,
}

impl LastQueryDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_query(&self) -> Option<Sql> {
        self.lock().last().cloned()
    }

    pub fn queries(&self) -> Vec<Sql> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Sql>> {
        self.queries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Driver for LastQueryDriver {
    fn execute(&self, sql: &Sql) -> Result<Execution> {
        self.lock().push(sql.clone());
        Ok(Execution::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;

    #[test]
    fn test_records_in_order() {
        let driver = LastQueryDriver::new();
        assert!(driver.last_query().is_none());

        driver.execute(&Sql::Schema(Schema::Delete { entity: "a".into() })).unwrap();
        driver.execute(&Sql::Schema(Schema::Delete { entity: "b".into() })).unwrap();

        assert_eq!(driver.queries().len(), 2);
        assert_eq!(driver.last_query().map(|sql| sql.table().to_string()), Some("b".to_string()));
    }
}
