//! General SQL serializer
//!
//! Identifiers are backtick-quoted, filter columns are always qualified by
//! their table, and every value is bound through a `?` placeholder.

use super::{Filter, Join, Sql};
use crate::node::Node;
use crate::row::Row;
use crate::schema::{Field, FieldKind, Schema};

/// Column alias used by `Sql::Count`
pub const COUNT_KEY: &str = "count";

pub struct GeneralSqlSerializer<'a> {
    sql: &'a Sql,
}

impl<'a> GeneralSqlSerializer<'a> {
    pub fn new(sql: &'a Sql) -> Self {
        Self { sql }
    }

    /// Statement text and its bound values, in placeholder order
    pub fn serialize(&self) -> (String, Vec<Node>) {
        let mut values = Vec::new();
        let statement = match self.sql {
            Sql::Select { table, joins, filters, limit } => {
                let mut statement = format!("SELECT {}.* FROM {}", quote(table), quote(table));
                statement.push_str(&joins_clause(joins));
                statement.push_str(&where_clause(filters, &mut values));
                if let Some(limit) = limit {
                    statement.push_str(&format!(" LIMIT {}", limit));
                }
                statement
            }
            Sql::Count { table, joins, filters } => {
                let mut statement = format!("SELECT COUNT(*) AS {} FROM {}", quote(COUNT_KEY), quote(table));
                statement.push_str(&joins_clause(joins));
                statement.push_str(&where_clause(filters, &mut values));
                statement
            }
            Sql::Insert { table, data } => insert(table, data, &mut values),
            Sql::Update { table, filters, data } => {
                let assignments: Vec<String> = data
                    .iter()
                    .map(|(column, value)| {
                        values.push(value.clone());
                        format!("{} = ?", quote(column))
                    })
                    .collect();
                let mut statement = format!("UPDATE {} SET {}", quote(table), assignments.join(", "));
                statement.push_str(&where_clause(filters, &mut values));
                statement
            }
            Sql::Delete { table, filters } => {
                let mut statement = format!("DELETE FROM {}", quote(table));
                statement.push_str(&where_clause(filters, &mut values));
                statement
            }
            Sql::Schema(Schema::Create { entity, fields }) => {
                let columns: Vec<String> = fields.iter().map(column_definition).collect();
                format!("CREATE TABLE IF NOT EXISTS {} ({})", quote(entity), columns.join(", "))
            }
            Sql::Schema(Schema::Delete { entity }) => {
                format!("DROP TABLE IF EXISTS {}", quote(entity))
            }
        };
        (statement, values)
    }
}

/// Backtick-quote an identifier
pub fn quote(identifier: &str) -> String {
    format!("`{}`", identifier.replace('`', "``"))
}

fn insert(table: &str, data: &Row, values: &mut Vec<Node>) -> String {
    if data.is_empty() {
        return format!("INSERT INTO {} DEFAULT VALUES", quote(table));
    }

    let columns: Vec<String> = data.keys().map(quote).collect();
    let placeholders = vec!["?"; data.len()].join(", ");
    values.extend(data.iter().map(|(_, value)| value.clone()));

    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote(table),
        columns.join(", "),
        placeholders
    )
}

fn joins_clause(joins: &[Join]) -> String {
    joins
        .iter()
        .map(|join| {
            format!(
                " JOIN {} ON {}.{} = {}.{}",
                quote(&join.joined),
                quote(&join.base),
                quote(&join.base_key),
                quote(&join.joined),
                quote(&join.joined_key)
            )
        })
        .collect()
}

fn where_clause(filters: &[Filter], values: &mut Vec<Node>) -> String {
    if filters.is_empty() {
        return String::new();
    }

    let conditions: Vec<String> = filters
        .iter()
        .map(|filter| {
            let column = format!("{}.{}", quote(&filter.entity), quote(&filter.column));
            if filter.value.is_null() {
                format!("{} IS NULL", column)
            } else {
                values.push(filter.value.clone());
                format!("{} = ?", column)
            }
        })
        .collect();

    format!(" WHERE {}", conditions.join(" AND "))
}

fn column_definition(field: &Field) -> String {
    let mut definition = format!("{} {}", quote(&field.name), field.kind.sql_type());
    if field.kind != FieldKind::Id && !field.optional {
        definition.push_str(" NOT NULL");
    }
    definition
}
