//! Node - the scalar value every identifier and column is encoded as
//!
//! Identifiers are opaque to the relation layer: it only compares them,
//! binds them as statement parameters and copies them between rows.

use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, Value, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A tagged scalar: the value of one column in one row.
#[derive(Debug, Clone, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    Text(String),
}

impl Node {
    /// Human-readable kind, used in type mismatch errors
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Null => "null",
            Node::Bool(_) => "bool",
            Node::Int(_) => "int",
            Node::Double(_) => "double",
            Node::Text(_) => "text",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Null)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Node::Int(i) => Some(*i),
            Node::Bool(b) => Some(*b as i64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Null => write!(f, "null"),
            Node::Bool(b) => write!(f, "{}", b),
            Node::Int(i) => write!(f, "{}", i),
            Node::Double(d) => write!(f, "{}", d),
            Node::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Node::Int(value)
    }
}

impl From<i32> for Node {
    fn from(value: i32) -> Self {
        Node::Int(value as i64)
    }
}

impl From<u32> for Node {
    fn from(value: u32) -> Self {
        Node::Int(value as i64)
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Node::Bool(value)
    }
}

impl From<f64> for Node {
    fn from(value: f64) -> Self {
        Node::Double(value)
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::Text(value.to_string())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::Text(value)
    }
}

impl<T: Into<Node>> From<Option<T>> for Node {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Node::Null)
    }
}

impl ToSql for Node {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Node::Null => ToSqlOutput::Owned(Value::Null),
            Node::Bool(b) => ToSqlOutput::Owned(Value::Integer(*b as i64)),
            Node::Int(i) => ToSqlOutput::Owned(Value::Integer(*i)),
            Node::Double(d) => ToSqlOutput::Owned(Value::Real(*d)),
            Node::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
        })
    }
}

impl FromSql for Node {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        Ok(match value {
            ValueRef::Null => Node::Null,
            ValueRef::Integer(i) => Node::Int(i),
            ValueRef::Real(d) => Node::Double(d),
            ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
                Node::Text(String::from_utf8_lossy(bytes).into_owned())
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_conversion() {
        assert_eq!(Node::from(Some(42i64)), Node::Int(42));
        assert_eq!(Node::from(None::<i64>), Node::Null);
    }

    #[test]
    fn test_serde_untagged() {
        let json = serde_json::to_string(&vec![Node::Int(42), Node::from("h"), Node::Null]).unwrap();
        assert_eq!(json, r#"[42,"h",null]"#);

        let parsed: Vec<Node> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, vec![Node::Int(42), Node::Text("h".into()), Node::Null]);
    }

    #[test]
    fn test_sqlite_roundtrip() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let node: Node = conn
            .query_row("SELECT ?1", [Node::Int(1337)], |row| row.get(0))
            .unwrap();
        assert_eq!(node, Node::Int(1337));

        let text: Node = conn
            .query_row("SELECT ?1", [Node::from("water")], |row| row.get(0))
            .unwrap();
        assert_eq!(text.as_str(), Some("water"));
    }
}
