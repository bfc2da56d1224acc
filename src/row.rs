//! Row - generic key to scalar encoding shared by entities and drivers

use crate::node::Node;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// An insertion-ordered set of columns.
///
/// Order is kept so that encoded entities serialize their columns in
/// declaration order (`id` first for every table in this crate).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Row {
    columns: Vec<(String, Node)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column, replacing an existing value in place
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Node>) {
        let key = key.into();
        let value = value.into();
        match self.columns.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.columns.push((key, value)),
        }
    }

    /// Builder form of [`Row::set`]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Node>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.columns.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn remove(&mut self, key: &str) -> Option<Node> {
        let index = self.columns.iter().position(|(k, _)| k == key)?;
        Some(self.columns.remove(index).1)
    }

    /// Extract a typed value stored under `key`
    pub fn extract<T: FromNode>(&self, key: &str) -> Result<T> {
        T::from_node(key, self.get(key))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<K: Into<String>, V: Into<Node>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (k, v) in iter {
            row.set(k, v);
        }
        row
    }
}

/// Typed extraction from an optional row value.
///
/// `value` is `None` when the key is absent from the row.
pub trait FromNode: Sized {
    fn from_node(key: &str, value: Option<&Node>) -> Result<Self>;
}

fn mismatch(key: &str, expected: &'static str, found: &Node) -> Error {
    Error::TypeMismatch {
        key: key.to_string(),
        expected,
        found: found.kind(),
    }
}

fn required<'a>(key: &str, value: Option<&'a Node>) -> Result<&'a Node> {
    value.ok_or_else(|| Error::MissingKey(key.to_string()))
}

impl FromNode for Node {
    fn from_node(key: &str, value: Option<&Node>) -> Result<Self> {
        required(key, value).cloned()
    }
}

impl<T: FromNode> FromNode for Option<T> {
    fn from_node(key: &str, value: Option<&Node>) -> Result<Self> {
        match value {
            None | Some(Node::Null) => Ok(None),
            Some(node) => T::from_node(key, Some(node)).map(Some),
        }
    }
}

impl FromNode for i64 {
    fn from_node(key: &str, value: Option<&Node>) -> Result<Self> {
        let node = required(key, value)?;
        node.as_int().ok_or_else(|| mismatch(key, "int", node))
    }
}

impl FromNode for bool {
    fn from_node(key: &str, value: Option<&Node>) -> Result<Self> {
        match required(key, value)? {
            Node::Bool(b) => Ok(*b),
            Node::Int(0) => Ok(false),
            Node::Int(1) => Ok(true),
            other => Err(mismatch(key, "bool", other)),
        }
    }
}

impl FromNode for f64 {
    fn from_node(key: &str, value: Option<&Node>) -> Result<Self> {
        match required(key, value)? {
            Node::Double(d) => Ok(*d),
            Node::Int(i) => Ok(*i as f64),
            other => Err(mismatch(key, "double", other)),
        }
    }
}

impl FromNode for String {
    fn from_node(key: &str, value: Option<&Node>) -> Result<Self> {
        let node = required(key, value)?;
        node.as_str()
            .map(str::to_string)
            .ok_or_else(|| mismatch(key, "text", node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_keeps_position() {
        let mut row = Row::new().with("id", Node::Null).with("atom_id", 42i64);
        row.set("id", 7i64);

        let keys: Vec<&str> = row.keys().collect();
        assert_eq!(keys, vec!["id", "atom_id"]);
        assert_eq!(row.get("id"), Some(&Node::Int(7)));
    }

    #[test]
    fn test_extract_missing_key() {
        let row = Row::new().with("name", "Hydrogen");
        let err = row.extract::<i64>("id").unwrap_err();
        assert!(matches!(err, Error::MissingKey(ref k) if k == "id"));
    }

    #[test]
    fn test_extract_type_mismatch() {
        let row = Row::new().with("id", "forty-two");
        let err = row.extract::<i64>("id").unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { expected: "int", found: "text", .. }));
    }

    #[test]
    fn test_extract_optional() {
        let row = Row::new().with("id", Node::Null).with("count", 3i64);
        assert_eq!(row.extract::<Option<Node>>("id").unwrap(), None);
        assert_eq!(row.extract::<Option<i64>>("missing").unwrap(), None);
        assert_eq!(row.extract::<Option<i64>>("count").unwrap(), Some(3));
    }
}
