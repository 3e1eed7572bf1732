//! In-memory representation of resource values.
//!
//! A [`Value`] is a dynamically shaped tree whose structure is described by a
//! [`Block`](crate::schema::Block). Values are produced by configuration
//! evaluation and by state loading; the planner only ever reads them and
//! builds new trees, so everything here is plain owned data.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// A value conforming to some schema block.
///
/// `Unknown` is the placeholder for "not yet determined": it stands for a
/// value a provider will decide during apply. It only ever appears in
/// proposed values, never in recorded state.
///
/// `Set` holds its elements in arbitrary order. Equality on values is
/// structural except for sets, which compare as multisets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    Null,
    Unknown,
    Bool(bool),
    Number(Number),
    String(String),
    /// A block or object: field name to child value.
    Object(BTreeMap<String, Value>),
    /// An ordered sequence of values.
    List(Vec<Value>),
    /// A string-keyed mapping of values.
    Map(BTreeMap<String, Value>),
    /// An unordered collection of values.
    Set(Vec<Value>),
}

impl Value {
    pub fn string(s: impl Into<String>) -> Value {
        Value::String(s.into())
    }

    pub fn int(n: i64) -> Value {
        Value::Number(Number::from(n))
    }

    pub fn object<K, I>(fields: I) -> Value
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Object(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn list(elems: impl IntoIterator<Item = Value>) -> Value {
        Value::List(elems.into_iter().collect())
    }

    pub fn map<K, I>(entries: I) -> Value
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn set(elems: impl IntoIterator<Item = Value>) -> Value {
        Value::Set(elems.into_iter().collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Whether this value itself is the unknown placeholder. A collection
    /// containing unknown elements is still known; see
    /// [`contains_unknown`](Value::contains_unknown) for the deep check.
    pub fn is_unknown(&self) -> bool {
        matches!(self, Value::Unknown)
    }

    pub fn is_known(&self) -> bool {
        !self.is_unknown()
    }

    /// Whether this value is or contains an unknown placeholder anywhere.
    pub fn contains_unknown(&self) -> bool {
        match self {
            Value::Unknown => true,
            Value::Object(fields) | Value::Map(fields) => {
                fields.values().any(Value::contains_unknown)
            }
            Value::List(elems) | Value::Set(elems) => elems.iter().any(Value::contains_unknown),
            _ => false,
        }
    }

    pub fn as_object(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Object(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(elems) => Some(elems),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&[Value]> {
        match self {
            Value::Set(elems) => Some(elems),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Unknown, Value::Unknown) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Set(a), Value::Set(b)) => multiset_eq(a, b),
            _ => false,
        }
    }
}
impl Eq for Value {}

/// Order-insensitive equality. Greedy matching is exact here because element
/// comparison is itself exact, unlike the fuzzy correlation done at plan
/// time.
fn multiset_eq(a: &[Value], b: &[Value]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut taken = vec![false; b.len()];
    'next: for elem in a {
        for (idx, candidate) in b.iter().enumerate() {
            if !taken[idx] && elem == candidate {
                taken[idx] = true;
                continue 'next;
            }
        }
        return false;
    }
    true
}
