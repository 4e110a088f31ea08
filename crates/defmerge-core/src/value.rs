//! Dynamic value model
//!
//! `Value` is the tagged union the merge operates on. Every value classifies
//! into one [`Shape`] before a merge rule is picked.

use std::collections::BTreeMap;
use std::ops::Index;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Number;

use crate::opaque::Opaque;

/// String-keyed plain record. Key order carries no meaning.
pub type Record = BTreeMap<String, Value>;

static ABSENT: Value = Value::Absent;

/// A value of any shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    /// Nothing was supplied here. Distinct from `Null`.
    #[default]
    Absent,
    /// Explicit "force empty" marker.
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<Value>),
    Record(Record),
    /// Leaf that is never decomposed; compared by identity.
    Opaque(Opaque),
}

/// Merge classification of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Null,
    Absent,
    Sequence,
    Record,
    Leaf,
}

impl Value {
    /// Classify this value for merging.
    pub fn shape(&self) -> Shape {
        match self {
            Value::Null => Shape::Null,
            Value::Absent => Shape::Absent,
            Value::Array(_) => Shape::Sequence,
            Value::Record(_) => Shape::Record,
            Value::Bool(_) | Value::Number(_) | Value::String(_) | Value::Opaque(_) => Shape::Leaf,
        }
    }

    /// Build a record from key/value pairs.
    pub fn record<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        entries.into_iter().collect()
    }

    /// Wrap any shareable object as an opaque leaf.
    pub fn opaque<T: std::any::Any + Send + Sync>(value: T) -> Self {
        Value::Opaque(Opaque::new(value))
    }

    /// Date leaf.
    pub fn date(value: DateTime<Utc>) -> Self {
        Self::opaque(value)
    }

    /// Pattern leaf.
    pub fn pattern(value: regex_lite::Regex) -> Self {
        Self::opaque(value)
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Number(n) => n.as_u64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_opaque(&self) -> Option<&Opaque> {
        match self {
            Value::Opaque(opaque) => Some(opaque),
            _ => None,
        }
    }

    /// Look up a key when this is a record.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_record().and_then(|record| record.get(key))
    }

    /// Look up a dot-separated path through nested records.
    pub fn pointer(&self, path: &str) -> Option<&Value> {
        let mut current = self;
        for part in path.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }
}

impl Index<&str> for Value {
    type Output = Value;

    /// Missing keys and non-records index to `Absent`.
    fn index(&self, key: &str) -> &Value {
        self.get(key).unwrap_or(&ABSENT)
    }
}

impl Index<usize> for Value {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        self.as_array()
            .and_then(|items| items.get(index))
            .unwrap_or(&ABSENT)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Value::Number(n.into())
                }
            }
        )*
    };
}

from_integer!(i8, i16, i32, i64, u8, u16, u32, u64, isize, usize);

impl From<f64> for Value {
    /// Non-finite floats have no number representation and are kept as
    /// opaque `f64` leaves.
    fn from(f: f64) -> Self {
        Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or_else(|| Value::opaque(f))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Record(record)
    }
}

impl From<Opaque> for Value {
    fn from(opaque: Opaque) -> Self {
        Value::Opaque(opaque)
    }
}

impl<T: std::any::Any + Send + Sync> From<Arc<T>> for Value {
    fn from(shared: Arc<T>) -> Self {
        Value::Opaque(Opaque::from_arc(shared))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(option: Option<T>) -> Self {
        option.map(Into::into).unwrap_or(Value::Absent)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Value::Record(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Value::Array(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_classification() {
        assert_eq!(Value::Null.shape(), Shape::Null);
        assert_eq!(Value::Absent.shape(), Shape::Absent);
        assert_eq!(Value::from(vec![Value::from(1)]).shape(), Shape::Sequence);
        assert_eq!(Value::record([("a", Value::from(1))]).shape(), Shape::Record);
        assert_eq!(Value::from("s").shape(), Shape::Leaf);
        assert_eq!(Value::from(true).shape(), Shape::Leaf);
        assert_eq!(Value::date(Utc::now()).shape(), Shape::Leaf);
    }

    #[test]
    fn test_default_is_absent() {
        assert!(Value::default().is_absent());
    }

    #[test]
    fn test_index_misses_are_absent() {
        let value = Value::record([("a", Value::from(1))]);
        assert_eq!(value["a"], Value::from(1));
        assert!(value["missing"].is_absent());
        assert!(value["a"]["deeper"].is_absent());
        assert!(Value::from("s")[0].is_absent());
    }

    #[test]
    fn test_pointer() {
        let value = Value::record([(
            "cache",
            Value::record([("mode", Value::from("on"))]),
        )]);
        assert_eq!(value.pointer("cache.mode").and_then(Value::as_str), Some("on"));
        assert!(value.pointer("cache.missing").is_none());
        assert!(value.pointer("cache.mode.deeper").is_none());
    }

    #[test]
    fn test_non_finite_float_is_opaque_leaf() {
        let nan = Value::from(f64::NAN);
        assert_eq!(nan.shape(), Shape::Leaf);
        assert!(!nan.is_null());
        assert!(nan.as_opaque().and_then(|o| o.downcast_ref::<f64>()).unwrap().is_nan());
        assert_eq!(
            Value::from(f64::INFINITY).as_opaque().and_then(|o| o.downcast_ref::<f64>()),
            Some(&f64::INFINITY)
        );
        assert_eq!(Value::from(1.5).as_f64(), Some(1.5));
    }

    #[test]
    fn test_option_none_is_absent() {
        assert!(Value::from(None::<i64>).is_absent());
        assert_eq!(Value::from(Some(3)).as_i64(), Some(3));
    }

    #[test]
    fn test_opaque_values_compare_by_identity() {
        let now = Utc::now();
        assert_ne!(Value::date(now), Value::date(now));

        let shared = Value::date(now);
        assert_eq!(shared.clone(), shared);
    }
}
