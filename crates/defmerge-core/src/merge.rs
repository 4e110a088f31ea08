//! Merge logic
//!
//! Rules, checked in order:
//! - Null: `value` is `Null` → `Null`, default ignored
//! - Absent: `value` is `Absent` → default, unchanged
//! - Arrays: both arrays → default elements followed by value elements
//! - Records: both records → key union, shared keys merged recursively
//! - Anything else: `value` wins

use crate::value::{Record, Value};

/// Deep merge `value` onto `default`.
///
/// Total over all shapes. Both operands are consumed, so opaque leaves move
/// into the result as the same instance.
pub fn merge(value: Value, default: Value) -> Value {
    match (value, default) {
        (Value::Null, _) => Value::Null,
        (Value::Absent, default) => default,
        (Value::Array(items), Value::Array(mut base)) => {
            base.extend(items);
            Value::Array(base)
        }
        (Value::Record(record), Value::Record(base)) => Value::Record(merge_records(record, base)),
        (value, _) => value,
    }
}

/// Merge without consuming the operands.
///
/// Composites are rebuilt; opaque leaves are shared with the input they
/// came from.
pub fn merge_ref(value: &Value, default: &Value) -> Value {
    match (value, default) {
        (Value::Null, _) => Value::Null,
        (Value::Absent, default) => default.clone(),
        (Value::Array(items), Value::Array(base)) => {
            Value::Array(base.iter().chain(items.iter()).cloned().collect())
        }
        (Value::Record(record), Value::Record(base)) => {
            let mut merged: Record = base
                .iter()
                .map(|(key, base_value)| {
                    let entry = match record.get(key) {
                        Some(value) => merge_ref(value, base_value),
                        None => base_value.clone(),
                    };
                    (key.clone(), entry)
                })
                .collect();
            for (key, value) in record {
                if !merged.contains_key(key) {
                    merged.insert(key.clone(), value.clone());
                }
            }
            Value::Record(merged)
        }
        (value, _) => value.clone(),
    }
}

fn merge_records(mut record: Record, base: Record) -> Record {
    let mut merged = Record::new();
    for (key, base_value) in base {
        let entry = match record.remove(&key) {
            Some(value) => merge(value, base_value),
            None => base_value,
        };
        merged.insert(key, entry);
    }
    // Keys only the value supplies, absent entries included
    merged.extend(record);
    merged
}

/// Merge layers in order (first is base, last has highest precedence).
///
/// An empty sequence yields `Absent`.
pub fn merge_layers<I>(layers: I) -> Value
where
    I: IntoIterator<Item = Value>,
{
    layers
        .into_iter()
        .fold(Value::Absent, |merged, layer| merge(layer, merged))
}

impl Value {
    /// Method form of [`merge`]: `self` wins, gaps come from `default`.
    pub fn merged_with(self, default: Value) -> Value {
        merge(self, default)
    }
}
