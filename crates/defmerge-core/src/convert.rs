//! Conversions between `Value` and the JSON / TOML data models
//!
//! JSON has no absent marker: absent record entries are dropped and absent
//! array elements become `null`. Date leaves render as strings; any other
//! opaque leaf cannot be represented.

use chrono::{DateTime, FixedOffset, Utc};
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Error as _, Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::Value as Json;

use crate::opaque::Opaque;
use crate::value::Value;

/// Conversion errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConvertError {
    #[error("Absent value has no JSON representation")]
    Absent,

    #[error("Opaque value of type {type_name} has no JSON representation")]
    Opaque { type_name: &'static str },
}

/// String form of the opaque leaves that have one.
fn render_opaque(opaque: &Opaque) -> Result<String, ConvertError> {
    if let Some(dt) = opaque.downcast_ref::<DateTime<Utc>>() {
        return Ok(dt.to_rfc3339());
    }
    if let Some(dt) = opaque.downcast_ref::<DateTime<FixedOffset>>() {
        return Ok(dt.to_rfc3339());
    }
    if let Some(dt) = opaque.downcast_ref::<toml::value::Datetime>() {
        return Ok(dt.to_string());
    }
    Err(ConvertError::Opaque {
        type_name: opaque.type_name(),
    })
}

impl From<Json> for Value {
    fn from(json: Json) -> Self {
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => Value::Number(n),
            Json::String(s) => Value::String(s),
            Json::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            Json::Object(map) => map.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
        }
    }
}

impl TryFrom<Value> for Json {
    type Error = ConvertError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Absent => Err(ConvertError::Absent),
            Value::Null => Ok(Json::Null),
            Value::Bool(b) => Ok(Json::Bool(b)),
            Value::Number(n) => Ok(Json::Number(n)),
            Value::String(s) => Ok(Json::String(s)),
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::Absent => Ok(Json::Null),
                    item => Json::try_from(item),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Json::Array),
            Value::Record(record) => record
                .into_iter()
                .filter(|(_, v)| !v.is_absent())
                .map(|(k, v)| Json::try_from(v).map(|json| (k, json)))
                .collect::<Result<serde_json::Map<_, _>, _>>()
                .map(Json::Object),
            Value::Opaque(opaque) => render_opaque(&opaque).map(Json::String),
        }
    }
}

impl From<toml::Value> for Value {
    fn from(toml: toml::Value) -> Self {
        match toml {
            toml::Value::String(s) => Value::String(s),
            toml::Value::Integer(i) => Value::from(i),
            toml::Value::Float(f) => Value::from(f),
            toml::Value::Boolean(b) => Value::Bool(b),
            toml::Value::Datetime(dt) => Value::opaque(dt),
            toml::Value::Array(items) => items.into_iter().map(Value::from).collect(),
            toml::Value::Table(table) => table.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Absent => Err(S::Error::custom(ConvertError::Absent)),
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => n.serialize(serializer),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    if item.is_absent() {
                        seq.serialize_element(&Value::Null)?;
                    } else {
                        seq.serialize_element(item)?;
                    }
                }
                seq.end()
            }
            Value::Record(record) => {
                let present = record.values().filter(|v| !v.is_absent()).count();
                let mut map = serializer.serialize_map(Some(present))?;
                for (key, item) in record.iter().filter(|(_, v)| !v.is_absent()) {
                    map.serialize_entry(key, item)?;
                }
                map.end()
            }
            Value::Opaque(opaque) => {
                let rendered = render_opaque(opaque).map_err(S::Error::custom)?;
                serializer.serialize_str(&rendered)
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Json::deserialize(deserializer).map(Value::from)
    }
}
