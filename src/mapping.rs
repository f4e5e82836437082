//! JSON <-> record conversion behind the [`MappingProvider`] seam.

use crate::value::Value;
use std::fmt;
use std::io::Read;

/// Errors raised while turning source text into records or records back into
/// output text.
#[derive(Debug)]
pub enum MappingError {
    /// Input that the provider could not deserialize
    Deserialize(String),

    /// A result that the provider could not serialize
    Serialize(String),
}

impl fmt::Display for MappingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingError::Deserialize(msg) => write!(f, "failed to deserialize input: {}", msg),
            MappingError::Serialize(msg) => write!(f, "failed to serialize result: {}", msg),
        }
    }
}

impl std::error::Error for MappingError {}

/// The pluggable boundary between source documents and the neutral record
/// model. A provider owns both directions: parsing input into [`Value`]
/// records and rendering read results back out as text.
pub trait MappingProvider: Send + Sync {
    /// Parses one document. A top-level array becomes one record per
    /// element; anything else is a single record.
    fn deserialize(&self, input: &str) -> Result<Vec<Value>, MappingError>;

    /// Streaming variant of [`deserialize`](MappingProvider::deserialize).
    fn deserialize_reader(&self, reader: &mut dyn Read) -> Result<Vec<Value>, MappingError>;

    /// Renders a read result. Zero records serialize as `{}`, one as a bare
    /// document, and several as an array.
    fn serialize(&self, records: &[Value]) -> Result<String, MappingError>;
}

/// The default provider, backed by serde_json.
#[derive(Debug, Clone, Default)]
pub struct JsonMappingProvider {
    pretty: bool,
}

impl JsonMappingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize results with two-space indentation instead of compactly.
    pub fn pretty() -> Self {
        JsonMappingProvider { pretty: true }
    }
}

impl MappingProvider for JsonMappingProvider {
    fn deserialize(&self, input: &str) -> Result<Vec<Value>, MappingError> {
        let parsed: serde_json::Value = serde_json::from_str(input)
            .map_err(|e| MappingError::Deserialize(e.to_string()))?;
        Ok(split_records(parsed))
    }

    fn deserialize_reader(&self, reader: &mut dyn Read) -> Result<Vec<Value>, MappingError> {
        let parsed: serde_json::Value = serde_json::from_reader(reader)
            .map_err(|e| MappingError::Deserialize(e.to_string()))?;
        Ok(split_records(parsed))
    }

    fn serialize(&self, records: &[Value]) -> Result<String, MappingError> {
        let collapsed = collapse(records);
        let rendered = if self.pretty {
            serde_json::to_string_pretty(&collapsed)
        } else {
            serde_json::to_string(&collapsed)
        };
        rendered.map_err(|e| MappingError::Serialize(e.to_string()))
    }
}

fn split_records(parsed: serde_json::Value) -> Vec<Value> {
    match parsed {
        serde_json::Value::Array(elements) => {
            elements.into_iter().map(json_to_value).collect()
        }
        other => vec![json_to_value(other)],
    }
}

/// The serialization collapse rule shared by every provider path: an empty
/// result renders as an empty object, a single record as itself, and more
/// than one as an array.
pub(crate) fn collapse(records: &[Value]) -> serde_json::Value {
    match records {
        [] => serde_json::Value::Object(serde_json::Map::new()),
        [single] => value_to_json(single.clone()),
        many => serde_json::Value::Array(many.iter().cloned().map(value_to_json).collect()),
    }
}

pub(crate) fn json_to_value(v: serde_json::Value) -> Value {
    match v {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else {
                Value::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(arr) => {
            Value::Array(arr.into_iter().map(json_to_value).collect())
        }
        serde_json::Value::Object(obj) => {
            Value::Object(obj.into_iter().map(|(k, v)| (k, json_to_value(v))).collect())
        }
    }
}

pub(crate) fn value_to_json(v: Value) -> serde_json::Value {
    match v {
        Value::Null => serde_json::Value::Null,
        Value::Boolean(b) => serde_json::Value::Bool(b),
        Value::Integer(i) => serde_json::Value::Number(i.into()),
        Value::Float(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::String(s) => serde_json::Value::String(s),
        Value::Array(arr) => {
            serde_json::Value::Array(arr.into_iter().map(value_to_json).collect())
        }
        Value::Object(obj) => serde_json::Value::Object(
            obj.into_iter()
                .map(|(k, v)| (k, value_to_json(v)))
                .collect(),
        ),
    }
}
