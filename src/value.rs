use std::collections::HashMap;

/// A JSON-like value used throughout the Quell query language.
///
/// This is the universal record shape flowing through parse -> filter ->
/// project -> serialize. A record is a [`Value::Object`]; its fields can be
/// scalars, nested objects, or arrays of either.
///
/// Integers and floats are kept distinct (unlike standard JSON which only has
/// "number"): arithmetic in projections preserves integer types when results
/// are whole, and mixed integer/float operations collapse back to integers
/// when mathematically exact.
///
/// # Examples
///
/// ```
/// use quell::Value;
/// use std::collections::HashMap;
///
/// let null = Value::Null;
/// let boolean = Value::Boolean(true);
/// let integer = Value::Integer(42);
/// let float = Value::Float(49.99);
/// let string = Value::String("tap".to_string());
///
/// let array = Value::Array(vec![Value::Integer(1), Value::Integer(2)]);
///
/// let mut obj = HashMap::new();
/// obj.insert("name".to_string(), Value::String("tap".to_string()));
/// let record = Value::Object(obj);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// JSON null
    Null,

    /// JSON boolean (true/false)
    Boolean(bool),

    /// Integer number (preserved separately from floats)
    Integer(i64),

    /// Floating-point number
    Float(f64),

    /// UTF-8 string
    String(String),

    /// Array of values (homogeneous or heterogeneous)
    Array(Vec<Value>),

    /// Object with string keys
    Object(HashMap<String, Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// True for an object with no fields. Records projected or filtered down
    /// to nothing are represented this way and dropped from read results.
    pub fn is_empty_record(&self) -> bool {
        matches!(self, Value::Object(map) if map.is_empty())
    }

    /// Get as float, widening integers
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Stringify for concatenation
    pub fn as_string(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Integer(n) => n.to_string(),
            Value::Float(n) => n.to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Null => "null".to_string(),
            _ => format!("{:?}", self),
        }
    }

    /// Human-readable type name, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}
