use std::collections::HashMap;

/// An owned NBT value.
///
/// Compounds map child names to values; list elements are unnamed and
/// homogeneous. The bulk array kinds are kept as native arrays rather than
/// lists of scalars.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    List(Vec<Value>),
    Compound(HashMap<String, Value>),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

impl Value {
    /// Name of the kind, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Byte(_) => "byte",
            Value::Short(_) => "short",
            Value::Int(_) => "int",
            Value::Long(_) => "long",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::ByteArray(_) => "byte array",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Compound(_) => "compound",
            Value::IntArray(_) => "int array",
            Value::LongArray(_) => "long array",
        }
    }

    /// Child of a compound by name. None for non-compounds.
    pub fn get(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Compound(fields) => fields.get(name),
            _ => None,
        }
    }

    pub fn as_compound(&self) -> Option<&HashMap<String, Value>> {
        match self {
            Value::Compound(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i8(&self) -> Option<i8> {
        match self {
            Value::Byte(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Long(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_long_array(&self) -> Option<&[i64]> {
        match self {
            Value::LongArray(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_int_array(&self) -> Option<&[i32]> {
        match self {
            Value::IntArray(v) => Some(v),
            _ => None,
        }
    }
}
