use std::fmt;

use serde::{Deserialize, Serialize};

/// Declared type of an option or argument. Defaults to `String`.
#[derive(Debug, Deserialize, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    #[default]
    String,
    Int,
    Float,
    Bool,
}

impl ValueType {
    /// Parse a raw input string as this type.
    ///
    /// Bools accept only `true`/`false`, case-insensitively.
    pub fn parse(self, raw: &str) -> Option<Value> {
        match self {
            Self::String => Some(Value::String(raw.to_string())),
            Self::Int => raw.parse().ok().map(Value::Int),
            Self::Float => raw.parse().ok().map(Value::Float),
            Self::Bool => match raw.to_ascii_lowercase().as_str() {
                "true" => Some(Value::Bool(true)),
                "false" => Some(Value::Bool(false)),
                _ => None,
            },
        }
    }

    /// Fit an already-typed scalar to this type, widening ints to floats.
    pub fn coerce(self, value: Value) -> Option<Value> {
        match (self, value) {
            (Self::Float, Value::Int(i)) => Some(Value::Float(i as f64)),
            (ty, value) if value.value_type() == Some(ty) => Some(value),
            _ => None,
        }
    }

    /// Fit a declared default to this type. Strings are parsed and other
    /// scalars coerced; array slots take an array of such values or a single
    /// one, which is wrapped.
    pub(crate) fn fit_default(self, value: Value, array: bool) -> Option<Value> {
        match value {
            Value::Array(items) if array => items
                .into_iter()
                .map(|item| self.fit(item))
                .collect::<Option<Vec<_>>>()
                .map(Value::Array),
            Value::Array(_) => None,
            scalar if array => self.fit(scalar).map(|item| Value::Array(vec![item])),
            scalar => self.fit(scalar),
        }
    }

    fn fit(self, value: Value) -> Option<Value> {
        match value {
            Value::String(raw) if self != Self::String => self.parse(&raw),
            value => self.coerce(value),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
        };
        f.write_str(name)
    }
}

/// A bound option or argument value.
///
/// Arrays hold scalars of a single declared type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
}

impl Value {
    /// Type of a scalar; `None` for arrays.
    pub fn value_type(&self) -> Option<ValueType> {
        match self {
            Self::Bool(_) => Some(ValueType::Bool),
            Self::Int(_) => Some(ValueType::Int),
            Self::Float(_) => Some(ValueType::Float),
            Self::String(_) => Some(ValueType::String),
            Self::Array(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_empty_array(&self) -> bool {
        matches!(self, Self::Array(items) if items.is_empty())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => f.write_str(s),
            Self::Array(items) => {
                let items: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", items.join(", "))
            }
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::Array(items.into_iter().map(Into::into).collect())
    }
}
