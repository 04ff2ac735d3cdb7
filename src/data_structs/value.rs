use std::fmt::Display;
use std::str::FromStr;

use polars::prelude::DataType;
use serde::{
    Deserialize,
    Serialize,
};

use crate::error::GtfError;

/// Value type of a GTF column.
#[derive(Eq, Hash, PartialEq, Copy, Clone, Debug, Default)]
pub enum ValueType {
    /// Raw text, the type of every attribute unless configured otherwise.
    #[default]
    String,
    /// 64-bit signed integer (`start`, `end`).
    Long,
    /// 64-bit float (`score`).
    Double,
    /// 32-bit signed integer (`frame`).
    Integer,
}

impl ValueType {
    /// Parses a raw cell. Unparseable input degrades to [`Value::Null`].
    pub fn parse(
        &self,
        raw: &str,
    ) -> Value {
        self.try_parse(raw).unwrap_or(Value::Null)
    }

    /// Returns true if `raw` parses into this type.
    pub fn accepts(
        &self,
        raw: &str,
    ) -> bool {
        self.try_parse(raw).is_ok()
    }

    /// Parses a raw cell, reporting a coercion failure instead of
    /// degrading to null.
    pub fn try_parse(
        &self,
        raw: &str,
    ) -> Result<Value, GtfError> {
        let coercion_err = || {
            GtfError::TypeCoercion {
                value:      raw.to_string(),
                value_type: *self,
            }
        };
        let value = match self {
            ValueType::String => Value::String(raw.to_string()),
            ValueType::Long => {
                Value::Long(raw.trim().parse().map_err(|_| coercion_err())?)
            },
            ValueType::Double => {
                Value::Double(raw.trim().parse().map_err(|_| coercion_err())?)
            },
            ValueType::Integer => {
                Value::Integer(raw.trim().parse().map_err(|_| coercion_err())?)
            },
        };
        Ok(value)
    }

    /// Polars data type used when rows are collected into a DataFrame.
    pub fn dtype(&self) -> DataType {
        match self {
            ValueType::String => DataType::String,
            ValueType::Long => DataType::Int64,
            ValueType::Double => DataType::Float64,
            ValueType::Integer => DataType::Int32,
        }
    }

    /// Maps a polars data type back onto the closest value type.
    pub fn from_dtype(dtype: &DataType) -> Self {
        match dtype {
            DataType::Int64 | DataType::UInt32 | DataType::UInt64 => {
                ValueType::Long
            },
            DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::UInt8
            | DataType::UInt16 => ValueType::Integer,
            DataType::Float32 | DataType::Float64 => ValueType::Double,
            _ => ValueType::String,
        }
    }
}

impl FromStr for ValueType {
    type Err = GtfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "string" | "str" | "utf8" => Ok(ValueType::String),
            "long" | "i64" | "int64" => Ok(ValueType::Long),
            "double" | "f64" | "float64" | "float" => Ok(ValueType::Double),
            "integer" | "int" | "i32" | "int32" => Ok(ValueType::Integer),
            _ => Err(GtfError::Configuration(s.to_string())),
        }
    }
}

impl Display for ValueType {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        let name = match self {
            ValueType::String => "string",
            ValueType::Long => "long",
            ValueType::Double => "double",
            ValueType::Integer => "integer",
        };
        write!(f, "{}", name)
    }
}

impl Serialize for ValueType {
    fn serialize<S>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer, {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ValueType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>, {
        let s = String::deserialize(deserializer)?;
        ValueType::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// A typed cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    String(String),
    Long(i64),
    Double(f64),
    Integer(i32),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self {
            Value::Long(v) => Some(*v),
            Value::Integer(v) => Some(*v as i64),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Double(v) => Some(*v),
            Value::Long(v) => Some(*v as f64),
            Value::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "."),
            Value::String(s) => write!(f, "{}", s),
            Value::Long(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::Integer(v) => write!(f, "{}", v),
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer, {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::String(s) => serializer.serialize_str(s),
            Value::Long(v) => serializer.serialize_i64(*v),
            Value::Double(v) => serializer.serialize_f64(*v),
            Value::Integer(v) => serializer.serialize_i32(*v),
        }
    }
}
