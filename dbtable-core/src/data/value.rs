use std::fmt;

use serde::{Deserialize, Serialize};

/// Data container for respective types
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub enum DataValue {
    Null,
    Utf8String(String),
    Binary(Vec<u8>),
    Boolean(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Decimal(rust_decimal::Decimal),
    Date(chrono::NaiveDate),
    Time(chrono::NaiveTime),
    DateTime(chrono::NaiveDateTime),
}

impl DataValue {
    pub fn is_null(&self) -> bool {
        *self == DataValue::Null
    }
}

/// Renders the value the way it would appear in a result set read as text
impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataValue::Null => write!(f, "null"),
            DataValue::Utf8String(d) => write!(f, "{}", d),
            DataValue::Binary(d) => write!(f, "<{} bytes>", d.len()),
            DataValue::Boolean(d) => write!(f, "{}", d),
            DataValue::Int8(d) => write!(f, "{}", d),
            DataValue::Int16(d) => write!(f, "{}", d),
            DataValue::Int32(d) => write!(f, "{}", d),
            DataValue::Int64(d) => write!(f, "{}", d),
            DataValue::Float32(d) => write!(f, "{}", d),
            DataValue::Float64(d) => write!(f, "{}", d),
            DataValue::Decimal(d) => write!(f, "{}", d),
            DataValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            DataValue::Time(d) => write!(f, "{}", d.format("%H:%M:%S")),
            DataValue::DateTime(d) => write!(f, "{}", d.format("%Y-%m-%d %H:%M:%S%.f")),
        }
    }
}

impl From<&str> for DataValue {
    fn from(str: &str) -> Self {
        DataValue::Utf8String(str.to_string())
    }
}

impl From<String> for DataValue {
    fn from(str: String) -> Self {
        DataValue::Utf8String(str)
    }
}

impl From<i32> for DataValue {
    fn from(v: i32) -> Self {
        DataValue::Int32(v)
    }
}

impl From<i64> for DataValue {
    fn from(v: i64) -> Self {
        DataValue::Int64(v)
    }
}

impl From<bool> for DataValue {
    fn from(v: bool) -> Self {
        DataValue::Boolean(v)
    }
}

impl From<Vec<u8>> for DataValue {
    fn from(v: Vec<u8>) -> Self {
        DataValue::Binary(v)
    }
}
