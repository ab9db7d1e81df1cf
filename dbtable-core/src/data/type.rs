use serde::{Deserialize, Serialize};

use super::DataValue;

/// The type of a connector value.
/// `Null` doubles as "unspecified", coercing into it keeps the value untouched.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum DataType {
    Utf8String,
    Binary,
    Boolean,
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    Decimal,
    Date,
    Time,
    DateTime,
    Null,
}

impl DataValue {
    /// The type of the contained value
    pub fn data_type(&self) -> DataType {
        use DataType as T;

        match self {
            Self::Null => T::Null,
            Self::Utf8String(_) => T::Utf8String,
            Self::Binary(_) => T::Binary,
            Self::Boolean(_) => T::Boolean,
            Self::Int8(_) => T::Int8,
            Self::Int16(_) => T::Int16,
            Self::Int32(_) => T::Int32,
            Self::Int64(_) => T::Int64,
            Self::Float32(_) => T::Float32,
            Self::Float64(_) => T::Float64,
            Self::Decimal(_) => T::Decimal,
            Self::Date(_) => T::Date,
            Self::Time(_) => T::Time,
            Self::DateTime(_) => T::DateTime,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_value_data_type() {
        assert_eq!(DataValue::Null.data_type(), DataType::Null);
        assert_eq!(DataValue::from("abc").data_type(), DataType::Utf8String);
        assert_eq!(DataValue::Int32(1).data_type(), DataType::Int32);
        assert_eq!(DataValue::Binary(vec![1]).data_type(), DataType::Binary);
    }
}
