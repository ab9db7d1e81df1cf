use dbtable_core::{
    data::DataType,
    err::{self, bail, Result},
};

/// The SQL type codes reported by database drivers.
/// The discriminants are the JDBC `java.sql.Types` constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum SqlType {
    Bit = -7,
    TinyInt = -6,
    SmallInt = 5,
    Integer = 4,
    BigInt = -5,
    Float = 6,
    Real = 7,
    Double = 8,
    Numeric = 2,
    Decimal = 3,
    Char = 1,
    VarChar = 12,
    LongVarChar = -1,
    NChar = -15,
    NVarChar = -9,
    LongNVarChar = -16,
    Date = 91,
    Time = 92,
    Timestamp = 93,
    Binary = -2,
    VarBinary = -3,
    LongVarBinary = -4,
    Null = 0,
    Other = 1111,
    Blob = 2004,
    Clob = 2005,
    NClob = 2011,
    Boolean = 16,
}

impl TryFrom<i32> for SqlType {
    type Error = err::Error;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Ok(match value {
            -7 => Self::Bit,
            -6 => Self::TinyInt,
            5 => Self::SmallInt,
            4 => Self::Integer,
            -5 => Self::BigInt,
            6 => Self::Float,
            7 => Self::Real,
            8 => Self::Double,
            2 => Self::Numeric,
            3 => Self::Decimal,
            1 => Self::Char,
            12 => Self::VarChar,
            -1 => Self::LongVarChar,
            -15 => Self::NChar,
            -9 => Self::NVarChar,
            -16 => Self::LongNVarChar,
            91 => Self::Date,
            92 => Self::Time,
            93 => Self::Timestamp,
            -2 => Self::Binary,
            -3 => Self::VarBinary,
            -4 => Self::LongVarBinary,
            0 => Self::Null,
            1111 => Self::Other,
            2004 => Self::Blob,
            2005 => Self::Clob,
            2011 => Self::NClob,
            16 => Self::Boolean,
            _ => bail!("Unrecognized SQL type code: {}", value),
        })
    }
}

impl SqlType {
    pub fn code(&self) -> i32 {
        *self as i32
    }

    /// Character column types
    pub fn is_string(&self) -> bool {
        matches!(
            self,
            Self::Char
                | Self::VarChar
                | Self::LongVarChar
                | Self::NChar
                | Self::NVarChar
                | Self::LongNVarChar
                | Self::Clob
                | Self::NClob
        )
    }

    /// Byte array column types
    pub fn is_binary(&self) -> bool {
        matches!(
            self,
            Self::Binary | Self::VarBinary | Self::LongVarBinary | Self::Blob
        )
    }

    pub fn is_temporal(&self) -> bool {
        matches!(self, Self::Date | Self::Time | Self::Timestamp)
    }

    /// The type of value produced by a native read of a column of this type.
    /// Unspecified types map to null, meaning the driver's value is kept as is.
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Bit | Self::Boolean => DataType::Boolean,
            Self::TinyInt => DataType::Int8,
            Self::SmallInt => DataType::Int16,
            Self::Integer => DataType::Int32,
            Self::BigInt => DataType::Int64,
            Self::Real => DataType::Float32,
            Self::Float | Self::Double => DataType::Float64,
            Self::Numeric | Self::Decimal => DataType::Decimal,
            Self::Date => DataType::Date,
            Self::Time => DataType::Time,
            Self::Timestamp => DataType::DateTime,
            t if t.is_string() => DataType::Utf8String,
            t if t.is_binary() => DataType::Binary,
            _ => DataType::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_sql_type_code_conversions() {
        let types = [
            SqlType::Bit,
            SqlType::TinyInt,
            SqlType::SmallInt,
            SqlType::Integer,
            SqlType::BigInt,
            SqlType::Float,
            SqlType::Real,
            SqlType::Double,
            SqlType::Numeric,
            SqlType::Decimal,
            SqlType::Char,
            SqlType::VarChar,
            SqlType::LongVarChar,
            SqlType::NChar,
            SqlType::NVarChar,
            SqlType::LongNVarChar,
            SqlType::Date,
            SqlType::Time,
            SqlType::Timestamp,
            SqlType::Binary,
            SqlType::VarBinary,
            SqlType::LongVarBinary,
            SqlType::Null,
            SqlType::Other,
            SqlType::Blob,
            SqlType::Clob,
            SqlType::NClob,
            SqlType::Boolean,
        ];

        for t in types {
            assert_eq!(SqlType::try_from(t.code()).unwrap(), t);
        }
    }

    #[test]
    fn test_sql_type_unknown_code() {
        SqlType::try_from(12345).unwrap_err();
    }

    #[test]
    fn test_sql_type_data_type() {
        assert_eq!(SqlType::VarChar.data_type(), DataType::Utf8String);
        assert_eq!(SqlType::Blob.data_type(), DataType::Binary);
        assert_eq!(SqlType::Timestamp.data_type(), DataType::DateTime);
        assert_eq!(SqlType::Other.data_type(), DataType::Null);
    }
}
