use dbtable_connectors_base::common::{SqlError, SqlType};
use dbtable_core::{
    data::DataValue,
    err::{Error, Result},
};
use rusqlite::{types::ValueRef, ToSql};

/// Maps a declared column type to the closest sql type.
///
/// Well known type names are matched first, then the column's type affinity is used.
/// @see sqlite3AffinityType in sqlite source
/// https://github.com/sqlite/sqlite/blob/41ce47c4f4bcae3882fdccec18a6100a85f4bba5/src/build.c#L1654
pub fn from_sqlite_type(decl: Option<&str>) -> SqlType {
    let decl = match decl {
        Some(d) if !d.trim().is_empty() => d.trim().to_uppercase(),
        // expressions and untyped columns
        _ => return SqlType::Null,
    };
    let name = decl.split('(').next().unwrap_or_default().trim();

    match name {
        "BOOLEAN" | "BOOL" => return SqlType::Boolean,
        "BIT" => return SqlType::Bit,
        "TINYINT" => return SqlType::TinyInt,
        "SMALLINT" => return SqlType::SmallInt,
        "INTEGER" | "INT" | "MEDIUMINT" => return SqlType::Integer,
        "BIGINT" => return SqlType::BigInt,
        "DECIMAL" => return SqlType::Decimal,
        "NUMERIC" => return SqlType::Numeric,
        "DOUBLE" | "DOUBLE PRECISION" => return SqlType::Double,
        "FLOAT" => return SqlType::Float,
        "REAL" => return SqlType::Real,
        "TIMESTAMP" | "DATETIME" => return SqlType::Timestamp,
        "DATE" => return SqlType::Date,
        "TIME" => return SqlType::Time,
        "CHAR" | "CHARACTER" => return SqlType::Char,
        "VARCHAR" | "VARYING CHARACTER" => return SqlType::VarChar,
        "NCHAR" | "NATIVE CHARACTER" => return SqlType::NChar,
        "NVARCHAR" => return SqlType::NVarChar,
        "TEXT" => return SqlType::LongVarChar,
        "CLOB" => return SqlType::Clob,
        "BLOB" => return SqlType::Blob,
        "BINARY" => return SqlType::Binary,
        "VARBINARY" => return SqlType::VarBinary,
        _ => {}
    }

    if decl.contains("INT") {
        SqlType::BigInt
    } else if decl.contains("CHAR") || decl.contains("CLOB") || decl.contains("TEXT") {
        SqlType::VarChar
    } else if decl.contains("BLOB") {
        SqlType::Blob
    } else if decl.contains("REAL") || decl.contains("FLOA") || decl.contains("DOUB") {
        SqlType::Double
    } else {
        // numeric affinity, the stored value may be of any type
        SqlType::Other
    }
}

pub fn to_sqlite(val: DataValue) -> Box<dyn ToSql> {
    match val {
        DataValue::Null => Box::new(rusqlite::types::Null),
        DataValue::Utf8String(d) => Box::new(d),
        DataValue::Binary(d) => Box::new(d),
        DataValue::Boolean(d) => Box::new(d),
        DataValue::Int8(d) => Box::new(d),
        DataValue::Int16(d) => Box::new(d),
        DataValue::Int32(d) => Box::new(d),
        DataValue::Int64(d) => Box::new(d),
        DataValue::Float32(d) => Box::new(d as f64),
        DataValue::Float64(d) => Box::new(d),
        DataValue::Decimal(d) => Box::new(d.to_string()),
        // temporal values are stored as text in a fixed format
        DataValue::Date(d) => Box::new(d.format("%Y-%m-%d").to_string()),
        DataValue::Time(d) => Box::new(d.format("%H:%M:%S%.f").to_string()),
        DataValue::DateTime(d) => Box::new(d.format("%Y-%m-%d %H:%M:%S%.f").to_string()),
    }
}

pub fn from_sqlite(val: ValueRef<'_>) -> DataValue {
    match val {
        ValueRef::Null => DataValue::Null,
        ValueRef::Integer(d) => DataValue::Int64(d),
        ValueRef::Real(d) => DataValue::Float64(d),
        ValueRef::Text(d) => DataValue::Utf8String(String::from_utf8_lossy(d).to_string()),
        ValueRef::Blob(d) => DataValue::Binary(d.to_vec()),
    }
}

/// Converts a rusqlite error, keeping the database error code of failures
pub fn sql_error(err: rusqlite::Error) -> Error {
    match err {
        rusqlite::Error::SqliteFailure(e, msg) => SqlError::new(
            msg.unwrap_or_else(|| e.to_string()),
            e.extended_code,
            None,
        )
        .into(),
        other => Error::new(other),
    }
}

pub(crate) trait SqliteResultExt<T> {
    fn sql(self) -> Result<T>;
}

impl<T> SqliteResultExt<T> for rusqlite::Result<T> {
    fn sql(self) -> Result<T> {
        self.map_err(sql_error)
    }
}
