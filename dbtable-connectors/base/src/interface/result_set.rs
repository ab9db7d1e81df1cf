use dbtable_core::{
    data::{
        chrono::{NaiveDate, NaiveDateTime, NaiveTime},
        rust_decimal::Decimal,
        DataType, DataValue,
    },
    err::{Context, Result},
};

use crate::common::SqlType;

/// Metadata of a result set column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMeta {
    pub name: String,
    pub sql_type: SqlType,
    /// Whether the column accepts nulls, none if unknown
    pub nullable: Option<bool>,
}

impl ColumnMeta {
    pub fn new(name: impl Into<String>, sql_type: SqlType, nullable: Option<bool>) -> Self {
        Self {
            name: name.into(),
            sql_type,
            nullable,
        }
    }
}

/// A result set from an executed query
pub trait ResultSet {
    /// Gets the columns of the result set
    fn columns(&self) -> &[ColumnMeta];

    /// Advances to the next row
    fn next(&mut self) -> Result<Option<&dyn Row>>;
}

/// A row of a result set.
///
/// Column indexes are 1-based. The typed accessors default to coercing the
/// native value, drivers override them where the database knows better.
pub trait Row {
    /// Reads the driver-native value of the column
    fn get_object(&self, idx: usize) -> Result<DataValue>;

    fn get_as(&self, idx: usize, r#type: &DataType) -> Result<DataValue> {
        self.get_object(idx)?
            .try_coerce_into(r#type)
            .with_context(|| format!("Failed to read column {} as {:?}", idx, r#type))
    }

    fn get_string(&self, idx: usize) -> Result<Option<String>> {
        Ok(match self.get_as(idx, &DataType::Utf8String)? {
            DataValue::Utf8String(s) => Some(s),
            _ => None,
        })
    }

    fn get_bytes(&self, idx: usize) -> Result<Option<Vec<u8>>> {
        Ok(match self.get_as(idx, &DataType::Binary)? {
            DataValue::Binary(b) => Some(b),
            _ => None,
        })
    }

    fn get_boolean(&self, idx: usize) -> Result<Option<bool>> {
        Ok(match self.get_as(idx, &DataType::Boolean)? {
            DataValue::Boolean(b) => Some(b),
            _ => None,
        })
    }

    fn get_decimal(&self, idx: usize) -> Result<Option<Decimal>> {
        Ok(match self.get_as(idx, &DataType::Decimal)? {
            DataValue::Decimal(d) => Some(d),
            _ => None,
        })
    }

    fn get_timestamp(&self, idx: usize) -> Result<Option<NaiveDateTime>> {
        Ok(match self.get_as(idx, &DataType::DateTime)? {
            DataValue::DateTime(d) => Some(d),
            _ => None,
        })
    }

    fn get_date(&self, idx: usize) -> Result<Option<NaiveDate>> {
        Ok(match self.get_as(idx, &DataType::Date)? {
            DataValue::Date(d) => Some(d),
            _ => None,
        })
    }

    fn get_time(&self, idx: usize) -> Result<Option<NaiveTime>> {
        Ok(match self.get_as(idx, &DataType::Time)? {
            DataValue::Time(d) => Some(d),
            _ => None,
        })
    }
}
