//! Conversion between column values and attribute values.
//!
//! Strategies form a chain, each node converting the value before
//! delegating to the next. The innermost node binds and reads natively.

use std::sync::Arc;

use dbtable_connectors_base::{
    common::SqlType,
    interface::{Row, Statement},
};
use dbtable_core::{
    data::DataValue,
    err::Result,
    framework::{AttributeType, AttributeValue},
};

use crate::DatabaseTableConfig;

mod attribute;
pub use attribute::*;
mod native;
pub use native::*;
mod string;
pub use string::*;
mod timestamp;
pub use timestamp::*;

/// A value bound to, or read from, a column
#[derive(Debug, Clone, PartialEq)]
pub struct SqlParam {
    /// The column name, empty for anonymous parameters
    pub name: String,
    pub value: AttributeValue,
    /// The type of the column, null if unknown
    pub sql_type: SqlType,
}

impl SqlParam {
    pub fn new(name: impl Into<String>, value: impl Into<AttributeValue>, sql_type: SqlType) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            sql_type,
        }
    }

    pub fn null(name: impl Into<String>, sql_type: SqlType) -> Self {
        Self::new(name, DataValue::Null, sql_type)
    }

    pub fn is_null(&self) -> bool {
        matches!(&self.value, AttributeValue::Data(d) if d.is_null())
    }

    /// The plain data value, none for secrets
    pub fn data(&self) -> Option<&DataValue> {
        self.value.as_data()
    }
}

/// A node of the mapping chain
pub trait MappingStrategy: Send + Sync {
    /// Binds the parameter to the 1-based placeholder
    fn set_sql_param(&self, stmt: &mut dyn Statement, idx: usize, param: &SqlParam) -> Result<()>;

    /// Reads the 1-based column of the current row
    fn get_sql_param(&self, row: &dyn Row, idx: usize, name: &str, sql_type: SqlType)
        -> Result<SqlParam>;

    /// The attribute type exposed in the schema for columns of the sql type
    fn get_sql_attribute_type(&self, sql_type: SqlType) -> AttributeType;
}

/// Builds the mapping chain for the configuration.
///
/// The native node is always last. Unless all columns are native, values are
/// read as strings, optionally with timestamps read natively before that.
/// Attribute values are always coerced first.
pub fn new_mapping_chain(conf: &DatabaseTableConfig) -> Arc<dyn MappingStrategy> {
    let mut sms: Box<dyn MappingStrategy> = Box::new(NativeMapping::default());

    if !conf.all_native {
        sms = Box::new(StringMapping::new(sms));

        if conf.native_timestamps {
            sms = Box::new(NativeTimestampsMapping::new(sms));
        }
    }

    Arc::new(AttributeCoercionMapping::new(sms))
}
