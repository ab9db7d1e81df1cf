use dbtable_connectors_base::{
    common::SqlType,
    interface::{Row, Statement},
};
use dbtable_core::{data::DataValue, err::Result, framework::AttributeType};

use super::{MappingStrategy, SqlParam};

/// Reads timestamp columns with the native timestamp accessor,
/// some drivers render timestamps incorrectly as strings
pub struct NativeTimestampsMapping {
    delegate: Box<dyn MappingStrategy>,
}

impl NativeTimestampsMapping {
    pub fn new(delegate: Box<dyn MappingStrategy>) -> Self {
        Self { delegate }
    }
}

impl MappingStrategy for NativeTimestampsMapping {
    fn set_sql_param(&self, stmt: &mut dyn Statement, idx: usize, param: &SqlParam) -> Result<()> {
        self.delegate.set_sql_param(stmt, idx, param)
    }

    fn get_sql_param(
        &self,
        row: &dyn Row,
        idx: usize,
        name: &str,
        sql_type: SqlType,
    ) -> Result<SqlParam> {
        if sql_type != SqlType::Timestamp {
            return self.delegate.get_sql_param(row, idx, name, sql_type);
        }

        let val = match row.get_timestamp(idx)? {
            Some(ts) => DataValue::DateTime(ts),
            None => DataValue::Null,
        };

        Ok(SqlParam::new(name, val, sql_type))
    }

    fn get_sql_attribute_type(&self, sql_type: SqlType) -> AttributeType {
        self.delegate.get_sql_attribute_type(sql_type)
    }
}
