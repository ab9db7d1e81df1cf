use dbtable_connectors_base::{
    common::SqlType,
    interface::{Row, Statement},
};
use dbtable_core::{data::DataValue, err::Result, framework::AttributeType};

use super::{MappingStrategy, SqlParam};

/// Reads every non-binary column as a string.
/// Text values are written through the next node, which parses them into the column type.
pub struct StringMapping {
    delegate: Box<dyn MappingStrategy>,
}

impl StringMapping {
    pub fn new(delegate: Box<dyn MappingStrategy>) -> Self {
        Self { delegate }
    }
}

impl MappingStrategy for StringMapping {
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
        if sql_type.is_binary() {
            return self.delegate.get_sql_param(row, idx, name, sql_type);
        }

        let val = match row.get_string(idx)? {
            Some(s) => DataValue::Utf8String(s),
            None => DataValue::Null,
        };

        Ok(SqlParam::new(name, val, sql_type))
    }

    fn get_sql_attribute_type(&self, sql_type: SqlType) -> AttributeType {
        if sql_type.is_binary() {
            return self.delegate.get_sql_attribute_type(sql_type);
        }

        AttributeType::String
    }
}
