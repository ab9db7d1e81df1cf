use dbtable_connectors_base::{
    common::SqlType,
    interface::{Row, Statement},
};
use dbtable_core::{
    data::DataValue,
    err::Result,
    framework::{AttributeType, AttributeValue},
};

use super::{MappingStrategy, SqlParam};

/// Converts between attribute values and the primitives understood by the rest of the chain.
///
/// Secrets are exposed only for the duration of the bind and are bound as varchar.
/// Temporal values read from the database are rendered as strings.
pub struct AttributeCoercionMapping {
    delegate: Box<dyn MappingStrategy>,
}

impl AttributeCoercionMapping {
    pub fn new(delegate: Box<dyn MappingStrategy>) -> Self {
        Self { delegate }
    }
}

impl MappingStrategy for AttributeCoercionMapping {
    fn set_sql_param(&self, stmt: &mut dyn Statement, idx: usize, param: &SqlParam) -> Result<()> {
        match &param.value {
            AttributeValue::Secret(secret) => secret.access(|plain| {
                let exposed = SqlParam::new(param.name.as_str(), plain, SqlType::VarChar);
                self.delegate.set_sql_param(stmt, idx, &exposed)
            }),
            AttributeValue::Data(_) => self.delegate.set_sql_param(stmt, idx, param),
        }
    }

    fn get_sql_param(
        &self,
        row: &dyn Row,
        idx: usize,
        name: &str,
        sql_type: SqlType,
    ) -> Result<SqlParam> {
        let mut param = self.delegate.get_sql_param(row, idx, name, sql_type)?;

        if let AttributeValue::Data(val) = &param.value {
            let coerced = match val {
                DataValue::DateTime(ts) => Some(DataValue::format_timestamp(ts).into()),
                DataValue::Date(_) | DataValue::Time(_) => Some(val.to_string().into()),
                DataValue::Int16(i) => Some(DataValue::Int32(*i as i32)),
                _ => None,
            };

            if let Some(coerced) = coerced {
                param.value = AttributeValue::Data(coerced);
            }
        }

        Ok(param)
    }

    fn get_sql_attribute_type(&self, sql_type: SqlType) -> AttributeType {
        self.delegate.get_sql_attribute_type(sql_type)
    }
}
