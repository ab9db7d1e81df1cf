use dbtable_connectors_base::{
    common::SqlType,
    interface::{Row, Statement},
};
use dbtable_core::{
    data::{DataType, DataValue},
    err::{bail, Context, Result},
    framework::{AttributeType, AttributeValue},
};

use super::{MappingStrategy, SqlParam};

/// Binds and reads values using the native type of the column
#[derive(Debug, Default)]
pub struct NativeMapping {}

impl MappingStrategy for NativeMapping {
    fn set_sql_param(&self, stmt: &mut dyn Statement, idx: usize, param: &SqlParam) -> Result<()> {
        let val = match &param.value {
            AttributeValue::Data(DataValue::Null) => return stmt.bind_null(idx, param.sql_type),
            AttributeValue::Data(val) => val.clone(),
            AttributeValue::Secret(_) => {
                bail!("Secret parameter {} must be exposed before binding", idx)
            }
        };

        let val = match param.sql_type.data_type() {
            DataType::Null => val,
            r#type => val.try_coerce_into(&r#type).with_context(|| {
                format!(
                    "Failed to bind parameter {} to column '{}' of type {:?}",
                    idx, param.name, param.sql_type
                )
            })?,
        };

        stmt.bind(idx, val)
    }

    fn get_sql_param(
        &self,
        row: &dyn Row,
        idx: usize,
        name: &str,
        sql_type: SqlType,
    ) -> Result<SqlParam> {
        let val = match sql_type {
            SqlType::Null | SqlType::Other => row.get_object(idx)?,
            SqlType::SmallInt => row.get_as(idx, &DataType::Int32)?,
            t => row.get_as(idx, &t.data_type())?,
        };

        Ok(SqlParam::new(name, val, sql_type))
    }

    fn get_sql_attribute_type(&self, sql_type: SqlType) -> AttributeType {
        match sql_type {
            SqlType::Decimal | SqlType::Numeric => AttributeType::BigDecimal,
            SqlType::Double | SqlType::Float => AttributeType::Double,
            SqlType::Real => AttributeType::Float,
            SqlType::Integer | SqlType::SmallInt => AttributeType::Integer,
            SqlType::BigInt => AttributeType::Long,
            SqlType::TinyInt => AttributeType::Byte,
            SqlType::Bit | SqlType::Boolean => AttributeType::Boolean,
            t if t.is_binary() => AttributeType::ByteArray,
            _ => AttributeType::String,
        }
    }
}
