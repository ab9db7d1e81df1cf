use std::collections::HashMap;

use dbtable_core::{
    data::DataValue,
    err::{ConnectorError, Result},
};

use crate::common::SqlType;

use super::ResultSet;

/// An open connection to a database
pub trait Connection {
    /// Prepares the supplied sql for execution
    fn prepare(&mut self, sql: &str) -> Result<Box<dyn Statement + '_>>;

    /// Prepares a stored procedure call.
    /// Drivers without a distinct call syntax prepare it as a regular statement.
    fn prepare_call(&mut self, sql: &str) -> Result<Box<dyn Statement + '_>> {
        self.prepare(sql)
    }

    /// Enables or disables committing after every statement
    fn set_auto_commit(&mut self, auto_commit: bool) -> Result<()>;

    fn auto_commit(&self) -> bool;

    fn commit(&mut self) -> Result<()>;

    fn rollback(&mut self) -> Result<()>;

    /// The name of the database product, as reported by the driver
    fn product_name(&self) -> String;

    /// Sets a vendor-specific connection property
    fn set_property(&mut self, name: &str, _value: &str) -> Result<()> {
        Err(ConnectorError::unsupported_operation(format!(
            "Connection property \"{}\" is not supported by {}",
            name,
            self.product_name()
        )))
    }

    /// Performs a round trip to the database to check the connection is usable
    fn is_valid(&mut self) -> Result<()>;

    /// Looks up which columns of the table accept nulls, keyed by column name.
    /// Used when the result set metadata does not report nullability.
    fn column_nullability(&mut self, _table: &str) -> Result<HashMap<String, bool>> {
        Ok(HashMap::new())
    }
}

/// A prepared statement with positional parameters
pub trait Statement {
    /// The sql text of the statement
    fn sql(&self) -> &str;

    /// The number of `?` placeholders in the statement
    fn parameter_count(&self) -> usize;

    /// Binds a value to the 1-based placeholder
    fn bind(&mut self, idx: usize, val: DataValue) -> Result<()>;

    /// Binds a null of the supplied type to the 1-based placeholder
    fn bind_null(&mut self, idx: usize, sql_type: SqlType) -> Result<()>;

    /// Whether executing the statement produces a result set
    fn has_result_set(&self) -> bool;

    /// Executes the query, returning the result set
    fn execute_query(&mut self) -> Result<Box<dyn ResultSet + '_>>;

    /// Executes the statement, returning the number of affected rows
    fn execute_modify(&mut self) -> Result<u64>;
}
