use dbtable_connectors_base::{
    common::SqlType,
    interface::{ColumnMeta, ResultSet, Statement},
};
use dbtable_core::{
    data::DataValue,
    err::{ensure, Result},
};

use crate::{from_sqlite_type, to_sqlite, SqliteResultExt, SqliteResultSet};

/// A prepared sqlite statement
pub struct SqliteStatement<'conn> {
    stmt: rusqlite::Statement<'conn>,
    sql: String,
}

impl<'conn> SqliteStatement<'conn> {
    pub fn new(stmt: rusqlite::Statement<'conn>, sql: impl Into<String>) -> Self {
        Self {
            stmt,
            sql: sql.into(),
        }
    }

    fn check_index(&self, idx: usize) -> Result<()> {
        ensure!(
            idx >= 1 && idx <= self.stmt.parameter_count(),
            "Parameter index {} out of range for statement with {} parameters",
            idx,
            self.stmt.parameter_count()
        );
        Ok(())
    }

    fn column_meta(&self) -> Vec<ColumnMeta> {
        self.stmt
            .columns()
            .into_iter()
            .map(|c| ColumnMeta::new(c.name(), from_sqlite_type(c.decl_type()), None))
            .collect()
    }
}

impl<'conn> Statement for SqliteStatement<'conn> {
    fn sql(&self) -> &str {
        &self.sql
    }

    fn parameter_count(&self) -> usize {
        self.stmt.parameter_count()
    }

    fn bind(&mut self, idx: usize, val: DataValue) -> Result<()> {
        self.check_index(idx)?;
        self.stmt.raw_bind_parameter(idx, to_sqlite(val)).sql()
    }

    fn bind_null(&mut self, idx: usize, _sql_type: SqlType) -> Result<()> {
        self.check_index(idx)?;
        self.stmt.raw_bind_parameter(idx, rusqlite::types::Null).sql()
    }

    fn has_result_set(&self) -> bool {
        self.stmt.column_count() > 0
    }

    fn execute_query(&mut self) -> Result<Box<dyn ResultSet + '_>> {
        let cols = self.column_meta();
        let rows = self.stmt.raw_query();

        Ok(Box::new(SqliteResultSet::new(rows, cols)))
    }

    fn execute_modify(&mut self) -> Result<u64> {
        Ok(self.stmt.raw_execute().sql()? as u64)
    }
}
