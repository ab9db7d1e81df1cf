use crate::mapping::SqlParam;
use dbtable_core::err::{ConnectorError, Result};
use itertools::Itertools;

use super::require_non_blank;

/// Builds `INSERT INTO table ( cols ) VALUES ( ?, ... )`
#[derive(Debug, Default, Clone, PartialEq)]
pub struct InsertIntoBuilder {
    columns: Vec<String>,
    params: Vec<SqlParam>,
}

impl InsertIntoBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a quoted column and the value bound to it
    pub fn add_bind(&mut self, column: impl Into<String>, param: SqlParam) -> &mut Self {
        self.columns.push(column.into());
        self.params.push(param);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn params(&self) -> &[SqlParam] {
        &self.params
    }

    pub fn into_params(self) -> Vec<SqlParam> {
        self.params
    }

    pub fn sql(&self, table: &str) -> Result<String> {
        require_non_blank(table, "table")?;

        if self.is_empty() {
            return Err(ConnectorError::illegal_argument(
                "At least one column is required to insert a row",
            ));
        }

        Ok([
            "INSERT INTO".to_string(),
            table.to_string(),
            format!("( {} )", self.columns.iter().join(", ")),
            "VALUES".to_string(),
            format!("( {} )", self.columns.iter().map(|_| "?").join(", ")),
        ]
        .join(" "))
    }
}
