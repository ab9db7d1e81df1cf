use dbtable_core::err::{ConnectorError, Result};
use itertools::Itertools;

use crate::mapping::SqlParam;

use super::require_non_blank;

/// Builds `UPDATE table SET col = ?, ... WHERE key = ?`
#[derive(Debug, Default, Clone, PartialEq)]
pub struct UpdateSetBuilder {
    assignments: Vec<String>,
    params: Vec<SqlParam>,
}

impl UpdateSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a `col = ?` assignment for the quoted column
    pub fn add_bind(&mut self, column: &str, param: SqlParam) -> &mut Self {
        self.assignments.push(format!("{} = ?", column));
        self.params.push(param);
        self
    }

    /// Appends a value bound after the assignments, such as the key predicate
    pub fn add_value(&mut self, param: SqlParam) -> &mut Self {
        self.params.push(param);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn params(&self) -> &[SqlParam] {
        &self.params
    }

    pub fn into_params(self) -> Vec<SqlParam> {
        self.params
    }

    pub fn sql(&self, table: &str, key_column: &str) -> Result<String> {
        require_non_blank(table, "table")?;
        require_non_blank(key_column, "key column")?;

        if self.is_empty() {
            return Err(ConnectorError::illegal_argument(
                "At least one column is required to update a row",
            ));
        }

        Ok(format!(
            "UPDATE {} SET {} WHERE {} = ?",
            table,
            self.assignments.iter().join(", "),
            key_column
        ))
    }
}
