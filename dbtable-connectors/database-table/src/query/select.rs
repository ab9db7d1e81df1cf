use dbtable_core::err::{ConnectorError, Result};
use itertools::Itertools;

use crate::mapping::SqlParam;

use super::{require_non_blank, FilterWhereBuilder};

/// A column the results are sorted by
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub ascending: bool,
}

impl OrderBy {
    pub fn new(column: impl Into<String>, ascending: bool) -> Self {
        Self {
            column: column.into(),
            ascending,
        }
    }
}

/// Builds `SELECT cols FROM table [WHERE ...] [ORDER BY ...]`
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseQueryBuilder {
    table: String,
    columns: Vec<String>,
    r#where: Option<FilterWhereBuilder>,
    order_by: Vec<OrderBy>,
}

impl DatabaseQueryBuilder {
    /// Selects the quoted columns, duplicates are removed
    pub fn new(table: impl Into<String>, columns: impl IntoIterator<Item = String>) -> Self {
        Self {
            table: table.into(),
            columns: columns.into_iter().unique().collect(),
            r#where: None,
            order_by: vec![],
        }
    }

    pub fn with_where(mut self, r#where: Option<FilterWhereBuilder>) -> Self {
        self.r#where = r#where.filter(|w| !w.is_empty());
        self
    }

    pub fn with_order_by(mut self, order_by: Vec<OrderBy>) -> Self {
        self.order_by = order_by;
        self
    }

    pub fn sql(&self) -> Result<String> {
        require_non_blank(&self.table, "table")?;

        if self.columns.is_empty() {
            return Err(ConnectorError::illegal_argument(
                "At least one column must be selected",
            ));
        }

        for col in self.columns.iter() {
            require_non_blank(col, "column")?;
        }

        Ok([
            format!("SELECT {}", self.columns.iter().join(", ")),
            format!("FROM {}", self.table),
            match self.r#where.as_ref() {
                Some(w) => format!("WHERE {}", w.clause()),
                None => String::new(),
            },
            match self.order_by.is_empty() {
                true => String::new(),
                false => format!(
                    "ORDER BY {}",
                    self.order_by
                        .iter()
                        .map(|o| format!("{} {}", o.column, if o.ascending { "ASC" } else { "DESC" }))
                        .join(", ")
                ),
            },
        ]
        .into_iter()
        .filter(|i| !i.is_empty())
        .join(" "))
    }

    /// The values bound to the where clause placeholders
    pub fn params(&self) -> Vec<SqlParam> {
        self.r#where
            .as_ref()
            .map(|w| w.params().to_vec())
            .unwrap_or_default()
    }
}
