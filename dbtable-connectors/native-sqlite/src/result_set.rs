use dbtable_connectors_base::interface::{ColumnMeta, ResultSet, Row};
use dbtable_core::{
    data::DataValue,
    err::{bail, Result},
};

use crate::{from_sqlite, SqliteResultExt};

/// Sqlite result set
pub struct SqliteResultSet<'stmt> {
    /// The stream of table rows
    rows: rusqlite::Rows<'stmt>,
    /// Column metadata
    cols: Vec<ColumnMeta>,
    /// The values of the current row
    current: SqliteRow,
}

impl<'stmt> SqliteResultSet<'stmt> {
    pub fn new(rows: rusqlite::Rows<'stmt>, cols: Vec<ColumnMeta>) -> Self {
        Self {
            rows,
            cols,
            current: SqliteRow::default(),
        }
    }
}

impl<'stmt> ResultSet for SqliteResultSet<'stmt> {
    fn columns(&self) -> &[ColumnMeta] {
        &self.cols
    }

    fn next(&mut self) -> Result<Option<&dyn Row>> {
        let row = match self.rows.next().sql()? {
            Some(row) => row,
            None => return Ok(None),
        };

        self.current.values = (0..self.cols.len())
            .map(|idx| Ok(from_sqlite(row.get_ref(idx).sql()?)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Some(&self.current))
    }
}

/// The values of a row read from sqlite
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SqliteRow {
    values: Vec<DataValue>,
}

impl Row for SqliteRow {
    fn get_object(&self, idx: usize) -> Result<DataValue> {
        match idx.checked_sub(1).and_then(|i| self.values.get(i)) {
            Some(val) => Ok(val.clone()),
            None => bail!(
                "Column index {} out of range for row with {} columns",
                idx,
                self.values.len()
            ),
        }
    }
}
