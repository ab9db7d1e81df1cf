use std::collections::HashMap;

use dbtable_connectors_base::interface::{Connection, Statement};
use dbtable_core::err::{Context, Result};
use dbtable_logging::{debug, trace};

use crate::{SqliteResultExt, SqliteStatement};

/// Connection to a sqlite database
pub struct SqliteConnection {
    /// The inner connection
    con: rusqlite::Connection,
    /// Whether statements are committed as they execute
    auto_commit: bool,
}

impl SqliteConnection {
    pub fn new(con: rusqlite::Connection) -> Self {
        Self {
            con,
            auto_commit: true,
        }
    }

    pub fn con(&self) -> &rusqlite::Connection {
        &self.con
    }

    /// Executes the supplied sql script outside of any prepared statement
    pub fn execute_batch(&mut self, sql: &str) -> Result<()> {
        self.con.execute_batch(sql).sql()
    }

    fn in_transaction(&self) -> bool {
        !self.con.is_autocommit()
    }

    /// Opens a transaction when auto commit is disabled and none is active
    fn ensure_transaction(&mut self) -> Result<()> {
        if !self.auto_commit && !self.in_transaction() {
            trace!("Beginning sqlite transaction");
            self.con
                .execute_batch("BEGIN DEFERRED")
                .sql()
                .context("Failed to begin transaction")?;
        }

        Ok(())
    }
}

impl Connection for SqliteConnection {
    fn prepare(&mut self, sql: &str) -> Result<Box<dyn Statement + '_>> {
        self.ensure_transaction()?;

        let stmt = self.con.prepare(sql).sql()?;
        Ok(Box::new(SqliteStatement::new(stmt, sql)))
    }

    fn set_auto_commit(&mut self, auto_commit: bool) -> Result<()> {
        // switching modes commits the active transaction
        if auto_commit && !self.auto_commit {
            self.commit()?;
        }

        self.auto_commit = auto_commit;
        Ok(())
    }

    fn auto_commit(&self) -> bool {
        self.auto_commit
    }

    fn commit(&mut self) -> Result<()> {
        if self.in_transaction() {
            debug!("Committing sqlite transaction");
            self.con
                .execute_batch("COMMIT")
                .sql()
                .context("Failed to commit transaction")?;
        }

        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        if self.in_transaction() {
            debug!("Rolling back sqlite transaction");
            self.con
                .execute_batch("ROLLBACK")
                .sql()
                .context("Failed to rollback transaction")?;
        }

        Ok(())
    }

    fn product_name(&self) -> String {
        "SQLite".into()
    }

    fn is_valid(&mut self) -> Result<()> {
        self.con
            .query_row("PRAGMA schema_version", [], |_| Ok(()))
            .sql()
            .context("Failed to query sqlite schema version")
    }

    fn column_nullability(&mut self, table: &str) -> Result<HashMap<String, bool>> {
        let mut stmt = self
            .con
            .prepare("SELECT name, \"notnull\" FROM pragma_table_info(?1)")
            .sql()?;

        let cols = stmt
            .query_map([table], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? == 0))
            })
            .sql()?
            .collect::<rusqlite::Result<HashMap<_, _>>>()
            .sql()?;

        Ok(cols)
    }
}
