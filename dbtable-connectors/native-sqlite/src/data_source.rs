use std::{collections::HashMap, time::Duration};

use dbtable_connectors_base::interface::{Connection, DataSource};
use dbtable_core::{
    err::{Context, Result},
    framework::GuardedString,
};
use dbtable_logging::debug;

use crate::{SqliteConnector, SqliteResultExt};

/// A data source handing out connections to a single sqlite database file
#[derive(Debug, Clone, PartialEq)]
pub struct SqliteDataSource {
    path: String,
}

impl SqliteDataSource {
    /// Environment property setting the busy timeout in milliseconds
    pub const BUSY_TIMEOUT: &'static str = "busy_timeout";

    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl DataSource for SqliteDataSource {
    fn connect(
        &self,
        credentials: Option<(&str, &GuardedString)>,
        env: &HashMap<String, String>,
    ) -> Result<Box<dyn Connection>> {
        if let Some((user, _)) = credentials {
            debug!("Ignoring credentials for user {}, sqlite does not authenticate", user);
        }

        let con = SqliteConnector::open(&self.path)?;

        if let Some(timeout) = env.get(Self::BUSY_TIMEOUT) {
            let ms: u64 = timeout
                .parse()
                .with_context(|| format!("Invalid {} \"{}\"", Self::BUSY_TIMEOUT, timeout))?;
            con.con().busy_timeout(Duration::from_millis(ms)).sql()?;
        }

        Ok(Box::new(con))
    }
}
