use dbtable_connectors_base::interface::Connection;
use dbtable_connectors_native_sqlite::SqliteConnector;
use dbtable_core::{err::Result, framework::GuardedString};
use dbtable_logging::debug;

/// The database drivers available to the connector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Drivers {
    NativeSqlite,
}

impl Drivers {
    /// Looks up the driver by the name configured as the jdbc driver
    pub fn from_type(name: &str) -> Option<Self> {
        let name = name.trim();

        if SqliteConnector::ALIASES.iter().any(|a| a.eq_ignore_ascii_case(name)) {
            return Some(Self::NativeSqlite);
        }

        None
    }

    /// Opens a connection to the database at the supplied url
    pub fn connect(
        &self,
        url: &str,
        user: Option<&str>,
        _password: Option<&GuardedString>,
    ) -> Result<Box<dyn Connection>> {
        match self {
            Drivers::NativeSqlite => {
                if let Some(user) = user {
                    debug!("Ignoring credentials for user {}, sqlite does not authenticate", user);
                }

                Ok(Box::new(SqliteConnector::connect(url)?))
            }
        }
    }
}
