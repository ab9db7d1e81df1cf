use dbtable_core::err::{ConnectorError, Result};
use dbtable_logging::debug;

mod connection;
pub use connection::*;
mod data;
pub use data::*;
mod data_source;
pub use data_source::*;
mod result_set;
pub use result_set::*;
mod statement;
pub use statement::*;

/// The connector for Sqlite built on rusqlite
#[derive(Default)]
pub struct SqliteConnector;

impl SqliteConnector {
    pub const TYPE: &'static str = "native.sqlite";

    /// Names under which the driver may be configured
    pub const ALIASES: [&'static str; 2] = [Self::TYPE, "org.sqlite.JDBC"];

    /// Connects to the database at the supplied url.
    /// Accepts `jdbc:sqlite:<path>` and `sqlite:<path>`, where the path may be ":memory:".
    pub fn connect(url: &str) -> Result<SqliteConnection> {
        let path = Self::parse_url(url)?;
        debug!("Opening sqlite database {}", path);

        Self::open(path)
    }

    pub(crate) fn parse_url(url: &str) -> Result<&str> {
        let path = url
            .strip_prefix("jdbc:sqlite:")
            .or_else(|| url.strip_prefix("sqlite:"))
            .ok_or_else(|| {
                ConnectorError::ConnectionFailed(format!("Unsupported sqlite url \"{}\"", url))
            })?;

        if path.trim().is_empty() {
            return Err(ConnectorError::ConnectionFailed(format!(
                "No database path in sqlite url \"{}\"",
                url
            ))
            .into());
        }

        Ok(path)
    }

    pub(crate) fn open(path: &str) -> Result<SqliteConnection> {
        let con = if path == ":memory:" {
            rusqlite::Connection::open_in_memory()
        } else {
            rusqlite::Connection::open(path)
        }
        .map_err(|e| {
            ConnectorError::ConnectionFailed(format!("Failed to open sqlite database {}: {}", path, e))
        })?;

        Ok(SqliteConnection::new(con))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_sqlite_parse_url() {
        assert_eq!(SqliteConnector::parse_url("jdbc:sqlite:/tmp/a.db").unwrap(), "/tmp/a.db");
        assert_eq!(SqliteConnector::parse_url("sqlite::memory:").unwrap(), ":memory:");
        SqliteConnector::parse_url("jdbc:derby:foo").unwrap_err();
        SqliteConnector::parse_url("sqlite:").unwrap_err();
    }
}
