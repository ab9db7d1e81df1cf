use dbtable_connectors_native_sqlite::{SqliteConnection, SqliteConnector};

pub fn connect_to_sqlite() -> SqliteConnection {
    SqliteConnector::connect("jdbc:sqlite::memory:").unwrap()
}
