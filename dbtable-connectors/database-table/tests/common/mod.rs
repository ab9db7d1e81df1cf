#![allow(dead_code)]

use std::path::PathBuf;

use dbtable_connectors_base::interface::{Connector, SearchOp};
use dbtable_connectors_database_table::{DatabaseTableConfig, DatabaseTableConnector};
use dbtable_core::{
    err::{ConnectorError, Error},
    framework::{
        Attribute, AttributeValue, ConnectorObject, Filter, GuardedString, ObjectClass,
        OperationOptions,
    },
};
use tempfile::TempDir;

/// A sqlite database file holding the accounts table, removed on drop
pub struct TestDatabase {
    _dir: TempDir,
    pub path: PathBuf,
}

const ACCOUNTS_DDL: &str = r#"
CREATE TABLE Accounts (
    accountId VARCHAR(50) NOT NULL PRIMARY KEY,
    password VARCHAR(50),
    manager VARCHAR(50),
    middlename VARCHAR(50),
    firstname VARCHAR(50) NOT NULL,
    lastname VARCHAR(50) NOT NULL,
    email VARCHAR(250),
    department VARCHAR(50),
    title VARCHAR(50),
    age INTEGER,
    salary DECIMAL(7, 2),
    jpegphoto BLOB,
    enrolled DATE,
    activate TIME,
    accessed TIMESTAMP,
    opentime TIMESTAMP,
    changed BOOLEAN,
    changelog BIGINT
);

CREATE TABLE changelog_seq (value BIGINT NOT NULL);
INSERT INTO changelog_seq (value) VALUES (0);

CREATE TRIGGER accounts_changelog_insert AFTER INSERT ON Accounts
BEGIN
    UPDATE changelog_seq SET value = value + 1;
    UPDATE Accounts SET changelog = (SELECT value FROM changelog_seq) WHERE accountId = NEW.accountId;
END;

CREATE TRIGGER accounts_changelog_update AFTER UPDATE ON Accounts
WHEN NEW.changelog IS OLD.changelog
BEGIN
    UPDATE changelog_seq SET value = value + 1;
    UPDATE Accounts SET changelog = (SELECT value FROM changelog_seq) WHERE accountId = NEW.accountId;
END;
"#;

pub fn create_database() -> TestDatabase {
    dbtable_logging::init_for_tests();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("accounts.db");

    let con = rusqlite::Connection::open(&path).unwrap();
    con.execute_batch(ACCOUNTS_DDL).unwrap();

    TestDatabase { _dir: dir, path }
}

pub fn config(db: &TestDatabase) -> DatabaseTableConfig {
    DatabaseTableConfig {
        user: "sa".into(),
        password: Some(GuardedString::new("sa")),
        jdbc_driver: "org.sqlite.JDBC".into(),
        jdbc_url_template: "jdbc:sqlite:%d".into(),
        database: db.path.to_string_lossy().to_string(),
        table: "Accounts".into(),
        key_column: "accountId".into(),
        password_column: "password".into(),
        changelog_column: "changelog".into(),
        quoting: "double".into(),
        ..Default::default()
    }
}

pub fn connector(conf: DatabaseTableConfig) -> DatabaseTableConnector {
    DatabaseTableConnector::init(conf).unwrap()
}

pub fn account() -> ObjectClass {
    ObjectClass::account()
}

/// The attributes of a complete account
pub fn account_attrs(name: &str) -> Vec<Attribute> {
    vec![
        Attribute::name(name),
        Attribute::password(GuardedString::new("secret")),
        Attribute::single("manager", "jsmith"),
        Attribute::single("firstname", "John"),
        Attribute::single("lastname", "Doe"),
        Attribute::single("email", format!("{}@example.com", name)),
        Attribute::single("department", "IT"),
        Attribute::single("title", "Engineer"),
        Attribute::single("age", "30"),
        Attribute::single("salary", "10000.5"),
        Attribute::single("jpegphoto", vec![0xffu8, 0xd8, 0xff, 0xe0]),
        Attribute::single("enrolled", "2008-01-01"),
        Attribute::single("activate", "12:30:00"),
        Attribute::single("accessed", "2008-01-01 12:00:00"),
        Attribute::single("changed", "1"),
    ]
}

/// Replaces the value of the named attribute
pub fn with_attr(mut attrs: Vec<Attribute>, attr: Attribute) -> Vec<Attribute> {
    attrs.retain(|a| !a.is(&attr.name));
    attrs.push(attr);
    attrs
}

pub fn search(
    connector: &mut DatabaseTableConnector,
    filter: Option<&Filter>,
    options: &OperationOptions,
) -> Vec<ConnectorObject> {
    let mut results = vec![];

    connector
        .search(
            &account(),
            filter,
            &mut |obj: ConnectorObject| {
                results.push(obj);
                true
            },
            options,
        )
        .unwrap();

    results
}

pub fn find_by_uid(connector: &mut DatabaseTableConnector, uid: &str) -> Option<ConnectorObject> {
    let mut results = search(
        connector,
        Some(&Filter::equals("__UID__", uid)),
        &OperationOptions::default(),
    );
    assert!(results.len() <= 1);

    results.pop()
}

pub fn values(obj: &ConnectorObject, name: &str) -> Option<Vec<AttributeValue>> {
    obj.attribute(name).map(|a| a.values.clone())
}

pub fn error_kind(err: &Error) -> Option<&ConnectorError> {
    ConnectorError::of(err)
}
