use dbtable_connectors_base::interface::{CreateOp, DeleteOp, SyncOp, UpdateOp};
use dbtable_connectors_database_table::{DatabaseTableConfig, DatabaseTableConnector};
use dbtable_core::{
    data::DataValue,
    err::ConnectorError,
    framework::{
        Attribute, AttributeValue, ObjectClass, OperationOptions, SyncDelta, SyncDeltaType,
        SyncToken, Uid,
    },
};
use pretty_assertions::assert_eq;

mod common;
use common::*;

fn create(connector: &mut DatabaseTableConnector, name: &str) {
    connector
        .create(&account(), &account_attrs(name), &OperationOptions::default())
        .unwrap();
}

fn sync(connector: &mut DatabaseTableConnector, token: Option<&SyncToken>) -> Vec<SyncDelta> {
    let mut deltas = vec![];

    connector
        .sync(
            &account(),
            token,
            &mut |delta: SyncDelta| {
                deltas.push(delta);
                true
            },
            &OperationOptions::default(),
        )
        .unwrap();

    deltas
}

fn summary(deltas: &[SyncDelta]) -> Vec<(String, DataValue)> {
    deltas
        .iter()
        .map(|d| (d.uid.value().to_string(), d.token.value.clone()))
        .collect()
}

#[test]
fn test_sync_from_start() {
    let db = create_database();
    let mut connector = connector(config(&db));
    create(&mut connector, "jdoe");
    create(&mut connector, "jroe");

    let deltas = sync(&mut connector, None);

    assert_eq!(
        summary(&deltas),
        vec![
            ("jdoe".to_string(), DataValue::Int64(1)),
            ("jroe".to_string(), DataValue::Int64(2)),
        ]
    );

    let delta = &deltas[0];
    let obj = delta.object.as_ref().unwrap();

    assert_eq!(delta.delta_type, SyncDeltaType::CreateOrUpdate);
    assert_eq!(obj.uid, Uid::new("jdoe"));
    assert_eq!(values(obj, "firstname"), Some(vec![AttributeValue::from("John")]));
    assert_eq!(obj.attribute("changelog"), None);
    assert_eq!(obj.attribute("password"), None);
}

#[test]
fn test_sync_after_token() {
    let db = create_database();
    let mut connector = connector(config(&db));
    create(&mut connector, "jdoe");
    create(&mut connector, "jroe");
    create(&mut connector, "bsmith");

    let deltas = sync(&mut connector, Some(&SyncToken::new(DataValue::Int64(2))));

    assert_eq!(
        summary(&deltas),
        vec![("bsmith".to_string(), DataValue::Int64(3))]
    );
}

#[test]
fn test_sync_reports_updates_in_change_order() {
    let db = create_database();
    let mut connector = connector(config(&db));
    create(&mut connector, "jdoe");
    create(&mut connector, "jroe");

    let token = connector.latest_sync_token(&account()).unwrap().unwrap();

    connector
        .update(
            &account(),
            &Uid::new("jdoe"),
            &[Attribute::single("title", "Manager")],
            &OperationOptions::default(),
        )
        .unwrap();

    let deltas = sync(&mut connector, Some(&token));

    assert_eq!(
        summary(&deltas),
        vec![("jdoe".to_string(), DataValue::Int64(3))]
    );
    assert_eq!(
        values(deltas[0].object.as_ref().unwrap(), "title"),
        Some(vec![AttributeValue::from("Manager")])
    );

    // nothing changed since the last delta
    assert_eq!(sync(&mut connector, Some(&deltas[0].token)), vec![]);
}

#[test]
fn test_sync_tokens_are_monotonic() {
    let db = create_database();
    let mut connector = connector(config(&db));

    for name in ["a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k"] {
        create(&mut connector, name);
    }

    let tokens = sync(&mut connector, None)
        .into_iter()
        .map(|d| match d.token.value {
            DataValue::Int64(v) => v,
            other => panic!("unexpected token {:?}", other),
        })
        .collect::<Vec<_>>();

    assert_eq!(tokens, (1..=11).collect::<Vec<_>>());
}

#[test]
fn test_sync_deleted_rows_are_not_reported() {
    let db = create_database();
    let mut connector = connector(config(&db));
    create(&mut connector, "jdoe");
    create(&mut connector, "jroe");

    connector
        .delete(&account(), &Uid::new("jdoe"), &OperationOptions::default())
        .unwrap();

    assert_eq!(
        summary(&sync(&mut connector, None)),
        vec![("jroe".to_string(), DataValue::Int64(2))]
    );
}

#[test]
fn test_sync_handler_stops() {
    let db = create_database();
    let mut connector = connector(config(&db));
    create(&mut connector, "jdoe");
    create(&mut connector, "jroe");

    let mut deltas = vec![];
    connector
        .sync(
            &account(),
            None,
            &mut |delta: SyncDelta| {
                deltas.push(delta);
                false
            },
            &OperationOptions::default(),
        )
        .unwrap();

    assert_eq!(deltas.len(), 1);
}

#[test]
fn test_latest_sync_token() {
    let db = create_database();
    let mut connector = connector(config(&db));

    assert_eq!(connector.latest_sync_token(&account()).unwrap(), None);

    create(&mut connector, "jdoe");
    create(&mut connector, "jroe");

    assert_eq!(
        connector.latest_sync_token(&account()).unwrap(),
        Some(SyncToken::new(DataValue::Int64(2)))
    );
}

#[test]
fn test_sync_without_changelog_column() {
    let db = create_database();
    let mut connector = connector(DatabaseTableConfig {
        changelog_column: "".into(),
        ..config(&db)
    });

    let err = connector.latest_sync_token(&account()).unwrap_err();
    assert!(matches!(
        error_kind(&err),
        Some(ConnectorError::UnsupportedOperation(_))
    ));

    let err = connector
        .sync(
            &account(),
            None,
            &mut |_: SyncDelta| true,
            &OperationOptions::default(),
        )
        .unwrap_err();
    assert!(matches!(
        error_kind(&err),
        Some(ConnectorError::UnsupportedOperation(_))
    ));
}

#[test]
fn test_sync_unsupported_object_class() {
    let db = create_database();
    let mut connector = connector(config(&db));

    let err = connector
        .latest_sync_token(&ObjectClass::new("__GROUP__"))
        .unwrap_err();

    assert!(matches!(
        error_kind(&err),
        Some(ConnectorError::UnsupportedObjectClass(_))
    ));
}
