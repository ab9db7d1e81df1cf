use dbtable_connectors_base::{
    common::SqlType,
    interface::{Row, SyncOp, SyncResultsHandler},
};
use dbtable_core::{
    data::{DataType, DataValue},
    err::{anyhow, Context, ConnectorError, Result},
    framework::{name_eq, ObjectClass, OperationOptions, SyncDelta, SyncDeltaType, SyncToken},
};
use dbtable_logging::debug;

use crate::{
    build_connector_object, check_object_class, columns_to_get,
    mapping::SqlParam,
    query::{DatabaseQueryBuilder, FilterWhereBuilder, OrderBy},
    DatabaseTableConfig, DatabaseTableConnector,
};

fn changelog_column(conf: &DatabaseTableConfig) -> Result<&str> {
    conf.changelog_column().ok_or_else(|| {
        ConnectorError::unsupported_operation("Sync requires a changelog column")
    })
}

/// Reads the changelog value with the native type of the column,
/// so tokens order the same way as the column
fn read_token_value(row: &dyn Row, idx: usize, sql_type: SqlType) -> Result<DataValue> {
    match sql_type.data_type() {
        DataType::Null => row.get_object(idx),
        r#type => row.get_as(idx, &r#type),
    }
}

impl SyncOp for DatabaseTableConnector {
    /// Emits every row changed after the token in changelog order.
    /// Deleted rows leave no trace in the table so every change is reported as create or update.
    fn sync(
        &mut self,
        object_class: &ObjectClass,
        token: Option<&SyncToken>,
        handler: &mut dyn SyncResultsHandler,
        options: &OperationOptions,
    ) -> Result<()> {
        check_object_class(object_class)?;

        let (conf, con, cache) = self.parts()?;
        let changelog = changelog_column(conf)?;
        let changelog_type = cache.column_type(changelog);
        let quoted_changelog = conf.quote_name(changelog)?;

        let mut columns = columns_to_get(conf, cache, options);
        columns.push(changelog.to_string());
        let columns = columns
            .iter()
            .map(|c| conf.quote_name(c))
            .collect::<Result<Vec<_>>>()?;

        let r#where = token.map(|token| {
            let mut w = FilterWhereBuilder::new();
            w.add_bind(
                &quoted_changelog,
                ">",
                SqlParam::new(changelog, token.value.clone(), changelog_type),
            );
            w
        });

        let query = DatabaseQueryBuilder::new(conf.quote_name(conf.table.trim())?, columns)
            .with_where(r#where)
            .with_order_by(vec![OrderBy::new(quoted_changelog, true)]);
        let sql = query.sql()?;

        let sms = con.sms();

        con.with_rollback(|con| {
            let mut stmt = con
                .prepare_statement(&sql, &query.params())
                .context("Failed to sync accounts")?;
            let mut rs = stmt.execute_query().context("Failed to sync accounts")?;
            let cols = rs.columns().to_vec();

            let changelog_idx = cols
                .iter()
                .rposition(|c| name_eq(&c.name, changelog))
                .ok_or_else(|| anyhow!("The changelog column {} was not selected", changelog))?;

            while let Some(row) = rs.next()? {
                let value =
                    match read_token_value(row, changelog_idx + 1, cols[changelog_idx].sql_type)? {
                        DataValue::Null => DataValue::Int64(0),
                        value => value,
                    };
                let obj = build_connector_object(conf, sms.as_ref(), row, &cols)?;

                let delta = SyncDelta {
                    token: SyncToken::new(value),
                    delta_type: SyncDeltaType::CreateOrUpdate,
                    uid: obj.uid.clone(),
                    object: Some(obj),
                };

                if !handler.handle(delta) {
                    debug!("Sync stopped by the results handler");
                    break;
                }
            }

            Ok(())
        })
    }

    fn latest_sync_token(&mut self, object_class: &ObjectClass) -> Result<Option<SyncToken>> {
        check_object_class(object_class)?;

        let (conf, con, cache) = self.parts()?;
        let changelog = changelog_column(conf)?;
        let sql = format!(
            "SELECT MAX({}) FROM {}",
            conf.quote_name(changelog)?,
            conf.quote_name(conf.table.trim())?
        );

        let changelog_type = cache.column_type(changelog);
        let value = con.with_rollback(|con| {
            let mut stmt = con
                .prepare_statement(&sql, &[])
                .context("Failed to read latest sync token")?;
            let mut rs = stmt.execute_query().context("Failed to read latest sync token")?;

            let value = match rs.next()? {
                Some(row) => read_token_value(row, 1, changelog_type)?,
                None => DataValue::Null,
            };

            Ok(value)
        })?;

        Ok(match value {
            DataValue::Null => None,
            value => Some(SyncToken::new(value)),
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::mapping::mock::MockRow;

    #[test]
    fn test_read_token_value() {
        let row = MockRow(vec![DataValue::from("12"), DataValue::Int64(3)]);

        assert_eq!(read_token_value(&row, 1, SqlType::BigInt).unwrap(), DataValue::Int64(12));
        assert_eq!(read_token_value(&row, 2, SqlType::Null).unwrap(), DataValue::Int64(3));
    }

    #[test]
    fn test_changelog_column_required() {
        let err = changelog_column(&DatabaseTableConfig::default()).unwrap_err();

        assert!(matches!(
            ConnectorError::of(&err),
            Some(ConnectorError::UnsupportedOperation(_))
        ));
    }
}
