use std::collections::HashSet;

use dbtable_connectors_base::{
    common::{SqlError, SqlType},
    interface::{
        AuthenticateOp, ColumnMeta, Connector, CreateOp, DeleteOp, ResultsHandler, Row, SchemaOp,
        SearchOp, TestOp, UpdateOp,
    },
};
use dbtable_core::{
    data::{DataType, DataValue},
    err::{anyhow, bail, Context, ConnectorError, Error, Result},
    framework::{
        attribute::{self, NAME, UID},
        name_eq, Attribute, AttributeValue, ConnectorObject, Filter, GuardedString, ObjectClass,
        OperationOptions, Schema, Uid,
    },
};
use dbtable_logging::{debug, info, warn};

use crate::{
    mapping::{MappingStrategy, SqlParam},
    query::{DatabaseQueryBuilder, InsertIntoBuilder, OrderBy, UpdateSetBuilder},
    DatabaseTableConfig, DatabaseTableConnection, DatabaseTableFilterTranslator, SchemaCache,
};

/// Exposes the rows of a database table as accounts
pub struct DatabaseTableConnector {
    conf: DatabaseTableConfig,
    con: Option<DatabaseTableConnection>,
    cache: Option<SchemaCache>,
}

impl Connector for DatabaseTableConnector {
    type TConfig = DatabaseTableConfig;

    fn init(conf: DatabaseTableConfig) -> Result<Self> {
        conf.validate()?;
        let con = DatabaseTableConnection::connect(&conf)?;
        info!("Connected to database for table {}", conf.table);

        Ok(Self {
            conf,
            con: Some(con),
            cache: None,
        })
    }

    fn dispose(&mut self) {
        debug!("Disposing connector for table {}", self.conf.table);
        self.con = None;
        self.cache = None;
    }

    fn check_alive(&mut self) -> Result<()> {
        self.con()?.test(None)
    }
}

impl DatabaseTableConnector {
    pub fn config(&self) -> &DatabaseTableConfig {
        &self.conf
    }

    fn con(&mut self) -> Result<&mut DatabaseTableConnection> {
        self.con.as_mut().ok_or_else(disposed)
    }

    /// The configuration, connection and schema cache, loading the cache on first use
    pub(crate) fn parts(
        &mut self,
    ) -> Result<(&DatabaseTableConfig, &mut DatabaseTableConnection, &SchemaCache)> {
        let con = self.con.as_mut().ok_or_else(disposed)?;

        let cache = match self.cache.take() {
            Some(cache) => cache,
            None => con
                .with_rollback(|con| SchemaCache::load(con, &self.conf))
                .context("Failed to read table schema")?,
        };
        let cache = self.cache.insert(cache);

        Ok((&self.conf, con, cache))
    }

    pub fn schema_cache(&mut self) -> Result<&SchemaCache> {
        Ok(self.parts()?.2)
    }
}

fn disposed() -> Error {
    ConnectorError::ConnectionFailed("The connector has been disposed".into()).into()
}

pub(crate) fn check_object_class(object_class: &ObjectClass) -> Result<()> {
    if !object_class.is(ObjectClass::ACCOUNT_NAME) {
        return Err(ConnectorError::UnsupportedObjectClass(format!(
            "Object class {} is not supported",
            object_class
        ))
        .into());
    }

    Ok(())
}

/// Whether the error is a sql warning without a vendor code, which is ignored
/// unless all sql errors are rethrown
pub fn is_ignorable_sql_error(conf: &DatabaseTableConfig, err: &Error) -> bool {
    !conf.rethrow_all_sql_exceptions && SqlError::of(err).map_or(false, |e| e.vendor_code == 0)
}

/// Runs the modification, returning the affected row count.
/// Returns none if the statement failed with an ignorable warning,
/// other failures roll back the transaction.
fn execute_modify(
    con: &mut DatabaseTableConnection,
    conf: &DatabaseTableConfig,
    sql: &str,
    params: &[SqlParam],
    action: &str,
) -> Result<Option<u64>> {
    let res = con
        .prepare_statement(sql, params)
        .and_then(|mut stmt| stmt.execute_modify());

    match res {
        Ok(count) => Ok(Some(count)),
        Err(err) if is_ignorable_sql_error(conf, &err) => {
            warn!("Ignoring sql warning while trying to {}: {:#}", action, err);
            Ok(None)
        }
        Err(err) => {
            con.rollback_quietly();
            Err(err.context(format!("Failed to {}", action)))
        }
    }
}

fn column_for_write<'a>(conf: &'a DatabaseTableConfig, attr: &'a Attribute) -> Result<&'a str> {
    conf.column_name(&attr.name).ok_or_else(|| {
        ConnectorError::illegal_argument(format!(
            "No column is configured for attribute {}",
            attr.name
        ))
    })
}

fn param_for_write(
    conf: &DatabaseTableConfig,
    cache: &SchemaCache,
    column: &str,
    attr: &Attribute,
) -> Result<SqlParam> {
    let sql_type = cache.column_type(column);
    let value = attr
        .single_value()?
        .cloned()
        .unwrap_or(AttributeValue::Data(DataValue::Null));

    let empty_string = conf.enable_empty_string
        && matches!(value, AttributeValue::Data(DataValue::Null))
        && cache
            .column(column)
            .map_or(false, |c| c.required && c.sql_type.is_string());

    if empty_string {
        return Ok(SqlParam::new(column, "", sql_type));
    }

    Ok(SqlParam::new(column, value, sql_type))
}

/// The unquoted columns selected for the requested attributes.
/// The key column is always selected, attributes without a column are skipped.
pub(crate) fn columns_to_get(
    conf: &DatabaseTableConfig,
    cache: &SchemaCache,
    options: &OperationOptions,
) -> Vec<String> {
    let attrs = options
        .attributes_to_get
        .as_deref()
        .unwrap_or_else(|| cache.default_attributes_to_get());

    let mut columns = vec![conf.key_column.trim().to_string()];

    for attr in attrs {
        let column = match conf.column_name(attr) {
            Some(column) => column,
            None => continue,
        };

        if conf.password_column().map_or(false, |p| name_eq(p, column)) {
            continue;
        }

        match cache.column(column) {
            Some(col) if !columns.iter().any(|c| name_eq(c, &col.name)) => {
                columns.push(col.name.clone())
            }
            Some(_) => {}
            None => debug!("Skipping attribute {} without a column", attr),
        }
    }

    columns
}

/// The type filter values of the attribute are compared as, taken from its column
fn attribute_data_type(conf: &DatabaseTableConfig, cache: &SchemaCache, name: &str) -> DataType {
    conf.column_name(name)
        .and_then(|column| cache.column(column))
        .map_or(DataType::Null, |col| col.sql_type.data_type())
}

/// Collects the attribute names referenced by the filter
fn filter_attribute_names(filter: &Filter, names: &mut Vec<String>) {
    match filter {
        Filter::And(l, r) | Filter::Or(l, r) => {
            filter_attribute_names(l, names);
            filter_attribute_names(r, names);
        }
        Filter::Not(inner) => filter_attribute_names(inner, names),
        leaf => names.extend(leaf.attribute().map(|a| a.name.clone())),
    }
}

/// Builds the account from the current row.
/// The key column becomes the name and uid, password and changelog columns are omitted.
pub(crate) fn build_connector_object(
    conf: &DatabaseTableConfig,
    sms: &dyn MappingStrategy,
    row: &dyn Row,
    columns: &[ColumnMeta],
) -> Result<ConnectorObject> {
    let is = |configured: Option<&str>, column: &str| configured.map_or(false, |c| name_eq(c, column));
    let mut name = None;
    let mut attrs = vec![];

    for (idx, col) in columns.iter().enumerate() {
        if is(conf.password_column(), &col.name) || is(conf.changelog_column(), &col.name) {
            continue;
        }

        let param = sms.get_sql_param(row, idx + 1, &col.name, col.sql_type)?;

        if name_eq(&col.name, conf.key_column.trim()) {
            match param.data() {
                Some(val) if !val.is_null() => name = Some(val.to_string()),
                _ => bail!("The key column {} must not be null", col.name),
            }
            continue;
        }

        let values = match param.value {
            AttributeValue::Data(DataValue::Null) => vec![],
            val => vec![val],
        };

        attrs.push(Attribute::new(col.name.clone(), values));
    }

    let name = name.ok_or_else(|| anyhow!("The key column {} was not selected", conf.key_column))?;

    Ok(ConnectorObject::new(
        ObjectClass::account(),
        Uid::new(name.clone()),
        name,
        attrs,
    ))
}

impl CreateOp for DatabaseTableConnector {
    fn create(
        &mut self,
        object_class: &ObjectClass,
        attrs: &[Attribute],
        _options: &OperationOptions,
    ) -> Result<Uid> {
        check_object_class(object_class)?;

        let name = match attribute::find(attrs, NAME) {
            Some(attr) => attr.single_string()?,
            None => None,
        }
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| {
            ConnectorError::illegal_argument("The __NAME__ attribute is required to create an account")
        })?;

        let (conf, con, cache) = self.parts()?;
        let mut insert = InsertIntoBuilder::new();
        let mut bound = HashSet::new();

        for attr in attrs.iter().filter(|a| !a.is(UID)) {
            let column = column_for_write(conf, attr)?;

            if !bound.insert(column.to_lowercase()) {
                return Err(ConnectorError::illegal_argument(format!(
                    "Column {} is set more than once",
                    column
                )));
            }

            insert.add_bind(
                conf.quote_name(column)?,
                param_for_write(conf, cache, column, attr)?,
            );
        }

        if conf.enable_empty_string {
            for col in cache.required_string_columns() {
                if !bound.contains(&col.name.to_lowercase()) {
                    insert.add_bind(
                        conf.quote_name(&col.name)?,
                        SqlParam::new(col.name.as_str(), "", col.sql_type),
                    );
                }
            }
        }

        let sql = insert.sql(&conf.quote_name(conf.table.trim())?)?;
        execute_modify(con, conf, &sql, insert.params(), "create account")?;
        con.commit()?;

        debug!("Created account {}", name);
        Ok(Uid::new(name))
    }
}

impl UpdateOp for DatabaseTableConnector {
    fn update(
        &mut self,
        object_class: &ObjectClass,
        uid: &Uid,
        attrs: &[Attribute],
        _options: &OperationOptions,
    ) -> Result<Uid> {
        check_object_class(object_class)?;

        let (conf, con, cache) = self.parts()?;
        let mut update = UpdateSetBuilder::new();
        let mut bound = HashSet::new();
        let mut new_uid = uid.clone();

        for attr in attrs.iter().filter(|a| !a.is(UID)) {
            if attr.is(NAME) {
                match attr.single_string()? {
                    Some(name) if !name.trim().is_empty() => new_uid = Uid::new(name),
                    _ => {
                        return Err(ConnectorError::illegal_argument(
                            "The __NAME__ attribute must not be blank",
                        ))
                    }
                }
            }

            let column = column_for_write(conf, attr)?;

            if !bound.insert(column.to_lowercase()) {
                return Err(ConnectorError::illegal_argument(format!(
                    "Column {} is set more than once",
                    column
                )));
            }

            update.add_bind(
                &conf.quote_name(column)?,
                param_for_write(conf, cache, column, attr)?,
            );
        }

        if update.is_empty() {
            return Err(ConnectorError::illegal_argument(format!(
                "No attributes to update for account {}",
                uid
            )));
        }

        let key = conf.key_column.trim();
        update.add_value(SqlParam::new(key, uid.value(), cache.column_type(key)));

        let sql = update.sql(&conf.quote_name(conf.table.trim())?, &conf.quote_name(key)?)?;
        let updated = execute_modify(con, conf, &sql, update.params(), "update account")?;

        if updated == Some(0) {
            con.rollback_quietly();
            return Err(ConnectorError::UnknownUid(format!("Account {} not found", uid)).into());
        }

        con.commit()?;

        debug!("Updated account {}", new_uid);
        Ok(new_uid)
    }
}

impl DeleteOp for DatabaseTableConnector {
    fn delete(
        &mut self,
        object_class: &ObjectClass,
        uid: &Uid,
        _options: &OperationOptions,
    ) -> Result<()> {
        check_object_class(object_class)?;

        let (conf, con, cache) = self.parts()?;
        let key = conf.key_column.trim();
        let sql = format!(
            "DELETE FROM {} WHERE {} = ?",
            conf.quote_name(conf.table.trim())?,
            conf.quote_name(key)?
        );
        let params = [SqlParam::new(key, uid.value(), cache.column_type(key))];

        let deleted = execute_modify(con, conf, &sql, &params, "delete account")?;

        if matches!(deleted, Some(count) if count != 1) {
            con.rollback_quietly();
            return Err(ConnectorError::UnknownUid(format!("Account {} not found", uid)).into());
        }

        con.commit()?;

        debug!("Deleted account {}", uid);
        Ok(())
    }
}

impl SearchOp for DatabaseTableConnector {
    fn search(
        &mut self,
        object_class: &ObjectClass,
        filter: Option<&Filter>,
        handler: &mut dyn ResultsHandler,
        options: &OperationOptions,
    ) -> Result<()> {
        check_object_class(object_class)?;

        let (conf, con, cache) = self.parts()?;

        let translation = match filter {
            Some(filter) => DatabaseTableFilterTranslator::new(conf, cache).translate(filter)?,
            None => None,
        };

        // filters which are not fully expressed in sql are applied to each result
        let local_filter = match (filter, translation.as_ref()) {
            (Some(filter), Some(t)) if !t.exact => Some(filter),
            (Some(filter), None) => Some(filter),
            _ => None,
        };

        let requested = columns_to_get(conf, cache, options);
        let mut selected = requested.clone();

        if let Some(filter) = local_filter {
            let mut names = vec![];
            filter_attribute_names(filter, &mut names);
            let filtered = OperationOptions {
                attributes_to_get: Some(names),
                ..OperationOptions::default()
            };

            selected.extend(columns_to_get(conf, cache, &filtered));
        }

        let columns = selected
            .iter()
            .map(|c| conf.quote_name(c))
            .collect::<Result<Vec<_>>>()?;

        let order_by = options
            .sort_keys
            .iter()
            .map(|k| {
                let column = conf.column_name(&k.field).ok_or_else(|| {
                    ConnectorError::illegal_argument(format!("Cannot sort by {}", k.field))
                })?;

                Ok(OrderBy::new(conf.quote_name(column)?, k.ascending))
            })
            .collect::<Result<Vec<_>>>()?;

        let query = DatabaseQueryBuilder::new(conf.quote_name(conf.table.trim())?, columns)
            .with_where(translation.map(|t| t.r#where))
            .with_order_by(order_by);
        let sql = query.sql()?;

        let sms = con.sms();
        let types = |name: &str| attribute_data_type(conf, cache, name);

        con.with_rollback(|con| {
            let mut stmt = con
                .prepare_statement(&sql, &query.params())
                .context("Failed to search accounts")?;
            let mut rs = stmt.execute_query().context("Failed to search accounts")?;
            let cols = rs.columns().to_vec();

            while let Some(row) = rs.next()? {
                let mut obj = build_connector_object(conf, sms.as_ref(), row, &cols)?;

                if let Some(filter) = local_filter {
                    if !filter.accepts_with(&obj, &types) {
                        continue;
                    }

                    // drop the columns only selected for filtering
                    obj.attributes
                        .retain(|a| requested.iter().any(|c| name_eq(c, &a.name)));
                }

                if !handler.handle(obj) {
                    debug!("Search stopped by the results handler");
                    break;
                }
            }

            Ok(())
        })
    }
}

impl AuthenticateOp for DatabaseTableConnector {
    fn authenticate(
        &mut self,
        object_class: &ObjectClass,
        username: &str,
        password: &GuardedString,
        _options: &OperationOptions,
    ) -> Result<Uid> {
        check_object_class(object_class)?;

        let (conf, con, cache) = self.parts()?;
        let password_column = conf.password_column().ok_or_else(|| {
            ConnectorError::unsupported_operation("Authenticate requires a password column")
        })?;
        let key = conf.key_column.trim();

        let sql = format!(
            "SELECT {0} FROM {1} WHERE ( {0} = ? ) AND ( {2} = ? )",
            conf.quote_name(key)?,
            conf.quote_name(conf.table.trim())?,
            conf.quote_name(password_column)?
        );
        let params = [
            SqlParam::new(key, username, cache.column_type(key)),
            SqlParam::new(
                password_column,
                password.clone(),
                cache.column_type(password_column),
            ),
        ];

        let sms = con.sms();
        let uid = con.with_rollback(|con| {
            let mut stmt = con
                .prepare_statement(&sql, &params)
                .context("Failed to authenticate")?;
            let mut rs = stmt.execute_query().context("Failed to authenticate")?;
            let sql_type = rs.columns().first().map_or(SqlType::Null, |c| c.sql_type);

            let uid = match rs.next()? {
                Some(row) => sms
                    .get_sql_param(row, 1, key, sql_type)?
                    .data()
                    .filter(|v| !v.is_null())
                    .map(|v| v.to_string()),
                None => None,
            };

            Ok(uid)
        })?;

        match uid {
            Some(uid) => Ok(Uid::new(uid)),
            None => Err(ConnectorError::InvalidCredential(format!(
                "Invalid credentials for {}",
                username
            ))
            .into()),
        }
    }
}

impl SchemaOp for DatabaseTableConnector {
    fn schema(&mut self) -> Result<Schema> {
        Ok(self.parts()?.2.schema().clone())
    }
}

impl TestOp for DatabaseTableConnector {
    fn test(&mut self) -> Result<()> {
        let query = self.conf.valid_connection_query().map(str::to_string);

        self.con()?.test(query.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use dbtable_core::framework::OperationType;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::mapping::{mock::MockRow, new_mapping_chain};

    fn conf() -> DatabaseTableConfig {
        DatabaseTableConfig {
            table: "Accounts".into(),
            key_column: "accountId".into(),
            password_column: "password".into(),
            changelog_column: "changelog".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_ignorable_sql_error() {
        let warning: Error = SqlError::new("warning", 0, None).into();
        let failure: Error = SqlError::new("failure", 19, None).into();

        assert_eq!(is_ignorable_sql_error(&conf(), &warning), false);

        let lenient = DatabaseTableConfig {
            rethrow_all_sql_exceptions: false,
            ..conf()
        };

        assert_eq!(is_ignorable_sql_error(&lenient, &warning), true);
        assert_eq!(
            is_ignorable_sql_error(&lenient, &warning.context("Failed to create account")),
            true
        );
        assert_eq!(is_ignorable_sql_error(&lenient, &failure), false);
        assert_eq!(is_ignorable_sql_error(&lenient, &anyhow!("other")), false);
    }

    #[test]
    fn test_check_object_class() {
        check_object_class(&ObjectClass::account()).unwrap();
        let err = check_object_class(&ObjectClass::new("__GROUP__")).unwrap_err();

        assert!(matches!(
            ConnectorError::of(&err),
            Some(ConnectorError::UnsupportedObjectClass(_))
        ));
    }

    #[test]
    fn test_build_connector_object() {
        let conf = conf();
        let sms = new_mapping_chain(&conf);
        let columns = vec![
            ColumnMeta::new("accountId", SqlType::VarChar, None),
            ColumnMeta::new("password", SqlType::VarChar, None),
            ColumnMeta::new("age", SqlType::Integer, None),
            ColumnMeta::new("email", SqlType::VarChar, None),
            ColumnMeta::new("changelog", SqlType::BigInt, None),
        ];
        let row = MockRow(vec![
            "jdoe".into(),
            "secret".into(),
            DataValue::Int64(30),
            DataValue::Null,
            DataValue::Int64(4),
        ]);

        let obj = build_connector_object(&conf, sms.as_ref(), &row, &columns).unwrap();

        assert_eq!(obj.uid, Uid::new("jdoe"));
        assert_eq!(obj.name, "jdoe");
        assert_eq!(
            obj.attributes,
            vec![Attribute::single("age", "30"), Attribute::empty("email")]
        );
    }

    #[test]
    fn test_build_connector_object_null_key() {
        let conf = conf();
        let sms = new_mapping_chain(&conf);
        let columns = vec![ColumnMeta::new("accountId", SqlType::VarChar, None)];

        build_connector_object(&conf, sms.as_ref(), &MockRow(vec![DataValue::Null]), &columns)
            .unwrap_err();
    }

    #[test]
    fn test_columns_to_get() {
        let conf = conf();
        let columns = vec![
            ColumnMeta::new("accountId", SqlType::VarChar, Some(false)),
            ColumnMeta::new("password", SqlType::VarChar, Some(true)),
            ColumnMeta::new("firstname", SqlType::VarChar, Some(true)),
            ColumnMeta::new("jpegphoto", SqlType::Blob, Some(true)),
            ColumnMeta::new("changelog", SqlType::BigInt, Some(true)),
        ];
        let cache = SchemaCache::new(
            &conf,
            new_mapping_chain(&conf).as_ref(),
            columns,
            &Default::default(),
        )
        .unwrap();

        assert_eq!(
            columns_to_get(&conf, &cache, &OperationOptions::default()),
            vec!["accountId".to_string(), "firstname".to_string()]
        );
        assert_eq!(
            columns_to_get(
                &conf,
                &cache,
                &OperationOptions::with_attributes_to_get(&[
                    "jpegphoto",
                    "__PASSWORD__",
                    "__UID__",
                    "unknown"
                ])
            ),
            vec!["accountId".to_string(), "jpegphoto".to_string()]
        );
        assert!(cache.schema().supports(OperationType::Sync));
    }
}
