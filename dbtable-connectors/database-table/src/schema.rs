use std::collections::{BTreeSet, HashMap};

use dbtable_connectors_base::{common::SqlType, interface::ColumnMeta};
use dbtable_core::{
    err::{ConnectorError, Result},
    framework::{
        attribute, name_eq, AttributeInfo, AttributeType, ObjectClass, ObjectClassInfo,
        OperationType, Schema,
    },
};
use dbtable_logging::debug;

use crate::{mapping::MappingStrategy, DatabaseTableConfig, DatabaseTableConnection};

/// The part a column plays in the account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    /// Stores the name and uid
    Key,
    Password,
    /// Drives sync, never exposed as an attribute
    Changelog,
    Attribute,
}

/// A column of the table
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDescriptor {
    pub name: String,
    pub sql_type: SqlType,
    pub required: bool,
    pub role: ColumnRole,
    pub attribute_type: AttributeType,
}

impl ColumnDescriptor {
    pub fn returned_by_default(&self) -> bool {
        self.role == ColumnRole::Key
            || (self.role == ColumnRole::Attribute && self.attribute_type != AttributeType::ByteArray)
    }
}

/// The table metadata, read once per connector instance
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaCache {
    columns: Vec<ColumnDescriptor>,
    /// Keyed by the lower-cased column name
    column_types: HashMap<String, SqlType>,
    default_attributes: Vec<String>,
    schema: Schema,
}

impl SchemaCache {
    /// Reads the column metadata using a query which never returns rows
    pub fn load(con: &mut DatabaseTableConnection, conf: &DatabaseTableConfig) -> Result<Self> {
        let sql = format!(
            "SELECT * FROM {} WHERE {} IS NULL",
            conf.quote_name(conf.table.trim())?,
            conf.quote_name(conf.key_column.trim())?
        );

        let columns = {
            let mut stmt = con.prepare_statement(&sql, &[])?;
            let rs = stmt.execute_query()?;
            rs.columns().to_vec()
        };

        let nullability = if columns.iter().any(|c| c.nullable.is_none()) {
            con.column_nullability(conf.table.trim())?
        } else {
            HashMap::new()
        };

        let sms = con.sms();
        Self::new(conf, sms.as_ref(), columns, &nullability)
    }

    pub fn new(
        conf: &DatabaseTableConfig,
        sms: &dyn MappingStrategy,
        columns: Vec<ColumnMeta>,
        nullability: &HashMap<String, bool>,
    ) -> Result<Self> {
        let columns = columns
            .into_iter()
            .map(|col| {
                let required = match col.nullable {
                    Some(nullable) => !nullable,
                    None => nullability
                        .iter()
                        .any(|(name, nullable)| name_eq(name, &col.name) && !nullable),
                };

                ColumnDescriptor {
                    role: Self::role(conf, &col.name),
                    attribute_type: sms.get_sql_attribute_type(col.sql_type),
                    sql_type: col.sql_type,
                    name: col.name,
                    required,
                }
            })
            .collect::<Vec<_>>();

        if !columns.iter().any(|c| c.role == ColumnRole::Key) {
            return Err(ConnectorError::configuration(format!(
                "Key column \"{}\" not found in table \"{}\"",
                conf.key_column, conf.table
            )));
        }

        let column_types = columns
            .iter()
            .map(|c| (c.name.to_lowercase(), c.sql_type))
            .collect();

        let attributes = columns
            .iter()
            .filter_map(|c| match c.role {
                ColumnRole::Key => {
                    Some(AttributeInfo::new(attribute::NAME, AttributeType::String).required(true))
                }
                ColumnRole::Password => Some(AttributeInfo::password()),
                ColumnRole::Changelog => None,
                ColumnRole::Attribute => Some(
                    AttributeInfo::new(c.name.clone(), c.attribute_type)
                        .required(c.required)
                        .returned_by_default(c.returned_by_default()),
                ),
            })
            .collect::<Vec<_>>();

        let default_attributes = attributes
            .iter()
            .filter(|a| a.returned_by_default)
            .map(|a| a.name.clone())
            .collect();

        let mut operations = OperationType::all();
        if conf.password_column().is_none() {
            operations.remove(&OperationType::Authenticate);
        }
        if conf.changelog_column().is_none() {
            operations.remove(&OperationType::Sync);
        }

        debug!(
            "Read schema of table {} with {} columns",
            conf.table,
            columns.len()
        );

        Ok(Self {
            columns,
            column_types,
            default_attributes,
            schema: Schema {
                object_classes: vec![ObjectClassInfo {
                    type_name: ObjectClass::ACCOUNT_NAME.to_string(),
                    attributes,
                }],
                operations,
            },
        })
    }

    fn role(conf: &DatabaseTableConfig, column: &str) -> ColumnRole {
        let is = |configured: Option<&str>| configured.map(|c| name_eq(c, column)).unwrap_or(false);

        if is(Some(conf.key_column.trim())) {
            ColumnRole::Key
        } else if is(conf.password_column()) {
            ColumnRole::Password
        } else if is(conf.changelog_column()) {
            ColumnRole::Changelog
        } else {
            ColumnRole::Attribute
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| name_eq(&c.name, name))
    }

    /// The sql type of the column, null for unknown columns
    pub fn column_type(&self, column: &str) -> SqlType {
        self.column_types
            .get(&column.to_lowercase())
            .copied()
            .unwrap_or(SqlType::Null)
    }

    /// The attributes returned when the caller does not list any
    pub fn default_attributes_to_get(&self) -> &[String] {
        &self.default_attributes
    }

    /// Required character columns of plain attributes
    pub fn required_string_columns(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.columns
            .iter()
            .filter(|c| c.role == ColumnRole::Attribute && c.required && c.sql_type.is_string())
    }

    pub fn supported_operations(&self) -> &BTreeSet<OperationType> {
        &self.schema.operations
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::mapping::new_mapping_chain;

    fn conf() -> DatabaseTableConfig {
        DatabaseTableConfig {
            table: "Accounts".into(),
            key_column: "accountId".into(),
            password_column: "password".into(),
            changelog_column: "changelog".into(),
            ..Default::default()
        }
    }

    fn columns() -> Vec<ColumnMeta> {
        vec![
            ColumnMeta::new("accountId", SqlType::VarChar, Some(false)),
            ColumnMeta::new("password", SqlType::VarChar, None),
            ColumnMeta::new("lastname", SqlType::VarChar, None),
            ColumnMeta::new("age", SqlType::Integer, Some(true)),
            ColumnMeta::new("jpegphoto", SqlType::Blob, None),
            ColumnMeta::new("changelog", SqlType::BigInt, None),
        ]
    }

    fn cache(conf: &DatabaseTableConfig) -> SchemaCache {
        let nullability = [("LASTNAME".to_string(), false)].into_iter().collect();

        SchemaCache::new(conf, new_mapping_chain(conf).as_ref(), columns(), &nullability).unwrap()
    }

    #[test]
    fn test_schema_cache_attributes() {
        let cache = cache(&conf());
        let account = cache.schema().object_class("__ACCOUNT__").unwrap();

        assert_eq!(
            account.attributes,
            vec![
                AttributeInfo::new("__NAME__", AttributeType::String).required(true),
                AttributeInfo::password(),
                AttributeInfo::new("lastname", AttributeType::String).required(true),
                AttributeInfo::new("age", AttributeType::String),
                AttributeInfo::new("jpegphoto", AttributeType::ByteArray).returned_by_default(false),
            ]
        );
        assert_eq!(
            cache.default_attributes_to_get(),
            &["__NAME__".to_string(), "lastname".to_string(), "age".to_string()]
        );
    }

    #[test]
    fn test_schema_cache_column_types() {
        let cache = cache(&conf());

        assert_eq!(cache.column_type("AGE"), SqlType::Integer);
        assert_eq!(cache.column_type("changelog"), SqlType::BigInt);
        assert_eq!(cache.column_type("unknown"), SqlType::Null);
        assert_eq!(
            cache.required_string_columns().map(|c| c.name.as_str()).collect::<Vec<_>>(),
            vec!["lastname"]
        );
    }

    #[test]
    fn test_schema_cache_operations() {
        let full = cache(&conf());

        assert!(full.schema().supports(OperationType::Authenticate));
        assert!(full.schema().supports(OperationType::Sync));

        let minimal = cache(&DatabaseTableConfig {
            password_column: "".into(),
            changelog_column: "".into(),
            ..conf()
        });

        assert!(!minimal.schema().supports(OperationType::Authenticate));
        assert!(!minimal.schema().supports(OperationType::Sync));
        assert!(minimal.schema().supports(OperationType::Search));
        assert_eq!(minimal.column("password").unwrap().role, ColumnRole::Attribute);
    }

    #[test]
    fn test_schema_cache_missing_key_column() {
        let conf = DatabaseTableConfig {
            key_column: "id".into(),
            ..conf()
        };

        let err = SchemaCache::new(&conf, new_mapping_chain(&conf).as_ref(), columns(), &HashMap::new())
            .unwrap_err();

        assert!(matches!(
            ConnectorError::of(&err),
            Some(ConnectorError::Configuration(_))
        ));
    }
}
