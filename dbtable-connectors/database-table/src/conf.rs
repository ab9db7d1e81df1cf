use std::path::Path;

use dbtable_config::ConfigLoader;
use dbtable_connectors_base::interface::parse_env_properties;
use dbtable_core::{
    config,
    err::{Context, ConnectorError, Result},
    framework::{attribute, name_eq, GuardedString},
};
use serde::{de, Deserialize, Deserializer};

use crate::{quote_name, Drivers};

/// The configuration of the database table connector
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DatabaseTableConfig {
    /// Substituted for `%h` in the url template
    pub host: String,
    /// Substituted for `%p` in the url template
    #[serde(deserialize_with = "string_or_number")]
    pub port: String,
    /// Substituted for `%d` in the url template
    pub database: String,
    pub user: String,
    pub password: Option<GuardedString>,
    /// The name of a registered data source.
    /// When set, the driver, url template and credentials are not required.
    pub datasource: String,
    /// `key=value` properties passed to the data source
    pub jndi_properties: Vec<String>,
    /// The driver used to open connections, eg "native.sqlite"
    pub jdbc_driver: String,
    /// The connection url with `%h`, `%p` and `%d` placeholders
    pub jdbc_url_template: String,
    pub table: String,
    /// The column holding the unique name of each account
    pub key_column: String,
    pub password_column: String,
    /// A monotonically increasing column used for sync
    pub changelog_column: String,
    /// One of none, double, single, back or brackets
    pub quoting: String,
    /// Write empty strings to required string columns without a value
    pub enable_empty_string: bool,
    /// When disabled, sql errors without a vendor code are logged and ignored
    pub rethrow_all_sql_exceptions: bool,
    /// Read timestamp columns as native timestamps
    pub native_timestamps: bool,
    /// Read and write every column using its native type
    pub all_native: bool,
    /// The query used to test the connection
    pub valid_connection_query: String,
}

impl Default for DatabaseTableConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: String::new(),
            database: String::new(),
            user: String::new(),
            password: None,
            datasource: String::new(),
            jndi_properties: vec![],
            jdbc_driver: String::new(),
            jdbc_url_template: String::new(),
            table: String::new(),
            key_column: String::new(),
            password_column: String::new(),
            changelog_column: String::new(),
            quoting: String::new(),
            enable_empty_string: false,
            rethrow_all_sql_exceptions: true,
            native_timestamps: false,
            all_native: false,
            valid_connection_query: String::new(),
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match config::Value::deserialize(deserializer)? {
        config::Value::Null => Ok(String::new()),
        config::Value::String(s) => Ok(s),
        config::Value::Number(n) => Ok(n.to_string()),
        _ => Err(de::Error::custom("expected a string or number for port")),
    }
}

fn non_blank(val: &str) -> Option<&str> {
    let val = val.trim();

    if val.is_empty() {
        None
    } else {
        Some(val)
    }
}

impl DatabaseTableConfig {
    pub fn parse(options: config::Value) -> Result<Self> {
        config::from_value::<Self>(options).context("Failed to parse connector configuration")
    }

    /// Loads and interpolates the configuration from the yaml file
    pub fn load(path: &Path) -> Result<Self> {
        Self::parse(ConfigLoader::new().load(path)?)
    }

    /// Checks the required properties are set.
    /// The first failing check is reported as a configuration error.
    pub fn validate(&self) -> Result<()> {
        let blank = |name: &str| ConnectorError::configuration(format!("{} must not be blank", name));

        if non_blank(&self.key_column).is_none() {
            return Err(blank("key_column"));
        }

        if non_blank(&self.table).is_none() {
            return Err(blank("table"));
        }

        if non_blank(&self.jdbc_url_template).is_none() {
            return Err(blank("jdbc_url_template"));
        }

        if self.datasource().is_none() {
            if non_blank(&self.user).is_none() {
                return Err(blank("user"));
            }

            if self.password.is_none() {
                return Err(ConnectorError::configuration("password must not be null"));
            }

            let placeholders = [
                ("%h", "host", &self.host),
                ("%p", "port", &self.port),
                ("%d", "database", &self.database),
            ];

            for (placeholder, name, val) in placeholders {
                if self.jdbc_url_template.contains(placeholder) && non_blank(val).is_none() {
                    return Err(blank(name));
                }
            }

            if non_blank(&self.jdbc_driver).is_none() {
                return Err(blank("jdbc_driver"));
            }

            if Drivers::from_type(&self.jdbc_driver).is_none() {
                return Err(ConnectorError::configuration(format!(
                    "jdbc_driver \"{}\" not found",
                    self.jdbc_driver
                )));
            }
        } else {
            parse_env_properties(&self.jndi_properties)?;
        }

        if let Err(err) = quote_name(&self.quoting, "test") {
            return Err(ConnectorError::configuration(format!(
                "quoting \"{}\" is invalid: {}",
                self.quoting, err
            )));
        }

        Ok(())
    }

    /// Substitutes the `%h`, `%p` and `%d` placeholders of the url template.
    /// `%%` is a literal percent sign, other placeholders are removed.
    pub fn format_url_template(&self) -> String {
        let mut url = String::with_capacity(self.jdbc_url_template.len());
        let mut chars = self.jdbc_url_template.chars();

        while let Some(c) = chars.next() {
            if c != '%' {
                url.push(c);
                continue;
            }

            match chars.next() {
                Some('h') => url.push_str(&self.host),
                Some('p') => url.push_str(&self.port),
                Some('d') => url.push_str(&self.database),
                Some('%') => url.push('%'),
                _ => {}
            }
        }

        url
    }

    /// Quotes the table or column name using the configured quoting
    pub fn quote_name(&self, name: &str) -> Result<String> {
        quote_name(&self.quoting, name)
    }

    pub fn datasource(&self) -> Option<&str> {
        non_blank(&self.datasource)
    }

    pub fn password_column(&self) -> Option<&str> {
        non_blank(&self.password_column)
    }

    pub fn changelog_column(&self) -> Option<&str> {
        non_blank(&self.changelog_column)
    }

    pub fn valid_connection_query(&self) -> Option<&str> {
        non_blank(&self.valid_connection_query)
    }

    /// Resolves the column an attribute is stored in.
    /// Name and uid map to the key column, the password to the password column if configured.
    pub fn column_name<'a>(&'a self, attr: &'a str) -> Option<&'a str> {
        if name_eq(attr, attribute::NAME) || name_eq(attr, attribute::UID) {
            return Some(self.key_column.trim());
        }

        if name_eq(attr, attribute::PASSWORD) {
            return self.password_column();
        }

        Some(attr)
    }

    /// The credentials used to connect, if a user is configured
    pub fn credentials(&self) -> Option<(&str, &GuardedString)> {
        match (non_blank(&self.user), self.password.as_ref()) {
            (Some(user), Some(password)) => Some((user, password)),
            _ => None,
        }
    }
}
