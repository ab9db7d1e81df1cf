use std::{collections::HashMap, sync::Arc};

use dbtable_connectors_base::interface::{
    lookup_data_source, parse_env_properties, Connection, Statement,
};
use dbtable_core::err::{Context, ConnectorError, Result};
use dbtable_logging::{debug, truncated, warn};

use crate::{
    mapping::{new_mapping_chain, MappingStrategy, SqlParam},
    DatabaseTableConfig, Drivers,
};

/// A vendor-specific adjustment applied to new connections
pub trait VendorHook {
    fn name(&self) -> &'static str;

    /// Whether the hook applies to the database product
    fn applies_to(&self, product_name: &str) -> bool;

    fn apply(&self, con: &mut dyn Connection) -> Result<()>;
}

/// Makes synonyms visible in the oracle metadata
pub struct OracleSynonymsHook;

impl VendorHook for OracleSynonymsHook {
    fn name(&self) -> &'static str {
        "oracle synonyms"
    }

    fn applies_to(&self, product_name: &str) -> bool {
        product_name.to_lowercase().contains("oracle")
    }

    fn apply(&self, con: &mut dyn Connection) -> Result<()> {
        con.set_property("includeSynonyms", "true")
    }
}

pub fn default_vendor_hooks() -> Vec<Box<dyn VendorHook>> {
    vec![Box::new(OracleSynonymsHook)]
}

/// Applies the matching hooks, failures are logged and ignored
pub fn apply_vendor_hooks(con: &mut dyn Connection, hooks: &[Box<dyn VendorHook>]) {
    let product = con.product_name();

    for hook in hooks.iter().filter(|h| h.applies_to(&product)) {
        match hook.apply(con) {
            Ok(_) => debug!("Applied {} hook to {} connection", hook.name(), product),
            Err(err) => warn!(
                "Failed to apply {} hook to {} connection: {:?}",
                hook.name(),
                product,
                err
            ),
        }
    }
}

/// A connection to the database holding the table, with autocommit disabled
pub struct DatabaseTableConnection {
    con: Box<dyn Connection>,
    sms: Arc<dyn MappingStrategy>,
}

impl DatabaseTableConnection {
    /// Opens a connection from the configured data source or driver
    pub fn connect(conf: &DatabaseTableConfig) -> Result<Self> {
        let con = Self::open(conf).map_err(|err| {
            ConnectorError::ConnectionFailed(format!("Failed to connect to database: {:#}", err))
        })?;

        Self::new(con, conf)
    }

    fn open(conf: &DatabaseTableConfig) -> Result<Box<dyn Connection>> {
        if let Some(name) = conf.datasource() {
            debug!("Connecting using data source \"{}\"", name);
            let env = parse_env_properties(&conf.jndi_properties)?;

            return lookup_data_source(name)?.connect(conf.credentials(), &env);
        }

        let driver = Drivers::from_type(&conf.jdbc_driver).ok_or_else(|| {
            ConnectorError::configuration(format!("jdbc_driver \"{}\" not found", conf.jdbc_driver))
        })?;
        let url = conf.format_url_template();
        debug!("Connecting to {} using driver {:?}", url, driver);

        let (user, password) = match conf.credentials() {
            Some((user, password)) => (Some(user), Some(password)),
            None => (None, None),
        };

        driver.connect(&url, user, password)
    }

    /// Wraps the open connection, disabling autocommit and building the mapping chain
    pub fn new(mut con: Box<dyn Connection>, conf: &DatabaseTableConfig) -> Result<Self> {
        con.set_auto_commit(false)
            .context("Failed to disable autocommit")?;
        apply_vendor_hooks(con.as_mut(), &default_vendor_hooks());

        Ok(Self {
            con,
            sms: new_mapping_chain(conf),
        })
    }

    pub fn sms(&self) -> Arc<dyn MappingStrategy> {
        Arc::clone(&self.sms)
    }

    pub fn connection(&mut self) -> &mut dyn Connection {
        self.con.as_mut()
    }

    /// Checks the connection using the validation query if set, otherwise with a driver round trip
    pub fn test(&mut self, valid_connection_query: Option<&str>) -> Result<()> {
        let res = match valid_connection_query {
            Some(query) => self.run_validation_query(query),
            None => self.con.is_valid(),
        };

        res.map_err(|err| {
            ConnectorError::ConnectionFailed(format!("Connection test failed: {:#}", err)).into()
        })
    }

    fn run_validation_query(&mut self, query: &str) -> Result<()> {
        debug!("Testing connection using {:?}", query);
        let mut stmt = self.con.prepare(query)?;

        if !stmt.has_result_set() {
            return Err(ConnectorError::illegal_argument(
                "Query must return a ResultSet",
            ));
        }

        let mut rs = stmt.execute_query()?;
        rs.next()?;

        Ok(())
    }

    /// Prepares the sql, binding the params to the placeholders in order
    pub fn prepare_statement(
        &mut self,
        sql: &str,
        params: &[SqlParam],
    ) -> Result<Box<dyn Statement + '_>> {
        debug!(
            "Preparing {:?} with params {:?}",
            truncated(sql),
            truncated(params)
        );

        let stmt = self
            .con
            .prepare(sql)
            .with_context(|| format!("Failed to prepare sql: {}", sql))?;

        Self::bind(self.sms.as_ref(), stmt, params)
    }

    /// Prepares the stored procedure call, binding the params in order
    pub fn prepare_call(
        &mut self,
        sql: &str,
        params: &[SqlParam],
    ) -> Result<Box<dyn Statement + '_>> {
        debug!("Preparing call {:?}", sql);

        let stmt = self
            .con
            .prepare_call(sql)
            .with_context(|| format!("Failed to prepare call: {}", sql))?;

        Self::bind(self.sms.as_ref(), stmt, params)
    }

    fn bind<'a>(
        sms: &dyn MappingStrategy,
        mut stmt: Box<dyn Statement + 'a>,
        params: &[SqlParam],
    ) -> Result<Box<dyn Statement + 'a>> {
        for (idx, param) in params.iter().enumerate() {
            sms.set_sql_param(stmt.as_mut(), idx + 1, param)?;
        }

        Ok(stmt)
    }

    pub fn commit(&mut self) -> Result<()> {
        self.con.commit().context("Failed to commit transaction")
    }

    /// Rolls back the transaction, logging any failure so the original error is kept
    pub fn rollback_quietly(&mut self) {
        if let Err(err) = self.con.rollback() {
            warn!("Failed to rollback transaction: {:?}", err);
        }
    }

    /// Runs the database work, rolling back quietly before returning its error
    pub fn with_rollback<T>(&mut self, work: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let res = work(self);

        if res.is_err() {
            self.rollback_quietly();
        }

        res
    }

    /// Looks up the nullability of the columns of the table
    pub fn column_nullability(&mut self, table: &str) -> Result<HashMap<String, bool>> {
        self.con.column_nullability(table)
    }
}
