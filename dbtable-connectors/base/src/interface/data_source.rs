use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use dbtable_core::{
    err::{anyhow, ConnectorError, Result},
    framework::GuardedString,
};
use dbtable_logging::debug;
use lazy_static::lazy_static;

use super::Connection;

/// A named factory of connections, looked up by name from the registry
pub trait DataSource: Send + Sync {
    /// Opens a new connection, optionally authenticating with the supplied
    /// credentials and using the supplied environment properties
    fn connect(
        &self,
        credentials: Option<(&str, &GuardedString)>,
        env: &HashMap<String, String>,
    ) -> Result<Box<dyn Connection>>;
}

lazy_static! {
    static ref DATA_SOURCES: RwLock<HashMap<String, Arc<dyn DataSource>>> =
        RwLock::new(HashMap::new());
}

/// Binds the data source under the supplied name, replacing any existing binding
pub fn register_data_source(name: impl Into<String>, ds: Arc<dyn DataSource>) -> Result<()> {
    let name = name.into();
    debug!("Registering data source \"{}\"", name);

    DATA_SOURCES
        .write()
        .map_err(|_| anyhow!("Data source registry lock is poisoned"))?
        .insert(name, ds);

    Ok(())
}

/// Removes the binding, returning true if one existed
pub fn unregister_data_source(name: &str) -> Result<bool> {
    Ok(DATA_SOURCES
        .write()
        .map_err(|_| anyhow!("Data source registry lock is poisoned"))?
        .remove(name)
        .is_some())
}

/// Looks up the data source bound to the supplied name
pub fn lookup_data_source(name: &str) -> Result<Arc<dyn DataSource>> {
    DATA_SOURCES
        .read()
        .map_err(|_| anyhow!("Data source registry lock is poisoned"))?
        .get(name)
        .cloned()
        .ok_or_else(|| {
            ConnectorError::ConnectionFailed(format!("No data source bound to \"{}\"", name)).into()
        })
}

/// Parses `key=value` environment property strings
pub fn parse_env_properties(props: &[String]) -> Result<HashMap<String, String>> {
    props
        .iter()
        .map(|p| match p.split_once('=') {
            Some((k, v)) if !k.trim().is_empty() => Ok((k.trim().to_string(), v.trim().to_string())),
            _ => Err(ConnectorError::configuration(format!(
                "Invalid environment property \"{}\", expected key=value",
                p
            ))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serial_test::serial;

    use super::*;

    struct MockDataSource;

    impl DataSource for MockDataSource {
        fn connect(
            &self,
            _credentials: Option<(&str, &GuardedString)>,
            _env: &HashMap<String, String>,
        ) -> Result<Box<dyn Connection>> {
            Err(anyhow!("not connectable"))
        }
    }

    #[test]
    #[serial]
    fn test_data_source_registry() {
        register_data_source("test/registry", Arc::new(MockDataSource)).unwrap();

        assert!(lookup_data_source("test/registry").is_ok());
        assert_eq!(unregister_data_source("test/registry").unwrap(), true);
        assert_eq!(unregister_data_source("test/registry").unwrap(), false);
    }

    #[test]
    #[serial]
    fn test_data_source_lookup_unbound() {
        let err = lookup_data_source("test/unbound").err().unwrap();

        assert!(matches!(
            ConnectorError::of(&err),
            Some(ConnectorError::ConnectionFailed(_))
        ));
    }

    #[test]
    fn test_parse_env_properties() {
        let props = parse_env_properties(&["a=A".into(), "b = B".into()]).unwrap();

        assert_eq!(props.get("a"), Some(&"A".to_string()));
        assert_eq!(props.get("b"), Some(&"B".to_string()));
    }

    #[test]
    fn test_parse_env_properties_malformed() {
        parse_env_properties(&["a=A".into(), "b".into()]).unwrap_err();
        parse_env_properties(&["=A".into()]).unwrap_err();
    }
}
