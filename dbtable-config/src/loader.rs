use std::{fs, path::Path};

use dbtable_core::{
    config::{Mapping, Value},
    err::{Context, Result},
};
use dbtable_logging::{debug, info};
use serde::Deserialize;
use serde_yaml::Deserializer;

use crate::{
    processor::{
        env::EnvConfigProcessor,
        property::PropertyConfigProcessor,
        util::{interpolate, process_strings},
        ConfigProcessor,
    },
    Ctx,
};

/// Parses and loads connector configuration
pub struct ConfigLoader {
    processors: Vec<Box<dyn ConfigProcessor>>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Initialises the configuration loader
    pub fn new() -> Self {
        Self {
            processors: vec![
                Box::new(EnvConfigProcessor::default()),
                Box::new(PropertyConfigProcessor::default()),
            ],
        }
    }

    /// Loads the configuration from the supplied yaml file
    pub fn load(&self, path: &Path) -> Result<Value> {
        info!("Loading config from path {}", path.display());

        let file_data = fs::read(path).context(format!(
            "Failed to read config from file {}",
            path.display()
        ))?;

        self.load_data(file_data.as_slice())
    }

    /// Parses and processes the supplied yaml
    pub fn load_data(&self, data: &[u8]) -> Result<Value> {
        let config =
            Value::deserialize(Deserializer::from_slice(data)).context("Failed to parse yaml")?;

        self.process(config)
    }

    /// Builds the configuration from environment-style `PREFIX_KEY=value` pairs.
    ///
    /// Keys are lower-cased after the prefix is removed. Booleans and
    /// `[a, b]` lists are parsed, everything else stays a string.
    pub fn from_env(
        &self,
        prefix: &str,
        vars: impl IntoIterator<Item = (String, String)>,
    ) -> Result<Value> {
        let prefix = format!("{}_", prefix.to_uppercase());
        let mut map = Mapping::new();

        for (key, val) in vars.into_iter() {
            let key = match key.strip_prefix(&prefix) {
                Some(key) if !key.is_empty() => key.to_lowercase(),
                _ => continue,
            };

            debug!("Reading config key {} from environment", key);
            map.insert(Value::String(key), Self::env_value(val)?);
        }

        self.process(Value::Mapping(map))
    }

    fn env_value(val: String) -> Result<Value> {
        let trimmed = val.trim();

        Ok(match trimmed {
            "true" | "false" => Value::Bool(trimmed == "true"),
            _ if trimmed.starts_with('[') && trimmed.ends_with(']') => {
                serde_yaml::from_str(trimmed).context("Failed to parse list value")?
            }
            _ => Value::String(val),
        })
    }

    /// Interpolates every string in the configuration
    pub fn process(&self, config: Value) -> Result<Value> {
        let ctx = Ctx::new(self, &config);
        let processed = process_strings(config, &|s| Ok(Value::String(self.interpolate(&ctx, &s)?)))?;

        debug!("Finished processing config");
        Ok(processed)
    }

    /// Resolves the `${...}` expressions in the supplied string
    pub(crate) fn interpolate(&self, ctx: &Ctx, input: &str) -> Result<String> {
        interpolate(input, &|expr| {
            for processor in self.processors.iter() {
                let res = processor.process(ctx, expr).context(format!(
                    "Failed to process config value \"{}\" using the {} processor",
                    input,
                    processor.display_name()
                ))?;

                if res.is_some() {
                    return Ok(res);
                }
            }

            Ok(None)
        })
    }
}

#[cfg(test)]
mod tests {
    use std::{env, io::Write};

    use dbtable_core::err::ConnectorError;
    use pretty_assertions::assert_eq;
    use serial_test::serial;

    use super::*;

    fn process_yaml(yaml: &str) -> Result<String> {
        let loader = ConfigLoader::new();

        loader
            .load_data(yaml.as_bytes())
            .and_then(|val| Ok(serde_yaml::to_string(&val)?))
            // remove trailing new line
            .map(|s| s.trim_end_matches('\n').to_string())
    }

    #[test]
    fn test_config_loader_basic_yaml() {
        assert_eq!(process_yaml("a: b").unwrap(), "a: b");
    }

    #[test]
    fn test_config_loader_unknown_interpolation() {
        assert_eq!(process_yaml("a: ${unknown}").unwrap(), "a: ${unknown}");
    }

    #[test]
    #[serial]
    fn test_config_loader_env_interpolation() {
        env::set_var("DBTABLE_CONFIG_LOADER_TEST1", "FROM_ENV_VAR");
        let input = r#"a: "${env:DBTABLE_CONFIG_LOADER_TEST1}""#;

        assert_eq!(process_yaml(input).unwrap(), "a: FROM_ENV_VAR");
    }

    fn process_value(yaml: &str) -> Value {
        ConfigLoader::new().load_data(yaml.as_bytes()).unwrap()
    }

    #[test]
    fn test_config_loader_property_interpolation() {
        let input = "host: db\nport: 8000\nurl: \"jdbc:x://${host}:${port}\"";

        assert_eq!(
            process_value(input),
            serde_yaml::from_str::<Value>("host: db\nport: 8000\nurl: \"jdbc:x://db:8000\"").unwrap()
        );
    }

    #[test]
    fn test_config_loader_nested_property_interpolation() {
        let input = "a: ${b}\nb: ${c}-x\nc: y";

        assert_eq!(
            process_value(input),
            serde_yaml::from_str::<Value>("a: y-x\nb: y-x\nc: y").unwrap()
        );
    }

    #[test]
    fn test_config_loader_circular_property() {
        let err = process_yaml("a: ${b}\nb: ${a}").unwrap_err();

        assert!(matches!(
            ConnectorError::of(&err),
            Some(ConnectorError::Configuration(_))
        ));
    }

    #[test]
    fn test_config_loader_from_env() {
        let loader = ConfigLoader::new();
        let vars = vec![
            ("DBT_TABLE".to_string(), "accounts".to_string()),
            ("DBT_ALL_NATIVE".to_string(), "true".to_string()),
            ("DBT_JNDI_PROPERTIES".to_string(), "[a=A, b=B]".to_string()),
            ("OTHER_TABLE".to_string(), "ignored".to_string()),
        ];

        let conf = loader.from_env("dbt", vars).unwrap();

        assert_eq!(
            conf,
            serde_yaml::from_str::<Value>("table: accounts\nall_native: true\njndi_properties: [a=A, b=B]")
                .unwrap()
        );
    }

    #[test]
    fn test_config_loader_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"table: accounts\nkey_column: ${table}_id").unwrap();

        let conf = ConfigLoader::new().load(file.path()).unwrap();

        assert_eq!(
            conf,
            serde_yaml::from_str::<Value>("table: accounts\nkey_column: accounts_id").unwrap()
        );
    }
}
