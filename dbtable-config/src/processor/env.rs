use std::env;

use dbtable_core::err::{Context, Result};

use crate::Ctx;

use super::ConfigProcessor;

/// Interpolates configuration using environment variables, `${env:NAME}`
#[derive(Default)]
pub struct EnvConfigProcessor {}

impl ConfigProcessor for EnvConfigProcessor {
    fn display_name(&self) -> &str {
        "environment"
    }

    fn process(&self, _ctx: &Ctx, expr: &str) -> Result<Option<String>> {
        let name = match expr.strip_prefix("env:") {
            Some(name) => name.trim(),
            None => return Ok(None),
        };

        let val = env::var(name)
            .with_context(|| format!("Environment variable \"{}\" is not set", name))?;

        Ok(Some(val))
    }
}
