use dbtable_core::{
    config::Value,
    err::{bail, ConnectorError, Result},
};

use crate::Ctx;

use super::ConfigProcessor;

/// Interpolates references to other top-level configuration keys, `${name}`
#[derive(Default)]
pub struct PropertyConfigProcessor {}

impl ConfigProcessor for PropertyConfigProcessor {
    fn display_name(&self) -> &str {
        "property"
    }

    fn process(&self, ctx: &Ctx, expr: &str) -> Result<Option<String>> {
        let key = expr.trim();
        let val = match ctx.root.get(key) {
            Some(val) => val.clone(),
            None => return Ok(None),
        };

        if !ctx.enter(key) {
            let mut chain = ctx.resolving();
            chain.push(key.to_string());
            return Err(ConnectorError::configuration(format!(
                "Circular property reference: {}",
                chain.join(" -> ")
            )));
        }

        let res = match val {
            Value::String(s) => ctx.loader.interpolate(ctx, &s),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            Value::Null => Ok(String::new()),
            _ => {
                ctx.exit();
                bail!("Property \"{}\" cannot be interpolated: it is not a scalar", key)
            }
        };

        ctx.exit();
        res.map(Some)
    }
}
