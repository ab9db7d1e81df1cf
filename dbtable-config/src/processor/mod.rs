use dbtable_core::err::Result;

use crate::Ctx;

pub mod env;
pub mod property;
pub mod util;

/// Resolves `${...}` expressions found in configuration strings
pub trait ConfigProcessor {
    /// Gets the name of the processor, used in error messages
    fn display_name(&self) -> &str;

    /// Resolves the expression between the braces.
    /// Returns none if this processor does not handle the expression.
    fn process(&self, ctx: &Ctx, expr: &str) -> Result<Option<String>>;
}
