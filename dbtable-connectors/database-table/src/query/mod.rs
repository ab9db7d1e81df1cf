//! Builders for the parameterised sql run against the table

mod insert;
pub use insert::*;
mod select;
pub use select::*;
mod update;
pub use update::*;
mod r#where;
pub use r#where::*;

use dbtable_core::err::{ConnectorError, Result};

fn require_non_blank(name: &str, what: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(ConnectorError::illegal_argument(format!(
            "The {} name must not be blank",
            what
        )));
    }

    Ok(())
}
