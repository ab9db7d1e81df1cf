mod error;
mod sql_type;

pub use error::*;
pub use sql_type::*;
