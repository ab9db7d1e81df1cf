//! The object model of the identity framework hosting the connectors

pub mod attribute;
mod filter;
mod guarded;
mod object;
mod options;
mod schema;
mod sync;

pub use attribute::{name_eq, Attribute, AttributeValue, Uid};
pub use filter::*;
pub use guarded::*;
pub use object::*;
pub use options::*;
pub use schema::*;
pub use sync::*;
