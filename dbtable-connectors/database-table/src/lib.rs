mod conf;
pub use conf::*;
mod connection;
pub use connection::*;
mod connector;
pub use connector::*;
mod drivers;
pub use drivers::*;
mod filter;
pub use filter::*;
pub mod mapping;
pub mod query;
mod quoting;
pub use quoting::*;
mod schema;
pub use schema::*;
mod sync;
pub use sync::*;
