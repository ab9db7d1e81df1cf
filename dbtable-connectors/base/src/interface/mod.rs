mod connection;
mod data_source;
mod operations;
mod result_set;

pub use connection::*;
pub use data_source::*;
pub use operations::*;
pub use result_set::*;
