mod ctx;
mod loader;
pub mod processor;

pub use ctx::*;
pub use loader::*;
