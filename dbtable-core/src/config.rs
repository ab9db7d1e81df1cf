pub use serde_yaml::{from_value, Mapping, Number, Sequence, Value};
