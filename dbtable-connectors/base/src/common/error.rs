use dbtable_core::err::Error;

/// An error raised by the database while executing a statement
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} (vendor code {vendor_code})")]
pub struct SqlError {
    pub message: String,
    /// The vendor-specific error code, zero conventionally marks a warning
    pub vendor_code: i32,
    pub sql_state: Option<String>,
}

impl SqlError {
    pub fn new(message: impl Into<String>, vendor_code: i32, sql_state: Option<String>) -> Self {
        Self {
            message: message.into(),
            vendor_code,
            sql_state,
        }
    }

    /// Returns the SQL error carried by the supplied error, if any
    pub fn of(err: &Error) -> Option<&SqlError> {
        err.downcast_ref::<SqlError>()
    }
}
