pub use anyhow::{anyhow, bail, ensure, Context, Error, Result};

/// Typed failures surfaced by a connector.
///
/// These travel inside [`anyhow::Error`] so that callers can branch on the
/// kind through [`ConnectorError::of`] while still receiving any context
/// attached on the way up.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectorError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),
    #[error("Illegal argument: {0}")]
    IllegalArgument(String),
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Unknown uid: {0}")]
    UnknownUid(String),
    #[error("Invalid credential: {0}")]
    InvalidCredential(String),
    #[error("Operation not supported: {0}")]
    UnsupportedOperation(String),
    #[error("Unsupported object class: {0}")]
    UnsupportedObjectClass(String),
    #[error("Invalid attribute value: {0}")]
    InvalidAttributeValue(String),
}

impl ConnectorError {
    /// Returns the typed connector error carried by the supplied error, if any
    pub fn of(err: &Error) -> Option<&ConnectorError> {
        err.downcast_ref::<ConnectorError>()
    }

    pub fn configuration(msg: impl Into<String>) -> Error {
        Self::Configuration(msg.into()).into()
    }

    pub fn illegal_argument(msg: impl Into<String>) -> Error {
        Self::IllegalArgument(msg.into()).into()
    }

    pub fn unsupported_operation(msg: impl Into<String>) -> Error {
        Self::UnsupportedOperation(msg.into()).into()
    }
}
