use crate::data::DataValue;

use super::{ConnectorObject, Uid};

/// Position in the change feed of the resource
#[derive(Debug, Clone, PartialEq)]
pub struct SyncToken {
    pub value: DataValue,
}

impl SyncToken {
    pub fn new(value: DataValue) -> Self {
        Self { value }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncDeltaType {
    CreateOrUpdate,
    Delete,
}

/// A single change observed in the resource
#[derive(Debug, Clone, PartialEq)]
pub struct SyncDelta {
    pub token: SyncToken,
    pub delta_type: SyncDeltaType,
    pub uid: Uid,
    pub object: Option<ConnectorObject>,
}
