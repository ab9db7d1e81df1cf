use dbtable_core::{
    err::Result,
    framework::{
        Attribute, ConnectorObject, Filter, GuardedString, ObjectClass, OperationOptions, Schema,
        SyncDelta, SyncToken, Uid,
    },
};

/// Receives the objects found by a search.
/// Returning false stops the search.
pub trait ResultsHandler {
    fn handle(&mut self, obj: ConnectorObject) -> bool;
}

impl<F: FnMut(ConnectorObject) -> bool> ResultsHandler for F {
    fn handle(&mut self, obj: ConnectorObject) -> bool {
        self(obj)
    }
}

/// Receives the changes found by a sync.
/// Returning false stops the sync.
pub trait SyncResultsHandler {
    fn handle(&mut self, delta: SyncDelta) -> bool;
}

impl<F: FnMut(SyncDelta) -> bool> SyncResultsHandler for F {
    fn handle(&mut self, delta: SyncDelta) -> bool {
        self(delta)
    }
}

/// The lifecycle of a connector instance
pub trait Connector: Sized {
    type TConfig;

    /// Validates the configuration and opens the connection
    fn init(config: Self::TConfig) -> Result<Self>;

    /// Releases the connection and any cached state
    fn dispose(&mut self);

    /// Checks the connection is still usable
    fn check_alive(&mut self) -> Result<()>;
}

pub trait CreateOp {
    fn create(
        &mut self,
        object_class: &ObjectClass,
        attrs: &[Attribute],
        options: &OperationOptions,
    ) -> Result<Uid>;
}

pub trait UpdateOp {
    fn update(
        &mut self,
        object_class: &ObjectClass,
        uid: &Uid,
        attrs: &[Attribute],
        options: &OperationOptions,
    ) -> Result<Uid>;
}

pub trait DeleteOp {
    fn delete(
        &mut self,
        object_class: &ObjectClass,
        uid: &Uid,
        options: &OperationOptions,
    ) -> Result<()>;
}

pub trait SearchOp {
    fn search(
        &mut self,
        object_class: &ObjectClass,
        filter: Option<&Filter>,
        handler: &mut dyn ResultsHandler,
        options: &OperationOptions,
    ) -> Result<()>;
}

pub trait SyncOp {
    fn sync(
        &mut self,
        object_class: &ObjectClass,
        token: Option<&SyncToken>,
        handler: &mut dyn SyncResultsHandler,
        options: &OperationOptions,
    ) -> Result<()>;

    fn latest_sync_token(&mut self, object_class: &ObjectClass) -> Result<Option<SyncToken>>;
}

pub trait AuthenticateOp {
    fn authenticate(
        &mut self,
        object_class: &ObjectClass,
        username: &str,
        password: &GuardedString,
        options: &OperationOptions,
    ) -> Result<Uid>;
}

pub trait SchemaOp {
    fn schema(&mut self) -> Result<Schema>;
}

pub trait TestOp {
    fn test(&mut self) -> Result<()>;
}
