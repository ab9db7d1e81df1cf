use std::collections::BTreeSet;

use super::{attribute, name_eq};

/// The externally visible type of an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeType {
    String,
    Long,
    Integer,
    Byte,
    Double,
    Float,
    BigDecimal,
    Boolean,
    ByteArray,
    GuardedString,
}

/// Describes an attribute of an object class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeInfo {
    pub name: String,
    pub r#type: AttributeType,
    pub required: bool,
    pub returned_by_default: bool,
}

impl AttributeInfo {
    pub fn new(name: impl Into<String>, r#type: AttributeType) -> Self {
        Self {
            name: name.into(),
            r#type,
            required: false,
            returned_by_default: true,
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn returned_by_default(mut self, returned: bool) -> Self {
        self.returned_by_default = returned;
        self
    }

    /// The operational password attribute, which is never returned by default
    pub fn password() -> Self {
        Self::new(attribute::PASSWORD, AttributeType::GuardedString).returned_by_default(false)
    }
}

/// Describes an object class supported by the connector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectClassInfo {
    pub type_name: String,
    pub attributes: Vec<AttributeInfo>,
}

impl ObjectClassInfo {
    pub fn attribute(&self, name: &str) -> Option<&AttributeInfo> {
        self.attributes.iter().find(|a| name_eq(&a.name, name))
    }
}

/// Operations a connector may support
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OperationType {
    Create,
    Update,
    Delete,
    Search,
    Sync,
    Authenticate,
    Schema,
    Test,
}

impl OperationType {
    pub fn all() -> BTreeSet<OperationType> {
        use OperationType::*;

        [Create, Update, Delete, Search, Sync, Authenticate, Schema, Test]
            .into_iter()
            .collect()
    }
}

/// The schema advertised by a connector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    pub object_classes: Vec<ObjectClassInfo>,
    pub operations: BTreeSet<OperationType>,
}

impl Schema {
    pub fn supports(&self, op: OperationType) -> bool {
        self.operations.contains(&op)
    }

    pub fn object_class(&self, name: &str) -> Option<&ObjectClassInfo> {
        self.object_classes.iter().find(|c| name_eq(&c.type_name, name))
    }
}
