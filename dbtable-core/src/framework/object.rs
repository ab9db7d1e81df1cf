use std::fmt;

use crate::data::DataValue;

use super::{attribute, name_eq, Attribute, AttributeValue, Uid};

/// The type of object held by the target resource
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectClass(String);

impl ObjectClass {
    pub const ACCOUNT_NAME: &'static str = "__ACCOUNT__";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn account() -> Self {
        Self::new(Self::ACCOUNT_NAME)
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn is(&self, name: &str) -> bool {
        name_eq(&self.0, name)
    }
}

impl fmt::Display for ObjectClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An object read from the target resource
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectorObject {
    pub object_class: ObjectClass,
    pub uid: Uid,
    pub name: String,
    pub attributes: Vec<Attribute>,
}

impl ConnectorObject {
    pub fn new(object_class: ObjectClass, uid: Uid, name: String, attributes: Vec<Attribute>) -> Self {
        Self {
            object_class,
            uid,
            name,
            attributes,
        }
    }

    /// Finds a regular attribute on the object
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        attribute::find(&self.attributes, name)
    }

    /// Returns the values of the named attribute, including the
    /// `__UID__` and `__NAME__` pseudo attributes
    pub fn values_of(&self, name: &str) -> Option<Vec<AttributeValue>> {
        if name_eq(name, attribute::UID) {
            return Some(vec![DataValue::from(self.uid.value()).into()]);
        }

        if name_eq(name, attribute::NAME) {
            return Some(vec![DataValue::from(self.name.as_str()).into()]);
        }

        self.attribute(name).map(|a| a.values.clone())
    }

    /// Returns the names of all attributes present on the object, in order
    pub fn attribute_names(&self) -> Vec<String> {
        let mut names = vec![attribute::UID.to_string(), attribute::NAME.to_string()];
        names.extend(self.attributes.iter().map(|a| a.name.clone()));
        names
    }
}
