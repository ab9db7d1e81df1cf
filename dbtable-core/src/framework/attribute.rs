use std::fmt;

use enum_as_inner::EnumAsInner;

use crate::{
    data::DataValue,
    err::{ConnectorError, Result},
};

use super::GuardedString;

/// The naming attribute of an object
pub const NAME: &str = "__NAME__";
/// The unique identifier attribute of an object
pub const UID: &str = "__UID__";
/// The operational password attribute
pub const PASSWORD: &str = "__PASSWORD__";

/// Returns true if the supplied attribute names are equal.
/// Attribute names are case-insensitive.
pub fn name_eq(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

/// A single value of an attribute
#[derive(Debug, Clone, PartialEq, EnumAsInner)]
pub enum AttributeValue {
    Data(DataValue),
    Secret(GuardedString),
}

macro_rules! impl_from_data {
    ($($t:ty),*) => {
        $(
            impl From<$t> for AttributeValue {
                fn from(v: $t) -> Self {
                    AttributeValue::Data(v.into())
                }
            }
        )*
    };
}

impl_from_data!(DataValue, &str, String, i32, i64, bool, Vec<u8>);

impl From<GuardedString> for AttributeValue {
    fn from(v: GuardedString) -> Self {
        AttributeValue::Secret(v)
    }
}

/// A named attribute with zero or more values
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub values: Vec<AttributeValue>,
}

impl Attribute {
    pub fn new(name: impl Into<String>, values: Vec<AttributeValue>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn single(name: impl Into<String>, value: impl Into<DataValue>) -> Self {
        Self::new(name, vec![AttributeValue::Data(value.into())])
    }

    pub fn secret(name: impl Into<String>, value: GuardedString) -> Self {
        Self::new(name, vec![AttributeValue::Secret(value)])
    }

    /// An attribute without values, which clears the underlying column
    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, vec![])
    }

    pub fn name(value: impl Into<String>) -> Self {
        Self::single(NAME, value.into())
    }

    pub fn password(value: GuardedString) -> Self {
        Self::secret(PASSWORD, value)
    }

    pub fn is(&self, name: &str) -> bool {
        name_eq(&self.name, name)
    }

    /// Returns the single value of this attribute, or none if it has no values.
    /// Fails if the attribute carries more than one value.
    pub fn single_value(&self) -> Result<Option<&AttributeValue>> {
        if self.values.len() > 1 {
            return Err(ConnectorError::InvalidAttributeValue(format!(
                "Attribute '{}' must be single valued, found {} values",
                self.name,
                self.values.len()
            ))
            .into());
        }

        Ok(self.values.first())
    }

    /// Returns the single value as a string, if present
    pub fn single_string(&self) -> Result<Option<String>> {
        Ok(match self.single_value()? {
            Some(AttributeValue::Data(DataValue::Null)) | None => None,
            Some(AttributeValue::Data(v)) => Some(v.to_string()),
            Some(AttributeValue::Secret(_)) => {
                return Err(ConnectorError::InvalidAttributeValue(format!(
                    "Attribute '{}' must not be a secret",
                    self.name
                ))
                .into())
            }
        })
    }
}

/// Finds an attribute by name
pub fn find<'a>(attrs: &'a [Attribute], name: &str) -> Option<&'a Attribute> {
    attrs.iter().find(|a| a.is(name))
}

/// The unique identifier of an object in the target resource
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Uid(pub String);

impl Uid {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_attribute_single_value() {
        let attr = Attribute::single("firstname", "John");

        assert_eq!(
            attr.single_value().unwrap(),
            Some(&AttributeValue::Data(DataValue::from("John")))
        );
        assert_eq!(attr.single_string().unwrap(), Some("John".to_string()));
        assert_eq!(Attribute::empty("x").single_value().unwrap(), None);
    }

    #[test]
    fn test_attribute_multi_valued_rejected() {
        let attr = Attribute::new("email", vec!["a@b".into(), "c@d".into()]);
        let err = attr.single_value().unwrap_err();

        assert!(matches!(
            ConnectorError::of(&err),
            Some(ConnectorError::InvalidAttributeValue(_))
        ));
    }

    #[test]
    fn test_attribute_names_case_insensitive() {
        let attrs = vec![Attribute::single("FirstName", "John")];

        assert!(find(&attrs, "firstname").is_some());
        assert!(find(&attrs, "lastname").is_none());
        assert!(Attribute::name("jdoe").is("__name__"));
    }
}
