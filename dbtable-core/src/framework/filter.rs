use std::cmp::Ordering;

use crate::data::{DataType, DataValue};

use super::{Attribute, AttributeValue, ConnectorObject};

/// A search filter over the attributes of an object
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Equals(Attribute),
    GreaterThan(Attribute),
    GreaterThanOrEqual(Attribute),
    LessThan(Attribute),
    LessThanOrEqual(Attribute),
    StartsWith(Attribute),
    EndsWith(Attribute),
    Contains(Attribute),
    ContainsAll(Attribute),
    And(Box<Filter>, Box<Filter>),
    Or(Box<Filter>, Box<Filter>),
    Not(Box<Filter>),
}

impl Filter {
    pub fn equals(name: &str, value: impl Into<DataValue>) -> Self {
        Self::Equals(Attribute::single(name, value))
    }

    pub fn and(left: Filter, right: Filter) -> Self {
        Self::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: Filter, right: Filter) -> Self {
        Self::Or(Box::new(left), Box::new(right))
    }

    pub fn not(inner: Filter) -> Self {
        Self::Not(Box::new(inner))
    }

    /// Returns the attribute the leaf filter applies to
    pub fn attribute(&self) -> Option<&Attribute> {
        match self {
            Filter::Equals(a)
            | Filter::GreaterThan(a)
            | Filter::GreaterThanOrEqual(a)
            | Filter::LessThan(a)
            | Filter::LessThanOrEqual(a)
            | Filter::StartsWith(a)
            | Filter::EndsWith(a)
            | Filter::Contains(a)
            | Filter::ContainsAll(a) => Some(a),
            _ => None,
        }
    }

    /// Evaluates the filter against an object, comparing values as they are.
    pub fn accepts(&self, obj: &ConnectorObject) -> bool {
        self.accepts_with(obj, &|_| DataType::Null)
    }

    /// Evaluates the filter against an object.
    ///
    /// Used to post-filter results when only part of a filter could be
    /// pushed down to the resource. `types` gives the type both sides of a
    /// comparison on an attribute are read as, `Null` keeps the attribute's own type.
    pub fn accepts_with(&self, obj: &ConnectorObject, types: &dyn Fn(&str) -> DataType) -> bool {
        self.eval(obj, types) == Some(true)
    }

    /// Three-valued evaluation matching sql, comparisons against a missing value are unknown
    fn eval(&self, obj: &ConnectorObject, types: &dyn Fn(&str) -> DataType) -> Option<bool> {
        match self {
            Filter::And(l, r) => match (l.eval(obj, types), r.eval(obj, types)) {
                (Some(false), _) | (_, Some(false)) => Some(false),
                (Some(true), Some(true)) => Some(true),
                _ => None,
            },
            Filter::Or(l, r) => match (l.eval(obj, types), r.eval(obj, types)) {
                (Some(true), _) | (_, Some(true)) => Some(true),
                (Some(false), Some(false)) => Some(false),
                _ => None,
            },
            // NOT of an unknown stays unknown, so NOT a = v excludes a null a
            Filter::Not(f) => f.eval(obj, types).map(|b| !b),
            Filter::ContainsAll(a) => {
                let actual = data_values(&obj.values_of(&a.name).unwrap_or_default());
                Some(data_values(&a.values).iter().all(|v| actual.contains(v)))
            }
            Filter::Equals(a) => {
                let actual = data_values(&obj.values_of(&a.name).unwrap_or_default());
                let expected = data_values(&a.values);

                if expected.iter().all(|v| v.is_null()) {
                    return Some(actual.iter().all(|v| v.is_null()));
                }

                if actual.iter().all(|v| v.is_null()) {
                    return None;
                }

                let r#type = types(&a.name);
                Some(
                    actual.len() == expected.len()
                        && actual
                            .iter()
                            .zip(expected.iter())
                            .all(|(a, e)| compare(a, e, &r#type) == Some(Ordering::Equal)),
                )
            }
            leaf => {
                let attr = leaf.attribute()?;
                let expected = data_values(&attr.values)
                    .into_iter()
                    .next()
                    .filter(|v| !v.is_null())?;
                let actual = data_values(&obj.values_of(&attr.name).unwrap_or_default())
                    .into_iter()
                    .next()
                    .filter(|v| !v.is_null())?;
                let ordering = || compare(&actual, &expected, &types(&attr.name));

                Some(match leaf {
                    Filter::GreaterThan(_) => ordering() == Some(Ordering::Greater),
                    Filter::GreaterThanOrEqual(_) => {
                        matches!(ordering(), Some(Ordering::Greater | Ordering::Equal))
                    }
                    Filter::LessThan(_) => ordering() == Some(Ordering::Less),
                    Filter::LessThanOrEqual(_) => {
                        matches!(ordering(), Some(Ordering::Less | Ordering::Equal))
                    }
                    Filter::StartsWith(_) => string_test(&actual, &expected, |a, e| a.starts_with(e)),
                    Filter::EndsWith(_) => string_test(&actual, &expected, |a, e| a.ends_with(e)),
                    Filter::Contains(_) => string_test(&actual, &expected, |a, e| a.contains(e)),
                    _ => false,
                })
            }
        }
    }
}

fn data_values(values: &[AttributeValue]) -> Vec<DataValue> {
    values
        .iter()
        .filter_map(|v| v.as_data().cloned())
        .collect()
}

fn string_test(actual: &DataValue, expected: &DataValue, f: impl Fn(&str, &str) -> bool) -> bool {
    match (actual, expected) {
        (DataValue::Utf8String(a), DataValue::Utf8String(e)) => f(a, e),
        _ => false,
    }
}

/// Compares two values read as the supplied type.
/// With a `Null` type the right operand is coerced into the type of the left.
fn compare(left: &DataValue, right: &DataValue, r#type: &DataType) -> Option<Ordering> {
    let r#type = match r#type {
        DataType::Null => left.data_type(),
        r#type => *r#type,
    };
    let left = left.clone().try_coerce_into(&r#type).ok()?;
    let right = right.clone().try_coerce_into(&r#type).ok()?;

    match (&left, &right) {
        (DataValue::Utf8String(a), DataValue::Utf8String(b)) => Some(a.cmp(b)),
        (DataValue::Binary(a), DataValue::Binary(b)) => Some(a.cmp(b)),
        (DataValue::Boolean(a), DataValue::Boolean(b)) => Some(a.cmp(b)),
        (DataValue::Int8(a), DataValue::Int8(b)) => Some(a.cmp(b)),
        (DataValue::Int16(a), DataValue::Int16(b)) => Some(a.cmp(b)),
        (DataValue::Int32(a), DataValue::Int32(b)) => Some(a.cmp(b)),
        (DataValue::Int64(a), DataValue::Int64(b)) => Some(a.cmp(b)),
        (DataValue::Float32(a), DataValue::Float32(b)) => a.partial_cmp(b),
        (DataValue::Float64(a), DataValue::Float64(b)) => a.partial_cmp(b),
        (DataValue::Decimal(a), DataValue::Decimal(b)) => Some(a.cmp(b)),
        (DataValue::Date(a), DataValue::Date(b)) => Some(a.cmp(b)),
        (DataValue::Time(a), DataValue::Time(b)) => Some(a.cmp(b)),
        (DataValue::DateTime(a), DataValue::DateTime(b)) => Some(a.cmp(b)),
        _ => None,
    }
}
