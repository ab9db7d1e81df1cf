/// A sort key applied to search results
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub ascending: bool,
}

impl SortKey {
    pub fn new(field: impl Into<String>, ascending: bool) -> Self {
        Self {
            field: field.into(),
            ascending,
        }
    }
}

/// Options supplied by the caller of an operation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OperationOptions {
    /// The attributes to return, defaults to those returned by default
    pub attributes_to_get: Option<Vec<String>>,
    /// Ordering of the search results
    pub sort_keys: Vec<SortKey>,
}

impl OperationOptions {
    pub fn with_attributes_to_get(attrs: &[&str]) -> Self {
        Self {
            attributes_to_get: Some(attrs.iter().map(|a| a.to_string()).collect()),
            ..Self::default()
        }
    }
}
