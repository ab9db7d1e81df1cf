use std::cell::RefCell;

use dbtable_core::config::{Mapping, Value};

use crate::ConfigLoader;

/// State shared by the processors while a configuration is interpolated
pub struct Ctx<'a> {
    /// The loader running the processors
    pub loader: &'a ConfigLoader,
    /// The raw top-level configuration, used to resolve property references
    pub root: Mapping,
    /// Property references currently being resolved
    resolving: RefCell<Vec<String>>,
}

impl<'a> Ctx<'a> {
    pub fn new(loader: &'a ConfigLoader, root: &Value) -> Self {
        Self {
            loader,
            root: root.as_mapping().cloned().unwrap_or_default(),
            resolving: RefCell::new(vec![]),
        }
    }

    /// Marks the property as being resolved, returning false if it already is
    pub(crate) fn enter(&self, key: &str) -> bool {
        let mut stack = self.resolving.borrow_mut();

        if stack.iter().any(|k| k == key) {
            return false;
        }

        stack.push(key.to_string());
        true
    }

    pub(crate) fn exit(&self) {
        self.resolving.borrow_mut().pop();
    }

    pub(crate) fn resolving(&self) -> Vec<String> {
        self.resolving.borrow().clone()
    }
}
