//! The fixed, ordered set of boolean attribute names an item may carry.
//!
//! An [`AttributeUniverse`] is built exactly once by whoever loads the item
//! data and is then shared read-only (usually behind an `Arc`) with every
//! [`Item`](crate::Item) and decision tree. Its order is significant: split
//! selection scans attributes in this order and keeps the first one that
//! reaches the lowest entropy.

use crate::error::{CoreError, Result};
use serde::Serialize;
use std::collections::HashMap;

/// Ordered, immutable list of attribute names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeUniverse {
    names: Vec<String>,
    #[serde(skip)]
    positions: HashMap<String, usize>,
}

impl AttributeUniverse {
    /// Freezes the given names, in order, into a universe.
    ///
    /// Names are trimmed. Blank names and duplicates are rejected.
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ordered = Vec::new();
        let mut positions = HashMap::new();
        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() {
                return Err(CoreError::BlankAttribute);
            }
            if positions.insert(name.to_string(), ordered.len()).is_some() {
                return Err(CoreError::DuplicateAttribute(name.to_string()));
            }
            ordered.push(name.to_string());
        }
        Ok(Self {
            names: ordered,
            positions,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// All names in universe order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Name at position `index`, if any.
    #[must_use]
    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}
