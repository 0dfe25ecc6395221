//! Catalog items described by boolean attributes.

use crate::attributes::AttributeUniverse;
use crate::error::{CoreError, Result};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

/// An immutable catalog entry.
///
/// An item either has an attribute or it does not; there is no "unknown".
/// Identity (equality, ordering, hashing) is defined by [`Item::key`] alone,
/// so two items with the same key but different attributes compare equal.
#[derive(Debug, Clone, Serialize)]
pub struct Item {
    key: String,
    attributes: BTreeSet<String>,
}

impl Item {
    /// Creates an item whose attributes are all members of `universe`.
    pub fn new<K, I, S>(key: K, attributes: I, universe: &AttributeUniverse) -> Result<Self>
    where
        K: Into<String>,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(CoreError::EmptyKey);
        }
        let mut owned = BTreeSet::new();
        for attribute in attributes {
            let attribute = attribute.as_ref();
            if !universe.contains(attribute) {
                return Err(CoreError::UnknownAttribute(attribute.to_string()));
            }
            owned.insert(attribute.to_string());
        }
        Ok(Self {
            key,
            attributes: owned,
        })
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn has_attribute(&self, attribute: &str) -> bool {
        self.attributes.contains(attribute)
    }

    /// Attributes present on this item, in lexical order.
    pub fn attributes(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(String::as_str)
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Item {}

impl Hash for Item {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl PartialOrd for Item {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Item {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn universe() -> AttributeUniverse {
        AttributeUniverse::new(["long_title", "weekend", "many_images"]).expect("universe")
    }

    #[test]
    fn absent_attributes_are_false() {
        let item = Item::new("https://e.org/a", ["weekend"], &universe()).expect("item");
        assert!(item.has_attribute("weekend"));
        assert!(!item.has_attribute("long_title"));
        assert!(!item.has_attribute("not-in-universe"));
    }

    #[test]
    fn identity_is_the_key() {
        let u = universe();
        let a = Item::new("https://e.org/a", ["weekend"], &u).expect("item");
        let b = Item::new("https://e.org/a", ["many_images"], &u).expect("item");
        let c = Item::new("https://e.org/c", ["weekend"], &u).expect("item");
        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<Item> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn rejects_foreign_attributes_and_empty_keys() {
        let u = universe();
        assert_eq!(
            Item::new("https://e.org/a", ["shares"], &u),
            Err(CoreError::UnknownAttribute("shares".into()))
        );
        assert_eq!(
            Item::new("  ", Vec::<String>::new(), &u),
            Err(CoreError::EmptyKey)
        );
    }

    #[test]
    fn displays_as_key() {
        let item = Item::new("https://e.org/x", ["weekend"], &universe()).expect("item");
        assert_eq!(item.to_string(), "https://e.org/x");
    }
}
