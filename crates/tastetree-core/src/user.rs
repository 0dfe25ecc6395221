//! Users and their like/dislike feedback.

use crate::item::Item;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Stable integer identity of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u32);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Verdicts a single user has given, keyed by item.
///
/// A later verdict on the same item replaces the earlier one; no history is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Feedback {
    verdicts: HashMap<Arc<Item>, bool>,
}

impl Feedback {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `liked` for `item`, returning the verdict it replaced.
    pub fn record(&mut self, item: Arc<Item>, liked: bool) -> Option<bool> {
        self.verdicts.insert(item, liked)
    }

    #[must_use]
    pub fn verdict(&self, item: &Item) -> Option<bool> {
        self.verdicts.get(item).copied()
    }

    #[must_use]
    pub fn contains(&self, item: &Item) -> bool {
        self.verdicts.contains_key(item)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.verdicts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.verdicts.is_empty()
    }

    /// Number of liked items.
    #[must_use]
    pub fn likes(&self) -> usize {
        self.verdicts.values().filter(|liked| **liked).count()
    }

    /// Number of disliked items.
    #[must_use]
    pub fn dislikes(&self) -> usize {
        self.len() - self.likes()
    }

    /// Iterates over `(item, liked)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&Arc<Item>, bool)> {
        self.verdicts.iter().map(|(item, liked)| (item, *liked))
    }
}

/// A user and the feedback they have given so far.
#[derive(Debug, Clone)]
pub struct User {
    id: UserId,
    feedback: Feedback,
}

impl User {
    #[must_use]
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            feedback: Feedback::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    #[must_use]
    pub fn feedback(&self) -> &Feedback {
        &self.feedback
    }

    pub fn like(&mut self, item: Arc<Item>) {
        self.feedback.record(item, true);
    }

    pub fn dislike(&mut self, item: Arc<Item>) {
        self.feedback.record(item, false);
    }

    pub fn like_all<I: IntoIterator<Item = Arc<Item>>>(&mut self, items: I) {
        for item in items {
            self.like(item);
        }
    }

    pub fn dislike_all<I: IntoIterator<Item = Arc<Item>>>(&mut self, items: I) {
        for item in items {
            self.dislike(item);
        }
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for User {}

impl Hash for User {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "User {}", self.id)
    }
}
