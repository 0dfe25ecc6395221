//! Core types shared by every tastetree crate.
//!
//! The attribute universe, catalog items, users with their feedback, and the
//! [`Predictor`] seam that per-user models implement.

#![warn(clippy::unwrap_used, clippy::expect_used)]

pub mod attributes;
pub mod error;
pub mod item;
pub mod user;

pub use attributes::AttributeUniverse;
pub use error::{CoreError, Result};
pub use item::Item;
pub use user::{Feedback, User, UserId};

use serde_json::Value;

/// A per-user model that learns from feedback and predicts likes.
pub trait Predictor {
    /// True iff the model would recommend `item`.
    fn predict(&self, item: &Item) -> bool;
    /// Discards what was learned and rebuilds from the given feedback.
    fn retrain(&mut self, feedback: &Feedback);
    /// Diagnostic JSON view of the learned model.
    fn snapshot(&self) -> Value;
}
