//! Binary Shannon entropy and the label counts it is computed from.

use crate::node::Label;
use tastetree_core::Item;

/// Binary entropy `B(q) = -q·log2(q) - (1-q)·log2(1-q)` with `B(0) = B(1) = 0`.
///
/// # Panics
///
/// Panics if `q` lies outside `[0, 1]`; callers only ever pass like ratios.
#[must_use]
pub fn binary_entropy(q: f64) -> f64 {
    assert!(
        (0.0..=1.0).contains(&q),
        "entropy argument {q} outside [0, 1]"
    );
    let log_q = if q == 0.0 { 0.0 } else { q.log2() };
    let log_not_q = if q == 1.0 { 0.0 } else { (1.0 - q).log2() };
    -(q * log_q + (1.0 - q) * log_not_q)
}

/// One training example: an item and whether it was liked.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Example<'a> {
    pub item: &'a Item,
    pub liked: bool,
}

/// Like/dislike counts of a subset of examples.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub likes: usize,
    pub dislikes: usize,
}

impl Tally {
    pub(crate) fn of(examples: &[Example<'_>]) -> Self {
        examples.iter().fold(Self::default(), |mut tally, example| {
            tally.add(example.liked);
            tally
        })
    }

    /// Counts of the `(absent, present)` partitions of `examples` by `attribute`.
    pub(crate) fn split(examples: &[Example<'_>], attribute: &str) -> (Self, Self) {
        let mut absent = Self::default();
        let mut present = Self::default();
        for example in examples {
            if example.item.has_attribute(attribute) {
                present.add(example.liked);
            } else {
                absent.add(example.liked);
            }
        }
        (absent, present)
    }

    fn add(&mut self, liked: bool) {
        if liked {
            self.likes += 1;
        } else {
            self.dislikes += 1;
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.likes + self.dislikes
    }

    /// True when every counted verdict agrees (or nothing was counted).
    #[must_use]
    pub fn is_homogeneous(&self) -> bool {
        self.likes == 0 || self.dislikes == 0
    }

    /// Entropy of the like ratio; an empty tally has entropy 0.
    #[must_use]
    pub fn entropy(&self) -> f64 {
        if self.total() == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        {
            binary_entropy(self.likes as f64 / self.total() as f64)
        }
    }

    /// Majority label, `Unsure` on an exact tie.
    #[must_use]
    pub fn label(&self) -> Label {
        match self.likes.cmp(&self.dislikes) {
            std::cmp::Ordering::Greater => Label::Like,
            std::cmp::Ordering::Less => Label::Dislike,
            std::cmp::Ordering::Equal => Label::Unsure,
        }
    }
}

/// Size-weighted entropy after splitting into `absent` and `present`.
#[must_use]
pub fn post_split_entropy(absent: Tally, present: Tally) -> f64 {
    let total = absent.total() + present.total();
    if total == 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    {
        (absent.total() as f64 * absent.entropy() + present.total() as f64 * present.entropy())
            / total as f64
    }
}
