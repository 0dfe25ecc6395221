//! Arena nodes of a decision tree.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Terminal prediction of a leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    Like,
    Dislike,
    Unsure,
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Label::Like => "Like",
            Label::Dislike => "Dislike",
            Label::Unsure => "Unsure",
        })
    }
}

/// Index of a node inside its tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// A split on one attribute, or a labelled leaf.
///
/// Both children of a split always exist; they are created together when the
/// split is made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Split {
        /// Position of the split attribute in the attribute universe.
        attribute: usize,
        /// Followed by items that lack the attribute.
        absent: NodeId,
        /// Followed by items that have the attribute.
        present: NodeId,
    },
    Leaf(Label),
}

impl Node {
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    /// `(absent, present)` children of a split.
    #[must_use]
    pub fn children(&self) -> Option<(NodeId, NodeId)> {
        match self {
            Node::Split {
                absent, present, ..
            } => Some((*absent, *present)),
            Node::Leaf(_) => None,
        }
    }
}
