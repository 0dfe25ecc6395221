#![warn(clippy::unwrap_used, clippy::expect_used)]

//! Per-user decision trees learned from like/dislike feedback.
//!
//! A [`DecisionTree`] greedily splits the items a user has rated on the
//! attribute with the highest information gain until every subset is
//! homogeneous or no attribute helps any more. Leaves carry the majority
//! [`Label`]. Prediction walks the tree and recommends only on `Like`.
//!
//! Retraining always rebuilds from scratch. The new arena is assembled on the
//! side and replaces the old one in a single assignment, so a tree is never
//! observed half-built.

pub mod entropy;
pub mod node;
mod telemetry;

pub use entropy::{binary_entropy, post_split_entropy, Tally};
pub use node::{Label, Node, NodeId};

use entropy::Example;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use tastetree_core::{AttributeUniverse, Feedback, Item, Predictor};

/// Post-split entropy must undercut the running best by more than this to win.
///
/// Absorbs floating point noise so that zero-gain splits are not taken and
/// near-equal candidates fall back to universe order.
const ENTROPY_TOLERANCE: f64 = 1e-12;

/// Binary predicate tree over the attribute universe.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTree {
    universe: Arc<AttributeUniverse>,
    nodes: Vec<Node>,
    /// `None` when there was no feedback to learn from.
    root: Option<NodeId>,
}

impl DecisionTree {
    /// Builds a tree from `feedback` right away.
    #[must_use]
    pub fn train(universe: Arc<AttributeUniverse>, feedback: &Feedback) -> Self {
        let mut tree = Self {
            universe,
            nodes: Vec::new(),
            root: None,
        };
        tree.learn_from_feedback(feedback);
        tree
    }

    /// Throws the current tree away and rebuilds it from `feedback`.
    pub fn learn_from_feedback(&mut self, feedback: &Feedback) {
        let examples: Vec<Example<'_>> = feedback
            .iter()
            .map(|(item, liked)| Example {
                item: item.as_ref(),
                liked,
            })
            .collect();
        let example_count = examples.len();

        let mut builder = Builder {
            universe: &self.universe,
            nodes: Vec::new(),
        };
        let root = if examples.is_empty() {
            None
        } else {
            Some(builder.grow(examples))
        };
        let nodes = builder.nodes;

        self.nodes = nodes;
        self.root = root;
        telemetry::trained(example_count, self.nodes.len(), self.depth());
    }

    /// Leaf label reached by `item`, or `None` if nothing has been learned.
    #[must_use]
    pub fn classify(&self, item: &Item) -> Option<Label> {
        let mut current = self.root?;
        loop {
            match &self.nodes[current.0] {
                Node::Leaf(label) => return Some(*label),
                Node::Split {
                    attribute,
                    absent,
                    present,
                } => {
                    current = if item.has_attribute(&self.universe.names()[*attribute]) {
                        *present
                    } else {
                        *absent
                    };
                }
            }
        }
    }

    /// True iff the item lands on a `Like` leaf.
    ///
    /// An untrained tree never recommends; neither do `Dislike` or `Unsure` leaves.
    #[must_use]
    pub fn predict(&self, item: &Item) -> bool {
        self.classify(item) == Some(Label::Like)
    }

    #[must_use]
    pub fn universe(&self) -> &Arc<AttributeUniverse> {
        &self.universe
    }

    #[must_use]
    pub fn is_trained(&self) -> bool {
        self.root.is_some()
    }

    #[must_use]
    pub fn root(&self) -> Option<&Node> {
        self.root.map(|id| &self.nodes[id.0])
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Name of the attribute a split node tests.
    #[must_use]
    pub fn split_attribute(&self, node: &Node) -> Option<&str> {
        match node {
            Node::Split { attribute, .. } => self.universe.name(*attribute),
            Node::Leaf(_) => None,
        }
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_leaf()).count()
    }

    /// Edges on the longest root-to-leaf path; 0 for an empty or single-leaf tree.
    #[must_use]
    pub fn depth(&self) -> usize {
        let Some(root) = self.root else {
            return 0;
        };
        let mut deepest = 0;
        let mut stack = vec![(root, 0)];
        while let Some((id, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            if let Some((absent, present)) = self.nodes[id.0].children() {
                stack.push((absent, depth + 1));
                stack.push((present, depth + 1));
            }
        }
        deepest
    }

    /// Diagnostic JSON view; not a stable serialization format.
    #[must_use]
    pub fn snapshot(&self) -> Value {
        json!({
            "attributes": self.universe.len(),
            "nodes": self.node_count(),
            "leaves": self.leaf_count(),
            "depth": self.depth(),
            "root": self.root.map_or(Value::Null, |root| self.snapshot_node(root)),
        })
    }

    fn snapshot_node(&self, id: NodeId) -> Value {
        match &self.nodes[id.0] {
            Node::Leaf(label) => json!({ "label": label }),
            Node::Split {
                attribute,
                absent,
                present,
            } => json!({
                "split": self.universe.names()[*attribute],
                "absent": self.snapshot_node(*absent),
                "present": self.snapshot_node(*present),
            }),
        }
    }

    fn token(&self, node: &Node) -> String {
        match node {
            Node::Leaf(label) => format!("<{label}>"),
            Node::Split { attribute, .. } => format!("<{}>", self.universe.names()[*attribute]),
        }
    }
}

impl Predictor for DecisionTree {
    fn predict(&self, item: &Item) -> bool {
        DecisionTree::predict(self, item)
    }

    fn retrain(&mut self, feedback: &Feedback) {
        self.learn_from_feedback(feedback);
    }

    fn snapshot(&self) -> Value {
        DecisionTree::snapshot(self)
    }
}

/// Level-by-level dump, one line per depth, nodes separated by tabs.
impl fmt::Display for DecisionTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(root) = self.root else {
            return f.write_str("<empty>");
        };
        let mut queue = VecDeque::from([(root, 0usize)]);
        let mut previous_depth = 0;
        while let Some((id, depth)) = queue.pop_front() {
            if depth > previous_depth {
                previous_depth = depth;
                writeln!(f)?;
            }
            let node = &self.nodes[id.0];
            write!(f, "{}\t", self.token(node))?;
            if let Some((absent, present)) = node.children() {
                queue.push_back((absent, depth + 1));
                queue.push_back((present, depth + 1));
            }
        }
        Ok(())
    }
}

struct Builder<'u> {
    universe: &'u AttributeUniverse,
    nodes: Vec<Node>,
}

impl Builder<'_> {
    /// Grows the subtree for a non-empty set of examples and returns its root.
    fn grow(&mut self, examples: Vec<Example<'_>>) -> NodeId {
        let tally = Tally::of(&examples);
        let Some(attribute) = self.choose_split(&examples, tally) else {
            return self.push(Node::Leaf(tally.label()));
        };

        let name = self.universe.names()[attribute].as_str();
        let (present, absent): (Vec<_>, Vec<_>) = examples
            .into_iter()
            .partition(|example| example.item.has_attribute(name));
        let absent = self.grow(absent);
        let present = self.grow(present);
        self.push(Node::Split {
            attribute,
            absent,
            present,
        })
    }

    /// Attribute with the lowest post-split entropy, first in universe order
    /// on ties, or `None` if the examples are homogeneous or nothing beats the
    /// parent's entropy.
    fn choose_split(&self, examples: &[Example<'_>], tally: Tally) -> Option<usize> {
        if tally.is_homogeneous() {
            return None;
        }
        let mut best = None;
        let mut min_entropy = tally.entropy();
        for (index, name) in self.universe.iter().enumerate() {
            let (absent, present) = Tally::split(examples, name);
            if absent.total() == 0 || present.total() == 0 {
                continue;
            }
            let entropy = post_split_entropy(absent, present);
            if entropy < min_entropy - ENTROPY_TOLERANCE {
                min_entropy = entropy;
                best = Some(index);
            }
        }
        best
    }

    fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }
}
