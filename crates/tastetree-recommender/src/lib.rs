#![warn(clippy::unwrap_used, clippy::expect_used)]

//! One decision tree per user, and the queries built on top of them.
//!
//! The [`Recommender`] owns every user together with the tree learned from
//! that user's feedback. Feedback only ever arrives through
//! [`Recommender::record_feedback`], which retrains the affected trees in
//! full before returning, so later queries always see the current verdicts.

pub mod error;
mod telemetry;

pub use error::{RecommendError, Result};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tastetree_core::{AttributeUniverse, Item, Predictor, User, UserId};
use tastetree_tree::DecisionTree;

/// Upper bound on items returned by [`Recommender::recommend_to_user`].
pub const DEFAULT_MAX_RECOMMENDATIONS: usize = 5;

#[derive(Debug)]
struct Profile {
    user: User,
    tree: DecisionTree,
}

/// Shape of one user's tree, for reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeSummary {
    pub user: UserId,
    pub likes: usize,
    pub dislikes: usize,
    pub nodes: usize,
    pub leaves: usize,
    pub depth: usize,
}

/// Maps users to their trees and the catalog to candidate recommendations.
#[derive(Debug)]
pub struct Recommender<R = StdRng> {
    universe: Arc<AttributeUniverse>,
    profiles: HashMap<UserId, Profile>,
    catalog: Vec<Arc<Item>>,
    max_recommendations: usize,
    rng: R,
}

impl Recommender<StdRng> {
    /// Trains a tree for every user; sampling is seeded from OS entropy.
    pub fn new<U, I>(universe: Arc<AttributeUniverse>, users: U, items: I) -> Result<Self>
    where
        U: IntoIterator<Item = User>,
        I: IntoIterator<Item = Arc<Item>>,
    {
        Self::with_rng(universe, users, items, StdRng::from_entropy())
    }

    /// Like [`Recommender::new`] with reproducible sampling.
    pub fn seeded<U, I>(
        universe: Arc<AttributeUniverse>,
        users: U,
        items: I,
        seed: u64,
    ) -> Result<Self>
    where
        U: IntoIterator<Item = User>,
        I: IntoIterator<Item = Arc<Item>>,
    {
        Self::with_rng(universe, users, items, StdRng::seed_from_u64(seed))
    }
}

impl<R> Recommender<R> {
    /// Trains a tree for every user and draws candidates from `rng`.
    ///
    /// Catalog entries sharing a key are kept once, first occurrence wins.
    pub fn with_rng<U, I>(
        universe: Arc<AttributeUniverse>,
        users: U,
        items: I,
        rng: R,
    ) -> Result<Self>
    where
        U: IntoIterator<Item = User>,
        I: IntoIterator<Item = Arc<Item>>,
    {
        let mut profiles = HashMap::new();
        for user in users {
            let id = user.id();
            if profiles.contains_key(&id) {
                return Err(RecommendError::DuplicateUser(id));
            }
            let tree = DecisionTree::train(Arc::clone(&universe), user.feedback());
            profiles.insert(id, Profile { user, tree });
        }

        let mut seen = HashSet::new();
        let catalog = items
            .into_iter()
            .filter(|item| seen.insert(item.key().to_string()))
            .collect();

        Ok(Self {
            universe,
            profiles,
            catalog,
            max_recommendations: DEFAULT_MAX_RECOMMENDATIONS,
            rng,
        })
    }

    /// Caps how many items one call to `recommend_to_user` may return.
    #[must_use]
    pub fn with_max_recommendations(mut self, limit: usize) -> Self {
        self.max_recommendations = limit;
        self
    }

    #[must_use]
    pub fn max_recommendations(&self) -> usize {
        self.max_recommendations
    }

    #[must_use]
    pub fn universe(&self) -> &Arc<AttributeUniverse> {
        &self.universe
    }

    #[must_use]
    pub fn catalog(&self) -> &[Arc<Item>] {
        &self.catalog
    }

    /// Every known user id, ascending.
    #[must_use]
    pub fn user_ids(&self) -> Vec<UserId> {
        let mut ids: Vec<UserId> = self.profiles.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    #[must_use]
    pub fn user(&self, id: UserId) -> Option<&User> {
        self.profiles.get(&id).map(|profile| &profile.user)
    }

    #[must_use]
    pub fn tree(&self, id: UserId) -> Option<&DecisionTree> {
        self.profiles.get(&id).map(|profile| &profile.tree)
    }

    /// Users whose tree would recommend `item`. Exhaustive over all users.
    #[must_use]
    pub fn recommend_item_to_users(&self, item: &Item) -> BTreeSet<UserId> {
        self.profiles
            .iter()
            .filter(|(_, profile)| profile.tree.predict(item))
            .map(|(id, _)| *id)
            .collect()
    }

    /// Overwrites each user's verdict on `item` and retrains their tree.
    ///
    /// All ids are checked before anything changes; one unknown id rejects
    /// the whole call.
    pub fn record_feedback(
        &mut self,
        users: &[UserId],
        item: &Arc<Item>,
        liked: bool,
    ) -> Result<()> {
        if let Some(missing) = users.iter().find(|id| !self.profiles.contains_key(*id)) {
            telemetry::rejected_feedback(*missing, item.key());
            return Err(RecommendError::UnknownUser(*missing));
        }

        let targets: BTreeSet<UserId> = users.iter().copied().collect();
        for id in targets {
            let Some(Profile { user, tree }) = self.profiles.get_mut(&id) else {
                continue;
            };
            if liked {
                user.like(Arc::clone(item));
            } else {
                user.dislike(Arc::clone(item));
            }
            tree.retrain(user.feedback());
            telemetry::retrained(id, user.feedback().len());
        }
        Ok(())
    }

    pub fn users_liked_item(&mut self, users: &[UserId], item: &Arc<Item>) -> Result<()> {
        self.record_feedback(users, item, true)
    }

    pub fn users_disliked_item(&mut self, users: &[UserId], item: &Arc<Item>) -> Result<()> {
        self.record_feedback(users, item, false)
    }

    /// Tree shape per user, ordered by user id.
    #[must_use]
    pub fn summaries(&self) -> Vec<TreeSummary> {
        self.user_ids()
            .into_iter()
            .filter_map(|id| self.profiles.get(&id))
            .map(|profile| TreeSummary {
                user: profile.user.id(),
                likes: profile.user.feedback().likes(),
                dislikes: profile.user.feedback().dislikes(),
                nodes: profile.tree.node_count(),
                leaves: profile.tree.leaf_count(),
                depth: profile.tree.depth(),
            })
            .collect()
    }
}

impl<R: Rng> Recommender<R> {
    /// Up to `max_recommendations` unrated items the user's tree likes.
    ///
    /// Draws uniformly from the catalog, with replacement, at most
    /// `catalog.len()` times. Best effort: a sparse catalog can yield fewer
    /// items than the limit even when more positives exist.
    pub fn recommend_to_user(&mut self, id: UserId) -> Result<BTreeSet<Arc<Item>>> {
        let profile = self
            .profiles
            .get(&id)
            .ok_or(RecommendError::UnknownUser(id))?;

        let mut picked = BTreeSet::new();
        let budget = self.catalog.len();
        let mut draws = 0;
        while draws < budget && picked.len() < self.max_recommendations {
            draws += 1;
            let item = &self.catalog[self.rng.gen_range(0..budget)];
            if !profile.user.feedback().contains(item) && profile.tree.predict(item) {
                picked.insert(Arc::clone(item));
            }
        }

        if picked.len() < self.max_recommendations {
            telemetry::short_batch(id, picked.len(), draws);
        }
        Ok(picked)
    }
}

/// Dumps every user's tree, ordered by user id.
impl<R> fmt::Display for Recommender<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for id in self.user_ids() {
            if let Some(profile) = self.profiles.get(&id) {
                write!(f, "\n{} decision tree:\n{}\n", profile.user, profile.tree)?;
            }
        }
        Ok(())
    }
}
