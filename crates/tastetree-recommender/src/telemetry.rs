//! Recommender events. Structured via `tracing` with the `telemetry` feature,
//! otherwise warnings go to stderr and debug events are dropped.

use tastetree_core::UserId;

#[cfg(feature = "telemetry")]
pub(crate) fn rejected_feedback(user: UserId, item: &str) {
    tracing::warn!(%user, item, "feedback rejected: unknown user");
}

#[cfg(not(feature = "telemetry"))]
pub(crate) fn rejected_feedback(user: UserId, item: &str) {
    eprintln!("Warning: feedback on {item} rejected: unknown user {user}");
}

#[cfg(feature = "telemetry")]
pub(crate) fn short_batch(user: UserId, found: usize, draws: usize) {
    tracing::debug!(%user, found, draws, "draw budget exhausted before the limit");
}

#[cfg(not(feature = "telemetry"))]
pub(crate) fn short_batch(_user: UserId, _found: usize, _draws: usize) {}

#[cfg(feature = "telemetry")]
pub(crate) fn retrained(user: UserId, ratings: usize) {
    tracing::debug!(%user, ratings, "retrained after feedback");
}

#[cfg(not(feature = "telemetry"))]
pub(crate) fn retrained(_user: UserId, _ratings: usize) {}
