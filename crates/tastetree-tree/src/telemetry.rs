//! Optional structured logging, enabled by the `telemetry` feature.

#[cfg(feature = "telemetry")]
pub(crate) fn trained(examples: usize, nodes: usize, depth: usize) {
    tracing::debug!(examples, nodes, depth, "decision tree rebuilt");
}

#[cfg(not(feature = "telemetry"))]
pub(crate) fn trained(_examples: usize, _nodes: usize, _depth: usize) {}
