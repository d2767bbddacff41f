//! Conditional resolution with per-node memoization

use crate::core::{Node, NodeId, Pipeline};
use crate::evaluation::GraphError;
use std::collections::HashMap;
use tracing::debug;

/// Memo of conditional outcomes, keyed by the conditional's handle
///
/// `Some(step)` records acceptance, `None` records rejection. One cache
/// instance is shared across a whole [`evaluate`](super::evaluate) call, so a
/// conditional reachable from several edges runs its predicate at most once.
#[derive(Debug, Default)]
pub(crate) struct ConditionalCache {
    outcomes: HashMap<NodeId, Option<NodeId>>,
}

/// Resolve one potential-step handle
///
/// Steps pass through unchanged. An uncached conditional runs its acceptance
/// predicate: acceptance yields the wrapped step handle, rejection yields
/// `None` (the slot or edge is dropped). A predicate failure propagates and
/// leaves no cache entry behind, so a later attempt re-runs the predicate.
pub(crate) async fn resolve(
    pipeline: &Pipeline,
    cache: &mut ConditionalCache,
    id: NodeId,
) -> Result<Option<NodeId>, GraphError> {
    let conditional = match pipeline.node(id) {
        Node::Step(_) => return Ok(Some(id)),
        Node::Conditional(conditional) => conditional,
    };

    if let Some(&outcome) = cache.outcomes.get(&id) {
        return Ok(outcome);
    }

    let accepted = conditional.accept().await.map_err(GraphError::Predicate)?;
    let outcome = if accepted {
        Some(conditional.wrapped())
    } else {
        None
    };
    debug!("resolved conditional {}: accepted = {}", id, accepted);
    cache.outcomes.insert(id, outcome);
    Ok(outcome)
}
