//! Pipeline evaluator - drives conditional resolution across the graph

use crate::core::{NodeId, Pipeline};
use crate::evaluation::resolver::{resolve, ConditionalCache};
use crate::evaluation::GraphError;
use futures::future::BoxFuture;
use std::collections::HashSet;
use tracing::debug;

/// Resolve every conditional reachable from the pipeline
///
/// Top-level slots are resolved left to right: a rejected conditional is
/// removed from the sequence, an accepted one is replaced by its wrapped
/// step. Dependency edges are then rewritten the same way, transitively, so
/// that afterwards no conditional is reachable through the top-level
/// sequence or a dependency edge. Effect edges are ordering annotations and
/// are left as built; a predicate sitting behind one never runs here.
///
/// A predicate failure aborts evaluation and propagates; slots resolved
/// before the failure stay resolved.
pub async fn evaluate(pipeline: &mut Pipeline) -> Result<(), GraphError> {
    debug!("evaluating pipeline '{}'", pipeline.name);
    let mut cache = ConditionalCache::default();
    let mut resolved_steps = HashSet::new();

    let slots = pipeline.steps().to_vec();
    let mut retained = Vec::with_capacity(slots.len());
    for slot in slots {
        if let Some(step) = resolve(pipeline, &mut cache, slot).await? {
            retained.push(step);
        }
    }
    pipeline.set_steps(retained.clone());

    for step in retained {
        resolve_edges(pipeline, &mut cache, &mut resolved_steps, step).await?;
    }

    debug!(
        "pipeline '{}' evaluated, {} top-level steps",
        pipeline.name,
        pipeline.steps().len()
    );
    Ok(())
}

/// Rewrite a step's dependency edge set, recursing into every retained edge
/// target. Each step is rewritten at most once per evaluation.
fn resolve_edges<'a>(
    pipeline: &'a mut Pipeline,
    cache: &'a mut ConditionalCache,
    resolved_steps: &'a mut HashSet<NodeId>,
    id: NodeId,
) -> BoxFuture<'a, Result<(), GraphError>> {
    Box::pin(async move {
        if !resolved_steps.insert(id) {
            return Ok(());
        }

        // Resolution only hands back step handles.
        let Some(step) = pipeline.step(id) else {
            return Ok(());
        };
        let snapshot = step.dependencies.clone();

        let dependencies = resolve_edge_set(pipeline, cache, snapshot).await?;

        // Two-phase update: the rebuilt set replaces the original wholesale,
        // never touching a set that is being iterated.
        if let Some(step) = pipeline.step_mut(id) {
            step.dependencies = dependencies.clone();
        }

        for edge in dependencies {
            resolve_edges(pipeline, cache, resolved_steps, edge).await?;
        }
        Ok(())
    })
}

/// Resolve a snapshot of one edge set, dropping rejected entries and
/// deduplicating entries that resolve to the same step
async fn resolve_edge_set(
    pipeline: &Pipeline,
    cache: &mut ConditionalCache,
    edges: Vec<NodeId>,
) -> Result<Vec<NodeId>, GraphError> {
    let mut rebuilt = Vec::with_capacity(edges.len());
    for edge in edges {
        if let Some(step) = resolve(pipeline, cache, edge).await? {
            if !rebuilt.contains(&step) {
                rebuilt.push(step);
            }
        }
    }
    Ok(rebuilt)
}
