//! Graph walker - dependency-first traversal with mutation hooks

use crate::core::{Command, CommandStep, Node, NodeId, Pipeline};
use crate::evaluation::GraphError;
use async_trait::async_trait;
use futures::future::BoxFuture;
use std::collections::HashSet;
use tracing::trace;

/// Mutation hooks applied during a walk
///
/// Every hook defaults to a no-op; implementors override the ones they need.
/// A hook mutates the node it is handed in place (including swapping out
/// sub-elements such as a command inside a step's sequence) and must not
/// start another walk or evaluation of the same pipeline.
#[async_trait]
pub trait Mutator: Send {
    /// Runs once, after every top-level subtree has been visited
    async fn pipeline_fn(&mut self, pipeline: &mut Pipeline) -> anyhow::Result<()> {
        let _ = pipeline;
        Ok(())
    }

    /// Runs once per distinct step, after the step's dependencies have been
    /// visited and mutated
    async fn step_fn(&mut self, step: &mut CommandStep) -> anyhow::Result<()> {
        let _ = step;
        Ok(())
    }

    /// Runs for each command of a step, in sequence order, after that step's
    /// `step_fn`
    async fn command_fn(&mut self, command: &mut Command) -> anyhow::Result<()> {
        let _ = command;
        Ok(())
    }
}

/// Walk a fully evaluated pipeline dependency-first
///
/// A step's dependencies are visited (and mutated) before the step itself,
/// and no step is visited twice, so diamond-shaped graphs see their shared
/// dependency exactly once. Encountering a conditional is fatal: the caller
/// skipped [`evaluate`](crate::evaluation::evaluate) or ran it on a different
/// graph. A dependency cycle is reported as
/// [`GraphError::DependencyCycle`] instead of recursing without bound.
pub async fn walk<M: Mutator>(
    pipeline: &mut Pipeline,
    mutator: &mut M,
) -> Result<(), GraphError> {
    let mut visited = HashSet::new();
    let mut visiting = HashSet::new();

    for slot in pipeline.steps().to_vec() {
        visit(pipeline, mutator, &mut visited, &mut visiting, slot).await?;
    }

    mutator
        .pipeline_fn(pipeline)
        .await
        .map_err(GraphError::Mutator)?;
    Ok(())
}

fn visit<'a, M: Mutator>(
    pipeline: &'a mut Pipeline,
    mutator: &'a mut M,
    visited: &'a mut HashSet<NodeId>,
    visiting: &'a mut HashSet<NodeId>,
    id: NodeId,
) -> BoxFuture<'a, Result<(), GraphError>> {
    Box::pin(async move {
        if matches!(pipeline.node(id), Node::Conditional(_)) {
            return Err(GraphError::Unresolved);
        }
        if visited.contains(&id) {
            return Ok(());
        }
        if !visiting.insert(id) {
            return Err(GraphError::DependencyCycle(step_label(pipeline, id)));
        }

        trace!("visiting {}", step_label(pipeline, id));

        // Snapshot of the edges as they are at visit time.
        let dependencies = pipeline
            .step(id)
            .map(|step| step.dependencies.clone())
            .unwrap_or_default();
        for dep in dependencies {
            visit(pipeline, mutator, visited, visiting, dep).await?;
        }

        if let Node::Step(step) = pipeline.node_mut(id) {
            mutator.step_fn(step).await.map_err(GraphError::Mutator)?;
            for command in &mut step.commands {
                mutator
                    .command_fn(command)
                    .await
                    .map_err(GraphError::Mutator)?;
            }
        }

        visiting.remove(&id);
        // Marked only after the hooks have finished, so a partially mutated
        // step is never treated as done.
        visited.insert(id);
        Ok(())
    })
}

/// Label used in cycle reports and trace output: the step key when present,
/// the handle otherwise
fn step_label(pipeline: &Pipeline, id: NodeId) -> String {
    match pipeline.step(id).and_then(|step| step.key.as_deref()) {
        Some(key) => key.to_string(),
        None => id.to_string(),
    }
}
