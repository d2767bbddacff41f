//! Pipeline evaluation and traversal
//!
//! [`evaluate`] resolves the conditionals guarding a pipeline's top-level
//! slots and dependency edges into concrete steps (or removes them), after
//! which [`walk`] can traverse the dependency graph dependency-first,
//! applying mutation hooks once per distinct step.

pub mod evaluator;
mod resolver;
pub mod walker;

pub use evaluator::evaluate;
pub use walker::{walk, Mutator};

use thiserror::Error;

/// Errors surfaced by evaluation and traversal
#[derive(Debug, Error)]
pub enum GraphError {
    /// A conditional survived into a walk or serialization; the caller
    /// skipped evaluation or ran it on a different graph
    #[error("encountered conditional during walk, run evaluate first")]
    Unresolved,

    /// The dependency graph is not a DAG
    #[error("cycle detected in dependency graph involving step '{0}'")]
    DependencyCycle(String),

    /// An acceptance predicate failed during resolution
    #[error("acceptance predicate failed")]
    Predicate(#[source] anyhow::Error),

    /// A mutation hook failed during a walk
    #[error("mutator failed")]
    Mutator(#[source] anyhow::Error),
}
