//! pipegraph - describe CI pipelines as dependency graphs
//!
//! A pipeline is built as an in-memory graph of steps and commands with
//! explicit dependency edges, optionally guarded by run-time conditionals.
//! [`evaluate`] resolves every conditional exactly once, honoring its
//! acceptance predicate; [`walk`] then traverses the resolved graph
//! dependency-first, letting mutation hooks rewrite nodes in place; finally
//! a [`Serializer`] turns the finalized graph into a configuration document.

pub mod core;
pub mod evaluation;
pub mod serializers;

// Re-export commonly used types
pub use crate::core::{Accept, Command, CommandStep, Conditional, Node, NodeId, Pipeline};
pub use crate::evaluation::{evaluate, walk, GraphError, Mutator};
pub use crate::serializers::{JsonSerializer, SerializeError, Serializer, YamlSerializer};
