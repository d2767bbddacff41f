//! Serializers over a finalized pipeline graph
//!
//! Serialization is pure formatting: the graph must already be evaluated
//! (and typically walked) before it is turned into a document.

pub mod json;
pub mod yaml;

pub use json::JsonSerializer;
pub use yaml::YamlSerializer;

use crate::core::Pipeline;
use crate::evaluation::GraphError;
use thiserror::Error;

/// Errors surfaced while emitting a pipeline document
#[derive(Debug, Error)]
pub enum SerializeError {
    /// The graph still contains conditionals
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("JSON serialization failed")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization failed")]
    Yaml(#[from] serde_yaml::Error),
}

/// Turns a finalized pipeline into an output document
pub trait Serializer {
    type Output;

    fn serialize(&self, pipeline: &Pipeline) -> Result<Self::Output, SerializeError>;
}
