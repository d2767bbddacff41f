//! Conditional node model

use crate::core::NodeId;
use anyhow::Result;
use async_trait::async_trait;
use std::fmt;

/// Acceptance predicate deciding whether a conditional's wrapped step joins
/// the graph
///
/// The predicate may perform arbitrary asynchronous work (external lookups,
/// for example) and is awaited to completion before its outcome is used.
#[async_trait]
pub trait Accept: Send + Sync {
    async fn accept(&self) -> Result<bool>;
}

/// A deferred node wrapping a step behind an acceptance predicate
///
/// Not itself a step: it must be resolved by
/// [`evaluate`](crate::evaluation::evaluate) before the graph can be walked
/// or serialized. The wrapped handle must reference a step node of the same
/// pipeline. Two conditionals wrapping the same step are distinct nodes and
/// are resolved independently.
pub struct Conditional {
    wrapped: NodeId,
    predicate: Box<dyn Accept>,
}

impl Conditional {
    /// Wrap a registered step behind a predicate
    pub fn new(wrapped: NodeId, predicate: impl Accept + 'static) -> Self {
        Self {
            wrapped,
            predicate: Box::new(predicate),
        }
    }

    /// Handle of the wrapped step
    pub fn wrapped(&self) -> NodeId {
        self.wrapped
    }

    /// Run the acceptance predicate
    pub async fn accept(&self) -> Result<bool> {
        self.predicate.accept().await
    }
}

impl fmt::Debug for Conditional {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Conditional")
            .field("wrapped", &self.wrapped)
            .finish_non_exhaustive()
    }
}
