//! Step domain model

use crate::core::{Command, NodeId};

/// An ordered sequence of commands executed as a unit
///
/// Edge lists reference other nodes of the owning pipeline and may point at
/// conditionals. [`evaluate`](crate::evaluation::evaluate) rewrites the
/// dependency list so it only points at steps; effect edges are ordering
/// annotations and are left as built. Both lists keep insertion order and
/// never hold the same handle twice.
#[derive(Debug, Clone, Default)]
pub struct CommandStep {
    /// Optional key other steps and documents can reference
    pub key: Option<String>,

    /// Commands executed in order
    pub commands: Vec<Command>,

    /// Steps that must run before this one
    pub dependencies: Vec<NodeId>,

    /// Side-effect-only ordering edges (secondary edge kind)
    pub effect_dependencies: Vec<NodeId>,
}

impl CommandStep {
    /// Create a step from its command sequence
    pub fn new(commands: Vec<Command>) -> Self {
        Self {
            key: None,
            commands,
            dependencies: Vec::new(),
            effect_dependencies: Vec::new(),
        }
    }

    /// Set the step key
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Add a dependency edge. Duplicate edges are ignored.
    pub fn depends_on(mut self, dep: NodeId) -> Self {
        if !self.dependencies.contains(&dep) {
            self.dependencies.push(dep);
        }
        self
    }

    /// Add an effect-only ordering edge. Duplicate edges are ignored.
    pub fn depends_on_effect(mut self, dep: NodeId) -> Self {
        if !self.effect_dependencies.contains(&dep) {
            self.effect_dependencies.push(dep);
        }
        self
    }
}
