//! Pipeline graph model

use crate::core::{CommandStep, Conditional};
use std::fmt;

/// Stable handle to a node in a pipeline's arena
///
/// Handles are minted by the owning pipeline and are only meaningful there.
/// All caches of the evaluation and traversal machinery are keyed by handles,
/// so node identity survives in-place mutation of the node's fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// A node in the pipeline graph: a concrete step, or a conditional
/// placeholder awaiting resolution
#[derive(Debug)]
pub enum Node {
    Step(CommandStep),
    Conditional(Conditional),
}

/// A named pipeline: the arena owning every node of the graph, plus the
/// ordered top-level sequence
///
/// Top-level order matters for output determinism only; execution order is
/// governed by dependency edges.
#[derive(Debug)]
pub struct Pipeline {
    /// Pipeline name
    pub name: String,

    /// Node arena; a `NodeId` indexes into this vector
    nodes: Vec<Node>,

    /// Top-level sequence, in insertion order
    steps: Vec<NodeId>,
}

impl Pipeline {
    /// Create an empty pipeline
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: Vec::new(),
            steps: Vec::new(),
        }
    }

    /// Register a step in the arena and return its handle
    ///
    /// Registration alone does not place the step in the top-level sequence;
    /// use [`add`](Self::add) for that. A step referenced only through
    /// dependency edges never needs `add`.
    pub fn add_step(&mut self, step: CommandStep) -> NodeId {
        self.push(Node::Step(step))
    }

    /// Register a conditional in the arena and return its handle
    pub fn add_conditional(&mut self, conditional: Conditional) -> NodeId {
        self.push(Node::Conditional(conditional))
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Append a registered node to the top-level sequence
    pub fn add(&mut self, id: NodeId) -> &mut Self {
        self.steps.push(id);
        self
    }

    /// Top-level sequence, in insertion order
    pub fn steps(&self) -> &[NodeId] {
        &self.steps
    }

    pub(crate) fn set_steps(&mut self, steps: Vec<NodeId>) {
        self.steps = steps;
    }

    /// Look up a node. Panics on a handle minted by another pipeline.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Mutable node lookup. Panics on a handle minted by another pipeline.
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Borrow the step behind a handle, if it is one
    pub fn step(&self, id: NodeId) -> Option<&CommandStep> {
        match self.node(id) {
            Node::Step(step) => Some(step),
            Node::Conditional(_) => None,
        }
    }

    /// Mutably borrow the step behind a handle, if it is one
    pub fn step_mut(&mut self, id: NodeId) -> Option<&mut CommandStep> {
        match self.node_mut(id) {
            Node::Step(step) => Some(step),
            Node::Conditional(_) => None,
        }
    }
}
