//! JSON document serializer

use crate::core::{Node, NodeId, Pipeline};
use crate::evaluation::GraphError;
use crate::serializers::{SerializeError, Serializer};
use serde::Serialize;
use std::collections::HashSet;

/// Emits a pipeline as a `serde_json::Value` document
///
/// Steps appear dependency-first (a step's dependencies precede it in the
/// emitted list) and each distinct step appears once, however many edges
/// reach it.
#[derive(Debug, Clone, Default)]
pub struct JsonSerializer {
    explicit_dependencies: bool,
}

impl JsonSerializer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a `key` for every step and a `depends_on` list naming the keys
    /// of its dependencies. Keyless steps get a stable generated key.
    pub fn with_explicit_dependencies(mut self, explicit: bool) -> Self {
        self.explicit_dependencies = explicit;
        self
    }
}

/// Step entry of the emitted document
#[derive(Debug, Serialize)]
struct StepDoc {
    #[serde(skip_serializing_if = "Option::is_none")]
    key: Option<String>,

    command: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    depends_on: Vec<String>,

    #[serde(skip_serializing_if = "is_false")]
    allow_dependency_failure: bool,
}

#[derive(Debug, Serialize)]
struct PipelineDoc {
    name: String,
    steps: Vec<StepDoc>,
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

impl Serializer for JsonSerializer {
    type Output = serde_json::Value;

    fn serialize(&self, pipeline: &Pipeline) -> Result<Self::Output, SerializeError> {
        let order = collect_steps(pipeline)?;
        let steps = order
            .into_iter()
            .map(|id| self.step_doc(pipeline, id))
            .collect::<Result<Vec<_>, SerializeError>>()?;
        let doc = PipelineDoc {
            name: pipeline.name.clone(),
            steps,
        };
        Ok(serde_json::to_value(doc)?)
    }
}

impl JsonSerializer {
    fn step_doc(&self, pipeline: &Pipeline, id: NodeId) -> Result<StepDoc, SerializeError> {
        let step = pipeline.step(id).ok_or(GraphError::Unresolved)?;

        let key = if self.explicit_dependencies {
            Some(step_key(pipeline, id)?)
        } else {
            step.key.clone()
        };

        let depends_on = if self.explicit_dependencies {
            let mut keys = Vec::with_capacity(
                step.dependencies.len() + step.effect_dependencies.len(),
            );
            for &dep in &step.dependencies {
                keys.push(step_key(pipeline, dep)?);
            }
            for &effect in &step.effect_dependencies {
                keys.push(step_key(pipeline, effect_target(pipeline, effect))?);
            }
            keys
        } else {
            Vec::new()
        };

        Ok(StepDoc {
            key,
            command: step.commands.iter().map(|c| c.to_string()).collect(),
            depends_on,
            allow_dependency_failure: self.explicit_dependencies
                && !step.effect_dependencies.is_empty(),
        })
    }
}

/// Key under which a step is referenced in the document: the user key when
/// present, a handle-derived one otherwise
fn step_key(pipeline: &Pipeline, id: NodeId) -> Result<String, SerializeError> {
    let step = pipeline.step(id).ok_or(GraphError::Unresolved)?;
    Ok(step
        .key
        .clone()
        .unwrap_or_else(|| format!("step-{}", id.index())))
}

/// Target a document edge points at
///
/// Evaluation leaves effect edges as built, so one may still carry a
/// conditional here; the document names its wrapped step without running the
/// predicate.
fn effect_target(pipeline: &Pipeline, id: NodeId) -> NodeId {
    match pipeline.node(id) {
        Node::Step(_) => id,
        Node::Conditional(conditional) => conditional.wrapped(),
    }
}

/// Dependency-first ordering of every step reachable from the top level,
/// effect-edge targets included
fn collect_steps(pipeline: &Pipeline) -> Result<Vec<NodeId>, SerializeError> {
    let mut order = Vec::new();
    let mut seen = HashSet::new();
    for &slot in pipeline.steps() {
        push_postorder(pipeline, &mut seen, &mut order, slot)?;
    }
    Ok(order)
}

fn push_postorder(
    pipeline: &Pipeline,
    seen: &mut HashSet<NodeId>,
    order: &mut Vec<NodeId>,
    id: NodeId,
) -> Result<(), SerializeError> {
    if !seen.insert(id) {
        return Ok(());
    }
    let step = pipeline.step(id).ok_or(GraphError::Unresolved)?;
    for &dep in &step.dependencies {
        push_postorder(pipeline, seen, order, dep)?;
    }
    for &effect in &step.effect_dependencies {
        push_postorder(pipeline, seen, order, effect_target(pipeline, effect))?;
    }
    order.push(id);
    Ok(())
}
