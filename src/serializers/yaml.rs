//! YAML serializer

use crate::core::Pipeline;
use crate::serializers::{JsonSerializer, SerializeError, Serializer};

/// Emits a pipeline as a YAML string, reusing the JSON document shape
#[derive(Debug, Clone, Default)]
pub struct YamlSerializer {
    json: JsonSerializer,
}

impl YamlSerializer {
    pub fn new() -> Self {
        Self::default()
    }

    /// See [`JsonSerializer::with_explicit_dependencies`]
    pub fn with_explicit_dependencies(mut self, explicit: bool) -> Self {
        self.json = self.json.with_explicit_dependencies(explicit);
        self
    }
}

impl Serializer for YamlSerializer {
    type Output = String;

    fn serialize(&self, pipeline: &Pipeline) -> Result<Self::Output, SerializeError> {
        let doc = self.json.serialize(pipeline)?;
        Ok(serde_yaml::to_string(&doc)?)
    }
}
