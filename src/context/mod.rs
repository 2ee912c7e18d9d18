//! Layered metadata composition.
//!
//! A dynamic file format reads its inputs from metadata authored across
//! a stack of layers. Opinions in stronger (nearer) layers override
//! weaker ones. Dictionary-valued fields compose key by key, recursively.

use std::collections::HashMap;

use crate::util::Value;

/// Read-only view of the metadata fields visible to a dynamic file format.
pub trait DynamicFileFormatContext {
    /// Strongest composed opinion for `field`, or `None` when no layer
    /// authors it.
    fn compose_value(&self, field: &str) -> Option<Value>;
}

/// Metadata fields authored in a single layer.
#[derive(Clone, Debug, Default)]
pub struct MetadataLayer {
    name: String,
    fields: HashMap<String, Value>,
}

impl MetadataLayer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Author a field value.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(field, value);
        self
    }

    /// Remove an authored opinion.
    pub fn clear(&mut self, field: &str) -> Option<Value> {
        self.fields.remove(field)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}

/// Ordered stack of layers, strongest first.
#[derive(Clone, Debug, Default)]
pub struct LayerStackContext {
    layers: Vec<MetadataLayer>,
}

impl LayerStackContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a stack from layers ordered strongest first.
    pub fn from_layers(layers: Vec<MetadataLayer>) -> Self {
        Self { layers }
    }

    /// Append a layer weaker than every existing one.
    pub fn push_weaker(&mut self, layer: MetadataLayer) {
        self.layers.push(layer);
    }

    /// Insert a layer stronger than every existing one.
    pub fn push_stronger(&mut self, layer: MetadataLayer) {
        self.layers.insert(0, layer);
    }

    pub fn layers(&self) -> &[MetadataLayer] {
        &self.layers
    }

    pub fn layer_mut(&mut self, name: &str) -> Option<&mut MetadataLayer> {
        self.layers.iter_mut().find(|l| l.name == name)
    }
}

impl DynamicFileFormatContext for LayerStackContext {
    fn compose_value(&self, field: &str) -> Option<Value> {
        let mut opinions = self.layers.iter().filter_map(|layer| layer.get(field));
        let strongest = opinions.next()?;

        let Value::Dictionary(strongest) = strongest else {
            return Some(strongest.clone());
        };

        let mut composed = strongest.clone();
        for weaker in opinions {
            // A non-dictionary opinion under a dictionary is ignored.
            if let Value::Dictionary(weaker) = weaker {
                composed.over(weaker);
            }
        }
        Some(Value::Dictionary(composed))
    }
}
