//! Primitives and properties of a loaded document.

use crate::core::{PrimMetadata, SdfPath, TimeSamples};
use crate::util::{Dictionary, TimeCode, Value};

/// One attribute on a prim.
#[derive(Clone, Debug, PartialEq)]
pub struct FileProp {
    type_name: String,
    default: Option<Value>,
    time_samples: TimeSamples,
    custom: bool,
}

impl FileProp {
    /// Attribute with a single default-time value.
    pub fn constant(value: Value) -> Self {
        Self {
            type_name: value.type_name().to_string(),
            default: Some(value),
            time_samples: TimeSamples::new(),
            custom: false,
        }
    }

    /// Attribute with time samples and no default.
    pub fn time_sampled(type_name: impl Into<String>, samples: TimeSamples) -> Self {
        Self {
            type_name: type_name.into(),
            default: None,
            time_samples: samples,
            custom: false,
        }
    }

    pub fn with_custom(mut self, custom: bool) -> Self {
        self.custom = custom;
        self
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn time_samples(&self) -> &TimeSamples {
        &self.time_samples
    }

    pub fn is_time_sampled(&self) -> bool {
        !self.time_samples.is_empty()
    }

    pub fn is_custom(&self) -> bool {
        self.custom
    }

    /// Resolved value at `time`: held time samples, else the default.
    pub fn value_at(&self, time: TimeCode) -> Option<&Value> {
        self.time_samples.value_at(time).or(self.default.as_ref())
    }
}

/// A prim in a loaded document. The pseudo-root doubles as the
/// layer-info prim.
#[derive(Clone, Debug, PartialEq)]
pub struct FilePrim {
    path: SdfPath,
    type_name: String,
    child_names: Vec<String>,
    prop_names: Vec<String>,
    props: Vec<FileProp>,
    metadata: PrimMetadata,
    custom_data: PrimMetadata,
}

impl FilePrim {
    pub fn new(path: SdfPath, type_name: impl Into<String>) -> Self {
        Self {
            path,
            type_name: type_name.into(),
            child_names: Vec::new(),
            prop_names: Vec::new(),
            props: Vec::new(),
            metadata: PrimMetadata::new(),
            custom_data: PrimMetadata::new(),
        }
    }

    pub fn path(&self) -> &SdfPath {
        &self.path
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn child_names(&self) -> &[String] {
        &self.child_names
    }

    pub fn add_child(&mut self, name: impl Into<String>) {
        self.child_names.push(name.into());
    }

    /// Property names in authoring order.
    pub fn prop_names(&self) -> &[String] {
        &self.prop_names
    }

    pub fn prop(&self, name: &str) -> Option<&FileProp> {
        let idx = self.prop_names.iter().position(|n| n == name)?;
        self.props.get(idx)
    }

    /// Add a property. An existing property with the same name is
    /// overwritten in place.
    pub fn add_property(&mut self, name: impl Into<String>, prop: FileProp) -> &mut FileProp {
        let name = name.into();
        let idx = match self.prop_names.iter().position(|n| *n == name) {
            Some(idx) => {
                self.props[idx] = prop;
                idx
            }
            None => {
                self.prop_names.push(name);
                self.props.push(prop);
                self.props.len() - 1
            }
        };
        &mut self.props[idx]
    }

    pub fn props(&self) -> impl Iterator<Item = (&str, &FileProp)> {
        self.prop_names.iter().map(String::as_str).zip(&self.props)
    }

    pub fn metadata(&self) -> &PrimMetadata {
        &self.metadata
    }

    /// Add metadata unless the key is already set.
    pub fn add_metadata(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.metadata.add(key, value);
    }

    pub fn replace_metadata(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.metadata.set(key, value);
    }

    pub fn custom_data(&self) -> &PrimMetadata {
        &self.custom_data
    }

    pub fn add_custom_data(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.custom_data.add(key, value);
    }

    pub fn custom_data_dictionary(&self) -> Dictionary {
        self.custom_data.to_dictionary()
    }
}
