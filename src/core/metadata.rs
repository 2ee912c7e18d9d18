//! Metadata for scene primitives.
//!
//! Key-value pairs attached to prims and the layer-info prim, kept in
//! insertion order.

use smallvec::SmallVec;
use std::fmt;

use crate::util::{Dictionary, Value};

/// Metadata storage - ordered key-value pairs.
///
/// Uses SmallVec optimization for common case of few entries.
#[derive(Clone, Default, PartialEq)]
pub struct PrimMetadata {
    entries: SmallVec<[(String, Value); 4]>,
}

impl PrimMetadata {
    /// Create empty metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a metadata value, replacing an existing one.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();

        for (k, v) in &mut self.entries {
            if k == &key {
                *v = value;
                return;
            }
        }
        self.entries.push((key, value));
    }

    /// Set a value only if the key is not present yet.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        if !self.contains(&key) {
            self.entries.push((key, value.into()));
        }
    }

    /// Get a metadata value by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Remove a key and return its value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Collect into a dictionary value.
    pub fn to_dictionary(&self) -> Dictionary {
        self.entries.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    // === Common metadata keys ===

    pub const DEFAULT_PRIM_KEY: &'static str = "defaultPrim";
    pub const START_TIME_CODE_KEY: &'static str = "startTimeCode";
    pub const END_TIME_CODE_KEY: &'static str = "endTimeCode";
    pub const CUSTOM_LAYER_DATA_KEY: &'static str = "customLayerData";
    pub const KIND_KEY: &'static str = "kind";
}

impl fmt::Debug for PrimMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(k, v)| (k, v)))
            .finish()
    }
}
