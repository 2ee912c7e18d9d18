//! Procedural engine integration.
//!
//! The engine is opaque: a session loads an asset library and cooks it
//! with a set of [`ImportOptions`], returning a [`CookedAsset`]. Sessions
//! come from an [`EngineFactory`] and may be retained across opens by the
//! [`SessionCache`].

mod options;
mod session;

pub use options::{ImportOptions, ParmValue};
pub use session::{
    SessionCache, SessionCacheConfig, SessionKey, DEFAULT_CACHE_CAPACITY, DEFAULT_IDLE_TIMEOUT,
    SESSION_CACHE_SIZE_ENV,
};

use std::path::Path;
use std::sync::Arc;

use crate::util::{Result, TimeCode, Value};

/// A live engine session with an asset library loaded.
pub trait Engine: Send + Sync {
    /// Instantiate and cook the asset at `path`.
    ///
    /// For time-cached modes the result carries one sample per cooked
    /// time; otherwise a single sample at `options.sample_time`.
    fn cook(&self, path: &Path, options: &ImportOptions) -> Result<CookedAsset>;

    /// False once the session has been torn down.
    fn is_alive(&self) -> bool {
        true
    }
}

/// Starts engine sessions.
pub trait EngineFactory: Send + Sync {
    /// Start a session and load the library at `path`.
    fn start_session(&self, path: &Path, asset_name: Option<&str>) -> Result<Arc<dyn Engine>>;

    /// Whether sessions may be kept open between opens.
    fn supports_session_retention(&self) -> bool {
        true
    }
}

/// Output of one cook.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CookedAsset {
    /// Fully qualified name of the asset that was instantiated.
    pub asset_name: String,
    /// Asset-level metadata (label, version, ...).
    pub metadata: Vec<(String, Value)>,
    /// Evaluated asset parameters.
    pub parms: Vec<CookedAttribute>,
    /// Cooked outputs, one prim subtree each.
    pub outputs: Vec<CookedOutput>,
}

impl CookedAsset {
    pub fn new(asset_name: impl Into<String>) -> Self {
        Self {
            asset_name: asset_name.into(),
            ..Default::default()
        }
    }

    /// Every time any attribute was sampled at, ascending and unique.
    pub fn sample_times(&self) -> Vec<TimeCode> {
        let mut times: Vec<TimeCode> = self
            .parms
            .iter()
            .chain(self.outputs.iter().flat_map(CookedOutput::all_attributes))
            .flat_map(|attr| attr.samples.iter().map(|(t, _)| *t))
            .collect();
        times.sort_by(|a, b| a.total_cmp(b));
        times.dedup_by(|a, b| crate::util::time_eq(*a, *b));
        times
    }
}

/// A named value sampled at one or more times.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CookedAttribute {
    pub name: String,
    pub samples: Vec<(TimeCode, Value)>,
}

impl CookedAttribute {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            samples: Vec::new(),
        }
    }

    /// Attribute with a single sample.
    pub fn constant(name: impl Into<String>, time: TimeCode, value: impl Into<Value>) -> Self {
        Self::new(name).with_sample(time, value)
    }

    pub fn with_sample(mut self, time: TimeCode, value: impl Into<Value>) -> Self {
        self.samples.push((time, value.into()));
        self
    }
}

/// One cooked output node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CookedOutput {
    pub name: String,
    /// Scene type of the prim this output becomes (`Mesh`, `Points`, ...).
    pub prim_type: String,
    pub attributes: Vec<CookedAttribute>,
    pub children: Vec<CookedOutput>,
}

impl CookedOutput {
    pub fn new(name: impl Into<String>, prim_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prim_type: prim_type.into(),
            ..Default::default()
        }
    }

    pub fn with_attribute(mut self, attribute: CookedAttribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn with_child(mut self, child: CookedOutput) -> Self {
        self.children.push(child);
        self
    }

    /// Attributes of this output and all descendants.
    pub fn all_attributes(&self) -> Box<dyn Iterator<Item = &CookedAttribute> + '_> {
        Box::new(
            self.attributes
                .iter()
                .chain(self.children.iter().flat_map(CookedOutput::all_attributes)),
        )
    }
}
