//! Scene-description documents.
//!
//! - [`AbstractData`] - the query interface a host layer reads through
//! - [`HdaFileData`] - document materialized from a cooked asset
//! - [`FilePrim`] / [`FileProp`] - primitives and attributes
//! - [`Layer`] - minimal host layer owning backing data

mod file_data;
mod layer;
mod prim;

pub use file_data::HdaFileData;
pub use layer::Layer;
pub use prim::{FilePrim, FileProp};

use crate::core::SdfPath;
use crate::util::{TimeCode, Value};

/// Kind of spec found at a path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpecType {
    PseudoRoot,
    Prim,
    Attribute,
}

// Field names served by documents.
pub const TYPE_NAME_FIELD: &str = "typeName";
pub const SPECIFIER_FIELD: &str = "specifier";
pub const PRIM_CHILDREN_FIELD: &str = "primChildren";
pub const PROPERTIES_FIELD: &str = "properties";
pub const CUSTOM_DATA_FIELD: &str = "customData";
pub const DEFAULT_FIELD: &str = "default";
pub const CUSTOM_FIELD: &str = "custom";

/// Read interface for layer backing data.
pub trait AbstractData: Send + Sync {
    fn spec_type(&self, path: &SdfPath) -> Option<SpecType>;

    fn has_spec(&self, path: &SdfPath) -> bool {
        self.spec_type(path).is_some()
    }

    /// Names of the fields authored on a spec.
    fn list_fields(&self, path: &SdfPath) -> Vec<String>;

    fn get_field(&self, path: &SdfPath, field: &str) -> Option<Value>;

    /// Union of sample times across every attribute, ascending.
    fn list_all_time_samples(&self) -> Vec<TimeCode>;

    fn list_time_samples_for_path(&self, path: &SdfPath) -> Vec<TimeCode>;

    /// Value authored exactly at `time`.
    fn query_time_sample(&self, path: &SdfPath, time: TimeCode) -> Option<Value>;

    fn bracketing_time_samples_for_path(
        &self,
        path: &SdfPath,
        time: TimeCode,
    ) -> Option<(TimeCode, TimeCode)>;

    /// Resolved attribute value at `time`: the held time sample when the
    /// attribute is time sampled, its default otherwise.
    fn value_at(&self, path: &SdfPath, time: TimeCode) -> Option<Value> {
        match self.bracketing_time_samples_for_path(path, time) {
            Some((lower, _)) => self.query_time_sample(path, lower),
            None => self.get_field(path, DEFAULT_FIELD),
        }
    }
}
