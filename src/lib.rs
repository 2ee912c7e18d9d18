//! # hda-format
//!
//! Dynamic scene-description file format for procedural digital assets
//! (`.hda`, `.otl` and their non-commercial/limited variants).
//!
//! Referencing an asset library from a scene does not read a file: the
//! format composes a set of cook arguments from layered metadata, hands
//! them to a procedural engine, and translates the cooked result into a
//! typed, time-sampled scene document.
//!
//! ## Modules
//!
//! - [`util`] - Values, errors, math re-exports
//! - [`core`] - Cook arguments, time caching, time samples, paths
//! - [`context`] - Layered metadata composition
//! - [`format`] - The file format: composition, change detection, reading
//! - [`engine`] - Engine traits, import options, retained sessions
//! - [`data`] - Scene documents and the host layer
//! - [`logging`] - Optional `tracing` subscriber setup
//!
//! ## Example
//!
//! ```ignore
//! use hda_format::prelude::*;
//!
//! let ctx = LayerStackContext::from_layers(vec![
//!     MetadataLayer::new("shot").with("HDAParms", Dictionary::new().with("speed", 4.0)),
//! ]);
//! let format = HdaFileFormat::new(factory);
//! let (args, dependency) = format.compose_fields_for_file_format_arguments("fx.hda", &ctx);
//! let mut layer = Layer::with_arguments("fx.hda", args);
//! format.read(&mut layer, Path::new("/lib/fx.hda"), false)?;
//! ```

pub mod util;
pub mod core;
pub mod context;
pub mod engine;
pub mod data;
pub mod format;
pub mod logging;

// Re-export commonly used types
pub use util::{Dictionary, Error, Result, Value};
pub use format::HdaFileFormat;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{Dictionary, Error, Result, TimeCode, Value};
    pub use crate::core::{
        DependencyContext, FileFormatArguments, SdfPath, TimeCacheRange, TimeCaching,
    };
    pub use crate::context::{DynamicFileFormatContext, LayerStackContext, MetadataLayer};
    pub use crate::data::{AbstractData, HdaFileData, Layer, SpecType};
    pub use crate::engine::{
        CookedAsset, CookedAttribute, CookedOutput, Engine, EngineFactory, ImportOptions,
        ParmValue, SessionCache, SessionCacheConfig,
    };
    pub use crate::format::{DynamicFileFormat, FileFormat, FormatRegistry, HdaFileFormat};
}
