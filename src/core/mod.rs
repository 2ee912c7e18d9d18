//! Core layer - fundamental types shared by composition and loading.
//!
//! This module provides:
//! - [`tokens`] - metadata field names and cook-argument keys
//! - [`FileFormatArguments`] - the cook-argument map and its encodings
//! - [`TimeCaching`] / [`TimeCacheRange`] / [`DependencyContext`]
//! - [`TimeSamples`] - ordered time-sampled values
//! - [`PrimMetadata`] - key-value metadata for prims
//! - [`SdfPath`] - prim and property paths

pub mod tokens;
mod args;
mod time_caching;
mod time_samples;
mod metadata;
mod path;

pub use args::{
    decode_numeric, decode_time, encode_numeric, FileFormatArguments, FORMAT_ARGS_DELIMITER,
};
pub use time_caching::{DependencyContext, TimeCacheRange, TimeCaching, MAX_RANGE_SAMPLES};
pub use time_samples::TimeSamples;
pub use metadata::PrimMetadata;
pub use path::{is_identifier, is_property_name, make_valid_identifier, SdfPath};
