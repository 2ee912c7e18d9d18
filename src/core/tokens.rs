//! Fixed names shared with authored scene files and plugin registration.
//!
//! Metadata field names must match the plugin declaration produced by
//! [`crate::format::plug_info`]. Cook-argument keys and value encodings
//! are persisted in authored layers and must never change.

// === Metadata fields ===

/// Dictionary of asset parameter values.
pub const PARM_DICT_FIELD: &str = "HDAParms";
/// Dictionary of loader options passed through as cook arguments.
pub const OPTION_DICT_FIELD: &str = "HDAOptions";
/// Asset name to instantiate from a library holding several definitions.
pub const ASSET_NAME_FIELD: &str = "HDAAssetName";
/// Time-cache mode string: `none`, `continuous` or `range`.
pub const TIME_CACHE_MODE_FIELD: &str = "HDATimeCacheMode";
pub const TIME_CACHE_START_FIELD: &str = "HDATimeCacheStart";
pub const TIME_CACHE_END_FIELD: &str = "HDATimeCacheEnd";
pub const TIME_CACHE_INTERVAL_FIELD: &str = "HDATimeCacheInterval";
/// Whether the engine session outlives the open that started it.
pub const KEEP_ENGINE_OPEN_FIELD: &str = "HDAKeepEngineOpen";

// === Cook-argument keys ===

pub const PARM_STRING_PREFIX: &str = "string_";
pub const PARM_NUMERIC_PREFIX: &str = "numeric_";
/// Separator between the components of a numeric tuple.
pub const PARM_SEPARATOR: &str = " ";

pub const ASSET_NAME_ARG: &str = "assetname";
pub const TIME_CACHE_METHOD_ARG: &str = "timecachemethod";
pub const TIME_CACHE_START_ARG: &str = "timecachestart";
pub const TIME_CACHE_END_ARG: &str = "timecacheend";
pub const TIME_CACHE_INTERVAL_ARG: &str = "timecacheinterval";
pub const KEEP_ENGINE_OPEN_ARG: &str = "keepengineopen";
/// Sample time used for values that are not time-cached.
pub const SAMPLE_TIME_ARG: &str = "t";

/// Every control key the composer may emit.
pub const CONTROL_ARGS: &[&str] = &[
    ASSET_NAME_ARG,
    TIME_CACHE_METHOD_ARG,
    TIME_CACHE_START_ARG,
    TIME_CACHE_END_ARG,
    TIME_CACHE_INTERVAL_ARG,
    KEEP_ENGINE_OPEN_ARG,
];

// === Format identity ===

pub const FORMAT_ID: &str = "hda";
pub const FORMAT_VERSION: &str = "1.0";
pub const FORMAT_TARGET: &str = "usd";

/// Recognized extensions, including the non-commercial and limited
/// commercial library variants. Matched case-sensitively.
pub const EXTENSIONS: &[&str] = &["hda", "otl", "hdanc", "otlnc", "hdalc", "otllc"];
