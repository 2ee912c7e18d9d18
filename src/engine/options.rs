//! Engine options decoded from cook arguments.
//!
//! The inverse of argument composition: typed configuration rebuilt from
//! the string map stored on the layer.

use tracing::warn;

use crate::core::tokens::{
    ASSET_NAME_ARG, KEEP_ENGINE_OPEN_ARG, SAMPLE_TIME_ARG, TIME_CACHE_END_ARG,
    TIME_CACHE_INTERVAL_ARG, TIME_CACHE_METHOD_ARG, TIME_CACHE_START_ARG,
};
use crate::core::{decode_numeric, decode_time, FileFormatArguments, TimeCacheRange, TimeCaching};
use crate::util::TimeCode;

/// Asset parameter value as the engine receives it.
#[derive(Clone, Debug, PartialEq)]
pub enum ParmValue {
    String(String),
    /// Tuple components in order.
    Numeric(Vec<f64>),
}

/// Typed configuration for one cook.
#[derive(Clone, Debug, PartialEq)]
pub struct ImportOptions {
    /// Asset to instantiate; `None` picks the library's first definition.
    pub asset_name: Option<String>,
    pub time_caching: TimeCaching,
    /// Only consulted for [`TimeCaching::Range`].
    pub range: TimeCacheRange,
    pub keep_engine_open: bool,
    /// Time for values that are not time-cached.
    pub sample_time: TimeCode,
    /// Parameter overrides, sorted by name.
    pub parms: Vec<(String, ParmValue)>,
    /// Pass-through loader options, sorted by key.
    pub options: Vec<(String, String)>,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            asset_name: None,
            time_caching: TimeCaching::None,
            range: TimeCacheRange::default(),
            keep_engine_open: false,
            sample_time: 0.0,
            parms: Vec::new(),
            options: Vec::new(),
        }
    }
}

impl ImportOptions {
    /// Decode cook arguments.
    ///
    /// Malformed values are reported and fall back to defaults; decoding
    /// never fails.
    pub fn from_args(args: &FileFormatArguments) -> Self {
        let mut opts = Self::default();

        opts.asset_name = args
            .get(ASSET_NAME_ARG)
            .filter(|name| !name.is_empty())
            .map(str::to_string);

        if let Some(method) = args.get(TIME_CACHE_METHOD_ARG) {
            opts.time_caching = TimeCaching::parse(method).unwrap_or_else(|| {
                warn!("Unknown time cache method '{method}', caching disabled");
                TimeCaching::None
            });
        }

        if opts.time_caching == TimeCaching::Range {
            let start = time_arg(args, TIME_CACHE_START_ARG).unwrap_or(opts.range.start);
            opts.range = TimeCacheRange {
                start,
                end: time_arg(args, TIME_CACHE_END_ARG).unwrap_or(start),
                interval: time_arg(args, TIME_CACHE_INTERVAL_ARG).unwrap_or(opts.range.interval),
            };
        }

        if let Some(keep) = args.get(KEEP_ENGINE_OPEN_ARG) {
            opts.keep_engine_open = match keep {
                "1" => true,
                "0" => false,
                other => {
                    warn!("Invalid {KEEP_ENGINE_OPEN_ARG} value '{other}'");
                    false
                }
            };
        }

        if let Some(t) = time_arg(args, SAMPLE_TIME_ARG) {
            opts.sample_time = t;
        }

        for (name, value) in args.string_parms() {
            opts.parms.push((name.to_string(), ParmValue::String(value.to_string())));
        }
        for (name, value) in args.numeric_parms() {
            let key = format!("{}{name}", crate::core::tokens::PARM_NUMERIC_PREFIX);
            match decode_numeric(&key, value) {
                Ok(values) => opts.parms.push((name.to_string(), ParmValue::Numeric(values))),
                Err(e) => warn!("Skipping parameter '{name}': {e}"),
            }
        }
        opts.parms.sort_by(|a, b| a.0.cmp(&b.0));

        opts.options = args
            .options()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        opts
    }

    /// Times the engine must cook at.
    ///
    /// `None` for continuous caching, where the engine chooses.
    pub fn cook_times(&self) -> Option<Vec<TimeCode>> {
        match self.time_caching {
            TimeCaching::None => Some(vec![self.sample_time]),
            TimeCaching::Continuous => None,
            TimeCaching::Range => Some(self.range.times()),
        }
    }

    /// Look up a parameter override.
    pub fn parm(&self, name: &str) -> Option<&ParmValue> {
        self.parms.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Look up a pass-through option.
    pub fn option(&self, key: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

fn time_arg(args: &FileFormatArguments, key: &str) -> Option<TimeCode> {
    let value = args.get(key)?;
    match decode_time(key, value) {
        Ok(t) => Some(t),
        Err(e) => {
            warn!("Ignoring {e}");
            None
        }
    }
}
