//! Change detection for composed cook arguments.
//!
//! Must mirror [`super::compose`]: a field that composition only reads
//! under some condition has to short-circuit here under the same
//! condition, using the dependency token composition produced.

use crate::core::tokens::{TIME_CACHE_END_FIELD, TIME_CACHE_INTERVAL_FIELD, TIME_CACHE_START_FIELD};
use crate::core::{DependencyContext, TimeCaching};
use crate::util::Value;

/// Fields composition reads only in range caching mode.
pub const RANGE_ONLY_FIELDS: &[&str] = &[
    TIME_CACHE_START_FIELD,
    TIME_CACHE_END_FIELD,
    TIME_CACHE_INTERVAL_FIELD,
];

/// Whether changing `field` from `old_value` to `new_value` can change
/// the composed cook arguments.
///
/// `None` stands for "no opinion authored".
pub fn can_field_change_affect_file_format_arguments(
    field: &str,
    old_value: Option<&Value>,
    new_value: Option<&Value>,
    dependency: &DependencyContext,
) -> bool {
    // Range settings are inert unless composition ran in range mode.
    if RANGE_ONLY_FIELDS.contains(&field) {
        if let Some(mode) = dependency.time_caching() {
            if mode != TimeCaching::Range {
                return false;
            }
        }
    }
    old_value != new_value
}
