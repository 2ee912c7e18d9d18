//! Cook-argument composition.
//!
//! Flattens the layered metadata fields into the string map that
//! identifies one cook of an asset, and records the time-caching mode as
//! the dependency token for [`super::dependency`].

use tracing::{debug, warn};

use crate::context::DynamicFileFormatContext;
use crate::core::tokens::{
    ASSET_NAME_ARG, ASSET_NAME_FIELD, KEEP_ENGINE_OPEN_ARG, KEEP_ENGINE_OPEN_FIELD,
    OPTION_DICT_FIELD, PARM_DICT_FIELD, PARM_NUMERIC_PREFIX, PARM_STRING_PREFIX,
    TIME_CACHE_END_ARG, TIME_CACHE_END_FIELD, TIME_CACHE_INTERVAL_ARG, TIME_CACHE_INTERVAL_FIELD,
    TIME_CACHE_METHOD_ARG, TIME_CACHE_MODE_FIELD, TIME_CACHE_START_ARG, TIME_CACHE_START_FIELD,
};
use crate::core::{encode_numeric, DependencyContext, FileFormatArguments, TimeCaching};
use crate::util::Value;

/// Compose cook arguments from the metadata visible in `context`.
pub fn compose_fields_for_file_format_arguments(
    asset_path: &str,
    context: &dyn DynamicFileFormatContext,
) -> (FileFormatArguments, DependencyContext) {
    let mut args = FileFormatArguments::new();

    // Asset parameters can be arbitrary, so they travel in one dictionary.
    if let Some(Value::Dictionary(parms)) = context.compose_value(PARM_DICT_FIELD) {
        for (name, value) in parms.iter() {
            match value {
                Value::String(s) => {
                    args.insert(format!("{PARM_STRING_PREFIX}{name}"), s.clone());
                }
                _ => add_numeric_parm(&mut args, name, value),
            }
        }
    }

    // Only string options are passed through.
    if let Some(Value::Dictionary(opts)) = context.compose_value(OPTION_DICT_FIELD) {
        for (name, value) in opts.iter() {
            if let Value::String(s) = value {
                args.insert(name, s.clone());
            }
        }
    }

    if let Some(Value::String(name)) = context.compose_value(ASSET_NAME_FIELD) {
        args.insert(ASSET_NAME_ARG, name);
    }

    let mut cache_mode = TimeCaching::None;
    match context.compose_value(TIME_CACHE_MODE_FIELD) {
        Some(Value::String(mode)) => {
            if let Some(parsed) = TimeCaching::parse(&mode) {
                cache_mode = parsed;
            }
            if cache_mode == TimeCaching::Range {
                add_range_field(&mut args, context, TIME_CACHE_START_FIELD, TIME_CACHE_START_ARG);
                add_range_field(&mut args, context, TIME_CACHE_END_FIELD, TIME_CACHE_END_ARG);
                add_range_field(
                    &mut args,
                    context,
                    TIME_CACHE_INTERVAL_FIELD,
                    TIME_CACHE_INTERVAL_ARG,
                );
            }
            args.insert(TIME_CACHE_METHOD_ARG, mode);
        }
        _ => {
            args.insert(TIME_CACHE_METHOD_ARG, TimeCaching::None.as_str());
        }
    }

    if let Some(Value::Bool(keep)) = context.compose_value(KEEP_ENGINE_OPEN_FIELD) {
        args.insert(KEEP_ENGINE_OPEN_ARG, if keep { "1" } else { "0" });
    }

    debug!("Composed {} cook arguments for {asset_path}", args.len());

    // Read back by can_field_change_affect_file_format_arguments.
    (args, DependencyContext::new(cache_mode))
}

/// Add a numeric parameter as `numeric_<name> = "v0 v1 ..."`.
///
/// Coercions are tried in a fixed order and the first that applies
/// wins. Values that are not numeric are dropped with a warning.
fn add_numeric_parm(args: &mut FileFormatArguments, name: &str, value: &Value) {
    let encoded = if let Some(v) = value.cast_double() {
        encode_numeric(&[v])
    } else if let Some(v) = value.cast_vec2d() {
        encode_numeric(&v.to_array())
    } else if let Some(v) = value.cast_vec3d() {
        encode_numeric(&v.to_array())
    } else if let Some(v) = value.cast_vec4d() {
        encode_numeric(&v.to_array())
    } else if let Some(v) = value.cast_double_array() {
        encode_numeric(&v)
    } else if let Some(v) = value.cast_int64_array() {
        encode_numeric(&v)
    } else {
        warn!("Unexpected data type '{}' for parameter '{name}'.", value.type_name());
        return;
    };

    args.insert(format!("{PARM_NUMERIC_PREFIX}{name}"), encoded);
}

/// Stringify a float range field when authored with the right type.
fn add_range_field(
    args: &mut FileFormatArguments,
    context: &dyn DynamicFileFormatContext,
    field: &str,
    key: &str,
) {
    if let Some(v) = context.compose_value(field).as_ref().and_then(Value::as_float) {
        args.insert(key, v.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{LayerStackContext, MetadataLayer};
    use crate::util::{DVec2, DVec4, Dictionary, IVec3, Vec3};

    fn compose_one(layer: MetadataLayer) -> (FileFormatArguments, DependencyContext) {
        let ctx = LayerStackContext::from_layers(vec![layer]);
        compose_fields_for_file_format_arguments("asset.hda", &ctx)
    }

    fn parms(dict: Dictionary) -> FileFormatArguments {
        compose_one(MetadataLayer::new("l").with(PARM_DICT_FIELD, dict)).0
    }

    #[test]
    fn test_numeric_encodings() {
        let args = parms(
            Dictionary::new()
                .with("scalar", 4.0)
                .with("count", 12)
                .with("toggle", true)
                .with("uv", DVec2::new(0.5, 0.25))
                .with("pos", Vec3::new(1.5, 2.0, -3.25))
                .with("res", IVec3::new(64, 32, 16))
                .with("color", DVec4::new(1.0, 0.0, 0.0, 1.0))
                .with("weights", vec![0.1f64, 0.2])
                .with("ids", vec![3i64, -4]),
        );

        assert_eq!(args.get("numeric_scalar"), Some("4"));
        assert_eq!(args.get("numeric_count"), Some("12"));
        assert_eq!(args.get("numeric_toggle"), Some("1"));
        assert_eq!(args.get("numeric_uv"), Some("0.5 0.25"));
        assert_eq!(args.get("numeric_pos"), Some("1.5 2 -3.25"));
        assert_eq!(args.get("numeric_res"), Some("64 32 16"));
        assert_eq!(args.get("numeric_color"), Some("1 0 0 1"));
        assert_eq!(args.get("numeric_weights"), Some("0.1 0.2"));
        assert_eq!(args.get("numeric_ids"), Some("3 -4"));
    }

    #[test]
    fn test_string_parm() {
        let args = parms(Dictionary::new().with("file", "leaf.png"));
        assert_eq!(args.get("string_file"), Some("leaf.png"));
        assert!(!args.contains("numeric_file"));
    }

    #[test]
    fn test_uncoercible_parms_are_dropped() {
        let args = parms(
            Dictionary::new()
                .with("names", vec!["a".to_string()])
                .with("nested", Dictionary::new().with("x", 1.0))
                .with("ok", 1.0),
        );
        assert!(!args.contains("numeric_names"));
        assert!(!args.contains("string_names"));
        assert!(!args.contains("numeric_nested"));
        assert_eq!(args.get("numeric_ok"), Some("1"));
    }

    #[test]
    fn test_only_string_options_pass_through() {
        let (args, _) = compose_one(
            MetadataLayer::new("l").with(
                OPTION_DICT_FIELD,
                Dictionary::new()
                    .with("quality", "high")
                    .with("threads", 4)
                    .with("verbose", true),
            ),
        );
        assert_eq!(args.get("quality"), Some("high"));
        assert!(!args.contains("threads"));
        assert!(!args.contains("verbose"));
    }

    #[test]
    fn test_mistyped_fields_are_absent() {
        let (args, token) = compose_one(
            MetadataLayer::new("l")
                .with(PARM_DICT_FIELD, "not a dict")
                .with(ASSET_NAME_FIELD, 3)
                .with(TIME_CACHE_MODE_FIELD, 2.0)
                .with(KEEP_ENGINE_OPEN_FIELD, "yes"),
        );
        let expected: FileFormatArguments = [("timecachemethod", "none")].into_iter().collect();
        assert_eq!(args, expected);
        assert_eq!(token.time_caching(), Some(TimeCaching::None));
    }

    #[test]
    fn test_unknown_mode_passes_through() {
        let (args, token) = compose_one(
            MetadataLayer::new("l")
                .with(TIME_CACHE_MODE_FIELD, "sometimes")
                .with(TIME_CACHE_START_FIELD, 1.0f32),
        );
        assert_eq!(args.get("timecachemethod"), Some("sometimes"));
        assert!(!args.contains("timecachestart"));
        assert_eq!(token.time_caching(), Some(TimeCaching::None));
    }

    #[test]
    fn test_keep_engine_open() {
        let (args, _) = compose_one(MetadataLayer::new("l").with(KEEP_ENGINE_OPEN_FIELD, true));
        assert_eq!(args.get("keepengineopen"), Some("1"));
        let (args, _) = compose_one(MetadataLayer::new("l").with(KEEP_ENGINE_OPEN_FIELD, false));
        assert_eq!(args.get("keepengineopen"), Some("0"));
    }

    #[test]
    fn test_range_fields_need_float() {
        let (args, token) = compose_one(
            MetadataLayer::new("l")
                .with(TIME_CACHE_MODE_FIELD, "range")
                .with(TIME_CACHE_START_FIELD, 1.5f32)
                .with(TIME_CACHE_END_FIELD, 10)
                .with(TIME_CACHE_INTERVAL_FIELD, 0.25),
        );
        assert_eq!(token.time_caching(), Some(TimeCaching::Range));
        assert_eq!(args.get("timecachestart"), Some("1.5"));
        assert!(!args.contains("timecacheend"));
        assert_eq!(args.get("timecacheinterval"), Some("0.25"));
    }
}
