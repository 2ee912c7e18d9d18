//! Integration tests for cook-argument composition and change detection.

use hda_format::core::{decode_numeric, FileFormatArguments, TimeCaching};
use hda_format::prelude::*;
use hda_format::util::{DVec3, IVec2};

mod common;

fn format() -> HdaFileFormat {
    HdaFileFormat::new(common::ScriptedFactory::new())
}

fn args(pairs: &[(&str, &str)]) -> FileFormatArguments {
    pairs.iter().copied().collect()
}

#[test]
fn test_scalar_parm_scenario() {
    let ctx = LayerStackContext::from_layers(vec![MetadataLayer::new("root")
        .with("HDAParms", Dictionary::new().with("speed", 4.0))
        .with("HDAOptions", Dictionary::new())
        .with("HDATimeCacheMode", "none")]);

    let (composed, token) = format().compose_fields_for_file_format_arguments("fx.hda", &ctx);

    assert_eq!(
        composed,
        args(&[("numeric_speed", "4"), ("timecachemethod", "none")])
    );
    assert_eq!(token.time_caching(), Some(TimeCaching::None));
}

#[test]
fn test_mode_defaults_to_none() {
    let ctx = LayerStackContext::from_layers(vec![MetadataLayer::new("root")]);
    let (composed, token) = format().compose_fields_for_file_format_arguments("fx.hda", &ctx);

    assert_eq!(composed, args(&[("timecachemethod", "none")]));
    assert_eq!(token.time_caching(), Some(TimeCaching::None));
}

#[test]
fn test_range_scenario() {
    let ctx = LayerStackContext::from_layers(vec![MetadataLayer::new("root")
        .with("HDATimeCacheMode", "range")
        .with("HDATimeCacheStart", 1.0f32)
        .with("HDATimeCacheEnd", 24.0f32)
        .with("HDATimeCacheInterval", 0.5f32)]);

    let (composed, token) = format().compose_fields_for_file_format_arguments("fx.hda", &ctx);

    assert_eq!(composed.get("timecachemethod"), Some("range"));
    assert_eq!(composed.get("timecachestart"), Some("1"));
    assert_eq!(composed.get("timecacheend"), Some("24"));
    assert_eq!(composed.get("timecacheinterval"), Some("0.5"));
    assert_eq!(token.time_caching(), Some(TimeCaching::Range));
}

#[test]
fn test_range_without_start_emits_no_default() {
    let ctx = LayerStackContext::from_layers(vec![MetadataLayer::new("root")
        .with("HDATimeCacheMode", "range")
        .with("HDATimeCacheEnd", 24.0f32)]);

    let (composed, _) = format().compose_fields_for_file_format_arguments("fx.hda", &ctx);

    assert!(!composed.contains("timecachestart"));
    assert!(!composed.contains("timecacheinterval"));
    assert_eq!(composed.get("timecacheend"), Some("24"));
}

#[test]
fn test_range_fields_ignored_in_other_modes() {
    for mode in ["none", "continuous"] {
        let ctx = LayerStackContext::from_layers(vec![MetadataLayer::new("root")
            .with("HDATimeCacheMode", mode)
            .with("HDATimeCacheStart", 1.0f32)
            .with("HDATimeCacheEnd", 24.0f32)]);

        let (composed, _) = format().compose_fields_for_file_format_arguments("fx.hda", &ctx);
        assert_eq!(composed, args(&[("timecachemethod", mode)]));
    }
}

#[test]
fn test_full_composition_across_layers() {
    let ctx = LayerStackContext::from_layers(vec![
        MetadataLayer::new("shot")
            .with(
                "HDAParms",
                Dictionary::new()
                    .with("seed", 7)
                    .with("offset", DVec3::new(1.5, 2.0, -3.25)),
            )
            .with("HDAKeepEngineOpen", true),
        MetadataLayer::new("asset")
            .with(
                "HDAParms",
                Dictionary::new()
                    .with("seed", 1)
                    .with("file", "rocks.bgeo")
                    .with("res", IVec2::new(8, 4)),
            )
            .with("HDAOptions", Dictionary::new().with("quality", "high").with("lod", 2))
            .with("HDAAssetName", "Sop/studio::scatter::1.0"),
    ]);

    let (composed, _) = format().compose_fields_for_file_format_arguments("fx.hda", &ctx);

    assert_eq!(
        composed,
        args(&[
            ("assetname", "Sop/studio::scatter::1.0"),
            ("keepengineopen", "1"),
            ("numeric_offset", "1.5 2 -3.25"),
            ("numeric_res", "8 4"),
            ("numeric_seed", "7"),
            ("quality", "high"),
            ("string_file", "rocks.bgeo"),
            ("timecachemethod", "none"),
        ])
    );
}

#[test]
fn test_composition_is_deterministic() {
    let ctx = LayerStackContext::from_layers(vec![MetadataLayer::new("root")
        .with(
            "HDAParms",
            Dictionary::new()
                .with("z", 1.0)
                .with("a", vec![1.0f64, 2.0, 3.0])
                .with("m", "text"),
        )
        .with("HDAOptions", Dictionary::new().with("b", "1").with("a", "2"))
        .with("HDATimeCacheMode", "range")
        .with("HDATimeCacheStart", 0.0f32)]);

    let fmt = format();
    let (first, first_token) = fmt.compose_fields_for_file_format_arguments("fx.hda", &ctx);
    let (second, second_token) = fmt.compose_fields_for_file_format_arguments("fx.hda", &ctx);

    assert_eq!(first, second);
    assert_eq!(first.serialize(), second.serialize());
    assert_eq!(first_token, second_token);
}

#[test]
fn test_numeric_vector_round_trip() {
    let ctx = LayerStackContext::from_layers(vec![MetadataLayer::new("root")
        .with("HDAParms", Dictionary::new().with("p", DVec3::new(1.5, 2.0, -3.25)))]);

    let (composed, _) = format().compose_fields_for_file_format_arguments("fx.hda", &ctx);
    let encoded = composed.get("numeric_p").expect("numeric_p missing");
    let decoded = decode_numeric("numeric_p", encoded).expect("decode failed");

    let expected = [1.5, 2.0, -3.25];
    assert_eq!(decoded.len(), expected.len());
    for (a, b) in decoded.iter().zip(expected) {
        assert!((a - b).abs() < 1e-9);
    }
}

#[test]
fn test_affects_arguments_pairs_with_composition() {
    let fmt = format();
    let range_fields = ["HDATimeCacheStart", "HDATimeCacheEnd", "HDATimeCacheInterval"];
    let a = Value::Float(1.0);
    let b = Value::Float(5.0);

    for mode in ["none", "continuous", "range"] {
        let ctx = LayerStackContext::from_layers(vec![MetadataLayer::new("root")
            .with("HDATimeCacheMode", mode)
            .with("HDATimeCacheStart", 1.0f32)]);
        let (before, token) = fmt.compose_fields_for_file_format_arguments("fx.hda", &ctx);

        for field in range_fields {
            let predicted =
                fmt.can_field_change_affect_file_format_arguments(field, Some(&a), Some(&b), &token);

            // Recompose with the edit applied and compare.
            let mut edited = ctx.clone();
            edited
                .layer_mut("root")
                .expect("root layer")
                .set(field, 5.0f32);
            let (after, _) = fmt.compose_fields_for_file_format_arguments("fx.hda", &edited);

            assert_eq!(predicted, before != after, "mode {mode}, field {field}");
        }
    }
}

#[test]
fn test_affects_arguments_for_other_fields() {
    let fmt = format();
    let old = Value::Dictionary(Dictionary::new().with("speed", 4.0));
    let same = Value::Dictionary(Dictionary::new().with("speed", 4.0));
    let new = Value::Dictionary(Dictionary::new().with("speed", 5.0));

    for mode in [TimeCaching::None, TimeCaching::Continuous, TimeCaching::Range] {
        let token = DependencyContext::new(mode);
        assert!(fmt.can_field_change_affect_file_format_arguments("HDAParms", Some(&old), Some(&new), &token));
        assert!(!fmt.can_field_change_affect_file_format_arguments("HDAParms", Some(&old), Some(&same), &token));
        assert!(fmt.can_field_change_affect_file_format_arguments("HDAParms", None, Some(&new), &token));
        assert!(fmt.can_field_change_affect_file_format_arguments(
            "HDATimeCacheMode",
            Some(&Value::from("none")),
            Some(&Value::from("range")),
            &token
        ));
    }
}
