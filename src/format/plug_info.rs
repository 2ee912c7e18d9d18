//! Plugin declaration.
//!
//! A host discovers which metadata fields a dynamic format consumes from
//! a JSON declaration shipped next to the plugin. The field names here
//! are the same constants composition reads, so the two cannot drift.

use serde_json::{json, Map, Value as JsonValue};

use crate::core::tokens::{
    ASSET_NAME_FIELD, EXTENSIONS, FORMAT_ID, FORMAT_TARGET, KEEP_ENGINE_OPEN_FIELD,
    OPTION_DICT_FIELD, PARM_DICT_FIELD, TIME_CACHE_END_FIELD, TIME_CACHE_INTERVAL_FIELD,
    TIME_CACHE_MODE_FIELD, TIME_CACHE_START_FIELD,
};

/// One metadata field consumed by argument composition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: &'static str,
    /// Value type as the host declares it.
    pub type_name: &'static str,
    pub doc: &'static str,
}

/// Every metadata field the format consumes.
pub fn metadata_fields() -> &'static [FieldDecl] {
    const FIELDS: &[FieldDecl] = &[
        FieldDecl {
            name: PARM_DICT_FIELD,
            type_name: "dictionary",
            doc: "Asset parameter values keyed by parameter name.",
        },
        FieldDecl {
            name: OPTION_DICT_FIELD,
            type_name: "dictionary",
            doc: "Loader options; string values only.",
        },
        FieldDecl {
            name: ASSET_NAME_FIELD,
            type_name: "string",
            doc: "Asset definition to instantiate from the library.",
        },
        FieldDecl {
            name: TIME_CACHE_MODE_FIELD,
            type_name: "string",
            doc: "Time caching: none, continuous or range.",
        },
        FieldDecl {
            name: TIME_CACHE_START_FIELD,
            type_name: "float",
            doc: "First cooked time in range mode.",
        },
        FieldDecl {
            name: TIME_CACHE_END_FIELD,
            type_name: "float",
            doc: "Last cooked time in range mode.",
        },
        FieldDecl {
            name: TIME_CACHE_INTERVAL_FIELD,
            type_name: "float",
            doc: "Step between cooked times in range mode.",
        },
        FieldDecl {
            name: KEEP_ENGINE_OPEN_FIELD,
            type_name: "bool",
            doc: "Keep the engine session open after loading.",
        },
    ];
    FIELDS
}

/// Render the plugin declaration.
pub fn plug_info(library_path: &str) -> JsonValue {
    let mut metadata = Map::new();
    for field in metadata_fields() {
        metadata.insert(
            field.name.to_string(),
            json!({
                "appliesTo": ["prims"],
                "displayGroup": "Core",
                "documentation": field.doc,
                "type": field.type_name,
            }),
        );
    }

    json!({
        "Plugins": [{
            "Info": {
                "SdfMetadata": metadata,
                "Types": {
                    "HdaFileFormat": {
                        "bases": ["SdfFileFormat"],
                        "displayName": "Houdini Digital Asset",
                        "extensions": EXTENSIONS,
                        "formatId": FORMAT_ID,
                        "primary": true,
                        "target": FORMAT_TARGET,
                    }
                }
            },
            "LibraryPath": library_path,
            "Name": "hda_format",
            "Type": "library",
        }]
    })
}
