//! Document materialized from a cooked asset.
//!
//! Opening drives the engine: cook arguments are decoded into
//! [`ImportOptions`], a session is acquired and the asset cooked, and
//! the result becomes a prim tree:
//!
//! ```text
//! /                      layer info: defaultPrim, time codes, customLayerData
//! /<asset>               Xform, one `parms:<name>` attribute per parameter
//! /<asset>/<output>...   one subtree per cooked output
//! ```
//!
//! Numeric values cooked under a time-caching mode become time samples;
//! everything else gets a single default taken at the sample time.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};

use tracing::{debug, info_span, warn};

use super::{
    AbstractData, FilePrim, FileProp, SpecType, CUSTOM_DATA_FIELD, CUSTOM_FIELD, DEFAULT_FIELD,
    PRIM_CHILDREN_FIELD, PROPERTIES_FIELD, SPECIFIER_FIELD, TYPE_NAME_FIELD,
};
use crate::core::{
    make_valid_identifier, FileFormatArguments, PrimMetadata, SdfPath, TimeCaching, TimeSamples,
};
use crate::engine::{
    CookedAsset, CookedAttribute, CookedOutput, Engine, ImportOptions, SessionCache, SessionKey,
};
use crate::util::{time_eq, Dictionary, Error, Result, TimeCode, Value};

/// Namespace for asset parameter attributes.
pub const PARMS_NAMESPACE: &str = "parms";
/// Prim type for the asset prim and outputs without a type.
pub const XFORM_TYPE: &str = "Xform";

/// Scene-description document for one instantiation of an asset.
pub struct HdaFileData {
    cook_args: FileFormatArguments,
    options: ImportOptions,
    resolved_path: Option<PathBuf>,
    prims: BTreeMap<SdfPath, FilePrim>,
    cooked: Option<CookedAsset>,
    sample_time: TimeCode,
    session: Option<Weak<dyn Engine>>,
}

impl HdaFileData {
    /// Create an empty document for the given cook arguments.
    pub fn new(cook_args: FileFormatArguments) -> Self {
        let options = ImportOptions::from_args(&cook_args);
        let sample_time = options.sample_time;
        Self {
            cook_args,
            options,
            resolved_path: None,
            prims: BTreeMap::new(),
            cooked: None,
            sample_time,
            session: None,
        }
    }

    /// Cook the asset at `resolved_path` and populate the document.
    ///
    /// On failure the document is left exactly as it was.
    pub fn open(&mut self, resolved_path: &Path, sessions: &SessionCache) -> Result<()> {
        let _span = info_span!("hda_open", path = %resolved_path.display()).entered();

        if !resolved_path.is_file() {
            return Err(Error::AssetNotFound(resolved_path.to_path_buf()));
        }

        let keep_open = self.options.keep_engine_open;
        let key = SessionKey::new(resolved_path, self.options.asset_name.as_deref());
        let session = sessions.acquire(&key, keep_open)?;

        let cooked = session.cook(resolved_path, &self.options);
        let weak = Arc::downgrade(&session);
        sessions.release(key, session, keep_open);
        let cooked = cooked?;

        let prims = build_prims(&cooked, &self.options, &self.cook_args, resolved_path, self.sample_time)?;
        debug!(
            "Loaded {} with {} prims ({} cached times)",
            cooked.asset_name,
            prims.len(),
            cooked.sample_times().len()
        );

        self.prims = prims;
        self.cooked = Some(cooked);
        self.resolved_path = Some(resolved_path.to_path_buf());
        self.session = Some(weak);
        Ok(())
    }

    /// Move the sample time used for values that are not time sampled.
    ///
    /// Time-cached documents serve every time from their samples. Without
    /// time caching a new time needs a recook, which fails with
    /// [`Error::SessionLost`] once the engine session has been released.
    /// Returns true when the asset was recooked.
    pub fn set_sample_time(&mut self, time: TimeCode) -> Result<bool> {
        let Some(path) = self.resolved_path.clone() else {
            self.sample_time = time;
            self.options.sample_time = time;
            return Ok(false);
        };

        if self.options.time_caching.is_animated() {
            if let Some(cooked) = &self.cooked {
                self.prims = build_prims(cooked, &self.options, &self.cook_args, &path, time)?;
            }
            self.sample_time = time;
            self.options.sample_time = time;
            return Ok(false);
        }

        if time_eq(time, self.sample_time) {
            return Ok(false);
        }

        let session = self
            .session
            .as_ref()
            .and_then(Weak::upgrade)
            .filter(|s| s.is_alive())
            .ok_or(Error::SessionLost)?;

        let mut options = self.options.clone();
        options.sample_time = time;
        let cooked = session.cook(&path, &options)?;
        let prims = build_prims(&cooked, &options, &self.cook_args, &path, time)?;

        self.prims = prims;
        self.cooked = Some(cooked);
        self.options = options;
        self.sample_time = time;
        Ok(true)
    }

    pub fn cook_args(&self) -> &FileFormatArguments {
        &self.cook_args
    }

    pub fn import_options(&self) -> &ImportOptions {
        &self.options
    }

    pub fn sample_time(&self) -> TimeCode {
        self.sample_time
    }

    pub fn time_caching(&self) -> TimeCaching {
        self.options.time_caching
    }

    pub fn is_open(&self) -> bool {
        self.cooked.is_some()
    }

    /// The pseudo-root carrying layer metadata.
    pub fn layer_info(&self) -> Option<&FilePrim> {
        self.prims.get(&SdfPath::absolute_root())
    }

    pub fn prim(&self, path: &SdfPath) -> Option<&FilePrim> {
        self.prims.get(path)
    }

    /// Every prim path, sorted.
    pub fn prim_paths(&self) -> impl Iterator<Item = &SdfPath> {
        self.prims.keys()
    }

    fn prop(&self, path: &SdfPath) -> Option<&FileProp> {
        if !path.is_property_path() {
            return None;
        }
        self.prims.get(&path.prim_path())?.prop(path.name())
    }
}

impl AbstractData for HdaFileData {
    fn spec_type(&self, path: &SdfPath) -> Option<SpecType> {
        if path.is_property_path() {
            return self.prop(path).map(|_| SpecType::Attribute);
        }
        self.prims.get(path).map(|_| {
            if path.is_absolute_root() {
                SpecType::PseudoRoot
            } else {
                SpecType::Prim
            }
        })
    }

    fn list_fields(&self, path: &SdfPath) -> Vec<String> {
        if let Some(prop) = self.prop(path) {
            let mut fields = vec![TYPE_NAME_FIELD.to_string(), CUSTOM_FIELD.to_string()];
            if prop.default_value().is_some() {
                fields.push(DEFAULT_FIELD.to_string());
            }
            return fields;
        }

        let Some(prim) = self.prims.get(path) else {
            return Vec::new();
        };
        let mut fields = Vec::new();
        if !path.is_absolute_root() {
            fields.push(TYPE_NAME_FIELD.to_string());
            fields.push(SPECIFIER_FIELD.to_string());
        }
        if !prim.child_names().is_empty() {
            fields.push(PRIM_CHILDREN_FIELD.to_string());
        }
        if !prim.prop_names().is_empty() {
            fields.push(PROPERTIES_FIELD.to_string());
        }
        fields.extend(prim.metadata().keys().map(str::to_string));
        if !prim.custom_data().is_empty() {
            fields.push(CUSTOM_DATA_FIELD.to_string());
        }
        fields
    }

    fn get_field(&self, path: &SdfPath, field: &str) -> Option<Value> {
        if path.is_property_path() {
            let prop = self.prop(path)?;
            return match field {
                TYPE_NAME_FIELD => Some(Value::from(prop.type_name())),
                CUSTOM_FIELD => Some(Value::Bool(prop.is_custom())),
                DEFAULT_FIELD => prop.default_value().cloned(),
                _ => None,
            };
        }

        let prim = self.prims.get(path)?;
        match field {
            TYPE_NAME_FIELD if !path.is_absolute_root() => Some(Value::from(prim.type_name())),
            SPECIFIER_FIELD if !path.is_absolute_root() => Some(Value::from("def")),
            PRIM_CHILDREN_FIELD => Some(Value::StringArray(prim.child_names().to_vec())),
            PROPERTIES_FIELD => Some(Value::StringArray(prim.prop_names().to_vec())),
            CUSTOM_DATA_FIELD if !prim.custom_data().is_empty() => {
                Some(Value::Dictionary(prim.custom_data_dictionary()))
            }
            _ => prim.metadata().get(field).cloned(),
        }
    }

    fn list_all_time_samples(&self) -> Vec<TimeCode> {
        let mut times: Vec<TimeCode> = self
            .prims
            .values()
            .flat_map(|prim| prim.props().flat_map(|(_, p)| p.time_samples().times()))
            .collect();
        times.sort_by(|a, b| a.total_cmp(b));
        times.dedup_by(|a, b| time_eq(*a, *b));
        times
    }

    fn list_time_samples_for_path(&self, path: &SdfPath) -> Vec<TimeCode> {
        self.prop(path)
            .map(|p| p.time_samples().times())
            .unwrap_or_default()
    }

    fn query_time_sample(&self, path: &SdfPath, time: TimeCode) -> Option<Value> {
        self.prop(path)?.time_samples().get(time).cloned()
    }

    fn bracketing_time_samples_for_path(
        &self,
        path: &SdfPath,
        time: TimeCode,
    ) -> Option<(TimeCode, TimeCode)> {
        self.prop(path)?.time_samples().bracketing(time)
    }
}

impl std::fmt::Debug for HdaFileData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HdaFileData")
            .field("cook_args", &self.cook_args)
            .field("resolved_path", &self.resolved_path)
            .field("prims", &self.prims.len())
            .field("sample_time", &self.sample_time)
            .finish()
    }
}

// ============================================================================
// Translation
// ============================================================================

fn build_prims(
    cooked: &CookedAsset,
    options: &ImportOptions,
    cook_args: &FileFormatArguments,
    resolved_path: &Path,
    sample_time: TimeCode,
) -> Result<BTreeMap<SdfPath, FilePrim>> {
    let mut prims = BTreeMap::new();
    let mode = options.time_caching;

    let asset_prim_name = if cooked.asset_name.is_empty() {
        "hda".to_string()
    } else {
        make_valid_identifier(asset_display_name(&cooked.asset_name))
    };

    // Layer info
    let root_path = SdfPath::absolute_root();
    let mut root = FilePrim::new(root_path.clone(), "");
    root.add_child(asset_prim_name.clone());
    root.add_metadata(PrimMetadata::DEFAULT_PRIM_KEY, asset_prim_name.clone());
    if mode.is_animated() {
        let times = cooked.sample_times();
        if let (Some(start), Some(end)) = (times.first(), times.last()) {
            root.add_metadata(PrimMetadata::START_TIME_CODE_KEY, *start);
            root.add_metadata(PrimMetadata::END_TIME_CODE_KEY, *end);
        }
    }
    let args_dict: Dictionary = cook_args.iter().collect();
    root.add_metadata(
        PrimMetadata::CUSTOM_LAYER_DATA_KEY,
        Dictionary::new()
            .with("assetName", cooked.asset_name.clone())
            .with("assetPath", resolved_path.display().to_string())
            .with("cookArgs", args_dict)
            .with("timeCacheMethod", mode.as_str())
            .with("sampleTime", sample_time),
    );
    prims.insert(root_path.clone(), root);

    // Asset prim with parameter attributes
    let asset_path = root_path.append_child(&asset_prim_name)?;
    let mut asset = FilePrim::new(asset_path.clone(), XFORM_TYPE);
    asset.add_metadata(PrimMetadata::KIND_KEY, "component");
    for (key, value) in &cooked.metadata {
        asset.add_custom_data(key.clone(), value.clone());
    }
    for parm in &cooked.parms {
        let name = format!("{PARMS_NAMESPACE}:{}", make_valid_identifier(&parm.name));
        if let Some(prop) = make_prop(parm, mode, sample_time) {
            asset.add_property(name, prop.with_custom(true));
        }
    }

    let mut used = Vec::new();
    for output in &cooked.outputs {
        let name = unique_name(&output.name, &mut used);
        asset.add_child(name.clone());
        add_output(&mut prims, &asset_path, &name, output, mode, sample_time)?;
    }
    prims.insert(asset_path, asset);

    Ok(prims)
}

fn add_output(
    prims: &mut BTreeMap<SdfPath, FilePrim>,
    parent: &SdfPath,
    name: &str,
    output: &CookedOutput,
    mode: TimeCaching,
    sample_time: TimeCode,
) -> Result<()> {
    let path = parent.append_child(name)?;
    let type_name = if output.prim_type.is_empty() {
        XFORM_TYPE
    } else {
        output.prim_type.as_str()
    };
    let mut prim = FilePrim::new(path.clone(), type_name);

    for attr in &output.attributes {
        let attr_name = attr
            .name
            .split(':')
            .map(make_valid_identifier)
            .collect::<Vec<_>>()
            .join(":");
        if let Some(prop) = make_prop(attr, mode, sample_time) {
            prim.add_property(attr_name, prop);
        }
    }

    let mut used = Vec::new();
    for child in &output.children {
        let child_name = unique_name(&child.name, &mut used);
        prim.add_child(child_name.clone());
        add_output(prims, &path, &child_name, child, mode, sample_time)?;
    }

    prims.insert(path, prim);
    Ok(())
}

/// Turn cooked samples into an attribute. Numeric values cooked under a
/// time-caching mode keep every sample; anything else keeps the sample
/// nearest the document's sample time.
fn make_prop(attr: &CookedAttribute, mode: TimeCaching, sample_time: TimeCode) -> Option<FileProp> {
    let samples: TimeSamples = attr.samples.iter().cloned().collect();
    let first = samples.iter().next().map(|(_, v)| v.clone())?;

    if mode.is_animated() && first.is_numeric() {
        if samples.iter().any(|(_, v)| v.type_name() != first.type_name()) {
            warn!("Attribute '{}' changes type over time, keeping one sample", attr.name);
        } else {
            return Some(FileProp::time_sampled(first.type_name(), samples));
        }
    }

    samples.nearest(sample_time).cloned().map(FileProp::constant)
}

/// Strip the operator namespace and version from an asset name:
/// `Sop/studio::tree::2.0` becomes `tree`.
fn asset_display_name(asset_name: &str) -> &str {
    let base = asset_name.rsplit('/').next().unwrap_or(asset_name);
    let mut parts: Vec<&str> = base.split("::").collect();
    if parts.len() > 1 && parts.last().is_some_and(|p| p.starts_with(|c: char| c.is_ascii_digit())) {
        parts.pop();
    }
    parts.last().copied().filter(|p| !p.is_empty()).unwrap_or(base)
}

/// Valid, sibling-unique prim name.
fn unique_name(name: &str, used: &mut Vec<String>) -> String {
    let base = make_valid_identifier(name);
    let mut candidate = base.clone();
    let mut suffix = 1;
    while used.contains(&candidate) {
        candidate = format!("{base}_{suffix}");
        suffix += 1;
    }
    used.push(candidate.clone());
    candidate
}
