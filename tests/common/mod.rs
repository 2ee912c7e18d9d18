//! Scripted engine used by the integration tests.

#![allow(dead_code)]

use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use hda_format::engine::{
    CookedAsset, CookedAttribute, CookedOutput, Engine, EngineFactory, ImportOptions, ParmValue,
};
use hda_format::{Error, Result, Value};
use parking_lot::Mutex;
use tempfile::NamedTempFile;

/// Times a continuous cook reports.
pub const CONTINUOUS_TIMES: [f64; 3] = [1.0, 2.0, 3.0];
pub const DEFAULT_ASSET: &str = "Sop/studio::scatter::1.0";

/// Session that cooks a fixed asset shape from the options it is given.
///
/// Outputs:
/// - `parms:<name>` for each parameter override, plus `parms:frame`
///   sampled at every cook time
/// - `/scatter/geo` (Mesh) with `points:count` and `label`
/// - `/scatter/geo/instances` (Points) with `scale`
pub struct ScriptedEngine {
    alive: AtomicBool,
    cooks: Arc<AtomicUsize>,
    fail_cook: Arc<AtomicBool>,
}

impl Engine for ScriptedEngine {
    fn cook(&self, _path: &Path, options: &ImportOptions) -> Result<CookedAsset> {
        if !self.alive.load(Ordering::SeqCst) {
            return Err(Error::EngineUnavailable("session terminated".into()));
        }
        let asset_name = options.asset_name.clone().unwrap_or_else(|| DEFAULT_ASSET.to_string());
        if self.fail_cook.load(Ordering::SeqCst) {
            return Err(Error::cook_failed(asset_name, "node errors"));
        }
        self.cooks.fetch_add(1, Ordering::SeqCst);

        let times = options
            .cook_times()
            .unwrap_or_else(|| CONTINUOUS_TIMES.to_vec());

        let mut asset = CookedAsset::new(asset_name);
        asset.metadata.push(("label".into(), Value::from("Scatter")));
        asset.metadata.push(("version".into(), Value::from("1.0")));

        for (name, value) in &options.parms {
            let mut attr = CookedAttribute::new(name.clone());
            for &t in &times {
                let v = match value {
                    ParmValue::String(s) => Value::from(s.as_str()),
                    ParmValue::Numeric(n) if n.len() == 1 => Value::Double(n[0]),
                    ParmValue::Numeric(n) => Value::DoubleArray(n.clone()),
                };
                attr = attr.with_sample(t, v);
            }
            asset.parms.push(attr);
        }

        let mut frame = CookedAttribute::new("frame");
        let mut count = CookedAttribute::new("points:count");
        let mut scale = CookedAttribute::new("scale");
        for &t in &times {
            frame = frame.with_sample(t, t);
            count = count.with_sample(t, (t * 10.0) as i32);
            scale = scale.with_sample(t, vec![t, t * 2.0]);
        }
        asset.parms.push(frame);

        asset.outputs.push(
            CookedOutput::new("geo", "Mesh")
                .with_attribute(count)
                .with_attribute(CookedAttribute::constant("label", times[0], "scattered"))
                .with_child(CookedOutput::new("instances", "Points").with_attribute(scale)),
        );
        Ok(asset)
    }

    fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
pub struct ScriptedFactory {
    pub started: AtomicUsize,
    pub cooks: Arc<AtomicUsize>,
    pub fail_start: AtomicBool,
    pub fail_cook: Arc<AtomicBool>,
    pub no_retention: bool,
    sessions: Mutex<Vec<Weak<ScriptedEngine>>>,
}

impl ScriptedFactory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn cooks(&self) -> usize {
        self.cooks.load(Ordering::SeqCst)
    }

    /// Sessions that are still referenced somewhere.
    pub fn live_sessions(&self) -> usize {
        self.sessions
            .lock()
            .iter()
            .filter(|w| w.strong_count() > 0)
            .count()
    }

    /// Simulate the engine process dying under every open session.
    pub fn kill_all(&self) {
        for session in self.sessions.lock().iter().filter_map(Weak::upgrade) {
            session.alive.store(false, Ordering::SeqCst);
        }
    }
}

impl EngineFactory for ScriptedFactory {
    fn start_session(&self, _path: &Path, _asset_name: Option<&str>) -> Result<Arc<dyn Engine>> {
        if self.fail_start.load(Ordering::SeqCst) {
            return Err(Error::EngineUnavailable("no license available".into()));
        }
        self.started.fetch_add(1, Ordering::SeqCst);
        let session = Arc::new(ScriptedEngine {
            alive: AtomicBool::new(true),
            cooks: Arc::clone(&self.cooks),
            fail_cook: Arc::clone(&self.fail_cook),
        });
        self.sessions.lock().push(Arc::downgrade(&session));
        Ok(session)
    }

    fn supports_session_retention(&self) -> bool {
        !self.no_retention
    }
}

/// An on-disk asset library file with the given extension.
pub fn asset_file(extension: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("asset")
        .suffix(&format!(".{extension}"))
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(b"INDX").expect("Failed to write temp file");
    file
}
