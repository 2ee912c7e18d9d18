//! The HDA dynamic file format.
//!
//! [`HdaFileFormat`] ties the pieces together: it recognizes asset
//! library paths, composes cook arguments from layered metadata, decides
//! whether a metadata edit changes them, and reads a layer by cooking
//! the asset into an [`HdaFileData`] document.
//!
//! ## Example
//!
//! ```ignore
//! let format = HdaFileFormat::new(Arc::new(MyEngineFactory));
//! let (args, dependency) = format.compose_fields_for_file_format_arguments("tree.hda", &ctx);
//! let mut layer = Layer::with_arguments("tree.hda", args);
//! format.read(&mut layer, Path::new("/lib/tree.hda"), false)?;
//! ```

pub mod compose;
pub mod dependency;
mod plug_info;
mod registry;

pub use compose::compose_fields_for_file_format_arguments;
pub use dependency::{can_field_change_affect_file_format_arguments, RANGE_ONLY_FIELDS};
pub use plug_info::{metadata_fields, plug_info, FieldDecl};
pub use registry::FormatRegistry;

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::context::DynamicFileFormatContext;
use crate::core::tokens::{EXTENSIONS, FORMAT_ID, FORMAT_TARGET, FORMAT_VERSION};
use crate::core::{DependencyContext, FileFormatArguments};
use crate::data::{HdaFileData, Layer};
use crate::engine::{EngineFactory, SessionCache};
use crate::util::{Result, Value};

/// A file format the host can read layers with.
pub trait FileFormat: Send + Sync {
    fn format_id(&self) -> &str;

    fn version(&self) -> &str;

    fn target(&self) -> &str;

    /// Extensions this format claims, without the dot.
    fn extensions(&self) -> &[&str];

    /// Whether `path` has one of this format's extensions.
    fn can_read(&self, path: &str) -> bool {
        extension(path).is_some_and(|ext| self.extensions().contains(&ext))
    }

    /// Populate `layer` from `resolved_path`.
    ///
    /// On failure the layer's backing data is left untouched.
    fn read(&self, layer: &mut Layer, resolved_path: &Path, metadata_only: bool) -> Result<()>;

    /// Dynamic formats expose argument composition.
    fn as_dynamic(&self) -> Option<&dyn DynamicFileFormat> {
        None
    }
}

/// A format whose cook arguments are composed from scene metadata.
pub trait DynamicFileFormat: FileFormat {
    fn compose_fields_for_file_format_arguments(
        &self,
        asset_path: &str,
        context: &dyn DynamicFileFormatContext,
    ) -> (FileFormatArguments, DependencyContext);

    fn can_field_change_affect_file_format_arguments(
        &self,
        field: &str,
        old_value: Option<&Value>,
        new_value: Option<&Value>,
        dependency: &DependencyContext,
    ) -> bool;
}

/// Extension after the last `.` of the file name, case preserved.
/// A leading `.` marks a hidden file, not an extension.
pub fn extension(path: &str) -> Option<&str> {
    let file_name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    let file_name = file_name.strip_prefix('.').unwrap_or(file_name);
    let (_, ext) = file_name.rsplit_once('.')?;
    (!ext.is_empty()).then_some(ext)
}

/// Dynamic file format for procedural asset libraries.
pub struct HdaFileFormat {
    sessions: Arc<SessionCache>,
}

impl HdaFileFormat {
    /// Create the format with its own session cache.
    pub fn new(factory: Arc<dyn EngineFactory>) -> Self {
        Self::with_sessions(Arc::new(SessionCache::new(factory)))
    }

    /// Create the format around a shared session cache.
    pub fn with_sessions(sessions: Arc<SessionCache>) -> Self {
        Self { sessions }
    }

    pub fn sessions(&self) -> &Arc<SessionCache> {
        &self.sessions
    }

    /// Build and open a document without installing it anywhere.
    pub fn open_data(&self, args: &FileFormatArguments, resolved_path: &Path) -> Result<HdaFileData> {
        let mut data = HdaFileData::new(args.clone());
        data.open(resolved_path, &self.sessions)?;
        Ok(data)
    }
}

impl FileFormat for HdaFileFormat {
    fn format_id(&self) -> &str {
        FORMAT_ID
    }

    fn version(&self) -> &str {
        FORMAT_VERSION
    }

    fn target(&self) -> &str {
        FORMAT_TARGET
    }

    fn extensions(&self) -> &[&str] {
        EXTENSIONS
    }

    fn read(&self, layer: &mut Layer, resolved_path: &Path, _metadata_only: bool) -> Result<()> {
        match self.open_data(layer.file_format_arguments(), resolved_path) {
            Ok(data) => {
                debug!("Installing cooked data for {}", layer.identifier());
                layer.set_backing_data(Box::new(data));
                Ok(())
            }
            Err(e) => {
                warn!("Failed to read {}: {e}", resolved_path.display());
                Err(e)
            }
        }
    }

    fn as_dynamic(&self) -> Option<&dyn DynamicFileFormat> {
        Some(self)
    }
}

impl DynamicFileFormat for HdaFileFormat {
    fn compose_fields_for_file_format_arguments(
        &self,
        asset_path: &str,
        context: &dyn DynamicFileFormatContext,
    ) -> (FileFormatArguments, DependencyContext) {
        compose_fields_for_file_format_arguments(asset_path, context)
    }

    fn can_field_change_affect_file_format_arguments(
        &self,
        field: &str,
        old_value: Option<&Value>,
        new_value: Option<&Value>,
        dependency: &DependencyContext,
    ) -> bool {
        can_field_change_affect_file_format_arguments(field, old_value, new_value, dependency)
    }
}
