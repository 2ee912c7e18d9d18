//! Explicit file format registry.
//!
//! The host builds one registry at startup and registers every format it
//! supports; lookups go by format id or by path extension.

use std::sync::Arc;

use tracing::debug;

use super::{extension, FileFormat};

/// Formats known to the host, in registration order.
#[derive(Default)]
pub struct FormatRegistry {
    formats: Vec<Arc<dyn FileFormat>>,
}

impl FormatRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a format. A format with the same id is replaced.
    pub fn register(&mut self, format: Arc<dyn FileFormat>) {
        debug!("Registering file format '{}'", format.format_id());
        self.formats.retain(|f| f.format_id() != format.format_id());
        self.formats.push(format);
    }

    pub fn find_by_id(&self, id: &str) -> Option<Arc<dyn FileFormat>> {
        self.formats.iter().find(|f| f.format_id() == id).cloned()
    }

    /// First registered format claiming the extension of `path`.
    pub fn find_for_path(&self, path: &str) -> Option<Arc<dyn FileFormat>> {
        extension(path)?;
        self.formats.iter().find(|f| f.can_read(path)).cloned()
    }

    /// Every extension claimed by a registered format.
    pub fn extensions(&self) -> Vec<&str> {
        self.formats
            .iter()
            .flat_map(|f| f.extensions().iter().copied())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }
}
