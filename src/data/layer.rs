//! Minimal host layer.
//!
//! Stands in for the host's layer object: it carries the identifier and
//! cook arguments a file format reads from, and owns whatever backing
//! data the format installs.

use std::fmt;

use super::AbstractData;
use crate::core::FileFormatArguments;

/// A scene-description layer backed by format-provided data.
pub struct Layer {
    asset_path: String,
    args: FileFormatArguments,
    data: Option<Box<dyn AbstractData>>,
}

impl Layer {
    /// Create a layer from an identifier, splitting off any embedded
    /// cook arguments.
    pub fn new(identifier: &str) -> Self {
        let (asset_path, args) = FileFormatArguments::split_identifier(identifier);
        Self::with_arguments(asset_path, args)
    }

    pub fn with_arguments(asset_path: impl Into<String>, args: FileFormatArguments) -> Self {
        Self {
            asset_path: asset_path.into(),
            args,
            data: None,
        }
    }

    /// Identifier including the cook arguments.
    pub fn identifier(&self) -> String {
        self.args.identifier(&self.asset_path)
    }

    pub fn asset_path(&self) -> &str {
        &self.asset_path
    }

    pub fn file_format_arguments(&self) -> &FileFormatArguments {
        &self.args
    }

    /// Install new backing data, replacing the previous one.
    pub fn set_backing_data(&mut self, data: Box<dyn AbstractData>) {
        self.data = Some(data);
    }

    pub fn backing_data(&self) -> Option<&dyn AbstractData> {
        self.data.as_deref()
    }

    pub fn has_backing_data(&self) -> bool {
        self.data.is_some()
    }
}

impl fmt::Debug for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Layer")
            .field("asset_path", &self.asset_path)
            .field("args", &self.args)
            .field("has_backing_data", &self.data.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_round_trip() {
        let layer = Layer::new("/lib/tree.hda:SDF_FORMAT_ARGS:assetname=Sop/tree&numeric_h=2");
        assert_eq!(layer.asset_path(), "/lib/tree.hda");
        assert_eq!(layer.file_format_arguments().get("assetname"), Some("Sop/tree"));
        assert_eq!(layer.file_format_arguments().get("numeric_h"), Some("2"));
        assert_eq!(
            layer.identifier(),
            "/lib/tree.hda:SDF_FORMAT_ARGS:assetname=Sop/tree&numeric_h=2"
        );
        assert!(!layer.has_backing_data());
    }
}
