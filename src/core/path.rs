//! Scene paths.
//!
//! Absolute prim paths (`/asset/geo`) and property paths
//! (`/asset.parms:speed`). Prim names are identifiers; property names may
//! additionally be namespaced with `:`.

use std::fmt;

use crate::util::{Error, Result};

/// Absolute path to a prim or property.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SdfPath {
    path: String,
}

impl SdfPath {
    /// The pseudo-root `/`.
    pub fn absolute_root() -> Self {
        Self { path: "/".to_string() }
    }

    /// Parse an absolute path.
    pub fn new(path: &str) -> Result<Self> {
        if path == "/" {
            return Ok(Self::absolute_root());
        }
        let body = path
            .strip_prefix('/')
            .ok_or_else(|| Error::InvalidPath(path.to_string()))?;

        let (prims, prop) = match body.split_once('.') {
            Some((prims, prop)) => (prims, Some(prop)),
            None => (body, None),
        };
        if prims.is_empty() && prop.is_some() {
            return Err(Error::InvalidPath(path.to_string()));
        }
        if !prims.split('/').all(is_identifier) {
            return Err(Error::InvalidPath(path.to_string()));
        }
        if let Some(prop) = prop {
            if !is_property_name(prop) {
                return Err(Error::InvalidPath(path.to_string()));
            }
        }
        Ok(Self { path: path.to_string() })
    }

    pub fn as_str(&self) -> &str {
        &self.path
    }

    pub fn is_absolute_root(&self) -> bool {
        self.path == "/"
    }

    pub fn is_property_path(&self) -> bool {
        self.path.contains('.')
    }

    pub fn is_prim_path(&self) -> bool {
        !self.is_property_path()
    }

    /// Child prim path.
    pub fn append_child(&self, name: &str) -> Result<Self> {
        if self.is_property_path() || !is_identifier(name) {
            return Err(Error::InvalidPath(format!("{}/{}", self.path, name)));
        }
        let path = if self.is_absolute_root() {
            format!("/{name}")
        } else {
            format!("{}/{}", self.path, name)
        };
        Ok(Self { path })
    }

    /// Property path on this prim.
    pub fn append_property(&self, name: &str) -> Result<Self> {
        if self.is_property_path() || self.is_absolute_root() || !is_property_name(name) {
            return Err(Error::InvalidPath(format!("{}.{}", self.path, name)));
        }
        Ok(Self {
            path: format!("{}.{}", self.path, name),
        })
    }

    /// Owning prim of a property path, or the path itself.
    pub fn prim_path(&self) -> Self {
        match self.path.split_once('.') {
            Some((prim, _)) => Self { path: prim.to_string() },
            None => self.clone(),
        }
    }

    /// Last element: the prim or property name. Empty for the root.
    pub fn name(&self) -> &str {
        if let Some((_, prop)) = self.path.split_once('.') {
            return prop;
        }
        self.path.rsplit('/').next().unwrap_or("")
    }

    /// Parent path. `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        if self.is_absolute_root() {
            return None;
        }
        if self.is_property_path() {
            return Some(self.prim_path());
        }
        match self.path.rfind('/') {
            Some(0) => Some(Self::absolute_root()),
            Some(idx) => Some(Self {
                path: self.path[..idx].to_string(),
            }),
            None => None,
        }
    }
}

impl fmt::Debug for SdfPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SdfPath({})", self.path)
    }
}

impl fmt::Display for SdfPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Identifiers joined by `:`.
pub fn is_property_name(name: &str) -> bool {
    name.split(':').all(is_identifier)
}

/// Turn an arbitrary name into a valid identifier.
///
/// Invalid characters become `_`; a leading digit gets a `_` prefix.
pub fn make_valid_identifier(name: &str) -> String {
    if name.is_empty() {
        return "_".to_string();
    }
    let mut out = String::with_capacity(name.len() + 1);
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        out.push('_');
    }
    out.extend(
        name.chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' }),
    );
    out
}
