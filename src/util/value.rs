//! Dynamically-typed metadata values.
//!
//! Layered metadata and cooked parameters carry values whose type is only
//! known at runtime. [`Value`] is the closed set of types this crate
//! understands, with explicit coercions instead of runtime type inspection.

use std::collections::BTreeMap;
use std::fmt;

use super::math::{DVec2, DVec3, DVec4, IVec2, IVec3, IVec4, Vec2, Vec3, Vec4};

/// Ordered dictionary of named values.
///
/// Keys iterate in sorted order, so anything derived from a dictionary
/// is deterministic.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dictionary {
    entries: BTreeMap<String, Value>,
}

impl Dictionary {
    /// Create an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Compose a weaker dictionary underneath this one.
    ///
    /// Keys already present here win. When both sides hold a nested
    /// dictionary for the same key the two are composed recursively.
    pub fn over(&mut self, weaker: &Dictionary) {
        for (key, weak_value) in &weaker.entries {
            match self.entries.get_mut(key) {
                Some(Value::Dictionary(strong)) => {
                    if let Value::Dictionary(weak) = weak_value {
                        strong.over(weak);
                    }
                }
                Some(_) => {}
                None => {
                    self.entries.insert(key.clone(), weak_value.clone());
                }
            }
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Dictionary {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut dict = Self::new();
        for (k, v) in iter {
            dict.insert(k, v);
        }
        dict
    }
}

/// A dynamically-typed value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i32),
    Int64(i64),
    Float(f32),
    Double(f64),
    String(String),
    Vec2d(DVec2),
    Vec3d(DVec3),
    Vec4d(DVec4),
    Vec2f(Vec2),
    Vec3f(Vec3),
    Vec4f(Vec4),
    Vec2i(IVec2),
    Vec3i(IVec3),
    Vec4i(IVec4),
    IntArray(Vec<i32>),
    Int64Array(Vec<i64>),
    FloatArray(Vec<f32>),
    DoubleArray(Vec<f64>),
    StringArray(Vec<String>),
    Dictionary(Dictionary),
}

impl Value {
    /// Scene-description type name for this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Int64(_) => "int64",
            Self::Float(_) => "float",
            Self::Double(_) => "double",
            Self::String(_) => "string",
            Self::Vec2d(_) => "double2",
            Self::Vec3d(_) => "double3",
            Self::Vec4d(_) => "double4",
            Self::Vec2f(_) => "float2",
            Self::Vec3f(_) => "float3",
            Self::Vec4f(_) => "float4",
            Self::Vec2i(_) => "int2",
            Self::Vec3i(_) => "int3",
            Self::Vec4i(_) => "int4",
            Self::IntArray(_) => "int[]",
            Self::Int64Array(_) => "int64[]",
            Self::FloatArray(_) => "float[]",
            Self::DoubleArray(_) => "double[]",
            Self::StringArray(_) => "string[]",
            Self::Dictionary(_) => "dictionary",
        }
    }

    /// True for every scalar, vector and array of numbers.
    pub fn is_numeric(&self) -> bool {
        !matches!(self, Self::String(_) | Self::StringArray(_) | Self::Dictionary(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Single-precision scalar. Doubles narrow, other types do not convert.
    pub fn as_float(&self) -> Option<f32> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Double(d) => Some(*d as f32),
            _ => None,
        }
    }

    pub fn as_dictionary(&self) -> Option<&Dictionary> {
        match self {
            Self::Dictionary(d) => Some(d),
            _ => None,
        }
    }

    // === Numeric coercions ===

    /// Coerce any numeric scalar to a double.
    pub fn cast_double(&self) -> Option<f64> {
        match self {
            Self::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Self::Int(i) => Some(*i as f64),
            Self::Int64(i) => Some(*i as f64),
            Self::Float(f) => Some(*f as f64),
            Self::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn cast_vec2d(&self) -> Option<DVec2> {
        match self {
            Self::Vec2d(v) => Some(*v),
            Self::Vec2f(v) => Some(v.as_dvec2()),
            Self::Vec2i(v) => Some(v.as_dvec2()),
            _ => None,
        }
    }

    pub fn cast_vec3d(&self) -> Option<DVec3> {
        match self {
            Self::Vec3d(v) => Some(*v),
            Self::Vec3f(v) => Some(v.as_dvec3()),
            Self::Vec3i(v) => Some(v.as_dvec3()),
            _ => None,
        }
    }

    pub fn cast_vec4d(&self) -> Option<DVec4> {
        match self {
            Self::Vec4d(v) => Some(*v),
            Self::Vec4f(v) => Some(v.as_dvec4()),
            Self::Vec4i(v) => Some(v.as_dvec4()),
            _ => None,
        }
    }

    pub fn cast_double_array(&self) -> Option<Vec<f64>> {
        match self {
            Self::DoubleArray(v) => Some(v.clone()),
            Self::FloatArray(v) => Some(v.iter().map(|&f| f as f64).collect()),
            _ => None,
        }
    }

    pub fn cast_int64_array(&self) -> Option<Vec<i64>> {
        match self {
            Self::Int64Array(v) => Some(v.clone()),
            Self::IntArray(v) => Some(v.iter().map(|&i| i as i64).collect()),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s:?}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Int64(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            other => write!(f, "<{}>", other.type_name()),
        }
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::$variant(v)
                }
            }
        )*
    };
}

impl_from! {
    bool => Bool,
    i32 => Int,
    i64 => Int64,
    f32 => Float,
    f64 => Double,
    String => String,
    DVec2 => Vec2d,
    DVec3 => Vec3d,
    DVec4 => Vec4d,
    Vec2 => Vec2f,
    Vec3 => Vec3f,
    Vec4 => Vec4f,
    IVec2 => Vec2i,
    IVec3 => Vec3i,
    IVec4 => Vec4i,
    Vec<i32> => IntArray,
    Vec<i64> => Int64Array,
    Vec<f32> => FloatArray,
    Vec<f64> => DoubleArray,
    Vec<String> => StringArray,
    Dictionary => Dictionary,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}
