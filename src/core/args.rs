//! Cook arguments.
//!
//! The flattened string map that identifies one cook of an asset. The
//! map doubles as the layer's identity, so iteration order is sorted and
//! value encodings are stable.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use super::tokens::{
    CONTROL_ARGS, PARM_NUMERIC_PREFIX, PARM_SEPARATOR, PARM_STRING_PREFIX, SAMPLE_TIME_ARG,
};
use crate::util::{Error, Result};

/// Separator between the asset path and its arguments in a layer identifier.
pub const FORMAT_ARGS_DELIMITER: &str = ":SDF_FORMAT_ARGS:";

/// String-keyed cook arguments.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct FileFormatArguments {
    entries: BTreeMap<String, String>,
}

impl FileFormatArguments {
    /// Create empty arguments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an argument, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over key-value pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// String-valued asset parameters, with the prefix stripped.
    pub fn string_parms(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter()
            .filter_map(|(k, v)| k.strip_prefix(PARM_STRING_PREFIX).map(|name| (name, v)))
    }

    /// Numeric asset parameters, with the prefix stripped and the value
    /// still encoded.
    pub fn numeric_parms(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter()
            .filter_map(|(k, v)| k.strip_prefix(PARM_NUMERIC_PREFIX).map(|name| (name, v)))
    }

    /// Loader options: every key that is neither a parameter nor a
    /// control key.
    pub fn options(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter().filter(|(k, _)| is_option_key(k))
    }

    // === Layer identifiers ===

    /// Serialize as the argument suffix of a layer identifier.
    /// Format: "key=value&key2=value2&..."
    pub fn serialize(&self) -> String {
        let mut result = String::new();
        for (i, (k, v)) in self.entries.iter().enumerate() {
            if i > 0 {
                result.push('&');
            }
            result.push_str(&escape_arg(k));
            result.push('=');
            result.push_str(&escape_arg(v));
        }
        result
    }

    /// Parse the argument suffix of a layer identifier.
    pub fn parse(s: &str) -> Self {
        let mut args = Self::new();
        for part in split_unescaped(s, b'&') {
            if let Some(eq_pos) = find_unescaped(part, b'=') {
                let key = unescape_arg(&part[..eq_pos]);
                if !key.is_empty() {
                    args.insert(key, unescape_arg(&part[eq_pos + 1..]));
                }
            }
        }
        args
    }

    /// Build a layer identifier from an asset path and these arguments.
    pub fn identifier(&self, asset_path: &str) -> String {
        if self.is_empty() {
            asset_path.to_string()
        } else {
            format!("{asset_path}{FORMAT_ARGS_DELIMITER}{}", self.serialize())
        }
    }

    /// Split a layer identifier into asset path and arguments.
    pub fn split_identifier(identifier: &str) -> (&str, Self) {
        match identifier.split_once(FORMAT_ARGS_DELIMITER) {
            Some((path, args)) => (path, Self::parse(args)),
            None => (identifier, Self::new()),
        }
    }
}

fn is_option_key(key: &str) -> bool {
    !key.starts_with(PARM_STRING_PREFIX)
        && !key.starts_with(PARM_NUMERIC_PREFIX)
        && !CONTROL_ARGS.contains(&key)
        && key != SAMPLE_TIME_ARG
}

impl fmt::Debug for FileFormatArguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FileFormatArguments {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut args = Self::new();
        for (k, v) in iter {
            args.insert(k, v);
        }
        args
    }
}

// === Numeric tuple encoding ===

/// Encode a numeric tuple as separator-joined components.
///
/// Components use the shortest representation that round-trips, so
/// `4.0` encodes as `"4"` and `0.5` as `"0.5"`.
pub fn encode_numeric<T: Display>(values: &[T]) -> String {
    let mut out = String::new();
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            out.push_str(PARM_SEPARATOR);
        }
        out.push_str(&v.to_string());
    }
    out
}

/// Decode a numeric tuple written by [`encode_numeric`].
pub fn decode_numeric(key: &str, value: &str) -> Result<Vec<f64>> {
    value
        .split(PARM_SEPARATOR)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f64>()
                .map_err(|_| Error::invalid_argument(key, value))
        })
        .collect()
}

/// Decode a scalar time value such as `timecachestart`.
pub fn decode_time(key: &str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| Error::invalid_argument(key, value))
}

// === Escaping ===

fn escape_arg(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '&' => result.push_str("\\&"),
            '=' => result.push_str("\\="),
            _ => result.push(c),
        }
    }
    result
}

fn unescape_arg(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.peek() {
                Some(&next @ ('\\' | '&' | '=')) => {
                    result.push(next);
                    chars.next();
                }
                _ => result.push(c),
            }
        } else {
            result.push(c);
        }
    }
    result
}

/// True when the byte at `i` is preceded by an even number of backslashes.
fn is_unescaped(bytes: &[u8], i: usize) -> bool {
    let mut backslashes = 0;
    let mut j = i;
    while j > 0 && bytes[j - 1] == b'\\' {
        backslashes += 1;
        j -= 1;
    }
    backslashes % 2 == 0
}

fn find_unescaped(s: &str, ch: u8) -> Option<usize> {
    let bytes = s.as_bytes();
    (0..bytes.len()).find(|&i| bytes[i] == ch && is_unescaped(bytes, i))
}

fn split_unescaped(s: &str, ch: u8) -> Vec<&str> {
    let bytes = s.as_bytes();
    let mut parts = Vec::new();
    let mut start = 0;
    for i in 0..bytes.len() {
        if bytes[i] == ch && is_unescaped(bytes, i) {
            parts.push(&s[start..i]);
            start = i + 1;
        }
    }
    if start < s.len() {
        parts.push(&s[start..]);
    }
    parts
}
