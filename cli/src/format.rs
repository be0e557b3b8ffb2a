//! JSON output formatting.
//!
//! A thin layer over `serde_json` serialization adding ASCII escaping,
//! recursive key sorting and a configurable newline sequence.

use clap::ValueEnum;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use std::fmt::Write as _;

/// Newline sequence written between lines of indented output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Newline {
    /// `\r\n`
    Dos,
    /// `\r`
    Mac,
    /// `\n`
    Unix,
    /// The platform's native sequence.
    #[default]
    System,
}

impl Newline {
    /// The byte sequence for this newline style.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dos => "\r\n",
            Self::Mac => "\r",
            Self::Unix => "\n",
            Self::System if cfg!(windows) => "\r\n",
            Self::System => "\n",
        }
    }
}

/// Output settings.
#[derive(Debug, Clone)]
pub struct JsonFormatter {
    /// Escape every non-ASCII character as `\uXXXX`.
    pub ascii: bool,
    /// Spaces per indentation level; `None` prints everything on one line.
    pub indent: Option<usize>,
    /// Sort object keys, recursively.
    pub sort_keys: bool,
    /// Newline sequence used by indented output.
    pub newline: Newline,
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self {
            ascii: false,
            indent: Some(4),
            sort_keys: false,
            newline: Newline::System,
        }
    }
}

impl JsonFormatter {
    /// Serialize `value` using these settings.
    ///
    /// # Errors
    ///
    /// Fails only if serialization itself fails.
    pub fn dump(&self, value: &Value) -> serde_json::Result<String> {
        let sorted;
        let value = if self.sort_keys {
            sorted = sort_keys(value);
            &sorted
        } else {
            value
        };

        let mut text = match self.indent {
            None => serde_json::to_string(value)?,
            Some(width) => {
                let indent = " ".repeat(width);
                let mut buf = Vec::new();
                let formatter = PrettyFormatter::with_indent(indent.as_bytes());
                let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
                value.serialize(&mut ser)?;
                // serde_json only writes valid UTF-8
                String::from_utf8_lossy(&buf).into_owned()
            }
        };

        if self.ascii {
            text = escape_non_ascii(&text);
        }

        // control characters inside strings are escaped, so every raw '\n'
        // is structural
        if self.indent.is_some() && self.newline != Newline::Unix {
            text = text.replace('\n', self.newline.as_str());
        }
        Ok(text)
    }
}

/// Rebuild `value` with every object's keys in ascending order.
fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(members) => {
            let mut entries: Vec<_> = members.iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            let sorted: Map<String, Value> = entries
                .into_iter()
                .map(|(k, v)| (k.clone(), sort_keys(v)))
                .collect();
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}

/// Replace every non-ASCII character with `\uXXXX` escapes, using surrogate
/// pairs outside the Basic Multilingual Plane.
///
/// Only valid on serialized JSON, where non-ASCII characters can appear only
/// inside string literals.
fn escape_non_ascii(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                let _ = write!(out, "\\u{unit:04x}");
            }
        }
    }
    out
}
