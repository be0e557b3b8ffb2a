//! Compile options.
//!
//! [`CompileOptions`] is serde-deserializable, so it can be loaded from JSON or
//! YAML alongside other application settings. Every field has a default:
//!
//! ```yaml
//! equality: loose        # strict | loose
//! max_depth: 16
//! max_regex_length: 1024
//! ```

use crate::value::Equality;
use crate::{MAX_DEPTH, MAX_REGEX_PATTERN_LENGTH};
use serde::{Deserialize, Serialize};

/// Options that shape how a pattern is compiled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompileOptions {
    /// Whether booleans coincide with `0`/`1` in equality and ordering.
    pub equality: Equality,
    /// Maximum pattern nesting depth. Defaults to [`MAX_DEPTH`].
    pub max_depth: usize,
    /// Maximum length of a `regex` operand. Defaults to [`MAX_REGEX_PATTERN_LENGTH`].
    pub max_regex_length: usize,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            equality: Equality::default(),
            max_depth: MAX_DEPTH,
            max_regex_length: MAX_REGEX_PATTERN_LENGTH,
        }
    }
}
