//! mqlite - JSON pattern compiler and matching engine
//!
//! A pattern is written in the same JSON grammar as the data it matches, plus
//! a small mini-language embedded in object keys (`"age >"`,
//! `"hobbies not contain any"`, `"__sort__"`). The pattern is compiled once
//! into a [`Matcher`] tree and evaluated against any number of data values.
//!
//! # Architecture
//!
//! - [`Compiler`]: walks a pattern value once and builds a [`Matcher`]
//! - [`Matcher`]: tests and projects data; returns a derived value or NoMatch
//! - [`Constraint`]: filters a field without projecting it
//! - [`Directive`]: reshapes the results of a list match (limit, sort, order)
//! - [`Pattern`]: a compiled matcher together with its source value
//!
//! # Results
//!
//! Evaluation returns [`MatchResult`]:
//!
//! - `Ok(Some(value))`: matched; `value` is a fresh, projected copy
//! - `Ok(None)`: NoMatch (distinct from a `null` result)
//! - `Err(MatchError)`: the data could not be tested (e.g. `regex` on a number)
//!
//! # Example
//!
//! ```
//! use mqlite::prelude::*;
//! use serde_json::json;
//!
//! let people = json!([
//!     { "name": "Anna", "age": 25, "student": true },
//!     { "name": "James", "age": 23, "student": false },
//!     { "name": "John", "age": 35, "student": true },
//! ]);
//!
//! let matcher = compile(&json!([{
//!     "name": null,
//!     "student ==": true,
//!     "__sort__": "name",
//!     "__order__": "reverse",
//! }])).unwrap();
//!
//! assert_eq!(
//!     matcher.evaluate(&people).unwrap(),
//!     Some(json!([{ "name": "John" }, { "name": "Anna" }])),
//! );
//! ```

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

mod compiler;
mod config;
mod constraint;
mod directive;
mod key;
mod matcher;
mod pattern;
mod value;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

// Core types
pub use compiler::Compiler;
pub use config::CompileOptions;
pub use constraint::Constraint;
pub use directive::Directive;
pub use matcher::{Matcher, ObjectMatcher, Wildcard};
pub use pattern::Pattern;

// Key grammar
pub use key::{classify, ConstraintKey, DirectiveKey, KeyKind, Operator, Prefix, Suffix, WILDCARD};

// Value model
pub use value::{compare, equals, Equality, TypeName, ValueKind};

/// Compile a pattern with default options.
///
/// Shorthand for `Compiler::new().compile(pattern)`.
///
/// # Errors
///
/// Returns a [`CompileError`] if the pattern is invalid.
pub fn compile(pattern: &serde_json::Value) -> Result<Matcher, CompileError> {
    Compiler::new().compile(pattern)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════════════════════════════════════════

/// Prelude module for convenient imports.
///
/// ```
/// use mqlite::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        compile,
        // Errors
        CompileError,
        // Core types
        CompileOptions,
        Compiler,
        Constraint,
        Directive,
        Equality,
        Error,
        MatchError,
        MatchResult,
        Matcher,
        Pattern,
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════════════════════════

/// Default maximum pattern nesting depth.
///
/// Every object, array and `match` operand adds one level. Protects the
/// recursive compiler and evaluator from stack overflow.
pub const MAX_DEPTH: usize = 128;

/// Default maximum length of a `regex` operand.
pub const MAX_REGEX_PATTERN_LENGTH: usize = 4096;

// ═══════════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// The result of evaluating a matcher. `Ok(None)` is NoMatch.
pub type MatchResult = Result<Option<serde_json::Value>, MatchError>;

/// Errors from pattern compilation.
///
/// These are caught before any data is seen. Fix the pattern and compile again.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// The `"*"` key holds something other than `"*"` or a list of names.
    #[error("invalid wildcard {found}: expected \"*\" or a list of field names")]
    InvalidWildcard {
        /// The offending value, as JSON.
        found: String,
    },
    /// A `"*"` name list holds a non-string.
    #[error("wildcard field names must be strings, found {found}")]
    InvalidWildcardKey {
        /// Kind of the offending element.
        found: ValueKind,
    },
    /// `__order__` is neither `"random"` nor `"reverse"`.
    #[error("invalid __order__ {found}: expected \"random\" or \"reverse\"")]
    InvalidOrder {
        /// The offending value, as JSON.
        found: String,
    },
    /// `__limit__` is not an integer.
    #[error("invalid __limit__ {found}: expected an integer")]
    InvalidLimit {
        /// The offending value, as JSON.
        found: String,
    },
    /// `__sort__` is not a field name.
    #[error("invalid __sort__ {found}: expected a field name")]
    InvalidSortKey {
        /// The offending value, as JSON.
        found: String,
    },
    /// A suffixed constraint was given a non-list operand.
    #[error("\"{key}\": suffix `{suffix}` requires a list operand, found {found}")]
    ExpectedList {
        /// The pattern key.
        key: String,
        /// The suffix word.
        suffix: &'static str,
        /// Kind of the operand.
        found: ValueKind,
    },
    /// A suffixed constraint was given an empty list.
    #[error("\"{key}\": suffix `{suffix}` requires a non-empty list")]
    EmptyList {
        /// The pattern key.
        key: String,
        /// The suffix word.
        suffix: &'static str,
    },
    /// An operator was given an operand it cannot use.
    #[error("\"{key}\": operator `{operator}` expects {expected}, found {found}")]
    InvalidOperand {
        /// The pattern key.
        key: String,
        /// The operator word.
        operator: &'static str,
        /// What the operator accepts.
        expected: &'static str,
        /// Kind of the operand.
        found: ValueKind,
    },
    /// An `is` operand names no known kind.
    #[error("\"{key}\": unknown type name \"{name}\"")]
    UnknownTypeName {
        /// The pattern key.
        key: String,
        /// The unknown name.
        name: String,
    },
    /// A `regex` operand failed to compile.
    #[error("invalid regex \"{pattern}\": {reason}")]
    InvalidRegex {
        /// The regex as written.
        pattern: String,
        /// The underlying error message.
        reason: String,
    },
    /// A `regex` operand is longer than the configured maximum.
    #[error("regex length is {len}, but maximum allowed is {max}")]
    PatternTooLong {
        /// Actual length of the regex.
        len: usize,
        /// Maximum allowed length.
        max: usize,
    },
    /// Pattern nesting exceeds the configured maximum.
    #[error("pattern nesting exceeds maximum depth {max}")]
    DepthExceeded {
        /// Maximum allowed depth.
        max: usize,
    },
}

/// Errors from evaluation.
///
/// Distinct from NoMatch: an error means the data could not be tested at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    /// An ordering comparison between kinds that do not order.
    #[error("cannot order {left} against {right}")]
    Incomparable {
        /// Kind of the left-hand value.
        left: ValueKind,
        /// Kind of the right-hand value.
        right: ValueKind,
    },
    /// A string operation applied to non-string data.
    #[error("`{operator}` expects string data, found {found}")]
    ExpectedString {
        /// The operator word.
        operator: &'static str,
        /// Kind of the data.
        found: ValueKind,
    },
    /// A substring test on string data with a non-string operand.
    #[error("`contain` on string data expects a string operand, found {found}")]
    SubstringOperand {
        /// Kind of the operand.
        found: ValueKind,
    },
    /// `contain` applied to data that is not an array, string or object.
    #[error("`contain` expects an array, string or object, found {found}")]
    NotAContainer {
        /// Kind of the data.
        found: ValueKind,
    },
    /// A `__sort__` key is missing from a result.
    #[error("sort key \"{key}\" is missing from a result")]
    MissingSortKey {
        /// The sort key.
        key: String,
    },
}

/// Any error from decoding, compiling or evaluating a pattern.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed JSON.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
    /// Invalid pattern.
    #[error("compile error: {0}")]
    Compile(#[from] CompileError),
    /// Data could not be tested.
    #[error("match error: {0}")]
    Match(#[from] MatchError),
}
