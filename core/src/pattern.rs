//! Pattern — a compiled pattern together with its source value

use crate::{CompileError, CompileOptions, Compiler, Error, MatchResult, Matcher};
use rand::RngCore;
use serde_json::Value;
use std::str::FromStr;

/// A compiled pattern.
///
/// Keeps the decoded source value next to the compiled [`Matcher`], so callers
/// can echo or re-serialize what they compiled.
///
/// # Example
///
/// ```
/// use mqlite::Pattern;
/// use serde_json::json;
///
/// let pattern = Pattern::from_json(r#"[{"name": null, "hobbies contain": "chess"}]"#).unwrap();
/// let people = json!([
///     { "name": "Anna", "hobbies": ["reading", "chess"] },
///     { "name": "James", "hobbies": ["football"] },
/// ]);
///
/// assert_eq!(pattern.evaluate(&people).unwrap(), Some(json!([{ "name": "Anna" }])));
/// ```
#[derive(Debug, Clone)]
pub struct Pattern {
    source: Value,
    matcher: Matcher,
}

impl Pattern {
    /// Compile a decoded pattern with default options.
    ///
    /// # Errors
    ///
    /// Returns a [`CompileError`] if the pattern is invalid.
    pub fn new(source: Value) -> Result<Self, CompileError> {
        Self::with_options(source, CompileOptions::default())
    }

    /// Compile a decoded pattern with the given options.
    ///
    /// # Errors
    ///
    /// Returns a [`CompileError`] if the pattern is invalid.
    pub fn with_options(source: Value, options: CompileOptions) -> Result<Self, CompileError> {
        let matcher = Compiler::with_options(options).compile(&source)?;
        Ok(Self { source, matcher })
    }

    /// Decode JSON text (keeping object key order) and compile it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] for malformed JSON and [`Error::Compile`] for
    /// an invalid pattern.
    pub fn from_json(text: &str) -> Result<Self, Error> {
        let source: Value = serde_json::from_str(text)?;
        Ok(Self::new(source)?)
    }

    /// Evaluate against `data` using the thread-local random source.
    ///
    /// # Errors
    ///
    /// See [`Matcher::evaluate`].
    pub fn evaluate(&self, data: &Value) -> MatchResult {
        self.matcher.evaluate(data)
    }

    /// Evaluate against `data` with an explicit random source.
    ///
    /// # Errors
    ///
    /// See [`Matcher::evaluate`].
    pub fn evaluate_with_rng(&self, data: &Value, rng: &mut dyn RngCore) -> MatchResult {
        self.matcher.evaluate_with_rng(data, rng)
    }

    /// The decoded pattern this was compiled from.
    #[must_use]
    pub fn source(&self) -> &Value {
        &self.source
    }

    /// The compiled matcher tree.
    #[must_use]
    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }
}

impl FromStr for Pattern {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_json(s)
    }
}
