//! Matcher — the compiled pattern tree
//!
//! A `Matcher` is built once by the [`Compiler`](crate::Compiler) and then
//! evaluated against any number of data values. Evaluation produces either a
//! derived value (a projected copy of the matching data) or NoMatch.
//!
//! # Object semantics
//!
//! 1. The data must be an object.
//! 2. Every field constraint must find its field and hold.
//! 3. Every field matcher must find its field and match; its result is
//!    projected into the output under the same key.
//! 4. The wildcard copies extra data fields that are not already projected.
//!
//! Constraint-only fields are never projected.
//!
//! # Array semantics
//!
//! Each element matcher is run against every data element. Its results are
//! post-processed by the element matcher's directives (object patterns only)
//! and concatenated into the output. An element matcher with no results makes
//! the whole array NoMatch.

use crate::value::{self, Equality};
use crate::{Constraint, Directive, MatchError, MatchResult};
use rand::RngCore;
use serde_json::{Map, Value};

/// A compiled pattern node.
///
/// `Matcher` is `Send + Sync`; evaluation never mutates it, so one compiled
/// tree can be shared across threads and reused indefinitely.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// `null` pattern: matches anything, returns the data unchanged.
    Any,
    /// Scalar pattern: matches a value equal to `value`.
    Equal {
        /// The expected value.
        value: Value,
        /// Boolean/number model.
        equality: Equality,
    },
    /// `{}` pattern: matches an empty object only.
    EmptyObject,
    /// `[]` pattern: matches an empty array only.
    EmptyArray,
    /// Non-empty object pattern.
    Object(ObjectMatcher),
    /// Non-empty array pattern: one matcher per pattern element.
    Array(Vec<Matcher>),
}

impl Matcher {
    /// Evaluate this matcher using the thread-local random source.
    ///
    /// Returns `Ok(None)` on NoMatch.
    ///
    /// # Errors
    ///
    /// Returns a [`MatchError`] when a constraint or directive cannot be
    /// applied to the data at all.
    ///
    /// # Example
    ///
    /// ```
    /// use mqlite::compile;
    /// use serde_json::json;
    ///
    /// let matcher = compile(&json!({ "name": null, "age >": 24 })).unwrap();
    ///
    /// let anna = json!({ "name": "Anna", "age": 25 });
    /// assert_eq!(matcher.evaluate(&anna).unwrap(), Some(json!({ "name": "Anna" })));
    ///
    /// let james = json!({ "name": "James", "age": 23 });
    /// assert_eq!(matcher.evaluate(&james).unwrap(), None);
    /// ```
    pub fn evaluate(&self, data: &Value) -> MatchResult {
        self.evaluate_with_rng(data, &mut rand::thread_rng())
    }

    /// Evaluate this matcher with an explicit random source.
    ///
    /// `rng` is only consumed by `__order__: "random"` directives.
    ///
    /// # Errors
    ///
    /// See [`Matcher::evaluate`].
    pub fn evaluate_with_rng(&self, data: &Value, rng: &mut dyn RngCore) -> MatchResult {
        match self {
            Self::Any => Ok(Some(data.clone())),
            Self::Equal { value, equality } => {
                Ok(value::equals(data, value, *equality).then(|| data.clone()))
            }
            Self::EmptyObject => Ok(data
                .as_object()
                .is_some_and(Map::is_empty)
                .then(|| data.clone())),
            Self::EmptyArray => Ok(data
                .as_array()
                .is_some_and(Vec::is_empty)
                .then(|| data.clone())),
            Self::Object(object) => object.evaluate(data, rng),
            Self::Array(elements) => evaluate_array(elements, data, rng),
        }
    }

    /// The directives attached to this matcher. Only object matchers carry any.
    #[must_use]
    pub fn directives(&self) -> &[Directive] {
        match self {
            Self::Object(object) => &object.directives,
            _ => &[],
        }
    }

    /// Maximum nesting depth of this tree, counting this node as 1.
    ///
    /// Sub-patterns compiled from `match` operands count toward depth.
    #[must_use]
    pub fn depth(&self) -> usize {
        let children = match self {
            Self::Object(object) => object
                .fields
                .iter()
                .map(|(_, m)| m.depth())
                .chain(object.constraints.iter().map(|(_, c)| constraint_depth(c)))
                .max()
                .unwrap_or(0),
            Self::Array(elements) => elements.iter().map(Matcher::depth).max().unwrap_or(0),
            _ => 0,
        };
        1 + children
    }
}

fn constraint_depth(constraint: &Constraint) -> usize {
    match constraint {
        Constraint::Match(matcher) => matcher.depth(),
        Constraint::Not(inner) => constraint_depth(inner),
        Constraint::All(list) | Constraint::Any(list) | Constraint::One(list) => {
            list.iter().map(constraint_depth).max().unwrap_or(0)
        }
        Constraint::And(a, b) => constraint_depth(a).max(constraint_depth(b)),
        _ => 0,
    }
}

fn evaluate_array(elements: &[Matcher], data: &Value, rng: &mut dyn RngCore) -> MatchResult {
    let Some(items) = data.as_array() else {
        return Ok(None);
    };

    let mut output = Vec::new();
    for element in elements {
        let mut results = Vec::new();
        for item in items {
            if let Some(result) = element.evaluate_with_rng(item, rng)? {
                results.push(result);
            }
        }

        for directive in element.directives() {
            results = directive.apply(results, rng)?;
        }

        if results.is_empty() {
            return Ok(None);
        }
        output.append(&mut results);
    }

    Ok(Some(Value::Array(output)))
}

/// Which extra data fields an object pattern copies into its output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Wildcard {
    /// No `"*"` key: project matched fields only.
    #[default]
    None,
    /// `"*": "*"`: copy every remaining data field.
    All,
    /// `"*": [..]`: copy these fields when present.
    Keys(Vec<String>),
}

/// A compiled non-empty object pattern.
///
/// Field matchers and field constraints are ordered association lists: keys
/// keep the order in which they were first declared in the pattern.
#[derive(Debug, Clone, Default)]
pub struct ObjectMatcher {
    /// Field matchers, in declared order.
    pub fields: Vec<(String, Matcher)>,
    /// Field constraints, in first-registration order.
    pub constraints: Vec<(String, Constraint)>,
    /// Directives, in declared order.
    pub directives: Vec<Directive>,
    /// Extra-field projection.
    pub wildcard: Wildcard,
}

impl ObjectMatcher {
    /// Create an empty object matcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field matcher.
    pub fn add_field(&mut self, field: impl Into<String>, matcher: Matcher) {
        let field = field.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some((_, existing)) => *existing = matcher,
            None => self.fields.push((field, matcher)),
        }
    }

    /// Add a field constraint.
    ///
    /// A second constraint on the same field is combined with the first as
    /// `And(new, existing)`; the field keeps its original position.
    pub fn add_constraint(&mut self, field: impl Into<String>, constraint: Constraint) {
        let field = field.into();
        match self.constraints.iter().position(|(name, _)| *name == field) {
            Some(index) => {
                let (field, previous) = self.constraints.remove(index);
                self.constraints.insert(index, (field, constraint.and(previous)));
            }
            None => self.constraints.push((field, constraint)),
        }
    }

    /// Append a directive.
    pub fn add_directive(&mut self, directive: Directive) {
        self.directives.push(directive);
    }

    /// Returns the constraint registered for `field`, if any.
    #[must_use]
    pub fn constraint(&self, field: &str) -> Option<&Constraint> {
        self.constraints
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, c)| c)
    }

    /// Returns the field matcher registered for `field`, if any.
    #[must_use]
    pub fn field(&self, field: &str) -> Option<&Matcher> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, m)| m)
    }

    fn evaluate(&self, data: &Value, rng: &mut dyn RngCore) -> MatchResult {
        let Some(members) = data.as_object() else {
            return Ok(None);
        };

        for (field, constraint) in &self.constraints {
            let Some(value) = members.get(field) else {
                return Ok(None);
            };
            if !constraint.evaluate(value, rng)? {
                return Ok(None);
            }
        }

        let mut output = Map::new();
        for (field, matcher) in &self.fields {
            let Some(value) = members.get(field) else {
                return Ok(None);
            };
            match matcher.evaluate_with_rng(value, rng)? {
                Some(result) => {
                    output.insert(field.clone(), result);
                }
                None => return Ok(None),
            }
        }

        match &self.wildcard {
            Wildcard::None => {}
            Wildcard::All => {
                for (field, value) in members {
                    output
                        .entry(field.clone())
                        .or_insert_with(|| value.clone());
                }
            }
            Wildcard::Keys(keys) => {
                for field in keys {
                    if let Some(value) = members.get(field) {
                        output
                            .entry(field.clone())
                            .or_insert_with(|| value.clone());
                    }
                }
            }
        }

        Ok(Some(Value::Object(output)))
    }
}
