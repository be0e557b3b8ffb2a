//! Constraint — Boolean tests on a single field value
//!
//! Constraints come from keys such as `"age >"` or `"hobbies not contain any"`.
//! They filter the enclosing object without projecting the field into the
//! output.
//!
//! Leaf constraints test the data against one operand. Combinators compose
//! them:
//!
//! - `Not`: inverts the inner constraint (`not` prefix)
//! - `All`: every constraint holds; short-circuits on the first `false`
//! - `Any`: some constraint holds; short-circuits on the first `true`
//! - `One`: exactly one holds; short-circuits on the second `true`
//! - `And`: two constraints declared for the same field; short-circuits on
//!   the first `false`

use crate::value::{self, Equality, TypeName, ValueKind};
use crate::{MatchError, Matcher};
use rand::RngCore;
use regex::Regex;
use serde_json::Value;

/// A compiled constraint.
///
/// Evaluation never mutates the constraint; the same tree is reused across
/// every call.
#[derive(Debug, Clone)]
pub enum Constraint {
    /// `data > operand`
    GreaterThan {
        /// Right-hand side.
        operand: Value,
        /// Boolean/number model.
        equality: Equality,
    },
    /// `data >= operand`
    GreaterOrEqual {
        /// Right-hand side.
        operand: Value,
        /// Boolean/number model.
        equality: Equality,
    },
    /// `data < operand`
    LessThan {
        /// Right-hand side.
        operand: Value,
        /// Boolean/number model.
        equality: Equality,
    },
    /// `data <= operand`
    LessOrEqual {
        /// Right-hand side.
        operand: Value,
        /// Boolean/number model.
        equality: Equality,
    },
    /// `data == operand`
    Equal {
        /// Right-hand side.
        operand: Value,
        /// Boolean/number model.
        equality: Equality,
    },
    /// `data != operand`
    NotEqual {
        /// Right-hand side.
        operand: Value,
        /// Boolean/number model.
        equality: Equality,
    },
    /// The data is a string with a prefix matching the regex.
    ///
    /// The match must begin at the start of the data; it may end anywhere.
    Regex(Regex),
    /// The data is an element of the operand list, a substring of the operand
    /// string, or a key of the operand object.
    In {
        /// The container searched.
        operand: Value,
        /// Boolean/number model.
        equality: Equality,
    },
    /// The operand is an element of the data array, a substring of the data
    /// string, or a key of the data object.
    Contain {
        /// The value searched for.
        operand: Value,
        /// Boolean/number model.
        equality: Equality,
    },
    /// The data has the named kind.
    Is(TypeName),
    /// The sub-pattern matches the data.
    Match(Box<Matcher>),
    /// Inverts the inner constraint.
    Not(Box<Constraint>),
    /// Every constraint holds.
    All(Vec<Constraint>),
    /// At least one constraint holds.
    Any(Vec<Constraint>),
    /// Exactly one constraint holds.
    One(Vec<Constraint>),
    /// Both constraints hold; the first is evaluated first.
    And(Box<Constraint>, Box<Constraint>),
}

impl Constraint {
    /// Evaluate this constraint against a field value.
    ///
    /// `rng` feeds `__order__: "random"` directives inside `match` sub-patterns.
    ///
    /// # Errors
    ///
    /// Returns a [`MatchError`] when the data cannot be tested at all, e.g.
    /// `regex` against a number or `>` between a string and a number.
    pub fn evaluate(&self, data: &Value, rng: &mut dyn RngCore) -> Result<bool, MatchError> {
        match self {
            Self::GreaterThan { operand, equality } => {
                Ok(value::compare(data, operand, *equality)?.is_gt())
            }
            Self::GreaterOrEqual { operand, equality } => {
                Ok(value::compare(data, operand, *equality)?.is_ge())
            }
            Self::LessThan { operand, equality } => {
                Ok(value::compare(data, operand, *equality)?.is_lt())
            }
            Self::LessOrEqual { operand, equality } => {
                Ok(value::compare(data, operand, *equality)?.is_le())
            }
            Self::Equal { operand, equality } => Ok(value::equals(data, operand, *equality)),
            Self::NotEqual { operand, equality } => Ok(!value::equals(data, operand, *equality)),
            Self::Regex(regex) => match data {
                // leftmost-first: a match at offset 0 is found whenever one exists
                Value::String(s) => Ok(regex.find(s).is_some_and(|m| m.start() == 0)),
                other => Err(MatchError::ExpectedString {
                    operator: "regex",
                    found: ValueKind::of(other),
                }),
            },
            Self::In { operand, equality } => membership(data, operand, *equality),
            Self::Contain { operand, equality } => containment(data, operand, *equality),
            Self::Is(type_name) => Ok(type_name.accepts(data)),
            Self::Match(matcher) => Ok(matcher.evaluate_with_rng(data, rng)?.is_some()),
            Self::Not(inner) => Ok(!inner.evaluate(data, rng)?),
            Self::All(constraints) => {
                for constraint in constraints {
                    if !constraint.evaluate(data, rng)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Self::Any(constraints) => {
                for constraint in constraints {
                    if constraint.evaluate(data, rng)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Self::One(constraints) => {
                let mut matched = false;
                for constraint in constraints {
                    if constraint.evaluate(data, rng)? {
                        if matched {
                            return Ok(false);
                        }
                        matched = true;
                    }
                }
                Ok(matched)
            }
            Self::And(first, second) => {
                Ok(first.evaluate(data, rng)? && second.evaluate(data, rng)?)
            }
        }
    }

    /// Combine a newly declared constraint with one already registered for
    /// the same field. The new constraint runs first.
    #[must_use]
    pub fn and(self, previous: Constraint) -> Self {
        Self::And(Box::new(self), Box::new(previous))
    }

    /// Returns `true` if this is a `Not` combinator.
    #[must_use]
    pub fn is_not(&self) -> bool {
        matches!(self, Self::Not(_))
    }

    /// Returns `true` if this is an `And` combinator.
    #[must_use]
    pub fn is_and(&self) -> bool {
        matches!(self, Self::And(..))
    }
}

/// `data in operand`
fn membership(data: &Value, operand: &Value, equality: Equality) -> Result<bool, MatchError> {
    match operand {
        Value::Array(items) => Ok(items.iter().any(|item| value::equals(data, item, equality))),
        Value::String(haystack) => match data {
            Value::String(needle) => Ok(haystack.contains(needle.as_str())),
            other => Err(MatchError::ExpectedString {
                operator: "in",
                found: ValueKind::of(other),
            }),
        },
        Value::Object(members) => match data {
            Value::String(key) => Ok(members.contains_key(key.as_str())),
            // containers can never be keys; scalars simply are not
            Value::Array(_) | Value::Object(_) => Err(MatchError::ExpectedString {
                operator: "in",
                found: ValueKind::of(data),
            }),
            _ => Ok(false),
        },
        // other operand kinds are rejected at compile time
        _ => Ok(false),
    }
}

/// `operand in data`
fn containment(data: &Value, operand: &Value, equality: Equality) -> Result<bool, MatchError> {
    match data {
        Value::Array(items) => Ok(items.iter().any(|item| value::equals(item, operand, equality))),
        Value::String(haystack) => match operand {
            Value::String(needle) => Ok(haystack.contains(needle.as_str())),
            other => Err(MatchError::SubstringOperand {
                found: ValueKind::of(other),
            }),
        },
        Value::Object(members) => Ok(operand.as_str().is_some_and(|key| members.contains_key(key))),
        other => Err(MatchError::NotAContainer {
            found: ValueKind::of(other),
        }),
    }
}
