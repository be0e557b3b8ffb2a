//! Compiler — turns a pattern value into a [`Matcher`] tree
//!
//! The compiler walks the pattern once. Scalars become equality matchers,
//! `null` becomes the match-anything matcher, and object keys are classified
//! by the [key grammar](crate::classify) into wildcard, directive, constraint
//! or field entries.
//!
//! Every operand is validated here, so evaluation only fails on properties of
//! the data (see [`MatchError`](crate::MatchError)).

use crate::key::{self, ConstraintKey, DirectiveKey, KeyKind, Operator, Suffix};
use crate::value::{TypeName, ValueKind};
use crate::{
    CompileError, CompileOptions, Constraint, Directive, Matcher, ObjectMatcher, Wildcard,
};
use regex::Regex;
use serde_json::{Map, Value};

/// Pattern compiler.
///
/// A `Compiler` only holds its [`CompileOptions`]; it can compile any number
/// of patterns.
///
/// # Example
///
/// ```
/// use mqlite::{Compiler, CompileOptions, Equality};
/// use serde_json::json;
///
/// let loose = CompileOptions { equality: Equality::Loose, ..CompileOptions::default() };
/// let matcher = Compiler::with_options(loose).compile(&json!({ "flag ==": 1 })).unwrap();
///
/// assert!(matcher.evaluate(&json!({ "flag": true })).unwrap().is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    options: CompileOptions,
}

impl Compiler {
    /// Create a compiler with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a compiler with the given options.
    #[must_use]
    pub fn with_options(options: CompileOptions) -> Self {
        Self { options }
    }

    /// The options this compiler was built with.
    #[must_use]
    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Compile a pattern.
    ///
    /// # Errors
    ///
    /// - [`CompileError::InvalidWildcard`]: `"*"` value is neither `"*"` nor a list of names
    /// - [`CompileError::InvalidLimit`], [`CompileError::InvalidOrder`],
    ///   [`CompileError::InvalidSortKey`]: bad directive value
    /// - [`CompileError::ExpectedList`], [`CompileError::EmptyList`]: bad suffixed operand
    /// - [`CompileError::InvalidOperand`], [`CompileError::UnknownTypeName`],
    ///   [`CompileError::InvalidRegex`], [`CompileError::PatternTooLong`]: bad operand
    /// - [`CompileError::DepthExceeded`]: nesting exceeds `max_depth`
    pub fn compile(&self, pattern: &Value) -> Result<Matcher, CompileError> {
        self.compile_at(pattern, 1)
    }

    fn compile_at(&self, pattern: &Value, depth: usize) -> Result<Matcher, CompileError> {
        if depth > self.options.max_depth {
            return Err(CompileError::DepthExceeded {
                max: self.options.max_depth,
            });
        }

        match pattern {
            Value::Null => Ok(Matcher::Any),
            Value::Bool(_) | Value::Number(_) | Value::String(_) => Ok(Matcher::Equal {
                value: pattern.clone(),
                equality: self.options.equality,
            }),
            Value::Object(members) if members.is_empty() => Ok(Matcher::EmptyObject),
            Value::Array(elements) if elements.is_empty() => Ok(Matcher::EmptyArray),
            Value::Array(elements) => elements
                .iter()
                .map(|element| self.compile_at(element, depth + 1))
                .collect::<Result<Vec<_>, _>>()
                .map(Matcher::Array),
            Value::Object(members) => self.compile_object(members, depth).map(Matcher::Object),
        }
    }

    fn compile_object(
        &self,
        members: &Map<String, Value>,
        depth: usize,
    ) -> Result<ObjectMatcher, CompileError> {
        let mut object = ObjectMatcher::new();

        for (key, value) in members {
            let kind = key::classify(key);
            tracing::trace!(key = %key, kind = ?kind, "classified pattern key");

            match kind {
                KeyKind::Wildcard => object.wildcard = wildcard(value)?,
                KeyKind::Directive(directive) => {
                    object.add_directive(self.directive(directive, value)?);
                }
                KeyKind::Constraint(parsed) => {
                    let constraint = self.constraint(key, &parsed, value, depth)?;
                    object.add_constraint(parsed.field, constraint);
                }
                KeyKind::Field(field) => {
                    object.add_field(field, self.compile_at(value, depth + 1)?);
                }
            }
        }

        tracing::debug!(
            depth,
            fields = object.fields.len(),
            constraints = object.constraints.len(),
            directives = object.directives.len(),
            wildcard = ?object.wildcard,
            "compiled object pattern"
        );
        Ok(object)
    }

    fn directive(&self, directive: DirectiveKey, value: &Value) -> Result<Directive, CompileError> {
        match directive {
            DirectiveKey::Limit => value
                .as_i64()
                .map(Directive::Limit)
                .ok_or_else(|| CompileError::InvalidLimit {
                    found: value.to_string(),
                }),
            DirectiveKey::Order => match value.as_str() {
                Some("random") => Ok(Directive::RandomOrder),
                Some("reverse") => Ok(Directive::ReverseOrder),
                _ => Err(CompileError::InvalidOrder {
                    found: value.to_string(),
                }),
            },
            DirectiveKey::Sort => match value {
                Value::String(key) => Ok(Directive::Sort {
                    key: key.clone(),
                    equality: self.options.equality,
                }),
                other => Err(CompileError::InvalidSortKey {
                    found: other.to_string(),
                }),
            },
        }
    }

    fn constraint(
        &self,
        key: &str,
        parsed: &ConstraintKey<'_>,
        operand: &Value,
        depth: usize,
    ) -> Result<Constraint, CompileError> {
        let constraint = match parsed.suffix {
            None => self.operator(key, parsed.operator, operand, depth)?,
            Some(suffix) => {
                let Value::Array(operands) = operand else {
                    return Err(CompileError::ExpectedList {
                        key: key.to_string(),
                        suffix: suffix.keyword(),
                        found: ValueKind::of(operand),
                    });
                };
                if operands.is_empty() {
                    return Err(CompileError::EmptyList {
                        key: key.to_string(),
                        suffix: suffix.keyword(),
                    });
                }
                let constraints = operands
                    .iter()
                    .map(|element| self.operator(key, parsed.operator, element, depth))
                    .collect::<Result<Vec<_>, _>>()?;
                match suffix {
                    Suffix::All => Constraint::All(constraints),
                    Suffix::Any => Constraint::Any(constraints),
                    Suffix::One => Constraint::One(constraints),
                }
            }
        };

        Ok(match parsed.prefix {
            Some(_) => Constraint::Not(Box::new(constraint)),
            None => constraint,
        })
    }

    fn operator(
        &self,
        key: &str,
        operator: Operator,
        operand: &Value,
        depth: usize,
    ) -> Result<Constraint, CompileError> {
        let equality = self.options.equality;
        let operand_value = || operand.clone();

        Ok(match operator {
            Operator::GreaterThan => Constraint::GreaterThan {
                operand: operand_value(),
                equality,
            },
            Operator::GreaterOrEqual => Constraint::GreaterOrEqual {
                operand: operand_value(),
                equality,
            },
            Operator::LessThan => Constraint::LessThan {
                operand: operand_value(),
                equality,
            },
            Operator::LessOrEqual => Constraint::LessOrEqual {
                operand: operand_value(),
                equality,
            },
            Operator::Equal => Constraint::Equal {
                operand: operand_value(),
                equality,
            },
            Operator::NotEqual => Constraint::NotEqual {
                operand: operand_value(),
                equality,
            },
            Operator::Regex => match operand {
                Value::String(pattern) => Constraint::Regex(self.regex(pattern)?),
                other => return Err(invalid_operand(key, operator, "a string", other)),
            },
            Operator::In => match operand {
                Value::Array(_) | Value::String(_) | Value::Object(_) => Constraint::In {
                    operand: operand_value(),
                    equality,
                },
                other => {
                    return Err(invalid_operand(
                        key,
                        operator,
                        "an array, string or object",
                        other,
                    ))
                }
            },
            Operator::Contain => Constraint::Contain {
                operand: operand_value(),
                equality,
            },
            Operator::Is => match operand {
                Value::String(name) => Constraint::Is(TypeName::parse(name).ok_or_else(|| {
                    CompileError::UnknownTypeName {
                        key: key.to_string(),
                        name: name.clone(),
                    }
                })?),
                other => return Err(invalid_operand(key, operator, "a type name", other)),
            },
            Operator::Match => Constraint::Match(Box::new(self.compile_at(operand, depth + 1)?)),
        })
    }

    fn regex(&self, pattern: &str) -> Result<Regex, CompileError> {
        let max = self.options.max_regex_length;
        if pattern.len() > max {
            return Err(CompileError::PatternTooLong {
                len: pattern.len(),
                max,
            });
        }
        Regex::new(pattern).map_err(|err| CompileError::InvalidRegex {
            pattern: pattern.to_string(),
            reason: err.to_string(),
        })
    }
}

fn wildcard(value: &Value) -> Result<Wildcard, CompileError> {
    match value {
        Value::String(s) if s == key::WILDCARD => Ok(Wildcard::All),
        Value::Array(names) => names
            .iter()
            .map(|name| match name {
                Value::String(s) => Ok(s.clone()),
                other => Err(CompileError::InvalidWildcardKey {
                    found: ValueKind::of(other),
                }),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Wildcard::Keys),
        other => Err(CompileError::InvalidWildcard {
            found: other.to_string(),
        }),
    }
}

fn invalid_operand(
    key: &str,
    operator: Operator,
    expected: &'static str,
    found: &Value,
) -> CompileError {
    CompileError::InvalidOperand {
        key: key.to_string(),
        operator: operator.keyword(),
        expected,
        found: ValueKind::of(found),
    }
}
