//! Key grammar — how pattern object keys are classified
//!
//! Every key of a pattern object is one of:
//!
//! | Kind | Example | Meaning |
//! |------|---------|---------|
//! | wildcard | `"*"` | copy extra input fields into the output |
//! | directive | `"__limit__"` | post-process the results of a list match |
//! | constraint | `"age >"`, `"hobbies not contain any"` | filter on a field without projecting it |
//! | field | `"name"` | match and project a field |
//!
//! Constraint keys read `<field> [not] <operator> [all|any|one]`. They are
//! recovered right to left by stripping one space-separated word at a time:
//! suffix first, then operator, then prefix. A key is a constraint only if an
//! operator was found and a non-empty field name is left; anything else is a
//! plain field name, including keys such as `"x all"` or `" >"`.

use std::fmt;

/// The wildcard key, also the "every field" wildcard value.
pub const WILDCARD: &str = "*";

/// A constraint operator word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterOrEqual,
    /// `<`
    LessThan,
    /// `<=`
    LessOrEqual,
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `regex`: the operand regex matches a prefix of the data string.
    Regex,
    /// `in`: the data is an element of the operand.
    In,
    /// `contain`: the operand is an element of the data.
    Contain,
    /// `is`: the data has the named kind.
    Is,
    /// `match`: the operand, compiled as a pattern, matches the data.
    Match,
}

impl Operator {
    /// Every operator, in keyword-table order.
    pub const ALL: [Operator; 11] = [
        Operator::GreaterThan,
        Operator::GreaterOrEqual,
        Operator::LessThan,
        Operator::LessOrEqual,
        Operator::Equal,
        Operator::NotEqual,
        Operator::Regex,
        Operator::In,
        Operator::Contain,
        Operator::Is,
        Operator::Match,
    ];

    /// The word that spells this operator in a key.
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            Self::GreaterThan => ">",
            Self::GreaterOrEqual => ">=",
            Self::LessThan => "<",
            Self::LessOrEqual => "<=",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Regex => "regex",
            Self::In => "in",
            Self::Contain => "contain",
            Self::Is => "is",
            Self::Match => "match",
        }
    }

    /// Look up an operator by its keyword.
    #[must_use]
    pub fn from_keyword(word: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.keyword() == word)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A constraint prefix word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Prefix {
    /// `not`: negate the constraint.
    Not,
}

impl Prefix {
    /// The word that spells this prefix in a key.
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Not => "not",
        }
    }

    /// Look up a prefix by its keyword.
    #[must_use]
    pub fn from_keyword(word: &str) -> Option<Self> {
        (word == "not").then_some(Self::Not)
    }
}

/// A constraint suffix word. A suffixed constraint takes a list operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Suffix {
    /// `all`: every element constraint holds.
    All,
    /// `any`: at least one element constraint holds.
    Any,
    /// `one`: exactly one element constraint holds.
    One,
}

impl Suffix {
    /// The word that spells this suffix in a key.
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Any => "any",
            Self::One => "one",
        }
    }

    /// Look up a suffix by its keyword.
    #[must_use]
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "all" => Some(Self::All),
            "any" => Some(Self::Any),
            "one" => Some(Self::One),
            _ => None,
        }
    }
}

/// A directive key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectiveKey {
    /// `__limit__`: keep the first N results.
    Limit,
    /// `__order__`: `"random"` or `"reverse"`.
    Order,
    /// `__sort__`: sort results by a field.
    Sort,
}

impl DirectiveKey {
    /// The key that spells this directive.
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Limit => "__limit__",
            Self::Order => "__order__",
            Self::Sort => "__sort__",
        }
    }

    /// Look up a directive by its key.
    #[must_use]
    pub fn from_keyword(key: &str) -> Option<Self> {
        match key {
            "__limit__" => Some(Self::Limit),
            "__order__" => Some(Self::Order),
            "__sort__" => Some(Self::Sort),
            _ => None,
        }
    }
}

/// A parsed constraint key: `<field> [prefix] <operator> [suffix]`.
///
/// # Example
///
/// ```
/// use mqlite::{ConstraintKey, Operator, Prefix, Suffix};
///
/// let key = ConstraintKey::parse("hobbies not contain any").unwrap();
/// assert_eq!(key.field, "hobbies");
/// assert_eq!(key.prefix, Some(Prefix::Not));
/// assert_eq!(key.operator, Operator::Contain);
/// assert_eq!(key.suffix, Some(Suffix::Any));
///
/// assert!(ConstraintKey::parse("name").is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstraintKey<'a> {
    /// The constrained field name. May itself contain spaces.
    pub field: &'a str,
    /// Optional negation.
    pub prefix: Option<Prefix>,
    /// The operator.
    pub operator: Operator,
    /// Optional list combinator.
    pub suffix: Option<Suffix>,
}

impl<'a> ConstraintKey<'a> {
    /// Parse a key, returning `None` if it is not a constraint key.
    #[must_use]
    pub fn parse(key: &'a str) -> Option<Self> {
        let (rest, suffix) = split_trailing_word(key, Suffix::from_keyword);
        let (rest, operator) = split_trailing_word(rest, Operator::from_keyword);
        let (field, prefix) = split_trailing_word(rest, Prefix::from_keyword);

        let operator = operator?;
        if field.is_empty() {
            return None;
        }

        Some(Self {
            field,
            prefix,
            operator,
            suffix,
        })
    }
}

/// The classification of one pattern object key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind<'a> {
    /// The `"*"` wildcard marker.
    Wildcard,
    /// A directive key.
    Directive(DirectiveKey),
    /// A constraint key.
    Constraint(ConstraintKey<'a>),
    /// A plain field name (the whole key).
    Field(&'a str),
}

/// Classify a pattern object key.
///
/// Checked in order: wildcard, directive, constraint, field.
#[must_use]
pub fn classify(key: &str) -> KeyKind<'_> {
    if key == WILDCARD {
        return KeyKind::Wildcard;
    }
    if let Some(directive) = DirectiveKey::from_keyword(key) {
        return KeyKind::Directive(directive);
    }
    match ConstraintKey::parse(key) {
        Some(constraint) => KeyKind::Constraint(constraint),
        None => KeyKind::Field(key),
    }
}

/// Split `"this is a text word"` into `("this is a text", Some(word))` when the
/// last space-separated word is recognized by `lookup`.
fn split_trailing_word<T>(text: &str, lookup: impl Fn(&str) -> Option<T>) -> (&str, Option<T>) {
    match text.rsplit_once(' ') {
        Some((head, word)) => match lookup(word) {
            Some(found) => (head, Some(found)),
            None => (text, None),
        },
        None => (text, None),
    }
}
