//! Directive — post-processing over a list match
//!
//! Directives come from `__limit__`, `__order__` and `__sort__` keys on an
//! object pattern that sits inside an array pattern. They never test data;
//! they reshape the sequence of results that object pattern produced.

use crate::value::{self, Equality};
use crate::MatchError;
use rand::seq::SliceRandom;
use rand::RngCore;
use serde_json::Value;
use std::cmp::Ordering;

/// A compiled directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Keep `results[0..n]`. A negative `n` drops the last `|n|` results.
    Limit(i64),
    /// Stable ascending sort by the value each result holds at `key`.
    Sort {
        /// Field read from every result.
        key: String,
        /// Boolean/number model used for comparisons.
        equality: Equality,
    },
    /// Shuffle with the caller's random source.
    RandomOrder,
    /// Reverse the sequence.
    ReverseOrder,
}

impl Directive {
    /// Apply this directive to a result sequence.
    ///
    /// # Errors
    ///
    /// `Sort` fails with [`MatchError::MissingSortKey`] if a result is not an
    /// object holding `key`, or with [`MatchError::Incomparable`] if two sort
    /// values cannot be ordered.
    pub fn apply(
        &self,
        mut results: Vec<Value>,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Value>, MatchError> {
        tracing::trace!(directive = ?self, len = results.len(), "applying directive");
        match self {
            Self::Limit(n) => {
                results.truncate(limit_len(results.len(), *n));
                Ok(results)
            }
            Self::Sort { key, equality } => sort_by_key(results, key, *equality),
            Self::RandomOrder => {
                results.shuffle(rng);
                Ok(results)
            }
            Self::ReverseOrder => {
                results.reverse();
                Ok(results)
            }
        }
    }
}

/// Length kept by `[0:n]` slicing of a sequence of length `len`.
fn limit_len(len: usize, n: i64) -> usize {
    let magnitude = usize::try_from(n.unsigned_abs()).unwrap_or(usize::MAX);
    if n >= 0 {
        len.min(magnitude)
    } else {
        len.saturating_sub(magnitude)
    }
}

fn sort_by_key(
    mut results: Vec<Value>,
    key: &str,
    equality: Equality,
) -> Result<Vec<Value>, MatchError> {
    if results.iter().any(|result| result.get(key).is_none()) {
        return Err(MatchError::MissingSortKey {
            key: key.to_string(),
        });
    }

    let mut failure = None;
    results.sort_by(|a, b| {
        // both lookups were checked above
        let (Some(a), Some(b)) = (a.get(key), b.get(key)) else {
            return Ordering::Equal;
        };
        match value::compare(a, b, equality) {
            Ok(ordering) => ordering,
            Err(err) => {
                failure.get_or_insert(err);
                Ordering::Equal
            }
        }
    });

    match failure {
        Some(err) => Err(err),
        None => Ok(results),
    }
}
