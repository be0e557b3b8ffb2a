//! mqlite-test: reference data and conformance fixtures
//!
//! Provides the reference data set used throughout the mqlite test suite and,
//! behind the `fixtures` feature, a runner for YAML conformance fixtures.
//!
//! # Example
//!
//! ```
//! use mqlite_test::prelude::*;
//! use serde_json::json;
//!
//! let matcher = compile(&json!([{ "name": null, "age >": 30 }])).unwrap();
//! assert_eq!(
//!     matcher.evaluate(&people()).unwrap(),
//!     Some(json!([{ "name": "John" }])),
//! );
//! ```

use serde_json::{json, Value};

#[cfg(feature = "fixtures")]
pub mod fixture;

/// The reference data set: three person records.
///
/// | name | age | student | grades | hobbies |
/// |------|-----|---------|--------|---------|
/// | Anna | 25 | yes | chemistry A, math C | reading, chess, swimming |
/// | James | 23 | no | - | chess, football, basketball |
/// | John | 35 | yes | chemistry C, english A | reading, swimming, painting |
#[must_use]
pub fn people() -> Value {
    json!([
        {
            "name": "Anna",
            "age": 25,
            "student": true,
            "grades": { "chemistry": "A", "math": "C" },
            "hobbies": ["reading", "chess", "swimming"]
        },
        {
            "name": "James",
            "age": 23,
            "student": false,
            "hobbies": ["chess", "football", "basketball"]
        },
        {
            "name": "John",
            "age": 35,
            "student": true,
            "grades": { "chemistry": "C", "english": "A" },
            "hobbies": ["reading", "swimming", "painting"]
        }
    ])
}

/// One record of [`people`] by name.
#[must_use]
pub fn person(name: &str) -> Option<Value> {
    match people() {
        Value::Array(records) => records.into_iter().find(|r| r["name"] == name),
        _ => None,
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{people, person};
    pub use mqlite::prelude::*;
}

#[cfg(test)]
mod tests {
    use super::*;
    use mqlite::prelude::*;

    fn run(pattern: Value) -> MatchResult {
        compile(&pattern).unwrap().evaluate(&people())
    }

    #[test]
    fn person_lookup() {
        assert_eq!(person("James").unwrap()["age"], json!(23));
        assert_eq!(person("Beth"), None);
    }

    #[test]
    fn null_pattern_returns_data_set() {
        assert_eq!(run(json!(null)).unwrap(), Some(people()));
    }

    #[test]
    fn projection_keeps_record_order() {
        assert_eq!(
            run(json!([{ "name": null }])).unwrap(),
            Some(json!([{ "name": "Anna" }, { "name": "James" }, { "name": "John" }]))
        );
    }

    #[test]
    fn nested_pattern_on_single_record() {
        let anna = person("Anna").unwrap();
        let matcher = compile(&json!({ "grades": { "math": null }, "hobbies contain": "chess" })).unwrap();
        assert_eq!(
            matcher.evaluate(&anna).unwrap(),
            Some(json!({ "grades": { "math": "C" } }))
        );
        let john = person("John").unwrap();
        assert_eq!(matcher.evaluate(&john).unwrap(), None);
    }

    #[test]
    fn one_law_on_reference_data() {
        // one bound holds for Anna, both for James, none for John
        let result = run(json!([{ "name": null, "age < one": [24, 30] }])).unwrap();
        assert_eq!(result, Some(json!([{ "name": "Anna" }])));
    }

    #[test]
    fn any_is_not_all() {
        let any = run(json!([{ "name": null, "hobbies contain any": ["chess", "painting"] }]));
        let all = run(json!([{ "name": null, "hobbies contain all": ["chess", "painting"] }]));
        assert_eq!(
            any.unwrap(),
            Some(json!([{ "name": "Anna" }, { "name": "James" }, { "name": "John" }]))
        );
        assert_eq!(all.unwrap(), None);
    }
}
