//! Conformance test fixture runner
//!
//! Loads YAML fixtures and runs them against the mqlite engine.
//!
//! ```yaml
//! name: constraints
//! description: constraint operators on the reference data
//! options:            # optional CompileOptions
//!   equality: loose
//! data: [...]         # optional, defaults to the reference data set
//! cases:
//!   - name: age_above
//!     pattern: [{ name: null, "age >": 30 }]
//!     expect: [{ name: John }]
//!   - name: bad_order
//!     pattern: [{ "__order__": sideways }]
//!     outcome: compile_error
//! ```

use mqlite::{CompileOptions, Compiler};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;

/// Seed for `__order__: random` in fixtures.
pub const FIXTURE_SEED: u64 = 0x6d71_6c69_7465;

/// A complete test fixture
#[derive(Debug, Deserialize)]
pub struct Fixture {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub options: CompileOptions,
    #[serde(default = "crate::people")]
    pub data: Value,
    pub cases: Vec<TestCase>,
}

/// Test case
#[derive(Debug, Deserialize)]
pub struct TestCase {
    pub name: String,
    pub pattern: Value,
    /// Overrides the fixture data for this case.
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub outcome: Outcome,
    /// Expected result when `outcome` is `matched`.
    #[serde(default)]
    pub expect: Option<Value>,
}

/// What a case is expected to produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    #[default]
    Matched,
    NoMatch,
    CompileError,
    MatchError,
}

/// What a case actually produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Actual {
    Matched(Value),
    NoMatch,
    CompileError(String),
    MatchError(String),
}

impl Actual {
    fn outcome(&self) -> Outcome {
        match self {
            Self::Matched(_) => Outcome::Matched,
            Self::NoMatch => Outcome::NoMatch,
            Self::CompileError(_) => Outcome::CompileError,
            Self::MatchError(_) => Outcome::MatchError,
        }
    }
}

impl fmt::Display for Actual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Matched(value) => write!(f, "{value}"),
            Self::NoMatch => f.write_str("no match"),
            Self::CompileError(msg) => write!(f, "compile error: {msg}"),
            Self::MatchError(msg) => write!(f, "match error: {msg}"),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Runner
// ═══════════════════════════════════════════════════════════════════════════════

/// Result of running a single test case
#[derive(Debug)]
pub struct CaseResult {
    pub case_name: String,
    pub passed: bool,
    pub expected: Outcome,
    pub expected_value: Option<Value>,
    pub actual: Actual,
}

impl TestCase {
    fn check(&self, actual: &Actual) -> bool {
        match (self.outcome, actual) {
            (Outcome::Matched, Actual::Matched(value)) => self.expect.as_ref() == Some(value),
            (expected, actual) => expected == actual.outcome(),
        }
    }
}

impl Fixture {
    /// Parse a fixture from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Parse multiple fixtures from a YAML file with `---` separators
    pub fn from_yaml_multi(yaml: &str) -> Result<Vec<Self>, serde_yaml::Error> {
        let mut fixtures = Vec::new();
        for doc in serde_yaml::Deserializer::from_str(yaml) {
            fixtures.push(Self::deserialize(doc)?);
        }
        Ok(fixtures)
    }

    /// Run all test cases and return results
    pub fn run(&self) -> Vec<CaseResult> {
        let compiler = Compiler::with_options(self.options.clone());
        self.cases
            .iter()
            .map(|case| {
                let data = case.data.as_ref().unwrap_or(&self.data);
                let mut rng = StdRng::seed_from_u64(FIXTURE_SEED);
                let actual = match compiler.compile(&case.pattern) {
                    Err(err) => Actual::CompileError(err.to_string()),
                    Ok(matcher) => match matcher.evaluate_with_rng(data, &mut rng) {
                        Ok(Some(value)) => Actual::Matched(value),
                        Ok(None) => Actual::NoMatch,
                        Err(err) => Actual::MatchError(err.to_string()),
                    },
                };
                CaseResult {
                    case_name: case.name.clone(),
                    passed: case.check(&actual),
                    expected: case.outcome,
                    expected_value: case.expect.clone(),
                    actual,
                }
            })
            .collect()
    }

    /// Run all test cases and panic on first failure
    pub fn run_and_assert(&self) {
        let results = self.run();
        for result in results {
            assert!(
                result.passed,
                "Fixture '{}' case '{}' failed: expected {:?} {}, got {}",
                self.name,
                result.case_name,
                result.expected,
                result
                    .expected_value
                    .as_ref()
                    .map_or_else(String::new, Value::to_string),
                result.actual
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = r#"
name: smoke
description: fixture parsing
cases:
  - name: names
    pattern: [{ name: null, "age >": 30 }]
    expect: [{ name: John }]
  - name: nothing
    pattern: [{ "age >": 99 }]
    outcome: no_match
  - name: bad
    pattern: { "__order__": sideways }
    outcome: compile_error
  - name: override
    data: { "x": 1 }
    pattern: { "x regex": "1" }
    outcome: match_error
"#;

    #[test]
    fn parse_and_run() {
        let fixture = Fixture::from_yaml(YAML).unwrap();
        assert_eq!(fixture.data, crate::people());
        assert_eq!(fixture.options, CompileOptions::default());
        assert_eq!(fixture.cases[1].outcome, Outcome::NoMatch);
        fixture.run_and_assert();
    }

    #[test]
    fn wrong_expectation_fails() {
        let yaml = r#"
name: failing
description: expectation mismatch
cases:
  - name: wrong
    pattern: [{ name: null, "age >": 30 }]
    expect: [{ name: Anna }]
"#;
        let results = Fixture::from_yaml(yaml).unwrap().run();
        assert!(!results[0].passed);
        assert_eq!(
            results[0].actual,
            Actual::Matched(serde_json::json!([{ "name": "John" }]))
        );
    }

    #[test]
    fn multi_document() {
        let yaml = format!("{YAML}\n---\n{YAML}");
        assert_eq!(Fixture::from_yaml_multi(&yaml).unwrap().len(), 2);
    }
}
