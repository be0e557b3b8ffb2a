//! ReDoS safety demonstration.
//!
//! `regex` constraints run on the linear-time `regex` crate (RE2 semantics),
//! so pathological patterns stay cheap.
//!
//! Pattern: `(a+)+$` against `"a" * N + "X"`
//!
//! - Backtracking engines: O(2^N), unusable past N=25
//! - `regex` crate: O(N), microseconds even at N=100

use mqlite::prelude::*;
use serde_json::{json, Value};

fn main() {
    divan::main();
}

/// The classic ReDoS pattern: nested quantifier with anchor.
const REDOS_PATTERN: &str = r"(a+)+$";

/// Build a pathological input: N 'a's followed by 'X' (forces full backtrack attempt).
fn pathological_input(n: usize) -> String {
    "a".repeat(n) + "X"
}

// ═══════════════════════════════════════════════════════════════════════════════
// ReDoS via a single regex constraint
// ═══════════════════════════════════════════════════════════════════════════════

#[divan::bench(args = [10, 20, 25, 30, 50, 100])]
fn redos_regex_constraint(bencher: divan::Bencher, n: usize) {
    let matcher = compile(&json!({ "value regex": REDOS_PATTERN })).unwrap();
    let data = json!({ "value": pathological_input(n) });

    bencher.bench_local(|| matcher.evaluate(&data));
}

// ═══════════════════════════════════════════════════════════════════════════════
// ReDoS over a list of records
// ═══════════════════════════════════════════════════════════════════════════════

#[divan::bench(args = [10, 20, 50, 100])]
fn redos_list_of_records(bencher: divan::Bencher, n: usize) {
    let matcher = compile(&json!([{ "id": null, "value regex any": [REDOS_PATTERN, "(a|aa)+$"] }])).unwrap();
    let data: Value = (0..100)
        .map(|id| json!({ "id": id, "value": pathological_input(n) }))
        .collect();

    bencher.bench_local(|| matcher.evaluate(&data));
}
