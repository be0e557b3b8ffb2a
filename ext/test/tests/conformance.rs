//! Conformance tests that run YAML fixtures against mqlite
//!
//! Run with: cargo test -p mqlite-test --test conformance

#![cfg(feature = "fixtures")]

use mqlite_test::fixture::Fixture;
use std::fs;
use std::path::{Path, PathBuf};

/// The fixtures directory of this crate
fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// Load and run every fixture in one file
fn run_fixture_file(name: &str) {
    let path = fixtures_dir().join(name);
    let yaml = fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e));

    // Parse potentially multiple fixtures (separated by ---)
    let fixtures = Fixture::from_yaml_multi(&yaml).unwrap_or_else(|e| {
        panic!("Failed to parse {}: {}", path.display(), e);
    });
    assert!(!fixtures.is_empty(), "{} holds no fixtures", path.display());

    for fixture in fixtures {
        println!("  Running: {}", fixture.name);
        fixture.run_and_assert();
    }
}

#[test]
fn test_reference() {
    run_fixture_file("01_reference.yaml");
}

#[test]
fn test_constraints() {
    run_fixture_file("02_constraints.yaml");
}

#[test]
fn test_directives() {
    run_fixture_file("03_directives.yaml");
}

#[test]
fn test_structure() {
    run_fixture_file("04_structure.yaml");
}

#[test]
fn test_errors() {
    run_fixture_file("05_errors.yaml");
}

#[test]
fn every_fixture_file_is_covered() {
    let mut files: Vec<_> = fs::read_dir(fixtures_dir())
        .expect("read fixtures dir")
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".yaml") || name.ends_with(".yml"))
        .collect();
    files.sort();
    assert_eq!(
        files,
        vec![
            "01_reference.yaml",
            "02_constraints.yaml",
            "03_directives.yaml",
            "04_structure.yaml",
            "05_errors.yaml",
        ]
    );
}
