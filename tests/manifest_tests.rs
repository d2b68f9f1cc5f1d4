//! Integration tests for route manifests
//!
//! The fixtures under `tests/manifests/` describe the same route set in YAML,
//! JSON and TOML.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use argvrouter::manifest::{load_manifest, load_route_table, ManifestFormat, RouteManifest};
use argvrouter::pattern::PatternError;
use common::temp_files::{create_temp_json, create_temp_manifest, create_temp_yaml};
use std::path::PathBuf;

fn test_file_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("manifests")
        .join(name)
}

#[test]
fn test_formats_load_identically() {
    let yaml = load_manifest(test_file_path("git.yaml")).unwrap();
    let json = load_manifest(test_file_path("git.json")).unwrap();
    let toml = load_manifest(test_file_path("git.toml")).unwrap();

    assert_eq!(yaml, json);
    assert_eq!(yaml, toml);
    assert_eq!(yaml.routes.len(), 3);
    assert_eq!(yaml.groups.len(), 1);
}

#[test]
fn test_definitions_follow_registration_order() {
    let manifest = load_manifest(test_file_path("git.yaml")).unwrap();
    let handlers: Vec<String> = manifest
        .definitions()
        .into_iter()
        .map(|d| d.handler_name)
        .collect();

    assert_eq!(
        handlers,
        vec!["status", "commit", "log", "remote_add", "remote_remove"]
    );
}

#[test]
fn test_loaded_table_resolves() {
    let table = load_route_table(test_file_path("git.toml")).unwrap();
    assert_eq!(table.len(), 5);

    let matched = table
        .resolve(&["remote", "add", "origin", "git@example.com:repo.git"])
        .unwrap();
    assert_eq!(matched.handler_name(), "remote_add");
    assert_eq!(matched.route.display_pattern(), "remote add {name} {url}");
    assert_eq!(matched.values.text("url"), Some("git@example.com:repo.git"));

    let matched = table.resolve(&["commit", "-m", "fix typo", "--amend"]).unwrap();
    assert_eq!(matched.values.text("message"), Some("fix typo"));
    assert_eq!(matched.values.flag("amend"), Some(true));

    let matched = table.resolve(&["log", "src", "docs", "--oneline"]).unwrap();
    assert_eq!(matched.values.text("paths"), Some("src docs"));
}

#[test]
fn test_descriptions_survive_compilation() {
    let table = load_route_table(test_file_path("git.json")).unwrap();
    assert_eq!(
        table.routes()[0].description.as_deref(),
        Some("Show the working tree status")
    );
}

#[test]
fn test_compile_failures_are_collected() {
    let report = load_manifest(test_file_path("broken_patterns.yaml"))
        .unwrap()
        .compile();

    assert_eq!(report.table.len(), 1);
    assert_eq!(report.failures.len(), 2);
    assert_eq!(
        report.failures[0].error,
        PatternError::DuplicateParameter {
            name: "src".to_string()
        }
    );
    assert!(matches!(
        report.failures[1].error,
        PatternError::OptionalBeforeRequired { .. }
    ));
}

#[test]
fn test_load_route_table_rejects_broken_manifest() {
    let err = load_route_table(test_file_path("broken_patterns.yaml")).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("2 route(s)"), "{message}");
    assert!(message.contains("copy {src} {src}"), "{message}");
}

#[test]
fn test_temp_yaml_manifest() {
    let file = create_temp_yaml(
        r#"
routes:
  - pattern: "ping {host} --count,-c {n:int}"
    handler: ping
"#,
    );
    let table = load_route_table(file.path()).unwrap();
    let matched = table.resolve(&["ping", "-c", "3", "localhost"]).unwrap();
    assert_eq!(matched.values.text("n"), Some("3"));
    assert_eq!(matched.values.text("host"), Some("localhost"));
}

#[test]
fn test_empty_manifest_is_valid() {
    let file = create_temp_json("{}");
    let manifest = load_manifest(file.path()).unwrap();
    assert_eq!(manifest, RouteManifest::default());
    assert!(load_route_table(file.path()).unwrap().is_empty());
}

#[test]
fn test_unsupported_extension() {
    let file = create_temp_manifest("routes: []", "ini");
    let err = load_manifest(file.path()).unwrap_err();
    assert!(err.to_string().contains("unsupported manifest extension"));
}

#[test]
fn test_parse_error_names_the_file() {
    let file = create_temp_yaml("routes: [unclosed");
    let err = load_manifest(file.path()).unwrap_err();
    assert!(err.to_string().contains("Failed to parse route manifest"));
}

#[test]
fn test_missing_file() {
    let err = load_manifest("does/not/exist.yaml").unwrap_err();
    assert!(err.to_string().contains("Failed to read route manifest"));
}

#[test]
fn test_from_str_as_matches_file_loading() {
    let content = std::fs::read_to_string(test_file_path("git.yaml")).unwrap();
    let parsed = RouteManifest::from_str_as(&content, ManifestFormat::Yaml).unwrap();
    assert_eq!(parsed, load_manifest(test_file_path("git.yaml")).unwrap());
}
