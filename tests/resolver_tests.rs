//! Integration tests for route resolution
//!
//! Covers the selection rules end to end through the public API: option
//! matching, catch-alls, end-of-options handling and the ranking of exact and
//! defaulted candidates.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use argvrouter::pattern::compile_pattern;
use argvrouter::router::{resolve, RawValue, RouteTable};
use common::routes::{compile_all, table};
use std::sync::Arc;
use std::thread;

#[test]
fn test_catch_all_joins_tokens() {
    let routes = compile_all(&[("backup {*files}", "backup")]);
    let matched = resolve(&["backup", "a.txt", "b.txt"], &routes).unwrap();

    assert_eq!(matched.values.text("files"), Some("a.txt b.txt"));
    assert_eq!(
        matched.values.get("files"),
        Some(&RawValue::Rest {
            joined: "a.txt b.txt".to_string(),
            tokens: vec!["a.txt".to_string(), "b.txt".to_string()],
        })
    );
}

#[test]
fn test_exact_beats_defaulted() {
    let routes = compile_all(&[
        ("deploy {env}", "deploy"),
        ("deploy {env} --force", "deploy_forced"),
    ]);

    let matched = resolve(&["deploy", "prod"], &routes).unwrap();
    assert_eq!(matched.handler_name(), "deploy");
    assert_eq!(matched.defaults_used, 0);

    let matched = resolve(&["deploy", "prod", "--force"], &routes).unwrap();
    assert_eq!(matched.handler_name(), "deploy_forced");
    assert_eq!(matched.values.flag("force"), Some(true));
}

#[test]
fn test_option_order_independence() {
    let routes = compile_all(&[("build --verbose --force", "build")]);

    let a = resolve(&["build", "--verbose", "--force"], &routes).unwrap();
    let b = resolve(&["build", "--force", "--verbose"], &routes).unwrap();

    assert_eq!(a.handler_name(), "build");
    assert_eq!(a.values, b.values);
    assert_eq!(a.values.flag("verbose"), Some(true));
    assert_eq!(a.values.flag("force"), Some(true));
}

#[test]
fn test_repeated_option_collects_in_order() {
    let routes = compile_all(&[("tag --label {l}*", "tag")]);
    let matched = resolve(&["tag", "--label", "a", "--label", "b"], &routes).unwrap();

    assert_eq!(
        matched.values.list("l"),
        Some(&["a".to_string(), "b".to_string()][..])
    );
    assert!(matched.is_exact());
}

#[test]
fn test_repeated_option_absent_is_empty_default() {
    let routes = compile_all(&[("tag {name} --label {l}*", "tag")]);
    let matched = resolve(&["tag", "v1"], &routes).unwrap();

    assert_eq!(matched.values.list("l"), Some(&[][..]));
    assert_eq!(matched.defaults_used, 1);
}

#[test]
fn test_no_match_is_a_value_not_a_panic() {
    let routes = compile_all(&[("status", "status")]);
    let result = resolve(&["deploy", "prod"], &routes);

    let err = result.unwrap_err();
    assert_eq!(err.args, vec!["deploy", "prod"]);
    assert!(err.to_string().contains("deploy prod"));
}

#[test]
fn test_no_match_on_empty_table() {
    let routes = Vec::new();
    assert!(resolve(&["anything"], &routes).is_err());
}

#[test]
fn test_resolution_is_referentially_transparent() {
    let routes = compile_all(&[
        ("remote add {name} {url}", "remote_add"),
        ("remote {*rest}", "remote_passthrough"),
        ("remote add {name} {url} --fetch,-f", "remote_add_fetch"),
    ]);
    let args = ["remote", "add", "origin", "git@host:repo", "-f"];

    let first = resolve(&args, &routes).unwrap();
    for _ in 0..10 {
        assert_eq!(resolve(&args, &routes).unwrap(), first);
    }
    assert_eq!(first.handler_name(), "remote_add_fetch");
}

#[test]
fn test_short_alias_matches() {
    let routes = compile_all(&[("clean --dry-run,-d", "clean")]);

    let long = resolve(&["clean", "--dry-run"], &routes).unwrap();
    let short = resolve(&["clean", "-d"], &routes).unwrap();
    assert_eq!(long.values, short.values);
    assert_eq!(short.values.flag("dry-run"), Some(true));
}

#[test]
fn test_value_option_takes_following_token() {
    let routes = compile_all(&[("round {value:double} --mode {mode}", "round")]);
    let matched = resolve(&["round", "--mode", "up", "2.5"], &routes).unwrap();

    assert_eq!(matched.values.text("mode"), Some("up"));
    assert_eq!(matched.values.text("value"), Some("2.5"));
}

#[test]
fn test_required_value_option_missing_rejects_route() {
    let routes = compile_all(&[("round {value} --mode {mode}", "round")]);
    assert!(resolve(&["round", "2.5"], &routes).is_err());
    // the value slot holds another declared option, so the value is absent
    let routes = compile_all(&[("round {value} --mode {mode} --up", "round")]);
    assert!(resolve(&["round", "2.5", "--mode", "--up"], &routes).is_err());
}

#[test]
fn test_optional_value_option_without_value_is_unset() {
    let routes = compile_all(&[("fetch {remote} --depth {n?} --all", "fetch")]);
    let matched = resolve(&["fetch", "origin", "--depth", "--all"], &routes).unwrap();

    assert_eq!(matched.values.get("n"), Some(&RawValue::Unset));
    assert_eq!(matched.values.flag("all"), Some(true));
    assert_eq!(matched.defaults_used, 1);
}

#[test]
fn test_negative_number_binds_without_declared_option() {
    let routes = compile_all(&[("add {a:int} {b:int}", "add")]);
    let matched = resolve(&["add", "-3", "4"], &routes).unwrap();

    assert_eq!(matched.values.text("a"), Some("-3"));
    assert_eq!(matched.values.text("b"), Some("4"));
}

#[test]
fn test_end_of_options_allows_option_lookalike_values() {
    let routes = compile_all(&[("grep --ignore-case,-i -- {pattern}", "grep")]);
    let matched = resolve(&["grep", "-i", "--", "-i"], &routes).unwrap();

    assert_eq!(matched.values.flag("ignore-case"), Some(true));
    assert_eq!(matched.values.text("pattern"), Some("-i"));
}

#[test]
fn test_literals_are_case_sensitive() {
    let routes = compile_all(&[("Status", "status")]);
    assert!(resolve(&["status"], &routes).is_err());
    assert!(resolve(&["Status"], &routes).is_ok());
}

#[test]
fn test_compilation_is_idempotent() {
    let a = compile_pattern("deploy {env:string} --replicas,-r {n:int}* -- {*rest}", "d").unwrap();
    let b = compile_pattern("deploy {env:string} --replicas,-r {n:int}* -- {*rest}", "d").unwrap();
    assert_eq!(a, b);
    assert_eq!(a.specificity, b.specificity);
}

#[test]
fn test_route_table_resolve_matches_free_function() {
    let patterns = [
        ("deploy {env}", "deploy"),
        ("deploy {env} --force", "deploy_forced"),
        ("deploy {env} {region?}", "deploy_region"),
    ];
    let routes = compile_all(&patterns);
    let table = table(&patterns);

    for args in [
        vec!["deploy", "prod"],
        vec!["deploy", "prod", "--force"],
        vec!["deploy", "prod", "eu-west-1"],
    ] {
        let free = resolve(&args, &routes).unwrap();
        let via_table = table.resolve(&args).unwrap();
        assert_eq!(free.handler_name(), via_table.handler_name());
        assert_eq!(free.values, via_table.values);
    }
}

#[test]
fn test_concurrent_resolution_over_shared_table() {
    let table = Arc::new(table(&[
        ("deploy {env}", "deploy"),
        ("deploy {env} --force", "deploy_forced"),
        ("backup {*files}", "backup"),
    ]));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let table = Arc::clone(&table);
            thread::spawn(move || {
                for _ in 0..200 {
                    let env = format!("env{i}");
                    let matched = table.resolve(&["deploy", env.as_str()]).unwrap();
                    assert_eq!(matched.handler_name(), "deploy");
                    assert_eq!(matched.values.text("env"), Some(env.as_str()));

                    let matched = table.resolve(&["backup", "x", "y"]).unwrap();
                    assert_eq!(matched.values.text("files"), Some("x y"));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_route_table_compile_keeps_good_routes() {
    let report = RouteTable::compile(&[
        argvrouter::RouteDefinition::new("ok {a}", "ok"),
        argvrouter::RouteDefinition::new("bad {a} {a}", "bad"),
        argvrouter::RouteDefinition::new("also-ok", "also_ok"),
    ]);

    assert_eq!(report.table.len(), 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].handler_name, "bad");
    assert!(report.table.resolve(&["also-ok"]).is_ok());
}
