#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::resolver::match_route;
use super::{resolve, RawValue, RouteTable};
use crate::pattern::{compile_pattern, CompiledRoute, RouteDefinition};

fn routes(patterns: &[(&str, &str)]) -> Vec<CompiledRoute> {
    patterns
        .iter()
        .map(|(pattern, handler)| compile_pattern(pattern, handler).unwrap())
        .collect()
}

#[test]
fn test_match_route_counts_defaults() {
    let route = compile_pattern("build {target?} --force --mode? {mode} --tag {t}*", "build").unwrap();
    let (values, defaults) = match_route(&route, &["build"]).unwrap();
    assert_eq!(defaults, 4);
    assert_eq!(values.get("target"), Some(&RawValue::Unset));
    assert_eq!(values.get("force"), Some(&RawValue::Flag(false)));
    assert_eq!(values.get("mode"), Some(&RawValue::Unset));
    assert_eq!(values.get("t"), Some(&RawValue::List(vec![])));
}

#[test]
fn test_match_route_rejects_leftover_tokens() {
    let route = compile_pattern("status", "status").unwrap();
    assert!(match_route(&route, &["status", "extra"]).is_err());
    assert!(match_route(&route, &["status"]).is_ok());
}

#[test]
fn test_empty_pattern_matches_only_empty_input() {
    let route = compile_pattern("", "root").unwrap();
    assert!(match_route(&route, &[]).is_ok());
    assert!(match_route(&route, &["anything"]).is_err());
}

#[test]
fn test_parameter_skips_declared_option() {
    let route = compile_pattern("deploy {env} --force", "deploy").unwrap();
    let (values, defaults) = match_route(&route, &["deploy", "--force", "prod"]).unwrap();
    assert_eq!(defaults, 0);
    assert_eq!(values.text("env"), Some("prod"));
    assert_eq!(values.flag("force"), Some(true));
}

#[test]
fn test_parameter_refuses_declared_option_token() {
    // `--force` is an option of this route, so it cannot be the value of {env}
    let route = compile_pattern("deploy {env} --force", "deploy").unwrap();
    assert!(match_route(&route, &["deploy", "--force"]).is_err());
}

#[test]
fn test_undeclared_flag_binds_as_parameter() {
    let route = compile_pattern("calc {n}", "calc").unwrap();
    let (values, _) = match_route(&route, &["calc", "-3"]).unwrap();
    assert_eq!(values.text("n"), Some("-3"));
}

#[test]
fn test_end_of_options_makes_flags_positional() {
    let route = compile_pattern("run --verbose -- {*rest}", "run").unwrap();
    let (values, defaults) = match_route(&route, &["run", "--verbose", "--", "--verbose", "-x"]).unwrap();
    assert_eq!(values.flag("verbose"), Some(true));
    assert_eq!(values.list("rest"), Some(&["--verbose".to_string(), "-x".to_string()][..]));
    assert_eq!(defaults, 0);
}

#[test]
fn test_catch_all_stops_at_declared_option() {
    let route = compile_pattern("exec {*cmd} --dry-run", "exec").unwrap();
    let (values, _) = match_route(&route, &["exec", "ls", "-la", "--dry-run"]).unwrap();
    assert_eq!(values.text("cmd"), Some("ls -la"));
    assert_eq!(values.flag("dry-run"), Some(true));
}

#[test]
fn test_catch_all_ends_at_option_in_the_middle() {
    let route = compile_pattern("exec {*cmd} --dry-run", "exec").unwrap();
    let (values, _) = match_route(&route, &["exec", "a", "--dry-run", "b"]).unwrap();
    assert_eq!(values.text("cmd"), Some("a"));
    assert_eq!(values.flag("dry-run"), Some(true));
}

#[test]
fn test_catch_all_starts_after_leading_options() {
    let route = compile_pattern("exec {*cmd} --mode {m}", "exec").unwrap();
    let (values, _) = match_route(&route, &["exec", "--mode", "fast", "ls", "-la"]).unwrap();
    assert_eq!(values.text("m"), Some("fast"));
    assert_eq!(values.text("cmd"), Some("ls -la"));
}

#[test]
fn test_empty_catch_all_counts_as_default() {
    let table = routes(&[("git {*args}", "git_passthrough"), ("git", "git_root")]);
    let matched = resolve(&["git"], &table).unwrap();
    assert_eq!(matched.handler_name(), "git_root");

    let (values, defaults) = match_route(&table[0], &["git"]).unwrap();
    assert_eq!(defaults, 1);
    assert_eq!(values.text("args"), Some(""));
}

#[test]
fn test_exact_beats_higher_specificity_defaulted() {
    let table = routes(&[("deploy {env} --force", "forced"), ("deploy {env}", "plain")]);
    assert!(table[0].specificity > table[1].specificity);

    let matched = resolve(&["deploy", "prod"], &table).unwrap();
    assert_eq!(matched.handler_name(), "plain");
    assert!(matched.is_exact());
}

#[test]
fn test_defaulted_prefers_most_defaults() {
    // Neither route is exact; the one that skipped more optional extras wins
    let table = routes(&[
        ("log {level?}", "one_default"),
        ("log {level?} --json --color", "three_defaults"),
    ]);
    let matched = resolve(&["log"], &table).unwrap();
    assert_eq!(matched.handler_name(), "three_defaults");
    assert_eq!(matched.defaults_used, 3);
}

#[test]
fn test_registration_order_breaks_ties() {
    let table = routes(&[("show {a}", "first"), ("show {b}", "second")]);
    let matched = resolve(&["show", "x"], &table).unwrap();
    assert_eq!(matched.handler_name(), "first");
    assert_eq!(matched.index, 0);
}

#[test]
fn test_exact_prefers_higher_specificity() {
    let table = routes(&[("user {name}", "by_name"), ("user list", "list")]);
    let matched = resolve(&["user", "list"], &table).unwrap();
    assert_eq!(matched.handler_name(), "list");
}

#[test]
fn test_no_match_suggests_shared_prefix() {
    let table = routes(&[
        ("remote add {name} {url}", "add"),
        ("remote remove {name}", "remove"),
        ("status", "status"),
    ]);
    let err = resolve(&["remote", "rename", "a", "b"], &table).unwrap_err();
    assert_eq!(err.args, vec!["remote", "rename", "a", "b"]);
    assert_eq!(err.suggestions, vec!["remote add {name} {url}", "remote remove {name}"]);
    assert!(err.message().contains("remote rename a b"));
}

#[test]
fn test_no_match_without_shared_prefix_has_no_suggestions() {
    let table = routes(&[("status", "status")]);
    let err = resolve(&["frobnicate"], &table).unwrap_err();
    assert!(err.suggestions.is_empty());
}

#[test]
fn test_group_prefix_participates_in_matching() {
    let table = RouteTable::compile(&[
        RouteDefinition::new("up {service?}", "compose_up").in_group("docker compose"),
        RouteDefinition::new("up", "plain_up"),
    ])
    .into_result()
    .unwrap();

    let matched = table.resolve(&["docker", "compose", "up", "web"]).unwrap();
    assert_eq!(matched.handler_name(), "compose_up");
    assert_eq!(matched.values.text("service"), Some("web"));
    assert_eq!(table.patterns(), vec!["docker compose up {service?}", "up"]);
}

#[test]
fn test_compile_report_collects_every_failure() {
    let report = RouteTable::compile(&[
        RouteDefinition::new("ok {a}", "ok"),
        RouteDefinition::new("bad {a} {a}", "dup"),
        RouteDefinition::new("bad {*rest} tail", "catch_all"),
    ]);
    assert_eq!(report.table.len(), 1);
    assert_eq!(report.failures.len(), 2);
    assert_eq!(report.failures[0].handler_name, "dup");
    assert!(!report.is_clean());
    assert!(report.into_result().is_err());
}
