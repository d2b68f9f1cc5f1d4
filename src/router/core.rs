//! Compiled route table - the immutable set of routes that argv is resolved
//! against, plus the logging wrapper around [`resolve`](super::resolve).

use super::resolver::{resolve, NoMatch, RouteMatch};
use crate::pattern::{compile_route, CompileFailure, CompiledRoute, RouteDefinition};
use crate::validator::{validate_with_policy, Diagnostic, ReachabilityPolicy};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Default threshold above which a successful match is logged as slow.
pub const DEFAULT_SLOW_MATCH: Duration = Duration::from_millis(1);

/// Outcome of compiling a whole set of route definitions.
///
/// Bad patterns do not abort compilation: every failure is collected so a
/// caller sees all problems in one pass, and the table holds every route that
/// compiled.
#[derive(Debug, Clone)]
pub struct CompileReport {
    pub table: RouteTable,
    pub failures: Vec<CompileFailure>,
}

impl CompileReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// The table, or the first failure when any pattern was rejected.
    pub fn into_result(self) -> Result<RouteTable, CompileFailure> {
        match self.failures.into_iter().next() {
            Some(failure) => Err(failure),
            None => Ok(self.table),
        }
    }
}

/// Read-only table of compiled routes in registration order.
///
/// The table is never mutated after construction, so a shared reference can
/// serve concurrent resolutions from any number of threads.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<CompiledRoute>,
    slow_match_threshold: Duration,
}

impl RouteTable {
    /// Build a table from already compiled routes.
    #[must_use]
    pub fn new(routes: Vec<CompiledRoute>) -> Self {
        let routes_summary: Vec<String> = routes
            .iter()
            .take(10)
            .map(|r| format!("{} -> {}", r.display_pattern(), r.handler_name))
            .collect();

        info!(
            routes_count = routes.len(),
            routes_summary = ?routes_summary,
            "Route table loaded"
        );

        Self {
            routes,
            slow_match_threshold: DEFAULT_SLOW_MATCH,
        }
    }

    /// Compile every definition, keeping going past failures.
    #[must_use]
    pub fn compile(definitions: &[RouteDefinition]) -> CompileReport {
        let mut routes = Vec::with_capacity(definitions.len());
        let mut failures = Vec::new();

        for definition in definitions {
            match compile_route(definition) {
                Ok(route) => routes.push(route),
                Err(error) => {
                    let pattern = match definition.group_prefix.as_deref() {
                        Some(prefix) => format!("{prefix} {}", definition.pattern),
                        None => definition.pattern.clone(),
                    };
                    warn!(
                        pattern = %pattern,
                        handler_name = %definition.handler_name,
                        error = %error,
                        "Route pattern failed to compile"
                    );
                    failures.push(CompileFailure {
                        pattern,
                        handler_name: definition.handler_name.clone(),
                        error,
                    });
                }
            }
        }

        CompileReport {
            table: Self::new(routes),
            failures,
        }
    }

    /// Set the duration above which a match is logged at `warn`.
    #[must_use]
    pub fn with_slow_match_threshold(mut self, threshold: Duration) -> Self {
        self.slow_match_threshold = threshold;
        self
    }

    #[must_use]
    pub fn routes(&self) -> &[CompiledRoute] {
        &self.routes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Resolve an argument vector against the table.
    ///
    /// # Example
    ///
    /// ```rust
    /// use argvrouter::pattern::RouteDefinition;
    /// use argvrouter::router::RouteTable;
    ///
    /// let table = RouteTable::compile(&[
    ///     RouteDefinition::new("backup {*files}", "backup"),
    /// ])
    /// .into_result()
    /// .unwrap();
    ///
    /// let matched = table.resolve(&["backup", "a.txt", "b.txt"]).unwrap();
    /// assert_eq!(matched.values.text("files"), Some("a.txt b.txt"));
    /// ```
    pub fn resolve<S: AsRef<str>>(&self, args: &[S]) -> Result<RouteMatch<'_>, NoMatch> {
        debug!(
            args_count = args.len(),
            routes_count = self.routes.len(),
            "Route match attempt"
        );

        let match_start = Instant::now();
        let result = resolve(args, &self.routes);
        let match_duration = match_start.elapsed();

        match &result {
            Ok(matched) => {
                if match_duration > self.slow_match_threshold {
                    warn!(
                        handler_name = %matched.route.handler_name,
                        route_pattern = %matched.route.display_pattern(),
                        defaults_used = matched.defaults_used,
                        duration_us = match_duration.as_micros(),
                        "Slow route matching detected"
                    );
                } else {
                    info!(
                        handler_name = %matched.route.handler_name,
                        route_pattern = %matched.route.display_pattern(),
                        defaults_used = matched.defaults_used,
                        duration_us = match_duration.as_micros(),
                        "Route matched"
                    );
                }
            }
            Err(no_match) => {
                warn!(
                    args = ?no_match.args,
                    suggestions = ?no_match.suggestions,
                    duration_us = match_duration.as_micros(),
                    "No route matched"
                );
            }
        }

        result
    }

    /// Run the route-set validator over this table.
    #[must_use]
    pub fn validate(&self, policy: ReachabilityPolicy) -> Vec<Diagnostic> {
        validate_with_policy(&self.routes, policy)
    }

    /// Print all registered routes to stdout.
    pub fn dump_routes(&self) {
        println!("[routes] count={}", self.routes.len());
        for route in &self.routes {
            println!(
                "[route] {} -> {} (specificity {})",
                route.display_pattern(),
                route.handler_name,
                route.specificity
            );
        }
    }

    /// Every pattern in registration order, group prefixes included.
    #[must_use]
    pub fn patterns(&self) -> Vec<String> {
        self.routes.iter().map(CompiledRoute::display_pattern).collect()
    }
}
