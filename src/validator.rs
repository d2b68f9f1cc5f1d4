//! # Route-Set Validator
//!
//! Static analysis over a compiled route table. Runs once, before the table
//! serves real input, and never changes what the resolver does.
//!
//! ## Checks Performed
//!
//! 1. **Duplicate patterns** - two routes with the same pattern (`Error`)
//! 2. **Overlapping type constraints** - same shape, different parameter
//!    types; a failed conversion is never retried against a sibling, so the
//!    overlap cannot resolve safely (`Error`)
//! 3. **Unreachable routes** - routes shadowed by another route, judged by the
//!    configured [`ReachabilityPolicy`]
//!
//! ## Signatures
//!
//! The *structure signature* keeps literals and option spellings verbatim and
//! replaces parameters with `{P}`, `{P?}` and `{*}`. Options are sorted by
//! spelling because their position never affects resolution. The *required
//! signature* keeps only literals and required parameters.
//!
//! ## Usage
//!
//! ```rust
//! use argvrouter::pattern::compile_pattern;
//! use argvrouter::validator::{validate, DiagnosticKind};
//!
//! let routes = vec![
//!     compile_pattern("get {id:int}", "by_id").unwrap(),
//!     compile_pattern("get {name}", "by_name").unwrap(),
//! ];
//! let diagnostics = validate(&routes);
//! assert!(diagnostics
//!     .iter()
//!     .any(|d| d.kind == DiagnosticKind::OverlappingTypeConstraints));
//! ```

use crate::pattern::{CompiledRoute, OptionSegment, Segment};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;
use tracing::{debug, info, warn};


/// Severity level for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Error - should fail the build or startup gate
    Error,
    /// Warning - likely a mistake, does not block
    Warning,
    /// Info - informational only
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    OverlappingTypeConstraints,
    DuplicateRoutePattern,
    UnreachableRoute,
}

impl DiagnosticKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::OverlappingTypeConstraints => "overlapping_type_constraints",
            DiagnosticKind::DuplicateRoutePattern => "duplicate_route_pattern",
            DiagnosticKind::UnreachableRoute => "unreachable_route",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A problem found in a route set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    /// Offending patterns verbatim; the subject of the diagnostic comes first
    pub patterns: Vec<String>,
    /// Human-readable description of the problem
    pub message: String,
    /// Optional suggestion for how to fix it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl Diagnostic {
    pub fn new(
        kind: DiagnosticKind,
        severity: Severity,
        patterns: Vec<String>,
        message: impl Into<String>,
    ) -> Self {
        Diagnostic {
            kind,
            severity,
            patterns,
            message: message.into(),
            suggestion: None,
        }
    }

    /// Add a suggestion for fixing the issue
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// How the unreachable-route check decides that a route is shadowed.
///
/// The resolver gives exact matches (no defaults used) priority over any
/// defaulted match, so ordering routes purely by specificity overstates
/// shadowing. Both readings are available.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReachabilityPolicy {
    /// Group by required signature and flag every route that a route of equal
    /// or higher specificity precedes. A `Warning`: it can flag routes that
    /// still win when invoked with exactly their required arguments.
    #[default]
    SpecificityOrder,
    /// Flag only routes an earlier route with the identical structure
    /// signature always beats. An `Error`: such routes are never selected.
    ExactFirst,
}

impl ReachabilityPolicy {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ReachabilityPolicy::SpecificityOrder => "specificity-order",
            ReachabilityPolicy::ExactFirst => "exact-first",
        }
    }
}

impl fmt::Display for ReachabilityPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReachabilityPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "specificity-order" | "specificity" => Ok(ReachabilityPolicy::SpecificityOrder),
            "exact-first" | "exact" => Ok(ReachabilityPolicy::ExactFirst),
            other => Err(format!(
                "unknown reachability policy '{other}' (expected specificity-order or exact-first)"
            )),
        }
    }
}

/// Normalised shape of a route plus its type slots in shape order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StructureSignature {
    pub shape: String,
    pub types: Vec<Option<String>>,
}

fn option_marker(option: &OptionSegment) -> String {
    let mut marker = option.spelling();
    if option.expects_value {
        if option.is_optional && !option.is_repeated {
            marker.push('?');
        }
        marker.push_str(if option.parameter_is_optional { " {P?}" } else { " {P}" });
    }
    if option.is_repeated {
        marker.push('*');
    }
    marker
}

/// Compute the structure signature of a route.
#[must_use]
pub fn structure_signature(route: &CompiledRoute) -> StructureSignature {
    let mut parts: Vec<String> = Vec::with_capacity(route.segments.len());
    let mut types = Vec::new();

    for segment in route.positional() {
        match segment {
            Segment::Literal(lit) => parts.push(lit.value.clone()),
            Segment::Parameter(p) => {
                let marker = if p.is_catch_all {
                    "{*}"
                } else if p.is_optional {
                    "{P?}"
                } else {
                    "{P}"
                };
                parts.push(marker.to_string());
                types.push(p.type_constraint.clone());
            }
            Segment::Option(_) => {}
        }
    }

    let mut options: Vec<(String, &OptionSegment)> =
        route.options().map(|o| (option_marker(o), o)).collect();
    options.sort_by(|a, b| a.0.cmp(&b.0));
    for (marker, option) in options {
        parts.push(marker);
        if option.expects_value {
            types.push(option.type_constraint.clone());
        }
    }

    StructureSignature {
        shape: parts.join(" "),
        types,
    }
}

/// Literals and required parameters only.
#[must_use]
pub fn required_signature(route: &CompiledRoute) -> String {
    route
        .positional()
        .filter_map(|segment| match segment {
            Segment::Literal(lit) => Some(lit.value.as_str()),
            Segment::Parameter(p) if !p.is_optional && !p.is_catch_all => Some("{P}"),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Validate with the default [`ReachabilityPolicy`].
#[must_use]
pub fn validate(routes: &[CompiledRoute]) -> Vec<Diagnostic> {
    validate_with_policy(routes, ReachabilityPolicy::default())
}

/// Run every check. Diagnostics come out grouped by check, in route order.
#[must_use]
pub fn validate_with_policy(routes: &[CompiledRoute], policy: ReachabilityPolicy) -> Vec<Diagnostic> {
    let signatures: Vec<StructureSignature> = routes.iter().map(structure_signature).collect();
    let patterns: Vec<String> = routes.iter().map(CompiledRoute::display_pattern).collect();
    let keys: Vec<String> = patterns.iter().map(|p| pattern_key(p)).collect();

    let mut diagnostics = Vec::new();
    check_structure_groups(&signatures, &patterns, &keys, &mut diagnostics);
    match policy {
        ReachabilityPolicy::SpecificityOrder => {
            check_specificity_order(routes, &patterns, &keys, &mut diagnostics);
        }
        ReachabilityPolicy::ExactFirst => check_exact_first(&signatures, &patterns, &keys, &mut diagnostics),
    }

    info!(
        routes_count = routes.len(),
        policy = %policy,
        diagnostics_count = diagnostics.len(),
        errors = diagnostics.iter().filter(|d| d.severity == Severity::Error).count(),
        "Route set validated"
    );
    diagnostics
}

/// Route indices grouped by key, groups ordered by their first member.
fn group_by<K: Ord>(keys: impl Iterator<Item = K>) -> Vec<Vec<usize>> {
    let mut first_seen: BTreeMap<K, usize> = BTreeMap::new();
    let mut groups: Vec<Vec<usize>> = Vec::new();
    for (idx, key) in keys.enumerate() {
        match first_seen.get(&key).copied() {
            Some(group) => groups[group].push(idx),
            None => {
                first_seen.insert(key, groups.len());
                groups.push(vec![idx]);
            }
        }
    }
    groups
}

fn describe_types(types: &[Option<String>]) -> String {
    let rendered: Vec<&str> = types.iter().map(|t| t.as_deref().unwrap_or("untyped")).collect();
    format!("[{}]", rendered.join(", "))
}

/// Patterns that differ only in whitespace compile to the same route.
fn pattern_key(pattern: &str) -> String {
    pattern.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn check_structure_groups(
    signatures: &[StructureSignature],
    patterns: &[String],
    keys: &[String],
    diagnostics: &mut Vec<Diagnostic>,
) {
    for group in group_by(signatures.iter().map(|s| s.shape.as_str())) {
        if group.len() < 2 {
            continue;
        }
        debug!(shape = %signatures[group[0]].shape, routes = group.len(), "Structure group");

        for same in group_by(group.iter().map(|&i| keys[i].as_str())) {
            if same.len() > 1 {
                let pattern = &patterns[group[same[0]]];
                diagnostics.push(
                    Diagnostic::new(
                        DiagnosticKind::DuplicateRoutePattern,
                        Severity::Error,
                        vec![pattern.clone()],
                        format!("pattern '{pattern}' is registered {} times", same.len()),
                    )
                    .with_suggestion("remove the duplicate registrations"),
                );
            }
        }

        for (pos, &a) in group.iter().enumerate() {
            for &b in &group[pos + 1..] {
                if keys[a] == keys[b] || signatures[a].types == signatures[b].types {
                    continue;
                }
                diagnostics.push(
                    Diagnostic::new(
                        DiagnosticKind::OverlappingTypeConstraints,
                        Severity::Error,
                        vec![patterns[b].clone(), patterns[a].clone()],
                        format!(
                            "'{}' {} and '{}' {} accept the same input shape but declare different types",
                            patterns[b],
                            describe_types(&signatures[b].types),
                            patterns[a],
                            describe_types(&signatures[a].types),
                        ),
                    )
                    .with_suggestion("merge the routes and branch on the value, or add a distinguishing literal"),
                );
            }
        }
    }
}

fn check_specificity_order(
    routes: &[CompiledRoute],
    patterns: &[String],
    keys: &[String],
    diagnostics: &mut Vec<Diagnostic>,
) {
    for mut group in group_by(routes.iter().map(required_signature)) {
        group.sort_by(|&a, &b| routes[b].specificity.cmp(&routes[a].specificity));

        for (pos, &lower) in group.iter().enumerate() {
            let shadower = group[..pos]
                .iter()
                .find(|&&higher| keys[higher] != keys[lower]);
            let Some(&higher) = shadower else {
                continue;
            };
            diagnostics.push(
                Diagnostic::new(
                    DiagnosticKind::UnreachableRoute,
                    Severity::Warning,
                    vec![patterns[lower].clone(), patterns[higher].clone()],
                    format!(
                        "'{}' (specificity {}) may be shadowed by '{}' (specificity {})",
                        patterns[lower], routes[lower].specificity, patterns[higher], routes[higher].specificity,
                    ),
                )
                .with_suggestion(
                    "exact matches still win at runtime; check with --policy exact-first for routes that can never match",
                ),
            );
        }
    }
}

fn check_exact_first(
    signatures: &[StructureSignature],
    patterns: &[String],
    keys: &[String],
    diagnostics: &mut Vec<Diagnostic>,
) {
    for group in group_by(signatures.iter().map(|s| s.shape.as_str())) {
        for (pos, &later) in group.iter().enumerate() {
            let shadower = group[..pos]
                .iter()
                .find(|&&earlier| keys[earlier] != keys[later]);
            let Some(&earlier) = shadower else {
                continue;
            };
            diagnostics.push(
                Diagnostic::new(
                    DiagnosticKind::UnreachableRoute,
                    Severity::Error,
                    vec![patterns[later].clone(), patterns[earlier].clone()],
                    format!(
                        "'{}' can never be selected: '{}' accepts exactly the same input and is registered first",
                        patterns[later], patterns[earlier],
                    ),
                )
                .with_suggestion("remove the route or give it a distinguishing literal or option"),
            );
        }
    }
}

/// True if any diagnostic is `Error` severity.
#[must_use]
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(|d| d.severity == Severity::Error)
}

/// Print diagnostics grouped by severity to stdout.
pub fn print_diagnostics(diagnostics: &[Diagnostic]) {
    let stdout = io::stdout();
    if let Err(e) = write_diagnostics(&mut stdout.lock(), diagnostics) {
        warn!(error = %e, "Failed to print route diagnostics");
    }
}

/// Render diagnostics grouped by severity.
///
/// # Errors
///
/// Returns any error from the underlying writer.
pub fn write_diagnostics(out: &mut dyn Write, diagnostics: &[Diagnostic]) -> io::Result<()> {
    if diagnostics.is_empty() {
        writeln!(out, "✅ No route issues found!")?;
        return Ok(());
    }

    let sections = [
        (Severity::Error, "❌ Errors (must fix):"),
        (Severity::Warning, "⚠️  Warnings (should review):"),
        (Severity::Info, "ℹ️  Info:"),
    ];
    let count = |severity: Severity| diagnostics.iter().filter(|d| d.severity == severity).count();

    writeln!(out, "\n📋 Route Validation Results:")?;
    writeln!(
        out,
        "   {} error(s), {} warning(s), {} info(s)\n",
        count(Severity::Error),
        count(Severity::Warning),
        count(Severity::Info)
    )?;

    for (severity, heading) in sections {
        if count(severity) == 0 {
            continue;
        }
        writeln!(out, "{heading}")?;
        for diagnostic in diagnostics.iter().filter(|d| d.severity == severity) {
            writeln!(out, "   [{}] {}", diagnostic.kind, diagnostic.patterns.join(" | "))?;
            writeln!(out, "      {}", diagnostic.message)?;
            if let Some(suggestion) = &diagnostic.suggestion {
                writeln!(out, "      💡 Suggestion: {suggestion}")?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Print and fail if there are any `Error` diagnostics.
pub fn fail_if_errors(diagnostics: &[Diagnostic]) -> anyhow::Result<()> {
    if has_errors(diagnostics) {
        print_diagnostics(diagnostics);
        let errors = diagnostics.iter().filter(|d| d.severity == Severity::Error).count();
        anyhow::bail!("route validation failed with {errors} error(s)");
    }
    Ok(())
}
