//! Resolver: matches an argument vector against every compiled route and picks
//! the single best candidate.
//!
//! ## Matching a route
//!
//! 1. Repeated options are collected from the whole option window first.
//! 2. Non-repeated options are bound next, wherever they appear.
//! 3. Literals and parameters walk the remaining unconsumed slots in order.
//!    A catch-all swallows what is left and accepts the route immediately.
//! 4. Any other route is accepted only if every slot was consumed.
//!
//! ## Selecting the winner
//!
//! Exact candidates (no defaults used) beat defaulted ones. Among exact
//! candidates the highest specificity wins; among defaulted candidates the one
//! that used the most defaults wins, then the highest specificity. Remaining
//! ties go to the route registered first.

use super::consumed::ConsumedSet;
use super::options::{self, OptionBinding, Rejected};
use super::values::{ExtractedValues, RawValue};
use crate::pattern::{CompiledRoute, Segment};
use serde::Serialize;
use smallvec::SmallVec;
use thiserror::Error;

/// Argument count kept inline when borrowing the input as `&str`.
const INLINE_ARGS: usize = 16;

/// Maximum number of near-miss patterns attached to a [`NoMatch`].
pub const MAX_SUGGESTIONS: usize = 3;

/// Successful resolution: the winning route and its raw bindings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteMatch<'r> {
    pub route: &'r CompiledRoute,
    /// Registration index of the route in the table
    pub index: usize,
    pub values: ExtractedValues,
    /// Optional elements that received no explicit value
    pub defaults_used: usize,
}

impl<'r> RouteMatch<'r> {
    #[inline]
    #[must_use]
    pub fn handler_name(&self) -> &'r str {
        &self.route.handler_name
    }

    #[inline]
    #[must_use]
    pub fn is_exact(&self) -> bool {
        self.defaults_used == 0
    }
}

/// No route accepted the input. This is a normal negative result.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("no route matches '{}'", .args.join(" "))]
pub struct NoMatch {
    /// The original input
    pub args: Vec<String>,
    /// Patterns sharing the longest literal prefix with the input
    pub suggestions: Vec<String>,
}

impl NoMatch {
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }
}

struct Candidate {
    index: usize,
    specificity: i32,
    defaults_used: usize,
    values: ExtractedValues,
}

impl Candidate {
    /// Selection order: exact first, then specificity; defaulted candidates
    /// prefer more defaults used, then specificity.
    fn outranks(&self, incumbent: &Candidate) -> bool {
        match (self.defaults_used == 0, incumbent.defaults_used == 0) {
            (true, false) => true,
            (false, true) => false,
            (true, true) => self.specificity > incumbent.specificity,
            (false, false) => {
                (self.defaults_used, self.specificity)
                    > (incumbent.defaults_used, incumbent.specificity)
            }
        }
    }
}

/// Resolve `args` against `routes`.
///
/// Pure and deterministic: the route slice is only read, and every call works
/// on its own scratch state, so concurrent calls over one table need no locking.
///
/// ```
/// use argvrouter::pattern::compile_pattern;
/// use argvrouter::router::resolve;
///
/// let routes = vec![
///     compile_pattern("deploy {env}", "deploy").unwrap(),
///     compile_pattern("deploy {env} --force", "deploy_forced").unwrap(),
/// ];
/// let matched = resolve(&["deploy", "prod"], &routes).unwrap();
/// assert_eq!(matched.handler_name(), "deploy");
/// assert_eq!(matched.values.text("env"), Some("prod"));
/// ```
pub fn resolve<'r, S: AsRef<str>>(
    args: &[S],
    routes: &'r [CompiledRoute],
) -> Result<RouteMatch<'r>, NoMatch> {
    let args: SmallVec<[&str; INLINE_ARGS]> = args.iter().map(AsRef::as_ref).collect();

    let mut best: Option<Candidate> = None;
    for (index, route) in routes.iter().enumerate() {
        let Ok((values, defaults_used)) = match_route(route, &args) else {
            continue;
        };
        let candidate = Candidate {
            index,
            specificity: route.specificity,
            defaults_used,
            values,
        };
        if best.as_ref().map_or(true, |incumbent| candidate.outranks(incumbent)) {
            best = Some(candidate);
        }
    }

    match best {
        Some(winner) => Ok(RouteMatch {
            route: &routes[winner.index],
            index: winner.index,
            values: winner.values,
            defaults_used: winner.defaults_used,
        }),
        None => Err(NoMatch {
            args: args.iter().map(|a| a.to_string()).collect(),
            suggestions: suggest(&args, routes),
        }),
    }
}

/// Match one route. Returns its bindings and the number of defaults used.
pub(crate) fn match_route(
    route: &CompiledRoute,
    args: &[&str],
) -> Result<(ExtractedValues, usize), Rejected> {
    let mut consumed = ConsumedSet::with_len(args.len());
    let mut values = ExtractedValues::new();
    let mut defaults_used = 0usize;
    let window_end = options::option_window(route, args);

    for option in route.options().filter(|o| o.is_repeated) {
        let collected = options::collect_repeated(route, option, args, window_end, &mut consumed)?;
        if collected.is_empty() {
            defaults_used += 1;
        }
        values.insert(&option.key, RawValue::List(collected));
    }

    for option in route.options().filter(|o| !o.is_repeated) {
        match options::bind_option(route, option, args, window_end, &mut consumed)? {
            OptionBinding::Present(value) => values.insert(&option.key, value),
            OptionBinding::PresentWithoutValue => {
                defaults_used += 1;
                values.insert(&option.key, RawValue::Unset);
            }
            OptionBinding::Absent if option.is_optional => {
                defaults_used += 1;
                values.insert(&option.key, option.absent_value());
            }
            OptionBinding::Absent => return Err(Rejected),
        }
    }

    let mut cursor = 0usize;
    for segment in route.positional() {
        match segment {
            Segment::Literal(literal) => {
                let slot = consumed.next_unmarked(cursor).ok_or(Rejected)?;
                if args[slot] != literal.value {
                    return Err(Rejected);
                }
                consumed.mark(slot);
                cursor = slot + 1;
            }
            Segment::Parameter(param) if param.is_catch_all => {
                // Capture stops at the first declared option after the capture
                // starts, even one already bound.
                let mut tokens = Vec::new();
                let mut slot = consumed.next_unmarked(cursor).unwrap_or(args.len());
                while slot < args.len() && !options::is_option_slot(route, args, slot, window_end) {
                    if !consumed.is_marked(slot) {
                        consumed.mark(slot);
                        tokens.push(args[slot].to_string());
                    }
                    slot += 1;
                }
                if tokens.is_empty() {
                    defaults_used += 1;
                }
                values.insert(&param.name, RawValue::rest(tokens));
                return Ok((values, defaults_used));
            }
            Segment::Parameter(param) => {
                let next = consumed
                    .next_unmarked(cursor)
                    .filter(|&slot| !options::is_option_slot(route, args, slot, window_end));
                match next {
                    Some(slot) => {
                        consumed.mark(slot);
                        cursor = slot + 1;
                        values.insert(&param.name, RawValue::Text(args[slot].to_string()));
                    }
                    None if param.is_optional => {
                        defaults_used += 1;
                        values.insert(&param.name, RawValue::Unset);
                    }
                    None => return Err(Rejected),
                }
            }
            Segment::Option(_) => {}
        }
    }

    if consumed.is_complete() {
        Ok((values, defaults_used))
    } else {
        Err(Rejected)
    }
}

/// Patterns whose leading literals share the longest prefix with `args`.
fn suggest(args: &[&str], routes: &[CompiledRoute]) -> Vec<String> {
    let shared = |route: &CompiledRoute| {
        route
            .leading_literals()
            .zip(args.iter())
            .take_while(|(literal, arg)| literal == *arg)
            .count()
    };

    let longest = routes.iter().map(shared).max().unwrap_or(0);
    if longest == 0 {
        return Vec::new();
    }

    let mut suggestions: Vec<String> = Vec::new();
    for route in routes.iter().filter(|r| shared(r) == longest) {
        let pattern = route.display_pattern();
        if !suggestions.contains(&pattern) {
            suggestions.push(pattern);
        }
        if suggestions.len() == MAX_SUGGESTIONS {
            break;
        }
    }
    suggestions
}
