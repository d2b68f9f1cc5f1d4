//! Option matching for a single route.
//!
//! "Is this token an option?" is always answered against the options the
//! current route declares, never globally. A token such as `-3` is therefore an
//! ordinary positional value under any route that does not declare `-3`.

use super::consumed::ConsumedSet;
use super::values::RawValue;
use crate::pattern::{CompiledRoute, OptionSegment, END_OF_OPTIONS};

/// The route cannot match this input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Rejected;

/// Outcome of searching the input for one non-repeated option.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum OptionBinding {
    /// Option found, with its bound value
    Present(RawValue),
    /// Option found but its optional value was not supplied
    PresentWithoutValue,
    /// Option does not appear in the input
    Absent,
}

/// End (exclusive) of the slots in which options may be recognised.
///
/// Routes that declare `--` stop recognising options at the first `--` token
/// of the input; every other route recognises options everywhere.
pub(crate) fn option_window(route: &CompiledRoute, args: &[&str]) -> usize {
    if route.has_end_of_options {
        args.iter()
            .position(|&a| a == END_OF_OPTIONS)
            .unwrap_or(args.len())
    } else {
        args.len()
    }
}

/// Whether `slot` holds a token the route treats as one of its own options.
#[inline]
pub(crate) fn is_option_slot(route: &CompiledRoute, args: &[&str], slot: usize, window_end: usize) -> bool {
    slot < window_end && route.declares_option(args[slot])
}

/// Take the value following an option at `slot`, if one is available.
fn take_value(
    route: &CompiledRoute,
    args: &[&str],
    slot: usize,
    window_end: usize,
    consumed: &mut ConsumedSet,
) -> Option<String> {
    let value_slot = slot + 1;
    if value_slot >= args.len()
        || consumed.is_marked(value_slot)
        || is_option_slot(route, args, value_slot, window_end)
        || (route.has_end_of_options && value_slot == window_end)
    {
        return None;
    }
    consumed.mark(value_slot);
    Some(args[value_slot].to_string())
}

/// Collect every occurrence of a repeated option across the option window.
///
/// Each occurrence is consumed along with its value when the option expects
/// one. A boolean repeated option records `"true"` per occurrence. A missing
/// required value rejects the route; a missing optional value is skipped.
pub(crate) fn collect_repeated(
    route: &CompiledRoute,
    option: &OptionSegment,
    args: &[&str],
    window_end: usize,
    consumed: &mut ConsumedSet,
) -> Result<Vec<String>, Rejected> {
    let mut collected = Vec::new();
    for slot in 0..window_end {
        if consumed.is_marked(slot) || !option.matches_token(args[slot]) {
            continue;
        }
        consumed.mark(slot);

        if !option.expects_value {
            collected.push("true".to_string());
            continue;
        }
        match take_value(route, args, slot, window_end, consumed) {
            Some(value) => collected.push(value),
            None if option.parameter_is_optional => {}
            None => return Err(Rejected),
        }
    }
    Ok(collected)
}

/// Bind a non-repeated option: the first unconsumed matching slot wins.
pub(crate) fn bind_option(
    route: &CompiledRoute,
    option: &OptionSegment,
    args: &[&str],
    window_end: usize,
    consumed: &mut ConsumedSet,
) -> Result<OptionBinding, Rejected> {
    let found = (0..window_end).find(|&slot| !consumed.is_marked(slot) && option.matches_token(args[slot]));
    let Some(slot) = found else {
        return Ok(OptionBinding::Absent);
    };
    consumed.mark(slot);

    if !option.expects_value {
        return Ok(OptionBinding::Present(RawValue::Flag(true)));
    }
    match take_value(route, args, slot, window_end, consumed) {
        Some(value) => Ok(OptionBinding::Present(RawValue::Text(value))),
        None if option.parameter_is_optional => Ok(OptionBinding::PresentWithoutValue),
        None => Err(Rejected),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::{compile_pattern, Segment};

    fn option<'r>(route: &'r CompiledRoute, key: &str) -> &'r OptionSegment {
        route
            .segments
            .iter()
            .find_map(|s| match s {
                Segment::Option(o) if o.key.as_ref() == key => Some(o),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn test_value_is_not_taken_from_a_declared_option() {
        let route = compile_pattern("build --mode {m?} --force", "build").unwrap();
        let args = ["build", "--mode", "--force"];
        let mut consumed = ConsumedSet::with_len(args.len());

        let binding = bind_option(&route, option(&route, "m"), &args, args.len(), &mut consumed).unwrap();
        assert_eq!(binding, OptionBinding::PresentWithoutValue);
        assert!(!consumed.is_marked(2), "--force stays available");
    }

    #[test]
    fn test_required_value_missing_rejects() {
        let route = compile_pattern("build --mode {m}", "build").unwrap();
        let args = ["build", "--mode"];
        let mut consumed = ConsumedSet::with_len(args.len());

        let result = bind_option(&route, option(&route, "m"), &args, args.len(), &mut consumed);
        assert_eq!(result, Err(Rejected));
    }

    #[test]
    fn test_undeclared_dash_token_is_a_value() {
        let route = compile_pattern("calc --offset {n}", "calc").unwrap();
        let args = ["calc", "--offset", "-3"];
        let mut consumed = ConsumedSet::with_len(args.len());

        let binding = bind_option(&route, option(&route, "n"), &args, args.len(), &mut consumed).unwrap();
        assert_eq!(binding, OptionBinding::Present(RawValue::Text("-3".into())));
    }

    #[test]
    fn test_repeated_collects_in_order() {
        let route = compile_pattern("tag --label {l}*", "tag").unwrap();
        let args = ["tag", "--label", "a", "x", "--label", "b"];
        let mut consumed = ConsumedSet::with_len(args.len());

        let values = collect_repeated(&route, option(&route, "l"), &args, args.len(), &mut consumed).unwrap();
        assert_eq!(values, vec!["a", "b"]);
        assert_eq!(consumed.count(), 4);
        assert!(!consumed.is_marked(3));
    }

    #[test]
    fn test_window_stops_at_end_of_options() {
        let route = compile_pattern("run --verbose -- {*rest}", "run").unwrap();
        let args = ["run", "--", "--verbose"];
        assert_eq!(option_window(&route, &args), 1);

        let plain = compile_pattern("run --verbose", "run").unwrap();
        assert_eq!(option_window(&plain, &args), 3);
    }
}
