//! # Router Module
//!
//! Resolves a command-line argument vector to the best-matching compiled route.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Holding the immutable [`RouteTable`] built once at startup
//! - Matching argv against **every** route (no short-circuit on first success)
//! - Binding options anywhere in the input, independent of their position
//! - Ranking the accepted candidates and extracting raw values for the winner
//!
//! ## Architecture
//!
//! 1. **Compilation**: pattern strings become [`CompiledRoute`](crate::pattern::CompiledRoute)s
//!    (see [`crate::pattern`]).
//! 2. **Matching**: [`resolve`] tries each route with fresh scratch state
//!    ([`ConsumedSet`] + [`ExtractedValues`]) and keeps the best candidate.
//!
//! ## Example
//!
//! ```rust
//! use argvrouter::pattern::RouteDefinition;
//! use argvrouter::router::RouteTable;
//!
//! let table = RouteTable::compile(&[
//!     RouteDefinition::new("tag --label {l}*", "tag"),
//! ])
//! .into_result()
//! .unwrap();
//!
//! let matched = table.resolve(&["tag", "--label", "a", "--label", "b"]).unwrap();
//! assert_eq!(matched.values.list("l"), Some(&["a".to_string(), "b".to_string()][..]));
//! ```
//!
//! ## Performance
//!
//! Matching is `O(routes × segments × argv)`. For up to
//! [`INLINE_SLOTS`] arguments and [`MAX_INLINE_VALUES`] bindings the
//! per-route scratch state stays on the stack.

mod consumed;
mod core;
mod options;
mod resolver;
mod values;

#[cfg(test)]
mod tests;

pub use consumed::{ConsumedSet, INLINE_SLOTS, INLINE_SLOT_WORDS};
pub use core::{CompileReport, RouteTable, DEFAULT_SLOW_MATCH};
pub use resolver::{resolve, NoMatch, RouteMatch, MAX_SUGGESTIONS};
pub use values::{ExtractedValues, RawValue, MAX_INLINE_VALUES};
