//! # Pattern Module
//!
//! Parses route pattern strings into [`CompiledRoute`] values: an ordered list of
//! [`Segment`]s plus a specificity score used to rank competing matches.
//!
//! ## Grammar
//!
//! | Token | Meaning |
//! | --- | --- |
//! | `deploy` | literal, case-sensitive exact match |
//! | `{env}` / `{n:int}` | required parameter, optionally typed |
//! | `{tag?}` / `{n:int?}` | optional parameter |
//! | `{*files}` | catch-all, must be the last positional segment |
//! | `--force` / `-f` / `--force,-f` | boolean option (always optional) |
//! | `--mode {mode}` | option expecting a value |
//! | `--mode? {mode}` | optional value option |
//! | `--label {l}*` | repeated option, collected into a list |
//! | `--` | end of options: later input tokens are positional |
//!
//! ## Specificity
//!
//! Each segment contributes a weight and the route specificity is the sum:
//! literal ([`LITERAL_WEIGHT`]) > required parameter ([`REQUIRED_WEIGHT`]) >
//! optional element ([`OPTIONAL_WEIGHT`]) > catch-all ([`CATCH_ALL_WEIGHT`]).
//! All weights are positive, so a structural superset of a route never scores
//! lower than the route itself.
//!
//! ## Example
//!
//! ```rust
//! use argvrouter::pattern::{compile_pattern, Segment};
//!
//! let route = compile_pattern("round {value:double} --mode {mode}", "round").unwrap();
//! assert!(matches!(route.segments[0], Segment::Literal(_)));
//! assert_eq!(route.constraint_for("value"), Some("double"));
//! ```

mod compile;
mod error;
mod types;


pub use compile::{compile_pattern, compile_route};
pub use error::{CompileFailure, PatternError};
pub use types::{
    CompiledRoute, LiteralSegment, OptionSegment, ParameterSegment, RouteDefinition, Segment,
    CATCH_ALL_WEIGHT, END_OF_OPTIONS, LITERAL_WEIGHT, OPTIONAL_WEIGHT, REQUIRED_WEIGHT,
};
