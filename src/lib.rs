//! # argvrouter
//!
//! **argvrouter** routes command-line argument vectors to named handlers using declarative
//! route patterns such as `deploy {env} --force --replicas {n:int}`.
//!
//! ## Overview
//!
//! Applications declare routes as pattern strings. argvrouter compiles each pattern once,
//! resolves incoming argv to the single best route by a specificity score, extracts the
//! raw values for parameters and options, and lints the route set for duplicates,
//! ambiguous type constraints and routes that can never win.
//!
//! ## Architecture
//!
//! The library is organized into several key modules:
//!
//! - **[`pattern`]** - Pattern grammar, compiled route model and specificity scoring
//! - **[`router`]** - Compiled route table and the resolver (option matching, selection)
//! - **[`validator`]** - Route-set diagnostics (duplicates, overlaps, reachability)
//! - **[`convert`]** - Type conversion registry for constrained values (`int`, `bool`, ...)
//! - **[`binder`]** - Converts a match's raw values into typed arguments
//! - **[`dispatcher`]** - Handler registry that resolves, binds and invokes
//! - **[`manifest`]** - Route manifests in YAML, JSON or TOML
//! - **[`runtime_config`]** - Environment-driven runtime settings
//! - **[`logging`]** - `tracing-subscriber` initialisation
//! - **[`cli`]** - The `argvrouter` command-line tool
//!
//! ### Resolution Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant App
//!     participant Table as router::RouteTable
//!     participant Resolver as router::resolve
//!     participant Binder as binder::bind
//!     participant Handler
//!
//!     App->>Table: RouteTable::compile(definitions)
//!     Table-->>App: CompileReport { table, failures }
//!     App->>Table: resolve(argv)
//!     Table->>Resolver: resolve(argv, routes)
//!     Resolver->>Resolver: match options inside the option window
//!     Resolver->>Resolver: walk positional segments
//!     Resolver->>Resolver: pick exact > specificity > registration order
//!     Resolver-->>Table: RouteMatch | NoMatch { suggestions }
//!     Table-->>App: RouteMatch
//!     App->>Binder: bind(&matched, &converters)
//!     Binder-->>App: BoundArguments
//!     App->>Handler: handler(&CommandRequest)
//! ```
//!
//! ### Key Architectural Patterns
//!
//! 1. **Compile Once**: Patterns are parsed and scored at registration; resolution only reads
//! 2. **Lock-Free Resolution**: A compiled table is immutable and safe to share across threads
//! 3. **Raw Then Typed**: The resolver binds raw strings; type conversion happens after selection
//! 4. **Deterministic Selection**: Ties always break by registration order
//!
//! ## Quick Start
//!
//! ```
//! use argvrouter::pattern::RouteDefinition;
//! use argvrouter::router::RouteTable;
//!
//! let table = RouteTable::compile(&[
//!     RouteDefinition::new("deploy {env}", "deploy"),
//!     RouteDefinition::new("deploy {env} --force", "deploy_forced"),
//! ])
//! .into_result()
//! .expect("patterns compile");
//!
//! let matched = table.resolve(&["deploy", "prod", "--force"]).expect("a route matches");
//! assert_eq!(matched.handler_name(), "deploy_forced");
//! assert_eq!(matched.values.text("env"), Some("prod"));
//! ```
//!
//! ## Features
//!
//! - **Rich Patterns**: Literals, `{name}`, `{name?}`, `{name:type}`, `{*rest}`, boolean and
//!   valued options with long/short aliases, optional and repeated options, and `--`
//! - **Specificity Ranking**: Literals outweigh parameters, which outweigh optional elements
//! - **Suggestions**: A miss carries the patterns sharing the longest literal prefix
//! - **Linting**: Duplicate, overlapping and unreachable routes are reported before runtime
//! - **Manifests**: Routes can live in a YAML, JSON or TOML file
//!
//! ## Runtime Considerations
//!
//! - Resolution allocates little: consumed-token tracking and bound values stay on the stack
//!   for typical argument counts
//! - Matches slower than `ARGVR_SLOW_MATCH_US` are logged at `warn`
//! - Logging is configured through `ARGVR_LOG_*` variables, see [`logging`]

pub mod binder;
pub mod cli;
pub mod convert;
pub mod dispatcher;
pub mod logging;
pub mod manifest;
pub mod pattern;
pub mod router;
pub mod runtime_config;
pub mod validator;

pub use binder::{bind, BindError, BoundArguments};
pub use dispatcher::{CommandRequest, DispatchError, Dispatcher};
pub use manifest::{load_manifest, load_route_table, RouteManifest};
pub use pattern::{compile_pattern, compile_route, CompiledRoute, PatternError, RouteDefinition};
pub use router::{resolve, NoMatch, RouteMatch, RouteTable};
pub use validator::{Diagnostic, ReachabilityPolicy, Severity};
