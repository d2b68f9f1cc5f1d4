//! # Dispatcher Module
//!
//! Runs the handler registered for the route an argument vector resolves to.
//!
//! ## Overview
//!
//! The dispatcher:
//! - Keeps a registry of handler closures keyed by handler name
//! - Resolves argv against its [`RouteTable`](crate::router::RouteTable)
//! - Binds the winning route's values through a type conversion registry
//! - Recovers from handler panics
//!
//! ## Handler Registration
//!
//! ```rust
//! use argvrouter::dispatcher::Dispatcher;
//! use argvrouter::pattern::RouteDefinition;
//! use argvrouter::router::RouteTable;
//!
//! let table = RouteTable::compile(&[RouteDefinition::new("add {a:int} {b:int}", "add")])
//!     .into_result()
//!     .unwrap();
//!
//! let mut dispatcher = Dispatcher::new(table);
//! dispatcher.register("add", |req| {
//!     let sum = req.arguments.get_i64("a").unwrap_or(0) + req.arguments.get_i64("b").unwrap_or(0);
//!     Ok(i32::try_from(sum)?)
//! });
//!
//! assert_eq!(dispatcher.dispatch(&["add", "2", "3"]).unwrap(), 5);
//! ```
//!
//! ## Error Handling
//!
//! - No matching route returns [`DispatchError::NoMatch`] with suggestions
//! - A value that fails type conversion returns [`DispatchError::Bind`]; no
//!   other route is tried
//! - Missing handlers return [`DispatchError::HandlerNotFound`]
//! - Handler panics are caught and returned as [`DispatchError::HandlerPanicked`]

mod core;

pub use core::{CommandRequest, DispatchError, Dispatcher, HandlerFn};
