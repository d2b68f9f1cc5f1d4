use crate::binder::{bind, BindError, BoundArguments};
use crate::convert::{DefaultConverters, TypeConverterRegistry};
use crate::router::{ExtractedValues, NoMatch, RouteTable};
use serde::Serialize;
use std::any::Any;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Everything a handler learns about the invocation that selected it.
#[derive(Debug, Clone, Serialize)]
pub struct CommandRequest {
    pub handler_name: String,
    /// Pattern of the winning route, group prefix included
    pub route_pattern: String,
    /// The argument vector as given
    pub args: Vec<String>,
    /// Raw values before conversion
    pub raw: ExtractedValues,
    /// Converted values
    pub arguments: BoundArguments,
}

/// Handler closure; returns the process exit code.
pub type HandlerFn = Arc<dyn Fn(&CommandRequest) -> anyhow::Result<i32> + Send + Sync>;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    NoMatch(#[from] NoMatch),

    #[error(transparent)]
    Bind(#[from] BindError),

    #[error("no handler registered for '{handler_name}'")]
    HandlerNotFound { handler_name: String },

    #[error("handler '{handler_name}' failed: {message}")]
    HandlerFailed { handler_name: String, message: String },

    #[error("handler '{handler_name}' panicked: {message}")]
    HandlerPanicked { handler_name: String, message: String },
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Resolves argv against a [`RouteTable`], binds the winning route and runs
/// the handler registered under its name.
pub struct Dispatcher {
    table: RouteTable,
    handlers: HashMap<String, HandlerFn>,
    converters: Arc<dyn TypeConverterRegistry>,
}

impl Dispatcher {
    /// Dispatcher over `table` using [`DefaultConverters`].
    #[must_use]
    pub fn new(table: RouteTable) -> Self {
        Self {
            table,
            handlers: HashMap::new(),
            converters: Arc::new(DefaultConverters::new()),
        }
    }

    #[must_use]
    pub fn with_converters(mut self, converters: Arc<dyn TypeConverterRegistry>) -> Self {
        self.converters = converters;
        self
    }

    /// Register a handler by name.
    ///
    /// **IMPORTANT**: If a handler with the same name already exists, it will be
    /// replaced.
    pub fn register<F>(&mut self, handler_name: impl Into<String>, handler: F)
    where
        F: Fn(&CommandRequest) -> anyhow::Result<i32> + Send + Sync + 'static,
    {
        let handler_name = handler_name.into();

        if self.handlers.remove(&handler_name).is_some() {
            warn!(
                handler_name = %handler_name,
                total_handlers = self.handlers.len(),
                "Replaced existing handler"
            );
        }

        info!(
            handler_name = %handler_name,
            total_handlers = self.handlers.len() + 1,
            "Handler registered successfully"
        );

        self.handlers.insert(handler_name, Arc::new(handler));
    }

    #[must_use]
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    #[must_use]
    pub fn has_handler(&self, handler_name: &str) -> bool {
        self.handlers.contains_key(handler_name)
    }

    /// Handler names referenced by routes but never registered, in route order.
    #[must_use]
    pub fn missing_handlers(&self) -> Vec<String> {
        let mut missing: Vec<String> = Vec::new();
        for route in self.table.routes() {
            let name = route.handler_name.as_ref();
            if !self.handlers.contains_key(name) && !missing.iter().any(|m| m == name) {
                missing.push(name.to_string());
            }
        }
        missing
    }

    /// Resolve, bind and invoke. Returns the handler's exit code.
    pub fn dispatch<S: AsRef<str>>(&self, args: &[S]) -> Result<i32, DispatchError> {
        let matched = self.table.resolve(args)?;
        let arguments = bind(&matched, self.converters.as_ref())?;
        let handler_name = matched.handler_name();

        debug!(
            handler_name = %handler_name,
            available_handlers = self.handlers.len(),
            "Handler lookup"
        );

        let Some(handler) = self.handlers.get(handler_name) else {
            let mut available: Vec<&String> = self.handlers.keys().collect();
            available.sort();
            error!(
                handler_name = %handler_name,
                available_handlers = ?available,
                "Handler not found - CRITICAL"
            );
            return Err(DispatchError::HandlerNotFound {
                handler_name: handler_name.to_string(),
            });
        };

        let request = CommandRequest {
            handler_name: handler_name.to_string(),
            route_pattern: matched.route.display_pattern(),
            args: args.iter().map(|a| a.as_ref().to_string()).collect(),
            raw: matched.values,
            arguments,
        };

        info!(
            handler_name = %request.handler_name,
            route_pattern = %request.route_pattern,
            "Handler execution start"
        );
        let execution_start = Instant::now();

        match catch_unwind(AssertUnwindSafe(|| handler(&request))) {
            Ok(Ok(code)) => {
                info!(
                    handler_name = %request.handler_name,
                    exit_code = code,
                    execution_time_us = execution_start.elapsed().as_micros(),
                    "Handler execution complete"
                );
                Ok(code)
            }
            Ok(Err(err)) => {
                warn!(
                    handler_name = %request.handler_name,
                    error = %err,
                    "Handler returned an error"
                );
                Err(DispatchError::HandlerFailed {
                    handler_name: request.handler_name,
                    message: format!("{err:#}"),
                })
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                error!(
                    handler_name = %request.handler_name,
                    panic_message = %message,
                    "Handler panicked - CRITICAL"
                );
                Err(DispatchError::HandlerPanicked {
                    handler_name: request.handler_name,
                    message,
                })
            }
        }
    }
}
