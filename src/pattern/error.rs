use thiserror::Error;

/// Reason a single route pattern failed to compile.
///
/// Compilation failures are per-pattern: a table compiler collects one of
/// these for each bad pattern and keeps compiling the rest.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// A token could not be classified (unbalanced braces, bad names, ...)
    #[error("invalid token '{token}': {reason}")]
    InvalidToken { token: String, reason: &'static str },

    /// Two segments bind under the same name
    #[error("parameter '{name}' is declared more than once")]
    DuplicateParameter { name: String },

    #[error("optional parameter '{optional}' precedes required parameter '{required}'")]
    OptionalBeforeRequired { optional: String, required: String },

    /// The optional parameter would always take the literal's token
    #[error("literal '{literal}' follows optional parameter '{optional}'")]
    LiteralAfterOptional { optional: String, literal: String },

    #[error("catch-all parameter '{name}' must be the last positional segment")]
    CatchAllNotLast { name: String },

    #[error("catch-all parameter '{catch_all}' cannot be combined with optional parameter '{optional}'")]
    CatchAllWithOptional { catch_all: String, optional: String },

    #[error("short alias '{alias}' is declared by more than one option")]
    DuplicateShortAlias { alias: String },

    #[error("option '{option}' is declared more than once")]
    DuplicateOption { option: String },

    #[error("option '{option}' is declared after the end-of-options marker '--'")]
    OptionAfterEndOfOptions { option: String },

    #[error("end-of-options marker '--' may appear only once")]
    DuplicateEndOfOptions,

    #[error("group prefix '{prefix}' may only contain literal tokens")]
    InvalidGroupPrefix { prefix: String },
}

/// A pattern that failed to compile, with enough context to report it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("route '{pattern}' ({handler_name}): {error}")]
pub struct CompileFailure {
    /// Pattern including any group prefix
    pub pattern: String,
    pub handler_name: String,
    pub error: PatternError,
}
