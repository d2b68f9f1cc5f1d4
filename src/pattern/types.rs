use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Weight of a literal segment.
pub const LITERAL_WEIGHT: i32 = 100;
/// Weight of a required parameter or a required value option.
pub const REQUIRED_WEIGHT: i32 = 50;
/// Weight of an optional parameter, optional option, boolean flag or repeated option.
pub const OPTIONAL_WEIGHT: i32 = 20;
/// Weight of a catch-all parameter.
pub const CATCH_ALL_WEIGHT: i32 = 5;

/// The reserved end-of-options literal.
pub const END_OF_OPTIONS: &str = "--";

/// A route as declared by the application, before compilation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDefinition {
    /// Pattern string, e.g. `deploy {env} --force`
    pub pattern: String,
    /// Name of the handler that receives matches for this route
    #[serde(alias = "handler")]
    pub handler_name: String,
    /// Literal-only prefix shared by a group of routes (e.g. `docker compose`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_prefix: Option<String>,
    /// Free-form description used by tooling
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RouteDefinition {
    pub fn new(pattern: impl Into<String>, handler_name: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            handler_name: handler_name.into(),
            group_prefix: None,
            description: None,
        }
    }

    pub fn in_group(mut self, prefix: impl Into<String>) -> Self {
        self.group_prefix = Some(prefix.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Exact-match token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LiteralSegment {
    pub value: String,
}

impl LiteralSegment {
    #[inline]
    #[must_use]
    pub fn is_end_of_options(&self) -> bool {
        self.value == END_OF_OPTIONS
    }
}

/// Positional parameter: `{name}`, `{name:type}`, `{name?}` or `{*name}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterSegment {
    pub name: Arc<str>,
    pub type_constraint: Option<String>,
    pub is_optional: bool,
    pub is_catch_all: bool,
}

/// Option such as `--force`, `-f`, `--mode {mode}` or `--label {l}*`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionSegment {
    /// Long form including dashes (`--dry-run`)
    pub long_form: Option<String>,
    /// Short form including the dash (`-d`)
    pub short_form: Option<String>,
    pub expects_value: bool,
    /// Name the value binds under when `expects_value` is set
    pub parameter_name: Option<Arc<str>>,
    pub type_constraint: Option<String>,
    pub parameter_is_optional: bool,
    pub is_repeated: bool,
    pub is_optional: bool,
    /// Key this option binds under in the extracted values
    pub key: Arc<str>,
}

impl OptionSegment {
    /// True if `token` is exactly one of this option's spellings.
    #[inline]
    #[must_use]
    pub fn matches_token(&self, token: &str) -> bool {
        self.long_form.as_deref() == Some(token) || self.short_form.as_deref() == Some(token)
    }

    /// `--long,-s`, `--long` or `-s`.
    #[must_use]
    pub fn spelling(&self) -> String {
        match (&self.long_form, &self.short_form) {
            (Some(long), Some(short)) => format!("{long},{short}"),
            (Some(long), None) => long.clone(),
            (None, Some(short)) => short.clone(),
            (None, None) => String::new(),
        }
    }

    /// Placeholder recorded when the option does not appear in the input.
    #[must_use]
    pub fn absent_value(&self) -> crate::router::RawValue {
        use crate::router::RawValue;
        if self.is_repeated {
            RawValue::List(Vec::new())
        } else if self.expects_value {
            RawValue::Unset
        } else {
            RawValue::Flag(false)
        }
    }
}

/// One element of a compiled route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Segment {
    Literal(LiteralSegment),
    Parameter(ParameterSegment),
    Option(OptionSegment),
}

impl Segment {
    /// Contribution of this segment to the route specificity.
    #[must_use]
    pub fn weight(&self) -> i32 {
        match self {
            Segment::Literal(_) => LITERAL_WEIGHT,
            Segment::Parameter(p) if p.is_catch_all => CATCH_ALL_WEIGHT,
            Segment::Parameter(p) if p.is_optional => OPTIONAL_WEIGHT,
            Segment::Parameter(_) => REQUIRED_WEIGHT,
            Segment::Option(o) if o.is_optional => OPTIONAL_WEIGHT,
            Segment::Option(_) => REQUIRED_WEIGHT,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_positional(&self) -> bool {
        !matches!(self, Segment::Option(_))
    }
}

/// A route pattern compiled into segments. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompiledRoute {
    /// Pattern as written, without the group prefix
    pub original_pattern: String,
    pub group_prefix: Option<String>,
    pub segments: Vec<Segment>,
    /// Indices into `segments` of every option segment
    pub option_segments: Vec<usize>,
    pub has_catch_all: bool,
    pub has_end_of_options: bool,
    pub specificity: i32,
    pub handler_name: Arc<str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CompiledRoute {
    /// Pattern including the group prefix, as shown in diagnostics.
    #[must_use]
    pub fn display_pattern(&self) -> String {
        match self.group_prefix.as_deref() {
            Some(prefix) if self.original_pattern.is_empty() => prefix.to_string(),
            Some(prefix) => format!("{prefix} {}", self.original_pattern),
            None => self.original_pattern.clone(),
        }
    }

    /// Option segments in declaration order.
    pub fn options(&self) -> impl Iterator<Item = &OptionSegment> + '_ {
        self.option_segments
            .iter()
            .filter_map(|&idx| match self.segments.get(idx) {
                Some(Segment::Option(option)) => Some(option),
                _ => None,
            })
    }

    /// Literal and parameter segments in declaration order.
    pub fn positional(&self) -> impl Iterator<Item = &Segment> + '_ {
        self.segments.iter().filter(|s| s.is_positional())
    }

    /// Whether `token` is one of the options this route declares.
    #[inline]
    #[must_use]
    pub fn declares_option(&self, token: &str) -> bool {
        token.starts_with('-') && self.options().any(|o| o.matches_token(token))
    }

    #[must_use]
    pub fn catch_all(&self) -> Option<&ParameterSegment> {
        self.segments.iter().find_map(|s| match s {
            Segment::Parameter(p) if p.is_catch_all => Some(p),
            _ => None,
        })
    }

    /// Type constraint declared for the value bound under `key`, if any.
    #[must_use]
    pub fn constraint_for(&self, key: &str) -> Option<&str> {
        self.segments.iter().find_map(|s| match s {
            Segment::Parameter(p) if p.name.as_ref() == key => p.type_constraint.as_deref(),
            Segment::Option(o) if o.key.as_ref() == key => o.type_constraint.as_deref(),
            _ => None,
        })
    }

    /// Leading literal tokens, used to suggest near misses.
    pub fn leading_literals(&self) -> impl Iterator<Item = &str> + '_ {
        self.positional().map_while(|s| match s {
            Segment::Literal(lit) if !lit.is_end_of_options() => Some(lit.value.as_str()),
            _ => None,
        })
    }
}
