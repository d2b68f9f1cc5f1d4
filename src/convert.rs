//! # Type Conversion Registry
//!
//! Maps a type-constraint name (the `int` in `{n:int}`) to a string → typed
//! value conversion. The resolver never converts anything; the
//! [`binder`](crate::binder) consults a registry after a route has won.
//!
//! ## Built-in constraints
//!
//! | Constraint | Result |
//! | --- | --- |
//! | `string` | [`TypedValue::Text`] |
//! | `int` | [`TypedValue::Int`], 32-bit range |
//! | `long` | [`TypedValue::Int`], 64-bit range |
//! | `double`, `float` | [`TypedValue::Float`] |
//! | `bool` | [`TypedValue::Bool`] (`true/false`, `yes/no`, `1/0`) |
//! | `uri` | [`TypedValue::Url`] |
//! | `path` | [`TypedValue::Path`] |
//!
//! Enumerations are registered by name with [`DefaultConverters::with_enum`]
//! and match their members case-insensitively.

use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use url::Url;

/// A converted parameter value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum TypedValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Url(Url),
    Path(PathBuf),
    /// Canonical member name of an enumeration
    Enum(String),
    /// Repeated option or catch-all, converted element-wise
    List(Vec<TypedValue>),
    /// Optional element that received no value
    Unset,
}

impl TypedValue {
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TypedValue::Text(s) | TypedValue::Enum(s) => Some(s),
            TypedValue::Url(u) => Some(u.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            TypedValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            TypedValue::Float(f) => Some(*f),
            TypedValue::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TypedValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[TypedValue]> {
        match self {
            TypedValue::List(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_unset(&self) -> bool {
        matches!(self, TypedValue::Unset)
    }
}

/// What a registry knows about one constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConverterInfo {
    pub name: String,
    pub is_enum: bool,
    /// Member names, empty unless `is_enum`
    pub members: Vec<String>,
}

impl ConverterInfo {
    /// Short description of accepted input, for error messages.
    #[must_use]
    pub fn expected(&self) -> String {
        if self.is_enum {
            format!("one of: {}", self.members.join(", "))
        } else {
            format!("a value of type '{}'", self.name)
        }
    }
}

/// Source of type conversions for the binder.
pub trait TypeConverterRegistry: Send + Sync {
    /// Convert `raw` under `constraint`; `None` when the value does not parse
    /// or the constraint is unknown.
    fn try_convert(&self, raw: &str, constraint: &str) -> Option<TypedValue>;

    /// Describe `constraint`, or `None` if the registry has no converter for it.
    fn converter_for(&self, constraint: &str) -> Option<ConverterInfo>;
}

const BUILTIN: &[&str] = &["string", "int", "long", "double", "float", "bool", "uri", "path"];

/// Built-in converters plus user-registered enumerations.
#[derive(Debug, Clone, Default)]
pub struct DefaultConverters {
    enums: HashMap<String, Vec<String>>,
}

impl DefaultConverters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an enumeration constraint. Replaces a previous registration.
    #[must_use]
    pub fn with_enum<I, S>(mut self, name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.register_enum(name, members);
        self
    }

    pub fn register_enum<I, S>(&mut self, name: impl Into<String>, members: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enums
            .insert(name.into(), members.into_iter().map(Into::into).collect());
    }

    fn parse_bool(raw: &str) -> Option<bool> {
        match raw.to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        }
    }
}

impl TypeConverterRegistry for DefaultConverters {
    fn try_convert(&self, raw: &str, constraint: &str) -> Option<TypedValue> {
        if let Some(members) = self.enums.get(constraint) {
            return members
                .iter()
                .find(|m| m.eq_ignore_ascii_case(raw))
                .map(|m| TypedValue::Enum(m.clone()));
        }

        match constraint {
            "string" => Some(TypedValue::Text(raw.to_string())),
            "int" => raw.parse::<i32>().ok().map(|n| TypedValue::Int(i64::from(n))),
            "long" => raw.parse::<i64>().ok().map(TypedValue::Int),
            "double" | "float" => raw.parse::<f64>().ok().map(TypedValue::Float),
            "bool" => Self::parse_bool(raw).map(TypedValue::Bool),
            "uri" => Url::parse(raw).ok().map(TypedValue::Url),
            "path" if !raw.is_empty() => Some(TypedValue::Path(PathBuf::from(raw))),
            _ => None,
        }
    }

    fn converter_for(&self, constraint: &str) -> Option<ConverterInfo> {
        if let Some(members) = self.enums.get(constraint) {
            return Some(ConverterInfo {
                name: constraint.to_string(),
                is_enum: true,
                members: members.clone(),
            });
        }
        BUILTIN.contains(&constraint).then(|| ConverterInfo {
            name: constraint.to_string(),
            is_enum: false,
            members: Vec::new(),
        })
    }
}
