//! Typed binding of a resolved route's raw values.
//!
//! Runs after resolution. A value that fails to convert is reported to the
//! user as a [`BindError`]; the binder never goes back to try a sibling route.

use crate::convert::{TypeConverterRegistry, TypedValue};
use crate::router::{RawValue, RouteMatch};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    #[error("parameter '{parameter}' uses unknown type constraint '{constraint}'")]
    UnknownConstraint { parameter: String, constraint: String },

    #[error("invalid value '{raw}' for '{parameter}': expected {expected}")]
    ConversionFailed {
        parameter: String,
        constraint: String,
        raw: String,
        expected: String,
    },
}

/// Converted values of the winning route, keyed by binding name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BoundArguments {
    values: BTreeMap<String, TypedValue>,
}

impl BoundArguments {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TypedValue> {
        self.values.get(name)
    }

    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(TypedValue::as_str)
    }

    #[must_use]
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(TypedValue::as_i64)
    }

    #[must_use]
    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(TypedValue::as_f64)
    }

    /// Boolean option state; `false` when absent.
    #[must_use]
    pub fn flag(&self, name: &str) -> bool {
        self.get(name).and_then(TypedValue::as_bool).unwrap_or(false)
    }

    #[must_use]
    pub fn get_path(&self, name: &str) -> Option<&Path> {
        match self.get(name) {
            Some(TypedValue::Path(p)) => Some(p),
            _ => None,
        }
    }

    #[must_use]
    pub fn list(&self, name: &str) -> &[TypedValue] {
        self.get(name).and_then(TypedValue::as_list).unwrap_or(&[])
    }

    /// True when `name` was bound to an actual value.
    #[must_use]
    pub fn is_set(&self, name: &str) -> bool {
        self.get(name).is_some_and(|v| !v.is_unset())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypedValue)> + '_ {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn convert_one(
    registry: &dyn TypeConverterRegistry,
    parameter: &str,
    constraint: Option<&str>,
    raw: &str,
) -> Result<TypedValue, BindError> {
    let Some(constraint) = constraint else {
        return Ok(TypedValue::Text(raw.to_string()));
    };
    let Some(info) = registry.converter_for(constraint) else {
        return Err(BindError::UnknownConstraint {
            parameter: parameter.to_string(),
            constraint: constraint.to_string(),
        });
    };
    registry
        .try_convert(raw, constraint)
        .ok_or_else(|| BindError::ConversionFailed {
            parameter: parameter.to_string(),
            constraint: constraint.to_string(),
            raw: raw.to_string(),
            expected: info.expected(),
        })
}

/// Convert every extracted value of `matched` using `registry`.
///
/// Untyped values bind as [`TypedValue::Text`], boolean options as
/// [`TypedValue::Bool`], and repeated options and catch-alls as
/// [`TypedValue::List`] converted element-wise.
pub fn bind(
    matched: &RouteMatch<'_>,
    registry: &dyn TypeConverterRegistry,
) -> Result<BoundArguments, BindError> {
    let route = matched.route;
    let mut values = BTreeMap::new();

    for (name, raw) in matched.values.iter() {
        let constraint = route.constraint_for(name);
        let converted = match raw {
            RawValue::Unset => Ok(TypedValue::Unset),
            RawValue::Flag(set) => Ok(TypedValue::Bool(*set)),
            RawValue::Text(text) => convert_one(registry, name, constraint, text),
            RawValue::List(items) | RawValue::Rest { tokens: items, .. } => items
                .iter()
                .map(|item| convert_one(registry, name, constraint, item))
                .collect::<Result<Vec<_>, _>>()
                .map(TypedValue::List),
        };

        match converted {
            Ok(value) => {
                values.insert(name.to_string(), value);
            }
            Err(error) => {
                warn!(
                    handler_name = %route.handler_name,
                    route_pattern = %route.display_pattern(),
                    error = %error,
                    "Argument binding failed"
                );
                return Err(error);
            }
        }
    }

    debug!(
        handler_name = %route.handler_name,
        bound_count = values.len(),
        "Arguments bound"
    );
    Ok(BoundArguments { values })
}
