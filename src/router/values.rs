use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use smallvec::SmallVec;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Maximum number of bound values kept inline before heap allocation.
/// Most commands bind a handful of parameters and options.
pub const MAX_INLINE_VALUES: usize = 8;

/// Raw, pre-conversion value bound to a parameter or option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RawValue {
    /// A single token
    Text(String),
    /// Boolean option presence
    Flag(bool),
    /// Every occurrence of a repeated option, in input order
    List(Vec<String>),
    /// Catch-all capture: the tokens and their space-joined form
    Rest { joined: String, tokens: Vec<String> },
    /// Optional element that received no value
    Unset,
}

impl RawValue {
    pub(crate) fn rest(tokens: Vec<String>) -> Self {
        RawValue::Rest {
            joined: tokens.join(" "),
            tokens,
        }
    }

    /// Text of a single value or the joined catch-all capture.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawValue::Text(s) => Some(s),
            RawValue::Rest { joined, .. } => Some(joined),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            RawValue::Flag(b) => Some(*b),
            _ => None,
        }
    }

    /// Repeated-option occurrences or catch-all tokens.
    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            RawValue::List(items) => Some(items),
            RawValue::Rest { tokens, .. } => Some(tokens),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_unset(&self) -> bool {
        matches!(self, RawValue::Unset)
    }
}

/// Name → raw value map produced by one resolution attempt.
///
/// Keys are unique. Names are shared with the compiled route (`Arc<str>`), so
/// binding a value never copies the name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedValues {
    entries: SmallVec<[(Arc<str>, RawValue); MAX_INLINE_VALUES]>,
}

impl ExtractedValues {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `value` under `name`, replacing any previous binding.
    pub fn insert(&mut self, name: &Arc<str>, value: RawValue) {
        match self.entries.iter_mut().find(|(k, _)| k == name) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((Arc::clone(name), value)),
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RawValue> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v)
    }

    /// Shorthand for `get(name)?.as_text()`.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(RawValue::as_text)
    }

    #[must_use]
    pub fn flag(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(RawValue::as_flag)
    }

    #[must_use]
    pub fn list(&self, name: &str) -> Option<&[String]> {
        self.get(name).and_then(RawValue::as_list)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_ref(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sorted copy of the bindings.
    /// Note: this allocates - use `get()` on hot paths instead
    #[must_use]
    pub fn to_map(&self) -> BTreeMap<String, RawValue> {
        self.entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }
}

impl Serialize for ExtractedValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k.as_ref(), v)?;
        }
        map.end()
    }
}
