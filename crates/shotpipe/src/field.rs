//! Typed template fields and field maps

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TemplateError};

/// A concrete value for a template field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Int(i64),
    Str(String),
}

impl FieldValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(v) => Some(*v),
            FieldValue::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Str(s) => Some(s),
            FieldValue::Int(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(v) => write!(f, "{}", v),
            FieldValue::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Str(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Str(s)
    }
}

/// How a field is formatted inside a path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Free-form string, never spanning a path separator
    Str,
    /// Integer, zero-padded to at least `padding` digits
    Int { padding: usize },
}

/// A named, typed placeholder in a template definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateKey {
    pub name: String,
    pub kind: FieldKind,
}

impl TemplateKey {
    /// Create a string-valued key
    pub fn string(name: impl Into<String>) -> Self {
        TemplateKey {
            name: name.into(),
            kind: FieldKind::Str,
        }
    }

    /// Create an integer-valued key, zero-padded to `padding` digits
    pub fn integer(name: impl Into<String>, padding: usize) -> Self {
        TemplateKey {
            name: name.into(),
            kind: FieldKind::Int { padding },
        }
    }

    /// Deterministic string form of a value under this key's format
    pub fn str_from_value(&self, value: &FieldValue) -> Result<String> {
        match (&self.kind, value) {
            (FieldKind::Int { padding }, FieldValue::Int(v)) => {
                Ok(format!("{:0width$}", v, width = *padding))
            }
            (FieldKind::Str, FieldValue::Str(s)) => Ok(s.clone()),
            _ => Err(TemplateError::InvalidValue {
                field: self.name.clone(),
                value: value.to_string(),
            }),
        }
    }

    /// Parse a path fragment back into a typed value
    pub fn value_from_str(&self, raw: &str) -> Result<FieldValue> {
        match &self.kind {
            FieldKind::Str => Ok(FieldValue::Str(raw.to_string())),
            FieldKind::Int { .. } => raw
                .parse::<i64>()
                .map(FieldValue::Int)
                .map_err(|_| TemplateError::InvalidValue {
                    field: self.name.clone(),
                    value: raw.to_string(),
                }),
        }
    }

    /// Regex fragment matching any value of this key
    pub(crate) fn pattern(&self) -> &'static str {
        match self.kind {
            FieldKind::Str => "[^/]+?",
            FieldKind::Int { .. } => "[0-9]+",
        }
    }
}

/// Mapping of template field names to concrete typed values
///
/// Produced by matching a path against a [`crate::Template`]; consumed by
/// `apply_fields` to render a new path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMap(BTreeMap<String, FieldValue>);

impl FieldMap {
    pub fn new() -> Self {
        FieldMap(BTreeMap::new())
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.insert(name.into(), value.into());
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.0.get(name).and_then(FieldValue::as_int)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(FieldValue::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.0.iter()
    }

    /// JSON object view of the fields, for registration payloads
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.0
                .iter()
                .map(|(name, value)| {
                    let json = match value {
                        FieldValue::Int(v) => serde_json::Value::from(*v),
                        FieldValue::Str(s) => serde_json::Value::from(s.clone()),
                    };
                    (name.clone(), json)
                })
                .collect(),
        )
    }
}

impl FromIterator<(String, FieldValue)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        FieldMap(iter.into_iter().collect())
    }
}
