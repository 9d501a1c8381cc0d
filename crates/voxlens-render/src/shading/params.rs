//! Stage parameters: the loosely typed maps stages are configured with, and
//! the descriptors that place a stage in a pipeline.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::color::Rgba;

/// A single stage parameter value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Number(f64),
    Text(String),
    Color(Rgba),
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<Rgba> for ParamValue {
    fn from(v: Rgba) -> Self {
        Self::Color(v)
    }
}

/// Named parameters for one stage.
///
/// Typed getters return `None` when a key is missing or holds a value of the
/// wrong type, so stages can fall back to their defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StageParams(BTreeMap<String, ParamValue>);

impl StageParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    /// A finite number.
    pub fn number(&self, key: &str) -> Option<f32> {
        match self.0.get(key)? {
            ParamValue::Number(n) if n.is_finite() => Some(*n as f32),
            _ => None,
        }
    }

    pub fn flag(&self, key: &str) -> Option<bool> {
        match self.0.get(key)? {
            ParamValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        match self.0.get(key)? {
            ParamValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn color(&self, key: &str) -> Option<Rgba> {
        match self.0.get(key)? {
            ParamValue::Color(c) => Some(*c),
            _ => None,
        }
    }

    pub fn number_or(&self, key: &str, default: f32) -> f32 {
        self.number(key).unwrap_or(default)
    }

    pub fn flag_or(&self, key: &str, default: bool) -> bool {
        self.flag(key).unwrap_or(default)
    }

    pub fn color_or(&self, key: &str, default: Rgba) -> Rgba {
        self.color(key).unwrap_or(default)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

fn enabled_by_default() -> bool {
    true
}

/// Places one stage in a pipeline: `{id, enabled, params}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StageDescriptor {
    pub id: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default)]
    pub params: StageParams,
}

impl StageDescriptor {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            enabled: true,
            params: StageParams::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(key, value);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// A parameter a stage understands, with the value used when it is absent.
#[derive(Clone, Debug, PartialEq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub default: ParamValue,
}

impl ParamSpec {
    pub fn new(name: &'static str, default: impl Into<ParamValue>) -> Self {
        Self {
            name,
            default: default.into(),
        }
    }
}
