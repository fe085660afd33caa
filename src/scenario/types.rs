//! Core sample types shared by every scenario model.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A scenario-specific derived quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtraValue {
    /// Numeric quantity (slip, torque, impedance, ...)
    Number(f64),
    /// Descriptive label (operating region, topology, ...)
    Text(String),
    /// Predicate (balanced, synchronized, converged, ...)
    Flag(bool),
}

impl ExtraValue {
    /// Numeric value, if this is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ExtraValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Boolean value, if this is a flag.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ExtraValue::Flag(b) => Some(*b),
            _ => None,
        }
    }

    /// Text value, if this is a label.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ExtraValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for ExtraValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtraValue::Number(v) => write!(f, "{}", v),
            ExtraValue::Text(s) => write!(f, "{}", s),
            ExtraValue::Flag(b) => write!(f, "{}", b),
        }
    }
}

impl From<f64> for ExtraValue {
    fn from(v: f64) -> Self {
        ExtraValue::Number(v)
    }
}

impl From<bool> for ExtraValue {
    fn from(b: bool) -> Self {
        ExtraValue::Flag(b)
    }
}

impl From<&str> for ExtraValue {
    fn from(s: &str) -> Self {
        ExtraValue::Text(s.to_string())
    }
}

impl From<String> for ExtraValue {
    fn from(s: String) -> Self {
        ExtraValue::Text(s)
    }
}

/// One time-stamped simulation output.
///
/// `index` is a monotonic step counter assigned by the simulator, not a
/// wall-clock time. Models return samples with `index == 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub index: u64,
    #[serde(rename = "V")]
    pub v: f64,
    #[serde(rename = "I")]
    pub i: f64,
    #[serde(rename = "P")]
    pub p: f64,
    pub extra: BTreeMap<String, ExtraValue>,
}

impl Sample {
    /// Create a sample with an explicit power value.
    pub fn new(v: f64, i: f64, p: f64) -> Self {
        Self {
            index: 0,
            v,
            i,
            p,
            extra: BTreeMap::new(),
        }
    }

    /// Create a sample whose power is the plain `V * I` product.
    pub fn from_vi(v: f64, i: f64) -> Self {
        Self::new(v, i, v * i)
    }

    /// Attach a derived quantity (builder style).
    pub fn with(mut self, key: &str, value: impl Into<ExtraValue>) -> Self {
        self.extra.insert(key.to_string(), value.into());
        self
    }

    /// Attach a derived quantity in place.
    pub fn set(&mut self, key: &str, value: impl Into<ExtraValue>) {
        self.extra.insert(key.to_string(), value.into());
    }

    /// Look up a numeric derived quantity.
    pub fn number(&self, key: &str) -> Option<f64> {
        self.extra.get(key).and_then(ExtraValue::as_f64)
    }

    /// Look up a boolean derived quantity.
    pub fn flag(&self, key: &str) -> Option<bool> {
        self.extra.get(key).and_then(ExtraValue::as_bool)
    }

    /// Look up a text derived quantity.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(ExtraValue::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_builder() {
        let s = Sample::from_vi(2.0, 3.0)
            .with("slip", 0.04)
            .with("balanced", true)
            .with("region", "active");

        assert_eq!(s.p, 6.0);
        assert_eq!(s.number("slip"), Some(0.04));
        assert_eq!(s.flag("balanced"), Some(true));
        assert_eq!(s.text("region"), Some("active"));
        assert_eq!(s.number("region"), None);
    }

    #[test]
    fn test_sample_json_shape() {
        let s = Sample::new(1.0, 0.5, 0.25).with("ok", true);
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains("\"V\":1.0"));
        assert!(json.contains("\"ok\":true"));
    }
}
