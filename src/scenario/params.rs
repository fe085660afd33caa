//! Caller-supplied scenario parameters.
//!
//! Models never trust raw values: every accessor here treats non-finite
//! numbers as absent and clamps into the range the model asks for.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{LabSimError, Result};
use crate::models::waveform::WaveShape;

/// Smallest magnitude a denominator may take after clamping.
pub const MIN_DENOMINATOR: f64 = 1e-9;

/// Key to float parameter map supplied by the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params {
    values: HashMap<String, f64>,
}

impl Params {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter (builder style).
    pub fn with(mut self, key: &str, value: f64) -> Self {
        self.values.insert(key.to_string(), value);
        self
    }

    /// Set a parameter.
    pub fn set(&mut self, key: &str, value: f64) {
        self.values.insert(key.to_string(), value);
    }

    /// Remove a parameter.
    pub fn remove(&mut self, key: &str) -> Option<f64> {
        self.values.remove(key)
    }

    /// Raw access. Non-finite values read as absent.
    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied().filter(|v| v.is_finite())
    }

    /// Value or `default` when absent or non-finite.
    pub fn get_or(&self, key: &str, default: f64) -> f64 {
        self.get(key).unwrap_or(default)
    }

    /// Value clamped into `[min, max]`.
    pub fn clamped(&self, key: &str, default: f64, min: f64, max: f64) -> f64 {
        self.get_or(key, default).clamp(min, max)
    }

    /// Strictly positive value, for resistances, inductances, frequencies.
    pub fn positive(&self, key: &str, default: f64) -> f64 {
        self.get_or(key, default).abs().max(MIN_DENOMINATOR)
    }

    /// Value clamped into `[0, 1]`.
    pub fn fraction(&self, key: &str, default: f64) -> f64 {
        self.clamped(key, default, 0.0, 1.0)
    }

    /// Whether a finite value is present for `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterate over all finite parameters.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values
            .iter()
            .filter(|(_, v)| v.is_finite())
            .map(|(k, v)| (k.as_str(), *v))
    }

    /// Merge `other` over `self`.
    pub fn extend(&mut self, other: &Params) {
        for (k, v) in &other.values {
            self.values.insert(k.clone(), *v);
        }
    }

    /// Parse a `key=value` assignment.
    pub fn parse_assignment(input: &str) -> Result<(String, f64)> {
        let (key, value) = input.split_once('=').ok_or_else(|| LabSimError::ParamParseError {
            input: input.to_string(),
            message: "expected key=value".to_string(),
        })?;

        let key = key.trim();
        if key.is_empty() {
            return Err(LabSimError::ParamParseError {
                input: input.to_string(),
                message: "empty key".to_string(),
            });
        }

        let value = value.trim();
        let parsed = crate::expr::parse_value(value).or_else(|| match key {
            // Waveform shapes may be given by name
            "shape" => WaveShape::from_name(value).map(|shape| shape.code()),
            _ => None,
        });
        let value = parsed.ok_or_else(|| LabSimError::ParamParseError {
            input: input.to_string(),
            message: format!("'{}' is not a number", value),
        })?;

        Ok((key.to_string(), value))
    }
}

impl FromIterator<(String, f64)> for Params {
    fn from_iter<T: IntoIterator<Item = (String, f64)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<(&'a str, f64)> for Params {
    fn from_iter<T: IntoIterator<Item = (&'a str, f64)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
        }
    }
}

/// Clamp a magnitude away from zero, keeping its sign.
pub fn nonzero(value: f64) -> f64 {
    if !value.is_finite() {
        return MIN_DENOMINATOR;
    }
    if value.abs() < MIN_DENOMINATOR {
        if value.is_sign_negative() {
            -MIN_DENOMINATOR
        } else {
            MIN_DENOMINATOR
        }
    } else {
        value
    }
}

/// Clamp an `asin`/`acos` argument into its domain.
pub fn unit_clamp(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-1.0, 1.0)
    }
}
