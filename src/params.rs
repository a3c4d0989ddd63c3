//! Parameter metadata for pipeline stages
//!
//! Every stage config describes its tunable constants here, enabling:
//! - Grid search over thresholds and weights
//! - Parameter documentation
//! - Building a config from a flat name/value map
//!
//! # Example
//!
//! ```rust
//! use candlescope::params::{ParamMeta, ParamType, ParameterizedStage};
//! use candlescope::prelude::*;
//!
//! for param in ExtractorConfig::param_meta() {
//!     println!("{}: {:?} (default: {})", param.name, param.param_type, param.default);
//! }
//! ```

use std::collections::HashMap;

use crate::{AnalysisError, Period, Ratio, Result};

// ============================================================
// PARAMETER TYPES
// ============================================================

/// Type of parameter value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
  /// Fraction in 0.0..=1.0
  Ratio,
  /// Positive integer (window, kernel size, count)
  Period,
  /// Non-negative real multiplier
  Factor,
  /// Signed integer (score weights, pixel thresholds)
  Integer,
}

/// Metadata for a single stage parameter
#[derive(Debug, Clone)]
pub struct ParamMeta {
  /// Parameter name (e.g., "min_area")
  pub name: &'static str,
  pub param_type: ParamType,
  pub default: f64,
  /// Range for optimization: (min, max, step)
  pub range: (f64, f64, f64),
  /// Human-readable description
  pub description: &'static str,
}

impl ParamMeta {
  pub const fn ratio(
    name: &'static str,
    default: f64,
    range: (f64, f64, f64),
    description: &'static str,
  ) -> Self {
    Self { name, param_type: ParamType::Ratio, default, range, description }
  }

  pub const fn period(
    name: &'static str,
    default: f64,
    range: (f64, f64, f64),
    description: &'static str,
  ) -> Self {
    Self { name, param_type: ParamType::Period, default, range, description }
  }

  pub const fn factor(
    name: &'static str,
    default: f64,
    range: (f64, f64, f64),
    description: &'static str,
  ) -> Self {
    Self { name, param_type: ParamType::Factor, default, range, description }
  }

  pub const fn integer(
    name: &'static str,
    default: f64,
    range: (f64, f64, f64),
    description: &'static str,
  ) -> Self {
    Self { name, param_type: ParamType::Integer, default, range, description }
  }

  /// Generate all values for grid search
  pub fn generate_grid(&self) -> Vec<f64> {
    let (min, max, step) = self.range;
    let mut values = Vec::new();
    let mut v = min;
    while v <= max + f64::EPSILON {
      values.push(v);
      v += step;
    }
    values
  }

  /// Validate a value for this parameter
  pub fn validate(&self, value: f64) -> Result<()> {
    let (min, max, _) = self.range;
    if value < min || value > max {
      return Err(AnalysisError::OutOfRange { field: self.name, value, min, max });
    }
    match self.param_type {
      ParamType::Ratio | ParamType::Factor => Ok(()),
      ParamType::Period => {
        if value < 1.0 || value.fract() != 0.0 {
          return Err(AnalysisError::InvalidValue("Period must be a positive integer"));
        }
        Ok(())
      },
      ParamType::Integer => {
        if value.fract() != 0.0 {
          return Err(AnalysisError::InvalidValue("Integer parameter has a fractional part"));
        }
        Ok(())
      },
    }
  }
}

// ============================================================
// PARAMETERIZED STAGE TRAIT
// ============================================================

/// Trait for stage configs that can be tuned from outside
pub trait ParameterizedStage: Sized {
  /// Returns metadata for all configurable parameters
  fn param_meta() -> &'static [ParamMeta];

  /// Creates a config from a name/value map
  ///
  /// Missing parameters use their default values.
  fn with_params(params: &HashMap<&str, f64>) -> Result<Self>;

  /// Returns the stage ID string
  fn stage_id_str() -> &'static str;
}

// ============================================================
// PARAMETER VALUE HELPERS
// ============================================================

/// Helper to get a Ratio from params with default fallback
pub fn get_ratio(params: &HashMap<&str, f64>, key: &str, default: f64) -> Result<Ratio> {
  let value = params.get(key).copied().unwrap_or(default);
  Ratio::new(value)
}

/// Helper to get a Period from params with default fallback
pub fn get_period(params: &HashMap<&str, f64>, key: &str, default: usize) -> Result<Period> {
  let value = params.get(key).copied().unwrap_or(default as f64);
  if value < 1.0 || value.fract() != 0.0 {
    return Err(AnalysisError::InvalidValue("Period must be a positive integer"));
  }
  Period::new(value as usize)
}

/// Helper to get a non-negative whole number (pixel counts, lengths)
pub fn get_count(params: &HashMap<&str, f64>, key: &str, default: usize) -> Result<usize> {
  let value = params.get(key).copied().unwrap_or(default as f64);
  if value < 0.0 || !value.is_finite() || value.fract() != 0.0 {
    return Err(AnalysisError::InvalidValue("Count must be a non-negative integer"));
  }
  Ok(value as usize)
}

/// Helper to get a finite, non-negative multiplier
pub fn get_factor(params: &HashMap<&str, f64>, key: &str, default: f64) -> Result<f64> {
  let value = params.get(key).copied().unwrap_or(default);
  if !value.is_finite() {
    return Err(AnalysisError::InvalidValue("Factor must be finite"));
  }
  if value < 0.0 {
    return Err(AnalysisError::OutOfRange { field: "Factor", value, min: 0.0, max: f64::MAX });
  }
  Ok(value)
}

/// Helper to get a whole number (weights, thresholds) with default fallback
pub fn get_int(params: &HashMap<&str, f64>, key: &str, default: i64) -> Result<i64> {
  let value = params.get(key).copied().unwrap_or(default as f64);
  if !value.is_finite() || value.fract() != 0.0 {
    return Err(AnalysisError::InvalidValue("Integer parameter has a fractional part"));
  }
  Ok(value as i64)
}

// ============================================================
// TESTS
// ============================================================
