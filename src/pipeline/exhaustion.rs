//! Exhaustion flag: too many strong candles in a row.

use std::collections::HashMap;

use super::helpers;
use crate::params::{get_period, ParamMeta, ParameterizedStage};
use crate::{AnalysisError, Period, Result, ShapeLabel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ExhaustionConfig {
    /// Trailing labels inspected
    pub window: Period,
    /// Strong labels within the window that raise the flag
    pub min_strong: Period,
}

impl Default for ExhaustionConfig {
    fn default() -> Self {
        Self {
            window: Period::new_const(helpers::EXHAUSTION_WINDOW),
            min_strong: Period::new_const(helpers::EXHAUSTION_MIN_STRONG),
        }
    }
}

impl ExhaustionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_strong > self.window {
            return Err(AnalysisError::InvalidConfig(format!(
                "exhaustion needs {} strong candles but only looks at {}",
                self.min_strong.get(),
                self.window.get()
            )));
        }
        Ok(())
    }
}

/// True when at least `min_strong` of the last `window` labels are strong.
/// Shorter histories are never exhausted.
pub fn is_exhausted(labels: &[ShapeLabel], config: &ExhaustionConfig) -> bool {
    let window = config.window.get();
    if labels.len() < window {
        return false;
    }
    let strong = labels[labels.len() - window..].iter().filter(|l| l.is_strong()).count();
    strong >= config.min_strong.get()
}

/// [`is_exhausted`] with the default 3-of-4 rule
pub fn is_exhausted_default(labels: &[ShapeLabel]) -> bool {
    is_exhausted(labels, &ExhaustionConfig::default())
}

static EXHAUSTION_PARAMS: &[ParamMeta] = &[
    ParamMeta::period(
        "window",
        helpers::EXHAUSTION_WINDOW as f64,
        (3.0, 8.0, 1.0),
        "Trailing labels inspected",
    ),
    ParamMeta::period(
        "min_strong",
        helpers::EXHAUSTION_MIN_STRONG as f64,
        (2.0, 6.0, 1.0),
        "Strong candles within the window that flag exhaustion",
    ),
];

impl ParameterizedStage for ExhaustionConfig {
    fn param_meta() -> &'static [ParamMeta] {
        EXHAUSTION_PARAMS
    }

    fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
        let config = Self {
            window: get_period(params, "window", helpers::EXHAUSTION_WINDOW)?,
            min_strong: get_period(params, "min_strong", helpers::EXHAUSTION_MIN_STRONG)?,
        };
        config.validate()?;
        Ok(config)
    }

    fn stage_id_str() -> &'static str {
        "EXHAUSTION"
    }
}
