//! Market context from recent candle heights
//!
//! Heights stand in for momentum; no price axis is read. Within the last
//! `window` candles three heights are sampled walking back from the newest
//! with a fixed `stride` (newest, newest - stride, newest - 2 * stride).
//! Strictly rising samples mean uptrend, strictly falling mean downtrend.

use std::collections::HashMap;

use tracing::trace;

use super::helpers;
use crate::params::{get_period, ParamMeta, ParameterizedStage};
use crate::{AnalysisError, CandleGeometry, ContextLabel, Period, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    /// Minimum candles required; the sample is taken from the last `window`
    pub window: Period,
    pub stride: Period,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            window: Period::new_const(helpers::CONTEXT_WINDOW),
            stride: Period::new_const(helpers::CONTEXT_STRIDE),
        }
    }
}

impl ContextConfig {
    pub fn validate(&self) -> Result<()> {
        if 2 * self.stride.get() >= self.window.get() {
            return Err(AnalysisError::InvalidConfig(format!(
                "context window {} cannot hold three samples at stride {}",
                self.window.get(),
                self.stride.get()
            )));
        }
        Ok(())
    }
}

/// Trend label over the trailing candles; `Neutral` when there are too few
pub fn context(candles: &[CandleGeometry], config: &ContextConfig) -> ContextLabel {
    let window = config.window.get();
    let stride = config.stride.get();
    if candles.len() < window || 2 * stride >= window {
        return ContextLabel::Neutral;
    }

    let last = candles.len() - 1;
    let newest = candles[last].height;
    let middle = candles[last - stride].height;
    let oldest = candles[last - 2 * stride].height;

    let label = if newest > middle && middle > oldest {
        ContextLabel::Uptrend
    } else if newest < middle && middle < oldest {
        ContextLabel::Downtrend
    } else {
        ContextLabel::Sideways
    };
    trace!(newest, middle, oldest, ?label, "market context");
    label
}

/// [`context()`] with the default 6-candle window
pub fn context_default(candles: &[CandleGeometry]) -> ContextLabel {
    context(candles, &ContextConfig::default())
}

static CONTEXT_PARAMS: &[ParamMeta] = &[
    ParamMeta::period(
        "window",
        helpers::CONTEXT_WINDOW as f64,
        (5.0, 12.0, 1.0),
        "Candles required before a trend is judged",
    ),
    ParamMeta::period(
        "stride",
        helpers::CONTEXT_STRIDE as f64,
        (1.0, 3.0, 1.0),
        "Distance between sampled heights",
    ),
];

impl ParameterizedStage for ContextConfig {
    fn param_meta() -> &'static [ParamMeta] {
        CONTEXT_PARAMS
    }

    fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
        let config = Self {
            window: get_period(params, "window", helpers::CONTEXT_WINDOW)?,
            stride: get_period(params, "stride", helpers::CONTEXT_STRIDE)?,
        };
        config.validate()?;
        Ok(config)
    }

    fn stage_id_str() -> &'static str {
        "CONTEXT"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_heights(heights: &[u32]) -> Vec<CandleGeometry> {
        heights
            .iter()
            .enumerate()
            .map(|(i, &h)| CandleGeometry {
                x: i as u32 * 20,
                y: 0,
                width: 8,
                height: h,
                body_size: 0,
                upper_wick_size: 0,
                lower_wick_size: 0,
            })
            .collect()
    }

    #[test]
    fn test_too_few_is_neutral() {
        assert_eq!(context_default(&[]), ContextLabel::Neutral);
        assert_eq!(context_default(&with_heights(&[10, 20, 30, 40, 50])), ContextLabel::Neutral);
    }

    #[test]
    fn test_uptrend_uses_stride_two() {
        // Last six are [5, 10, 5, 20, 5, 30]: samples 30 > 20 > 10
        let candles = with_heights(&[5, 5, 10, 5, 20, 5, 30]);
        assert_eq!(context_default(&candles), ContextLabel::Uptrend);
    }

    #[test]
    fn test_downtrend() {
        let candles = with_heights(&[99, 60, 1, 50, 1, 40]);
        assert_eq!(context_default(&candles), ContextLabel::Downtrend);
    }

    #[test]
    fn test_skipped_candles_are_ignored() {
        // Odd positions rise, but the sampled ones (1, 3, 5) are flat
        let candles = with_heights(&[10, 20, 30, 20, 50, 20]);
        assert_eq!(context_default(&candles), ContextLabel::Sideways);
    }

    #[test]
    fn test_equal_heights_are_sideways() {
        let candles = with_heights(&[10, 10, 10, 10, 20, 30]);
        // samples 30, 10, 10: not strictly rising
        assert_eq!(context_default(&candles), ContextLabel::Sideways);
    }

    #[test]
    fn test_custom_stride() {
        let config = ContextConfig { window: Period::new_const(3), stride: Period::new_const(1) };
        assert_eq!(context(&with_heights(&[10, 20, 30]), &config), ContextLabel::Uptrend);
    }

    #[test]
    fn test_invalid_window_rejected() {
        let config = ContextConfig { window: Period::new_const(4), stride: Period::new_const(2) };
        assert!(config.validate().is_err());
        assert_eq!(context(&with_heights(&[1, 2, 3, 4, 5, 6]), &config), ContextLabel::Neutral);
    }
}
