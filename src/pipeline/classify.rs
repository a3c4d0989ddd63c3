//! Single-candle shape classification
//!
//! Rules are evaluated in order and the first match wins:
//!
//! 1. body < height * doji_body_ratio -> `Doji`
//! 2. lower wick > body * rejection_factor -> `LowerRejection`
//! 3. upper wick > body * rejection_factor -> `UpperRejection`
//! 4. otherwise -> `Strong`

use std::collections::HashMap;

use tracing::trace;

use super::helpers;
use crate::params::{get_factor, get_ratio, ParamMeta, ParameterizedStage};
use crate::{AnalysisError, CandleGeometry, Ratio, Result, ShapeLabel};

/// Proportion thresholds for shape labels
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub doji_body_ratio: Ratio,
    pub rejection_factor: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            doji_body_ratio: Ratio::new_const(helpers::DOJI_BODY_RATIO),
            rejection_factor: helpers::REJECTION_WICK_FACTOR,
        }
    }
}

impl ClassifierConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.rejection_factor.is_finite() || self.rejection_factor < 0.0 {
            return Err(AnalysisError::InvalidConfig(format!(
                "rejection factor must be a non-negative number, got {}",
                self.rejection_factor
            )));
        }
        Ok(())
    }
}

/// Label one candle from its own proportions
pub fn classify(candle: &CandleGeometry, config: &ClassifierConfig) -> ShapeLabel {
    let body = candle.body_size as f64;
    let rejection_limit = body * config.rejection_factor;

    if body < config.doji_body_ratio.get() * candle.height as f64 {
        ShapeLabel::Doji
    } else if candle.lower_wick_size as f64 > rejection_limit {
        ShapeLabel::LowerRejection
    } else if candle.upper_wick_size as f64 > rejection_limit {
        ShapeLabel::UpperRejection
    } else {
        ShapeLabel::Strong
    }
}

/// [`classify()`] with default thresholds
pub fn classify_default(candle: &CandleGeometry) -> ShapeLabel {
    classify(candle, &ClassifierConfig::default())
}

/// Label every candle, preserving order
pub fn classify_all(candles: &[CandleGeometry], config: &ClassifierConfig) -> Vec<ShapeLabel> {
    let labels: Vec<ShapeLabel> = candles.iter().map(|c| classify(c, config)).collect();
    trace!(?labels, "classified candles");
    labels
}

static CLASSIFIER_PARAMS: &[ParamMeta] = &[
    ParamMeta::ratio(
        "doji_body_ratio",
        helpers::DOJI_BODY_RATIO,
        (0.1, 0.4, 0.05),
        "Body share of height below which a candle is a doji",
    ),
    ParamMeta::factor(
        "rejection_factor",
        helpers::REJECTION_WICK_FACTOR,
        (0.8, 2.0, 0.2),
        "Wick-to-body multiple marking a rejection",
    ),
];

impl ParameterizedStage for ClassifierConfig {
    fn param_meta() -> &'static [ParamMeta] {
        CLASSIFIER_PARAMS
    }

    fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
        Ok(Self {
            doji_body_ratio: get_ratio(params, "doji_body_ratio", helpers::DOJI_BODY_RATIO)?,
            rejection_factor: get_factor(params, "rejection_factor", helpers::REJECTION_WICK_FACTOR)?,
        })
    }

    fn stage_id_str() -> &'static str {
        "CLASSIFIER"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(height: u32, body: u32, upper: u32, lower: u32) -> CandleGeometry {
        CandleGeometry {
            x: 0,
            y: 0,
            width: 10,
            height,
            body_size: body,
            upper_wick_size: upper,
            lower_wick_size: lower,
        }
    }

    #[test]
    fn test_doji() {
        assert_eq!(classify_default(&candle(40, 9, 15, 15)), ShapeLabel::Doji);
    }

    #[test]
    fn test_doji_wins_over_rejection() {
        // Lower wick 20 > 5 * 1.2, but the tiny body matches first
        assert_eq!(classify_default(&candle(40, 5, 10, 20)), ShapeLabel::Doji);
    }

    #[test]
    fn test_lower_rejection() {
        assert_eq!(classify_default(&candle(40, 12, 4, 20)), ShapeLabel::LowerRejection);
    }

    #[test]
    fn test_lower_wins_over_upper() {
        assert_eq!(classify_default(&candle(40, 10, 20, 20)), ShapeLabel::LowerRejection);
    }

    #[test]
    fn test_upper_rejection() {
        assert_eq!(classify_default(&candle(40, 12, 20, 4)), ShapeLabel::UpperRejection);
    }

    #[test]
    fn test_strong() {
        assert_eq!(classify_default(&candle(40, 20, 8, 8)), ShapeLabel::Strong);
    }

    #[test]
    fn test_rejection_threshold_is_strict() {
        // 12 == 10 * 1.2 exactly is not a rejection
        assert_eq!(classify_default(&candle(40, 10, 12, 12)), ShapeLabel::Strong);
    }

    #[test]
    fn test_default_extractor_proportions_are_strong() {
        for height in [25, 40, 77, 300] {
            let c = candle(
                height,
                helpers::scale_length(height, helpers::BODY_FRACTION),
                helpers::scale_length(height, helpers::UPPER_WICK_FRACTION),
                helpers::scale_length(height, helpers::LOWER_WICK_FRACTION),
            );
            assert_eq!(classify_default(&c), ShapeLabel::Strong, "height {height}");
        }
    }

    #[test]
    fn test_classify_all_preserves_order() {
        let candles = [candle(40, 5, 10, 10), candle(40, 20, 8, 8), candle(40, 12, 20, 4)];
        let labels = classify_all(&candles, &ClassifierConfig::default());
        assert_eq!(labels, vec![ShapeLabel::Doji, ShapeLabel::Strong, ShapeLabel::UpperRejection]);
    }

    #[test]
    fn test_with_params() {
        let mut params = HashMap::new();
        params.insert("rejection_factor", 0.5);
        let config = ClassifierConfig::with_params(&params).unwrap();
        // Upper 8 > 20 * 0.5 is false, lower 12 > 10 is true
        assert_eq!(classify(&candle(40, 20, 8, 12), &config), ShapeLabel::LowerRejection);
    }
}
