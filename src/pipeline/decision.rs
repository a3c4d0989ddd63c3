//! Additive scoring of context, last-candle pattern, confirmation and
//! exhaustion into a [`Decision`]
//!
//! Rules fire in a fixed order; each one that fires appends its reason:
//!
//! | Rule | Condition | Score |
//! |------|-----------|-------|
//! | context | up/down trend | `trend_weight` |
//! | context | sideways/neutral | `sideways_weight` |
//! | pattern | last is lower/upper rejection | `rejection_weight`, sets direction |
//! | confirmation | second-to-last is strong | `confirmation_weight` |
//! | exhaustion | flag raised | `exhaustion_weight` |
//!
//! A direction becomes an entry only when the total reaches `entry_threshold`.

use std::collections::HashMap;

use tracing::debug;

use super::classify::classify_all;
use super::context::context;
use super::exhaustion::is_exhausted;
use super::helpers;
use crate::params::{get_int, ParamMeta, ParameterizedStage};
use crate::{
    AnalysisError, AnalyzerConfig, CandleGeometry, ContextLabel, Decision, Direction, Reason,
    Result, ShapeLabel, Verdict,
};

/// Rule weights and the entry threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub trend_weight: i32,
    pub sideways_weight: i32,
    pub rejection_weight: i32,
    pub confirmation_weight: i32,
    pub exhaustion_weight: i32,
    pub entry_threshold: i32,
    pub max_confidence: i32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            trend_weight: helpers::TREND_WEIGHT,
            sideways_weight: helpers::SIDEWAYS_WEIGHT,
            rejection_weight: helpers::REJECTION_WEIGHT,
            confirmation_weight: helpers::CONFIRMATION_WEIGHT,
            exhaustion_weight: helpers::EXHAUSTION_WEIGHT,
            entry_threshold: helpers::ENTRY_THRESHOLD,
            max_confidence: helpers::MAX_CONFIDENCE,
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_confidence <= 0 {
            return Err(AnalysisError::InvalidConfig(format!(
                "max confidence must be positive, got {}",
                self.max_confidence
            )));
        }
        Ok(())
    }

    /// Reported confidence for a raw score
    #[inline]
    pub fn confidence(&self, score: i32) -> i32 {
        score.min(self.max_confidence)
    }
}

/// Score already computed stage outputs.
///
/// `labels` must hold at least the last two candles.
pub fn score(
    context: ContextLabel,
    labels: &[ShapeLabel],
    exhausted: bool,
    config: &ScoringConfig,
) -> Result<Decision> {
    let (prior, last) = match labels {
        [.., prior, last] => (*prior, *last),
        _ => return Err(AnalysisError::InsufficientData { need: 2, got: labels.len() }),
    };

    let mut total = 0i32;
    let mut reasons = Vec::with_capacity(4);

    // 1) Context
    if context.is_trending() {
        total = total.saturating_add(config.trend_weight);
        reasons.push(Reason::TrendContext);
    } else {
        total = total.saturating_add(config.sideways_weight);
        reasons.push(Reason::SidewaysMarket);
    }

    // 2) Last candle pattern
    let direction = match last {
        ShapeLabel::LowerRejection => {
            total = total.saturating_add(config.rejection_weight);
            reasons.push(Reason::LowerRejection);
            Some(Direction::Bullish)
        },
        ShapeLabel::UpperRejection => {
            total = total.saturating_add(config.rejection_weight);
            reasons.push(Reason::UpperRejection);
            Some(Direction::Bearish)
        },
        ShapeLabel::Doji | ShapeLabel::Strong => None,
    };

    // 3) Confirmation by the prior candle
    if prior.is_strong() {
        total = total.saturating_add(config.confirmation_weight);
        reasons.push(Reason::PriorStrongConfirmation);
    }

    // 4) Exhaustion filter
    if exhausted {
        total = total.saturating_add(config.exhaustion_weight);
        reasons.push(Reason::ExhaustionDetected);
    }

    // 5) Verdict
    let verdict = match direction {
        Some(direction) if total >= config.entry_threshold => Verdict::from(direction),
        _ => Verdict::NoTrade,
    };

    debug!(?context, ?last, ?prior, exhausted, score = total, ?verdict, "scored candles");

    Ok(Decision {
        verdict,
        score: total,
        confidence: config.confidence(total),
        reasons,
    })
}

/// Classify, derive context and exhaustion, then score.
///
/// Needs at least two candles; the caller's minimum-candle gate normally
/// guarantees that.
pub fn decide(candles: &[CandleGeometry], config: &AnalyzerConfig) -> Result<Decision> {
    if candles.len() < 2 {
        return Err(AnalysisError::InsufficientData { need: 2, got: candles.len() });
    }
    let labels = classify_all(candles, &config.classifier);
    let context = context(candles, &config.context);
    let exhausted = is_exhausted(&labels, &config.exhaustion);
    score(context, &labels, exhausted, &config.scoring)
}

/// [`decide()`] with the default configuration
pub fn decide_default(candles: &[CandleGeometry]) -> Result<Decision> {
    decide(candles, &AnalyzerConfig::default())
}

static SCORING_PARAMS: &[ParamMeta] = &[
    ParamMeta::integer("trend_weight", helpers::TREND_WEIGHT as f64, (0.0, 30.0, 5.0), "Score for a trending context"),
    ParamMeta::integer(
        "sideways_weight",
        helpers::SIDEWAYS_WEIGHT as f64,
        (-30.0, 0.0, 5.0),
        "Score for a sideways or undecided context",
    ),
    ParamMeta::integer(
        "rejection_weight",
        helpers::REJECTION_WEIGHT as f64,
        (10.0, 50.0, 5.0),
        "Score for a rejection on the last candle",
    ),
    ParamMeta::integer(
        "confirmation_weight",
        helpers::CONFIRMATION_WEIGHT as f64,
        (0.0, 30.0, 5.0),
        "Score for a strong candle before the last",
    ),
    ParamMeta::integer(
        "exhaustion_weight",
        helpers::EXHAUSTION_WEIGHT as f64,
        (-40.0, 0.0, 5.0),
        "Score when exhaustion is flagged",
    ),
    ParamMeta::integer(
        "entry_threshold",
        helpers::ENTRY_THRESHOLD as f64,
        (30.0, 80.0, 5.0),
        "Minimum score for a directional verdict",
    ),
    ParamMeta::integer(
        "max_confidence",
        helpers::MAX_CONFIDENCE as f64,
        (100.0, 100.0, 1.0),
        "Upper clamp on reported confidence",
    ),
];

fn get_weight(params: &HashMap<&str, f64>, key: &str, default: i32) -> Result<i32> {
    let value = get_int(params, key, default as i64)?;
    i32::try_from(value).map_err(|_| AnalysisError::InvalidValue("score weight does not fit in i32"))
}

impl ParameterizedStage for ScoringConfig {
    fn param_meta() -> &'static [ParamMeta] {
        SCORING_PARAMS
    }

    fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
        let config = Self {
            trend_weight: get_weight(params, "trend_weight", helpers::TREND_WEIGHT)?,
            sideways_weight: get_weight(params, "sideways_weight", helpers::SIDEWAYS_WEIGHT)?,
            rejection_weight: get_weight(params, "rejection_weight", helpers::REJECTION_WEIGHT)?,
            confirmation_weight: get_weight(params, "confirmation_weight", helpers::CONFIRMATION_WEIGHT)?,
            exhaustion_weight: get_weight(params, "exhaustion_weight", helpers::EXHAUSTION_WEIGHT)?,
            entry_threshold: get_weight(params, "entry_threshold", helpers::ENTRY_THRESHOLD)?,
            max_confidence: get_weight(params, "max_confidence", helpers::MAX_CONFIDENCE)?,
        };
        config.validate()?;
        Ok(config)
    }

    fn stage_id_str() -> &'static str {
        "SCORING"
    }
}
