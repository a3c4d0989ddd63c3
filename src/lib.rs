//! # Candlescope - chart-image candlestick reader
//!
//! Reads a rendered candlestick chart (an RGB pixel buffer) and turns it into
//! an entry signal: enter-long, enter-short or no-trade, with a confidence
//! score and the list of rules that fired.
//!
//! The pipeline is deterministic and stateless:
//!
//! 1. [`smooth()`] - grayscale + Gaussian blur
//! 2. [`extract()`] - threshold, opening, outer components, candle filter
//! 3. [`classify()`] - body/wick proportions to a [`ShapeLabel`]
//! 4. [`context()`] / [`is_exhausted()`] - recent-history signals
//! 5. [`decide()`] - additive scoring into a [`Decision`]
//!
//! ## Quick Start
//!
//! ```rust
//! use candlescope::prelude::*;
//!
//! // White 64x64 canvas, no candles drawn
//! let image = ColorBuffer::filled(64, 64, [255, 255, 255]).unwrap();
//!
//! let analyzer = AnalyzerBuilder::new().build().unwrap();
//! let result = analyzer.analyze(&image).unwrap();
//!
//! assert_eq!(result.signal, Verdict::NoTrade);
//! assert_eq!(result.confidence, 0);
//! assert_eq!(result.analyzed_candles, None);
//! ```

use tracing::debug;

pub mod params;
pub mod pipeline;

pub use pipeline::*;

pub mod prelude {
    pub use crate::{
        // Free functions
        analyze,
        analyze_parallel,
        // Stages
        pipeline::*,
        // Parameters
        params::{get_count, get_factor, get_int, get_period, get_ratio, ParamMeta, ParamType, ParameterizedStage},
        // Results
        AnalysisError,
        AnalysisReport,
        AnalysisResult,
        // Engine
        Analyzer,
        AnalyzerBuilder,
        AnalyzerConfig,
        BatchError,
        BatchResult,
        // Geometry
        CandleGeometry,
        CandleSequence,
        // Buffers
        ColorBuffer,
        ContextLabel,
        Decision,
        Direction,
        IntensityBuffer,
        Period,
        Ratio,
        Reason,
        Result,
        ShapeLabel,
        Verdict,
    };
}

// ============================================================
// ERRORS
// ============================================================

pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Errors that can occur while reading a chart
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Insufficient data: need {need} candles, got {got}")]
    InsufficientData { need: usize, got: usize },

    #[error("Invalid value: {0}")]
    InvalidValue(&'static str),

    #[error("{field} = {value} out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

// ============================================================
// VALIDATED TYPES
// ============================================================

/// Normalized value in range 0.0..=1.0
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Ratio(f64);

impl Ratio {
    /// Create a new Ratio, validating the value is in [0.0, 1.0]
    pub fn new(value: f64) -> Result<Self> {
        if value.is_nan() || value.is_infinite() {
            return Err(AnalysisError::InvalidValue(
                "Ratio cannot be NaN or infinite",
            ));
        }
        if !(0.0..=1.0).contains(&value) {
            return Err(AnalysisError::OutOfRange {
                field: "Ratio",
                value,
                min: 0.0,
                max: 1.0,
            });
        }
        Ok(Self(value))
    }

    /// Create a Ratio from a compile-time constant (library internal use)
    #[doc(hidden)]
    pub const fn new_const(value: f64) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> f64 {
        self.0
    }
}

impl serde::Serialize for Ratio {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(s)
    }
}

impl<'de> serde::Deserialize<'de> for Ratio {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let value = f64::deserialize(d)?;
        Ratio::new(value).map_err(serde::de::Error::custom)
    }
}

/// Window length or count (must be > 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Period(usize);

impl Period {
    /// Create a new Period, validating value is > 0
    pub fn new(value: usize) -> Result<Self> {
        if value == 0 {
            return Err(AnalysisError::InvalidValue("Period must be > 0"));
        }
        Ok(Self(value))
    }

    #[doc(hidden)]
    pub const fn new_const(value: usize) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> usize {
        self.0
    }
}

impl serde::Serialize for Period {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(s)
    }
}

impl<'de> serde::Deserialize<'de> for Period {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let value = usize::deserialize(d)?;
        Period::new(value).map_err(serde::de::Error::custom)
    }
}

// ============================================================
// PIXEL BUFFERS
// ============================================================

/// Interleaved 8-bit RGB image, row-major, owned by the caller.
///
/// Decoding a file into this buffer is the host's job; any decode failure
/// must be reported before the pipeline runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl ColorBuffer {
    pub const CHANNELS: usize = 3;

    /// Wrap raw RGB bytes. Fails if a dimension is zero or the length is off.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        let expected = sample_count(width, height, Self::CHANNELS)?;
        if data.len() != expected {
            return Err(AnalysisError::InvalidInput(format!(
                "RGB buffer of {width}x{height} needs {expected} bytes, got {}",
                data.len()
            )));
        }
        Ok(Self { width, height, data })
    }

    /// Buffer with every pixel set to `rgb`
    pub fn filled(width: usize, height: usize, rgb: [u8; 3]) -> Result<Self> {
        let len = sample_count(width, height, Self::CHANNELS)?;
        let data = rgb.iter().copied().cycle().take(len).collect();
        Ok(Self { width, height, data })
    }

    /// Build a buffer by evaluating `f(x, y)` for every pixel
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> [u8; 3]) -> Result<Self> {
        let mut data = Vec::with_capacity(sample_count(width, height, Self::CHANNELS)?);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        Ok(Self { width, height, data })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// RGB sample at `(x, y)`. Panics when out of bounds.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        let i = (y * self.width + x) * Self::CHANNELS;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }
}

/// Single-channel 8-bit image, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntensityBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl IntensityBuffer {
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        let expected = sample_count(width, height, 1)?;
        if data.len() != expected {
            return Err(AnalysisError::InvalidInput(format!(
                "intensity buffer of {width}x{height} needs {expected} bytes, got {}",
                data.len()
            )));
        }
        Ok(Self { width, height, data })
    }

    /// Dimensions already validated by a source buffer
    pub(crate) fn from_parts(width: usize, height: usize, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), width * height);
        Self { width, height, data }
    }

    pub fn filled(width: usize, height: usize, value: u8) -> Result<Self> {
        let len = sample_count(width, height, 1)?;
        Ok(Self { width, height, data: vec![value; len] })
    }

    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> u8) -> Result<Self> {
        let mut data = Vec::with_capacity(sample_count(width, height, 1)?);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Ok(Self { width, height, data })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }
}

/// Byte length of a `width` x `height` buffer with `channels` samples per pixel
fn sample_count(width: usize, height: usize, channels: usize) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(AnalysisError::InvalidInput(format!(
            "image must have nonzero dimensions, got {width}x{height}"
        )));
    }
    width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(channels))
        .ok_or_else(|| AnalysisError::InvalidInput(format!("image dimensions {width}x{height} overflow")))
}

// ============================================================
// CANDLE GEOMETRY
// ============================================================

/// One candle silhouette found in the image.
///
/// Body and wick lengths are proportional estimates of `height`, not a
/// partition of it; they need not sum to `height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CandleGeometry {
    /// Left edge of the bounding box; only used for ordering
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub body_size: u32,
    pub upper_wick_size: u32,
    pub lower_wick_size: u32,
}

/// Candles in chronological (left-to-right) order
pub type CandleSequence = Vec<CandleGeometry>;

// ============================================================
// LABELS
// ============================================================

/// Structural shape of a single candle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShapeLabel {
    Doji,
    LowerRejection,
    UpperRejection,
    Strong,
}

impl ShapeLabel {
    #[inline]
    pub fn is_strong(self) -> bool {
        matches!(self, ShapeLabel::Strong)
    }

    #[inline]
    pub fn is_rejection(self) -> bool {
        matches!(self, ShapeLabel::LowerRejection | ShapeLabel::UpperRejection)
    }
}

/// Coarse market context derived from recent candle heights
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContextLabel {
    Uptrend,
    Downtrend,
    Sideways,
    /// Not enough candles to judge
    #[default]
    Neutral,
}

impl ContextLabel {
    #[inline]
    pub fn is_trending(self) -> bool {
        matches!(self, ContextLabel::Uptrend | ContextLabel::Downtrend)
    }
}

/// Direction implied by the last candle's rejection wick
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Direction {
    Bullish,
    Bearish,
}

/// Final trading verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    EnterLong,
    EnterShort,
    NoTrade,
}

impl From<Direction> for Verdict {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Bullish => Verdict::EnterLong,
            Direction::Bearish => Verdict::EnterShort,
        }
    }
}

impl Verdict {
    pub fn is_entry(self) -> bool {
        !matches!(self, Verdict::NoTrade)
    }
}

/// Why a score changed. Serialized as its human-readable text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reason {
    TrendContext,
    SidewaysMarket,
    LowerRejection,
    UpperRejection,
    PriorStrongConfirmation,
    ExhaustionDetected,
    TooFewCandles,
}

impl Reason {
    pub const ALL: [Reason; 7] = [
        Reason::TrendContext,
        Reason::SidewaysMarket,
        Reason::LowerRejection,
        Reason::UpperRejection,
        Reason::PriorStrongConfirmation,
        Reason::ExhaustionDetected,
        Reason::TooFewCandles,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Reason::TrendContext => "trend context",
            Reason::SidewaysMarket => "sideways/insufficient-trend market",
            Reason::LowerRejection => "lower rejection",
            Reason::UpperRejection => "upper rejection",
            Reason::PriorStrongConfirmation => "confirmation by prior strong candle",
            Reason::ExhaustionDetected => "exhaustion detected",
            Reason::TooFewCandles => "too few candles detected",
        }
    }
}

impl std::fmt::Display for Reason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Reason {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        Reason::ALL
            .iter()
            .copied()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| AnalysisError::InvalidInput(format!("unknown reason: {s}")))
    }
}

impl serde::Serialize for Reason {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        s.serialize_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for Reason {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(d)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================
// DECISION / RESULT
// ============================================================

/// Output of the scoring stage
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Decision {
    pub verdict: Verdict,
    /// Raw additive score; may be negative
    pub score: i32,
    /// `min(score, max_confidence)`
    pub confidence: i32,
    /// One entry per rule that fired, in evaluation order
    pub reasons: Vec<Reason>,
}

impl Decision {
    pub fn reason_strings(&self) -> Vec<&'static str> {
        self.reasons.iter().map(|r| r.as_str()).collect()
    }
}

/// What the host returns for one chart image
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AnalysisResult {
    /// Fixed tag, not read from the image
    pub timeframe: String,
    pub signal: Verdict,
    pub confidence: i32,
    pub reasons: Vec<Reason>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyzed_candles: Option<usize>,
}

impl AnalysisResult {
    /// Fixed low-confidence result for charts with too few readable candles
    pub fn too_few_candles(timeframe: impl Into<String>) -> Self {
        Self {
            timeframe: timeframe.into(),
            signal: Verdict::NoTrade,
            confidence: 0,
            reasons: vec![Reason::TooFewCandles],
            analyzed_candles: None,
        }
    }

    pub fn from_decision(timeframe: impl Into<String>, decision: Decision, analyzed_candles: usize) -> Self {
        Self {
            timeframe: timeframe.into(),
            signal: decision.verdict,
            confidence: decision.confidence,
            reasons: decision.reasons,
            analyzed_candles: Some(analyzed_candles),
        }
    }
}

// ============================================================
// CONFIGURATION
// ============================================================

/// Every tunable constant of the pipeline in one place
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub preprocess: PreprocessConfig,
    pub extractor: ExtractorConfig,
    pub classifier: ClassifierConfig,
    pub context: ContextConfig,
    pub exhaustion: ExhaustionConfig,
    pub scoring: ScoringConfig,
    /// Below this many candles the fixed low-confidence result is returned
    pub min_candles: usize,
    pub timeframe: String,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            preprocess: PreprocessConfig::default(),
            extractor: ExtractorConfig::default(),
            classifier: ClassifierConfig::default(),
            context: ContextConfig::default(),
            exhaustion: ExhaustionConfig::default(),
            scoring: ScoringConfig::default(),
            min_candles: helpers::MIN_CANDLES,
            timeframe: helpers::TIMEFRAME_TAG.to_string(),
        }
    }
}

impl AnalyzerConfig {
    /// Check cross-field constraints of every stage
    pub fn validate(&self) -> Result<()> {
        self.preprocess.validate()?;
        self.extractor.validate()?;
        self.classifier.validate()?;
        self.context.validate()?;
        self.exhaustion.validate()?;
        self.scoring.validate()?;
        // decide() reads the last two labels
        if self.min_candles < 2 {
            return Err(AnalysisError::InvalidConfig(format!(
                "min_candles must be at least 2, got {}",
                self.min_candles
            )));
        }
        if self.timeframe.is_empty() {
            return Err(AnalysisError::InvalidConfig("timeframe tag is empty".into()));
        }
        Ok(())
    }
}

// ============================================================
// ANALYZER
// ============================================================

/// Every intermediate product of one pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    pub candles: CandleSequence,
    pub labels: Vec<ShapeLabel>,
    pub context: ContextLabel,
    pub exhausted: bool,
    /// `None` when fewer than `min_candles` were extracted
    pub decision: Option<Decision>,
}

impl AnalysisReport {
    pub fn to_result(&self, timeframe: &str) -> AnalysisResult {
        match &self.decision {
            Some(decision) => AnalysisResult::from_decision(timeframe, decision.clone(), self.candles.len()),
            None => AnalysisResult::too_few_candles(timeframe),
        }
    }
}

/// Stateless chart reader. Cheap to share across threads.
#[derive(Debug, Clone)]
pub struct Analyzer {
    config: AnalyzerConfig,
}

impl Analyzer {
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    // ===========================================
    // LOW-LEVEL: Stages
    // ===========================================

    /// Smooth and extract, returning candles in left-to-right order
    pub fn extract_candles(&self, image: &ColorBuffer) -> Result<CandleSequence> {
        let smoothed = smooth(image, &self.config.preprocess)?;
        Ok(extract(&smoothed, &self.config.extractor))
    }

    /// Score an already extracted sequence. Needs at least two candles.
    pub fn decide(&self, candles: &[CandleGeometry]) -> Result<Decision> {
        decide(candles, &self.config)
    }

    // ===========================================
    // MID-LEVEL: Full trace
    // ===========================================

    /// Run the whole pipeline and keep every intermediate product
    pub fn inspect(&self, image: &ColorBuffer) -> Result<AnalysisReport> {
        debug!(width = image.width(), height = image.height(), "analyzing chart image");

        let candles = self.extract_candles(image)?;
        let labels = classify_all(&candles, &self.config.classifier);
        let context = context(&candles, &self.config.context);
        let exhausted = is_exhausted(&labels, &self.config.exhaustion);

        let decision = if candles.len() < self.config.min_candles {
            debug!(
                candles = candles.len(),
                min_candles = self.config.min_candles,
                "too few candles for a decision"
            );
            None
        } else {
            Some(score(context, &labels, exhausted, &self.config.scoring)?)
        };

        Ok(AnalysisReport { candles, labels, context, exhausted, decision })
    }

    // ===========================================
    // HIGH-LEVEL: Request entry point
    // ===========================================

    /// Read one chart image into the host-facing result
    pub fn analyze(&self, image: &ColorBuffer) -> Result<AnalysisResult> {
        let report = self.inspect(image)?;
        let result = report.to_result(&self.config.timeframe);
        debug!(
            signal = ?result.signal,
            entry = result.signal.is_entry(),
            confidence = result.confidence,
            candles = ?result.analyzed_candles,
            "analysis complete"
        );
        Ok(result)
    }
}

/// Analyze one image with the default configuration
pub fn analyze(image: &ColorBuffer) -> Result<AnalysisResult> {
    Analyzer::new(AnalyzerConfig::default())?.analyze(image)
}

// ============================================================
// BUILDER
// ============================================================

/// Builder for creating Analyzer instances
#[derive(Debug, Clone, Default)]
pub struct AnalyzerBuilder {
    config: AnalyzerConfig,
}

impl AnalyzerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: AnalyzerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn preprocess(mut self, preprocess: PreprocessConfig) -> Self {
        self.config.preprocess = preprocess;
        self
    }

    pub fn extractor(mut self, extractor: ExtractorConfig) -> Self {
        self.config.extractor = extractor;
        self
    }

    pub fn classifier(mut self, classifier: ClassifierConfig) -> Self {
        self.config.classifier = classifier;
        self
    }

    pub fn context(mut self, context: ContextConfig) -> Self {
        self.config.context = context;
        self
    }

    pub fn exhaustion(mut self, exhaustion: ExhaustionConfig) -> Self {
        self.config.exhaustion = exhaustion;
        self
    }

    pub fn scoring(mut self, scoring: ScoringConfig) -> Self {
        self.config.scoring = scoring;
        self
    }

    pub fn min_candles(mut self, min_candles: usize) -> Self {
        self.config.min_candles = min_candles;
        self
    }

    pub fn timeframe(mut self, timeframe: impl Into<String>) -> Self {
        self.config.timeframe = timeframe.into();
        self
    }

    /// Build the analyzer
    pub fn build(self) -> Result<Analyzer> {
        Analyzer::new(self.config)
    }
}

// ============================================================
// PARALLEL ANALYSIS
// ============================================================

use rayon::prelude::*;

/// Result of analyzing one named image
#[derive(Debug)]
pub struct BatchResult {
    pub name: String,
    pub result: AnalysisResult,
}

/// Error from analyzing one named image
#[derive(Debug)]
pub struct BatchError {
    pub name: String,
    pub error: AnalysisError,
}

/// Analyze independent images in parallel. Requests share nothing.
pub fn analyze_parallel<'a, I>(analyzer: &Analyzer, images: I) -> (Vec<BatchResult>, Vec<BatchError>)
where
    I: IntoParallelIterator<Item = (&'a str, &'a ColorBuffer)>,
{
    let results: Vec<_> = images
        .into_par_iter()
        .map(|(name, image)| {
            analyzer
                .analyze(image)
                .map(|result| BatchResult {
                    name: name.to_string(),
                    result,
                })
                .map_err(|error| BatchError {
                    name: name.to_string(),
                    error,
                })
        })
        .collect();

    let mut successes = Vec::new();
    let mut errors = Vec::new();

    for result in results {
        match result {
            Ok(r) => successes.push(r),
            Err(e) => errors.push(e),
        }
    }

    (successes, errors)
}

// ============================================================
// TESTS
// ============================================================
