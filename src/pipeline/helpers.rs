//! Shared constants and pixel helpers for the chart-reading pipeline
//!
//! Every tunable default used by the stages lives here as a named constant.
//! Stage configs copy these into their `Default` impls; nothing downstream
//! should repeat the literal.

// ============================================================
// PREPROCESSING
// ============================================================

/// Side of the square smoothing kernel (pixels, odd)
pub const BLUR_KERNEL_SIZE: usize = 5;
/// Gaussian sigma; `0.0` means "derive from kernel size"
pub const BLUR_SIGMA: f64 = 0.0;

/// ITU-R BT.601 luma weights
pub const LUMA_R: f64 = 0.299;
pub const LUMA_G: f64 = 0.587;
pub const LUMA_B: f64 = 0.114;

// ============================================================
// EXTRACTION
// ============================================================

/// Intensity below this (0..=255) is candle ink
pub const INK_THRESHOLD: u8 = 120;
/// Side of the square structuring element for the opening (pixels, odd)
pub const OPENING_KERNEL_SIZE: usize = 3;
/// Components enclosing less area (square pixels) are noise
pub const MIN_CANDLE_AREA: usize = 300;
/// Components shorter than this are not candles
pub const MIN_CANDLE_HEIGHT: u32 = 25;

/// Estimated body length as a fraction of total candle height
pub const BODY_FRACTION: f64 = 0.45;
/// Estimated upper wick length as a fraction of total candle height
pub const UPPER_WICK_FRACTION: f64 = 0.25;
/// Estimated lower wick length as a fraction of total candle height
pub const LOWER_WICK_FRACTION: f64 = 0.25;

// ============================================================
// CLASSIFICATION
// ============================================================

/// Body below `height * DOJI_BODY_RATIO` is a doji
pub const DOJI_BODY_RATIO: f64 = 0.25;
/// Wick above `body * REJECTION_WICK_FACTOR` is a rejection
pub const REJECTION_WICK_FACTOR: f64 = 1.2;

// ============================================================
// CONTEXT / EXHAUSTION
// ============================================================

/// Number of trailing candles the context analyzer needs
pub const CONTEXT_WINDOW: usize = 6;
/// Distance between sampled heights, walking back from the latest candle
pub const CONTEXT_STRIDE: usize = 2;

/// Number of trailing labels inspected for exhaustion
pub const EXHAUSTION_WINDOW: usize = 4;
/// Strong candles within the window that flag exhaustion
pub const EXHAUSTION_MIN_STRONG: usize = 3;

// ============================================================
// SCORING
// ============================================================

pub const TREND_WEIGHT: i32 = 15;
pub const SIDEWAYS_WEIGHT: i32 = -10;
pub const REJECTION_WEIGHT: i32 = 30;
pub const CONFIRMATION_WEIGHT: i32 = 15;
pub const EXHAUSTION_WEIGHT: i32 = -20;
/// Minimum score for a directional verdict
pub const ENTRY_THRESHOLD: i32 = 50;
/// Upper clamp applied to the reported confidence
pub const MAX_CONFIDENCE: i32 = 100;

// ============================================================
// REQUEST GATE
// ============================================================

/// Fewer extracted candles than this yields the fixed low-confidence result
pub const MIN_CANDLES: usize = 5;
/// Timeframe tag attached to every result. Not detected from the image.
pub const TIMEFRAME_TAG: &str = "M3";

// ============================================================
// HELPER FUNCTIONS
// ============================================================

/// Luma of one RGB sample, rounded to nearest
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    let y = LUMA_R * r as f64 + LUMA_G * g as f64 + LUMA_B * b as f64;
    y.round().clamp(0.0, 255.0) as u8
}

/// Reflect-101 border mapping (`gfedcb|abcdefgh|gfedcba`).
///
/// `len` must be nonzero.
#[inline]
pub fn reflect_101(index: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let last = len as isize - 1;
    let mut i = index;
    // Loops only for kernels wider than the image
    while i < 0 || i > last {
        if i < 0 {
            i = -i;
        }
        if i > last {
            i = 2 * last - i;
        }
    }
    i as usize
}

/// `floor(value * fraction)` for pixel lengths
#[inline]
pub fn scale_length(value: u32, fraction: f64) -> u32 {
    (value as f64 * fraction).floor() as u32
}
