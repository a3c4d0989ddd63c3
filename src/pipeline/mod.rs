//! Chart-reading pipeline stages
//!
//! Each stage consumes the previous stage's output and never mutates it.
//!
//! # Stages
//!
//! - **preprocess**: RGB to intensity, then Gaussian smoothing
//! - **extract**: threshold, opening, outer components, candle filter
//! - **classify**: body/wick proportions to a shape label
//! - **context**: coarse trend label from recent heights
//! - **exhaustion**: run-of-strong-candles risk flag
//! - **decision**: additive scoring into a verdict

pub mod helpers;

pub mod classify;
pub mod context;
pub mod decision;
pub mod exhaustion;
pub mod extract;
pub mod preprocess;

// Re-export all stages for convenience
pub use classify::*;
pub use context::*;
pub use decision::*;
pub use exhaustion::*;
pub use extract::*;
pub use helpers::*;
pub use preprocess::*;
