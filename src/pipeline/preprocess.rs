//! Grayscale conversion and Gaussian smoothing
//!
//! Suppresses pixel-level noise (JPEG blocks, antialiasing) before the
//! extractor thresholds the image.

use std::collections::HashMap;

use tracing::trace;

use super::helpers::{self, luma, reflect_101};
use crate::params::{get_factor, get_period, ParamMeta, ParamType, ParameterizedStage};
use crate::{AnalysisError, ColorBuffer, IntensityBuffer, Result};

/// Smoothing parameters
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    /// Square kernel side, odd
    pub kernel_size: usize,
    /// Gaussian sigma; `<= 0.0` derives it from `kernel_size`
    pub sigma: f64,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            kernel_size: helpers::BLUR_KERNEL_SIZE,
            sigma: helpers::BLUR_SIGMA,
        }
    }
}

impl PreprocessConfig {
    pub fn validate(&self) -> Result<()> {
        if self.kernel_size == 0 || self.kernel_size % 2 == 0 {
            return Err(AnalysisError::InvalidConfig(format!(
                "blur kernel size must be odd, got {}",
                self.kernel_size
            )));
        }
        if self.sigma.is_nan() || self.sigma.is_infinite() {
            return Err(AnalysisError::InvalidValue("blur sigma must be finite"));
        }
        Ok(())
    }
}

/// Convert to intensity and blur. The input is left untouched.
pub fn smooth(pixels: &ColorBuffer, config: &PreprocessConfig) -> Result<IntensityBuffer> {
    config.validate()?;
    let gray = to_intensity(pixels);
    let smoothed = gaussian_blur(&gray, config.kernel_size, config.sigma);
    trace!(
        width = smoothed.width(),
        height = smoothed.height(),
        kernel = config.kernel_size,
        "smoothed chart image"
    );
    Ok(smoothed)
}

/// [`smooth`] with the default 5x5 kernel
pub fn smooth_default(pixels: &ColorBuffer) -> Result<IntensityBuffer> {
    smooth(pixels, &PreprocessConfig::default())
}

/// Per-pixel BT.601 luma
pub fn to_intensity(pixels: &ColorBuffer) -> IntensityBuffer {
    let data = pixels
        .as_bytes()
        .chunks_exact(ColorBuffer::CHANNELS)
        .map(|rgb| luma(rgb[0], rgb[1], rgb[2]))
        .collect();
    IntensityBuffer::from_parts(pixels.width(), pixels.height(), data)
}

/// Normalized 1-D Gaussian weights of length `size`.
///
/// With `sigma <= 0` and `size <= 7` the fixed binomial-style kernels are
/// returned; otherwise weights are sampled from the Gaussian, deriving
/// sigma from the size when not given.
pub fn gaussian_kernel(size: usize, sigma: f64) -> Vec<f64> {
    if sigma <= 0.0 {
        match size {
            1 => return vec![1.0],
            3 => return vec![0.25, 0.5, 0.25],
            5 => return vec![0.0625, 0.25, 0.375, 0.25, 0.0625],
            7 => return vec![0.03125, 0.109375, 0.21875, 0.28125, 0.21875, 0.109375, 0.03125],
            _ => {},
        }
    }
    let sigma = if sigma > 0.0 {
        sigma
    } else {
        0.3 * ((size as f64 - 1.0) * 0.5 - 1.0) + 0.8
    };
    let center = (size / 2) as f64;
    let raw: Vec<f64> = (0..size)
        .map(|i| {
            let d = i as f64 - center;
            (-(d * d) / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let sum: f64 = raw.iter().sum();
    raw.into_iter().map(|w| w / sum).collect()
}

/// Separable Gaussian blur with reflect-101 borders.
///
/// Intermediate sums stay in floating point; rounding happens once at the end.
pub fn gaussian_blur(src: &IntensityBuffer, size: usize, sigma: f64) -> IntensityBuffer {
    let kernel = gaussian_kernel(size, sigma);
    let radius = (kernel.len() / 2) as isize;
    let (w, h) = (src.width(), src.height());
    let pixels = src.as_bytes();

    let mut horizontal = vec![0.0f64; w * h];
    for y in 0..h {
        let row = &pixels[y * w..(y + 1) * w];
        for x in 0..w {
            horizontal[y * w + x] = kernel
                .iter()
                .enumerate()
                .map(|(k, weight)| {
                    let sx = reflect_101(x as isize + k as isize - radius, w);
                    weight * row[sx] as f64
                })
                .sum();
        }
    }

    let mut data = Vec::with_capacity(w * h);
    for y in 0..h {
        for x in 0..w {
            let v: f64 = kernel
                .iter()
                .enumerate()
                .map(|(k, weight)| {
                    let sy = reflect_101(y as isize + k as isize - radius, h);
                    weight * horizontal[sy * w + x]
                })
                .sum();
            data.push(v.round().clamp(0.0, 255.0) as u8);
        }
    }

    IntensityBuffer::from_parts(w, h, data)
}

// ============================================================
// PARAMETERIZED STAGE
// ============================================================

static PREPROCESS_PARAMS: &[ParamMeta] = &[
    ParamMeta {
        name: "kernel_size",
        param_type: ParamType::Period,
        default: helpers::BLUR_KERNEL_SIZE as f64,
        range: (3.0, 9.0, 2.0),
        description: "Side of the square smoothing kernel (odd)",
    },
    ParamMeta {
        name: "sigma",
        param_type: ParamType::Factor,
        default: helpers::BLUR_SIGMA,
        range: (0.0, 3.0, 0.5),
        description: "Gaussian sigma, 0 derives it from the kernel size",
    },
];

impl ParameterizedStage for PreprocessConfig {
    fn param_meta() -> &'static [ParamMeta] {
        PREPROCESS_PARAMS
    }

    fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
        let config = Self {
            kernel_size: get_period(params, "kernel_size", helpers::BLUR_KERNEL_SIZE)?.get(),
            sigma: get_factor(params, "sigma", helpers::BLUR_SIGMA)?,
        };
        config.validate()?;
        Ok(config)
    }

    fn stage_id_str() -> &'static str {
        "PREPROCESS"
    }
}
