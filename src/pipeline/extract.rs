//! Candle extraction from a smoothed intensity image
//!
//! Candles are assumed to render darker than the chart background. The
//! extractor thresholds the image, erases speckles with a morphological
//! opening, labels the outer 8-connected foreground regions and keeps the
//! ones shaped like a candle.
//!
//! Body and wick lengths are fixed fractions of the bounding height. Fill
//! colour is not used, so bullish and bearish candles are not told apart.

use std::collections::HashMap;

use tracing::debug;

use super::helpers::{self, scale_length};
use crate::params::{get_count, get_period, get_ratio, ParamMeta, ParameterizedStage};
use crate::{AnalysisError, CandleGeometry, CandleSequence, IntensityBuffer, Ratio, Result};

// ============================================================
// CONFIG
// ============================================================

/// Threshold, cleanup and shape filter settings
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Intensity strictly below this is foreground
    pub threshold: u8,
    /// Opening structuring element side (odd); 1 disables the opening
    pub opening_kernel: usize,
    pub min_area: usize,
    pub min_height: u32,
    /// Drop components wider than tall
    pub reject_wide: bool,
    pub body_fraction: Ratio,
    pub upper_wick_fraction: Ratio,
    pub lower_wick_fraction: Ratio,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            threshold: helpers::INK_THRESHOLD,
            opening_kernel: helpers::OPENING_KERNEL_SIZE,
            min_area: helpers::MIN_CANDLE_AREA,
            min_height: helpers::MIN_CANDLE_HEIGHT,
            reject_wide: true,
            body_fraction: Ratio::new_const(helpers::BODY_FRACTION),
            upper_wick_fraction: Ratio::new_const(helpers::UPPER_WICK_FRACTION),
            lower_wick_fraction: Ratio::new_const(helpers::LOWER_WICK_FRACTION),
        }
    }
}

impl ExtractorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.opening_kernel == 0 || self.opening_kernel % 2 == 0 {
            return Err(AnalysisError::InvalidConfig(format!(
                "opening kernel size must be odd, got {}",
                self.opening_kernel
            )));
        }
        Ok(())
    }

    /// Size/shape filter: area, height, and taller-than-wide
    pub fn accepts(&self, component: &Component) -> bool {
        if component.area < self.min_area as f64 {
            return false;
        }
        if component.height < self.min_height {
            return false;
        }
        if self.reject_wide && component.width > component.height {
            return false;
        }
        true
    }

    /// Candle geometry estimated from a component's bounding box
    pub fn geometry(&self, component: &Component) -> CandleGeometry {
        CandleGeometry {
            x: component.x,
            y: component.y,
            width: component.width,
            height: component.height,
            body_size: scale_length(component.height, self.body_fraction.get()),
            upper_wick_size: scale_length(component.height, self.upper_wick_fraction.get()),
            lower_wick_size: scale_length(component.height, self.lower_wick_fraction.get()),
        }
    }
}

// ============================================================
// MASK
// ============================================================

/// Binary foreground mask, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: usize,
    height: usize,
    data: Vec<bool>,
}

impl Mask {
    /// All-background mask. Dimensions may be zero.
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, data: vec![false; width * height] }
    }

    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> bool) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self { width, height, data }
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
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.data[y * self.width + x]
    }

    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }
}

/// Inverse binary threshold: `value < threshold` is foreground
pub fn binarize(src: &IntensityBuffer, threshold: u8) -> Mask {
    Mask {
        width: src.width(),
        height: src.height(),
        data: src.as_bytes().iter().map(|&v| v < threshold).collect(),
    }
}

/// Square-window erosion. Pixels outside the image are ignored.
pub fn erode(mask: &Mask, kernel: usize) -> Mask {
    morph(mask, kernel, true)
}

/// Square-window dilation. Pixels outside the image are ignored.
pub fn dilate(mask: &Mask, kernel: usize) -> Mask {
    morph(mask, kernel, false)
}

/// Erosion followed by dilation; removes specks smaller than the kernel
pub fn open(mask: &Mask, kernel: usize) -> Mask {
    if kernel <= 1 {
        return mask.clone();
    }
    dilate(&erode(mask, kernel), kernel)
}

// Square windows are separable: a row pass then a column pass.
fn morph(mask: &Mask, kernel: usize, erosion: bool) -> Mask {
    let r = kernel / 2;
    let (w, h) = (mask.width, mask.height);

    let mut rows = Mask::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let window = x.saturating_sub(r)..=(x + r).min(w - 1);
            rows.data[y * w + x] = fold_window(erosion, window.map(|sx| mask.data[y * w + sx]));
        }
    }

    let mut out = Mask::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let window = y.saturating_sub(r)..=(y + r).min(h - 1);
            out.data[y * w + x] = fold_window(erosion, window.map(|sy| rows.data[sy * w + x]));
        }
    }
    out
}

#[inline]
fn fold_window(erosion: bool, mut values: impl Iterator<Item = bool>) -> bool {
    if erosion {
        values.all(|v| v)
    } else {
        values.any(|v| v)
    }
}

// ============================================================
// COMPONENTS
// ============================================================

/// Bounding box and size of one connected foreground region
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Component {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Area enclosed by the outer boundary through pixel centres; a solid
    /// `w x h` rectangle encloses `(w - 1) * (h - 1)`
    pub area: f64,
    /// Foreground pixel count
    pub pixels: usize,
}

const NEIGHBORS_4: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const NEIGHBORS_8: [(isize, isize); 8] =
    [(-1, -1), (0, -1), (1, -1), (-1, 0), (1, 0), (-1, 1), (0, 1), (1, 1)];

// Screen-clockwise starting east (y grows downward)
const CLOCKWISE: [(isize, isize); 8] =
    [(1, 0), (1, 1), (0, 1), (-1, 1), (-1, 0), (-1, -1), (0, -1), (1, -1)];
const WEST: usize = 4;

#[inline]
fn offset(x: usize, y: usize, (dx, dy): (isize, isize), w: usize, h: usize) -> Option<(usize, usize)> {
    let nx = x.checked_add_signed(dx)?;
    let ny = y.checked_add_signed(dy)?;
    (nx < w && ny < h).then_some((nx, ny))
}

/// Background reachable from the border through 4-connected steps
fn outside_background(mask: &Mask) -> Vec<bool> {
    let (w, h) = (mask.width, mask.height);
    let mut outside = vec![false; w * h];
    let mut stack = Vec::new();

    for y in 0..h {
        for x in 0..w {
            let on_border = x == 0 || y == 0 || x == w - 1 || y == h - 1;
            if on_border && !mask.get(x, y) && !outside[y * w + x] {
                outside[y * w + x] = true;
                stack.push((x, y));
            }
        }
    }

    while let Some((x, y)) = stack.pop() {
        for step in NEIGHBORS_4 {
            if let Some((nx, ny)) = offset(x, y, step, w, h) {
                let i = ny * w + nx;
                if !mask.data[i] && !outside[i] {
                    outside[i] = true;
                    stack.push((nx, ny));
                }
            }
        }
    }

    outside
}

/// 8-connected foreground regions that are not nested inside a hole of
/// another region, in raster order of their first pixel.
pub fn outer_components(mask: &Mask) -> Vec<Component> {
    let (w, h) = (mask.width, mask.height);
    if w == 0 || h == 0 {
        return Vec::new();
    }

    let outside = outside_background(mask);
    let mut visited = vec![false; w * h];
    let mut components = Vec::new();
    let mut stack = Vec::new();

    for start_y in 0..h {
        for start_x in 0..w {
            let start = start_y * w + start_x;
            if !mask.data[start] || visited[start] {
                continue;
            }

            visited[start] = true;
            stack.push((start_x, start_y));
            let (mut min_x, mut max_x, mut min_y, mut max_y) = (start_x, start_x, start_y, start_y);
            let mut pixels = 0usize;
            let mut is_outer = false;

            while let Some((x, y)) = stack.pop() {
                pixels += 1;
                min_x = min_x.min(x);
                max_x = max_x.max(x);
                min_y = min_y.min(y);
                max_y = max_y.max(y);

                if !is_outer {
                    is_outer = x == 0
                        || y == 0
                        || x == w - 1
                        || y == h - 1
                        || NEIGHBORS_4.iter().any(|&step| {
                            offset(x, y, step, w, h).is_some_and(|(nx, ny)| outside[ny * w + nx])
                        });
                }

                for step in NEIGHBORS_8 {
                    if let Some((nx, ny)) = offset(x, y, step, w, h) {
                        let i = ny * w + nx;
                        if mask.data[i] && !visited[i] {
                            visited[i] = true;
                            stack.push((nx, ny));
                        }
                    }
                }
            }

            if is_outer {
                components.push(Component {
                    x: min_x as u32,
                    y: min_y as u32,
                    width: (max_x - min_x + 1) as u32,
                    height: (max_y - min_y + 1) as u32,
                    area: contour_area(mask, (start_x, start_y)),
                    pixels,
                });
            }
        }
    }

    components
}

/// Area enclosed by the outer boundary of the region containing `start`.
///
/// `start` must be the region's first pixel in raster order, so its west
/// neighbour is background. The boundary is followed through pixel centres
/// with 8-connectivity until it returns to `start`; one pixel wide spurs
/// are walked out and back and enclose nothing.
fn contour_area(mask: &Mask, start: (usize, usize)) -> f64 {
    let (w, h) = (mask.width, mask.height);
    let step = |(x, y): (usize, usize), dir: usize| {
        offset(x, y, CLOCKWISE[dir], w, h).filter(|&(nx, ny)| mask.get(nx, ny))
    };

    let first = (0..8).map(|k| (WEST + k) % 8).find_map(|dir| step(start, dir).map(|p| (dir, p)));
    let Some((first_dir, first)) = first else {
        return 0.0;
    };

    let mut points = vec![start];
    let mut current = start;
    // Direction from `current` back to the previous boundary pixel
    let mut back = first_dir;
    loop {
        let next = (1..=8)
            .map(|k| (back + 8 - k) % 8)
            .find_map(|dir| step(current, dir).map(|p| (dir, p)));
        let Some((dir, next)) = next else {
            break;
        };
        if next == start && current == first {
            break;
        }
        current = next;
        back = (dir + 4) % 8;
        points.push(current);
    }

    shoelace(&points)
}

fn shoelace(points: &[(usize, usize)]) -> f64 {
    let twice: i64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(&(x0, y0), &(x1, y1))| x0 as i64 * y1 as i64 - x1 as i64 * y0 as i64)
        .sum();
    twice.unsigned_abs() as f64 / 2.0
}

// ============================================================
// EXTRACTION
// ============================================================

/// Turn a smoothed intensity image into candles ordered left to right.
///
/// Never fails; an image with no candle-shaped region yields an empty
/// sequence.
pub fn extract(intensity: &IntensityBuffer, config: &ExtractorConfig) -> CandleSequence {
    let mask = binarize(intensity, config.threshold);
    let cleaned = open(&mask, config.opening_kernel);
    let components = outer_components(&cleaned);

    let mut candles: CandleSequence = components
        .iter()
        .filter(|c| config.accepts(c))
        .map(|c| config.geometry(c))
        .collect();
    // Stable: equal x keeps extraction order
    candles.sort_by_key(|c| c.x);

    debug!(
        foreground = mask.count(),
        components = components.len(),
        candles = candles.len(),
        "extracted candles"
    );
    candles
}

/// [`extract()`] with default thresholds and filters
pub fn extract_default(intensity: &IntensityBuffer) -> CandleSequence {
    extract(intensity, &ExtractorConfig::default())
}

// ============================================================
// PARAMETERIZED STAGE
// ============================================================

static EXTRACTOR_PARAMS: &[ParamMeta] = &[
    ParamMeta::integer(
        "threshold",
        helpers::INK_THRESHOLD as f64,
        (60.0, 200.0, 20.0),
        "Intensity below which a pixel is candle ink",
    ),
    ParamMeta::period(
        "opening_kernel",
        helpers::OPENING_KERNEL_SIZE as f64,
        (1.0, 5.0, 2.0),
        "Opening structuring element side (odd)",
    ),
    ParamMeta::integer(
        "min_area",
        helpers::MIN_CANDLE_AREA as f64,
        (100.0, 600.0, 100.0),
        "Minimum area enclosed by a component outline",
    ),
    ParamMeta::integer(
        "min_height",
        helpers::MIN_CANDLE_HEIGHT as f64,
        (10.0, 50.0, 5.0),
        "Minimum component height in pixels",
    ),
    ParamMeta::ratio(
        "body_fraction",
        helpers::BODY_FRACTION,
        (0.3, 0.6, 0.05),
        "Estimated body length as a share of height",
    ),
    ParamMeta::ratio(
        "upper_wick_fraction",
        helpers::UPPER_WICK_FRACTION,
        (0.1, 0.4, 0.05),
        "Estimated upper wick length as a share of height",
    ),
    ParamMeta::ratio(
        "lower_wick_fraction",
        helpers::LOWER_WICK_FRACTION,
        (0.1, 0.4, 0.05),
        "Estimated lower wick length as a share of height",
    ),
];

impl ParameterizedStage for ExtractorConfig {
    fn param_meta() -> &'static [ParamMeta] {
        EXTRACTOR_PARAMS
    }

    fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
        let threshold = get_count(params, "threshold", helpers::INK_THRESHOLD as usize)?;
        let threshold = u8::try_from(threshold).map_err(|_| AnalysisError::OutOfRange {
            field: "threshold",
            value: threshold as f64,
            min: 0.0,
            max: 255.0,
        })?;
        let min_height = get_count(params, "min_height", helpers::MIN_CANDLE_HEIGHT as usize)?;

        let config = Self {
            threshold,
            opening_kernel: get_period(params, "opening_kernel", helpers::OPENING_KERNEL_SIZE)?.get(),
            min_area: get_count(params, "min_area", helpers::MIN_CANDLE_AREA)?,
            min_height: u32::try_from(min_height)
                .map_err(|_| AnalysisError::InvalidValue("min_height does not fit in u32"))?,
            reject_wide: true,
            body_fraction: get_ratio(params, "body_fraction", helpers::BODY_FRACTION)?,
            upper_wick_fraction: get_ratio(params, "upper_wick_fraction", helpers::UPPER_WICK_FRACTION)?,
            lower_wick_fraction: get_ratio(params, "lower_wick_fraction", helpers::LOWER_WICK_FRACTION)?,
        };
        config.validate()?;
        Ok(config)
    }

    fn stage_id_str() -> &'static str {
        "EXTRACTOR"
    }
}

// ============================================================
// TESTS
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// White intensity canvas with black rectangles `(x, y, w, h)`
    fn canvas(width: usize, height: usize, rects: &[(usize, usize, usize, usize)]) -> IntensityBuffer {
        IntensityBuffer::from_fn(width, height, |px, py| {
            let ink = rects
                .iter()
                .any(|&(x, y, w, h)| px >= x && px < x + w && py >= y && py < y + h);
            if ink {
                0
            } else {
                255
            }
        })
        .unwrap()
    }

    fn component(width: u32, height: u32, area: f64) -> Component {
        Component { x: 0, y: 0, width, height, area, pixels: (width * height) as usize }
    }

    #[test]
    fn test_binarize_is_strict() {
        let src = IntensityBuffer::new(3, 1, vec![119, 120, 121]).unwrap();
        let mask = binarize(&src, 120);
        assert!(mask.get(0, 0));
        assert!(!mask.get(1, 0));
        assert!(!mask.get(2, 0));
    }

    #[test]
    fn test_opening_removes_speckle() {
        let mask = Mask::from_fn(10, 10, |x, y| (x == 2 && y == 2) || (x == 6 && (5..7).contains(&y)));
        assert_eq!(open(&mask, 3).count(), 0);
    }

    #[test]
    fn test_opening_keeps_solid_block() {
        let mask = Mask::from_fn(12, 12, |x, y| (2..7).contains(&x) && (3..10).contains(&y));
        assert_eq!(open(&mask, 3), mask);
    }

    #[test]
    fn test_opening_keeps_block_on_border() {
        let mask = Mask::from_fn(6, 6, |x, _| x < 3);
        assert_eq!(open(&mask, 3), mask);
    }

    #[test]
    fn test_opening_disabled_with_unit_kernel() {
        let mask = Mask::from_fn(5, 5, |x, y| x == y);
        assert_eq!(open(&mask, 1), mask);
    }

    #[test]
    fn test_components_use_8_connectivity() {
        // Diagonal chain is one region
        let mask = Mask::from_fn(5, 5, |x, y| x == y);
        let comps = outer_components(&mask);
        assert_eq!(comps.len(), 1);
        assert_eq!(comps[0].pixels, 5);
        // A line encloses nothing
        assert_eq!(comps[0].area, 0.0);
        assert_eq!((comps[0].width, comps[0].height), (5, 5));
    }

    #[test]
    fn test_nested_component_dropped() {
        // 20x20 frame, 2 px thick, with a 4x4 block in its hole
        let mask = Mask::from_fn(30, 30, |x, y| {
            let in_outer = (5..25).contains(&x) && (5..25).contains(&y);
            let in_hole = (7..23).contains(&x) && (7..23).contains(&y);
            let in_block = (13..17).contains(&x) && (13..17).contains(&y);
            (in_outer && !in_hole) || in_block
        });
        let comps = outer_components(&mask);
        assert_eq!(comps.len(), 1);
        assert_eq!((comps[0].x, comps[0].y), (5, 5));
        assert_eq!(comps[0].pixels, 20 * 20 - 16 * 16);
        // The hole does not reduce the outer area
        assert_eq!(comps[0].area, 19.0 * 19.0);
    }

    #[test]
    fn test_open_frame_does_not_nest() {
        // Frame with a gap in its right side: the block inside is reachable
        let mask = Mask::from_fn(30, 30, |x, y| {
            let in_outer = (5..25).contains(&x) && (5..25).contains(&y);
            let in_hole = (7..23).contains(&x) && (7..23).contains(&y);
            let gap = x >= 23 && (14..16).contains(&y);
            let in_block = (13..17).contains(&x) && (13..17).contains(&y);
            (in_outer && !in_hole && !gap) || in_block
        });
        assert_eq!(outer_components(&mask).len(), 2);
    }

    #[test]
    fn test_full_foreground_is_one_component() {
        let mask = Mask::from_fn(4, 3, |_, _| true);
        let comps = outer_components(&mask);
        assert_eq!(comps, vec![Component { x: 0, y: 0, width: 4, height: 3, area: 6.0, pixels: 12 }]);
    }

    #[test]
    fn test_rectangle_area_runs_through_pixel_centres() {
        let mask = Mask::from_fn(20, 60, |x, y| (3..15).contains(&x) && (5..45).contains(&y));
        let comps = outer_components(&mask);
        assert_eq!(comps[0].pixels, 12 * 40);
        assert_eq!(comps[0].area, 11.0 * 39.0);
    }

    #[test]
    fn test_area_of_clipped_and_spurred_shapes() {
        // Missing corners cut half a pixel each
        let clipped = Mask::from_fn(12, 12, |x, y| {
            let inside = (1..11).contains(&x) && (1..11).contains(&y);
            let corner = (x == 1 || x == 10) && (y == 1 || y == 10);
            inside && !corner
        });
        assert_eq!(outer_components(&clipped)[0].area, 81.0 - 2.0);

        // A one pixel tail encloses nothing beyond the triangle at its root
        let tailed = Mask::from_fn(12, 12, |x, y| {
            ((1..6).contains(&x) && (1..6).contains(&y)) || (y == 3 && (6..10).contains(&x))
        });
        let comps = outer_components(&tailed);
        assert_eq!(comps.len(), 1);
        assert_eq!(comps[0].area, 16.0 + 1.0);
    }

    #[test]
    fn test_single_pixel_and_u_shape_areas() {
        let dot = Mask::from_fn(3, 3, |x, y| x == 1 && y == 1);
        assert_eq!(outer_components(&dot)[0].area, 0.0);

        // 5x4 block with a 1x2 notch cut from the top middle
        let notched = Mask::from_fn(7, 6, |x, y| {
            let block = (1..6).contains(&x) && (1..5).contains(&y);
            let notch = x == 3 && (1..3).contains(&y);
            block && !notch
        });
        // 4x3 around the centres minus the wedge the boundary dips into
        assert_eq!(outer_components(&notched)[0].area, 12.0 - 3.0);
    }

    #[test]
    fn test_thin_bar_fails_area_filter() {
        // 8x40 encloses 7 * 39 = 273, 12x40 encloses 11 * 39 = 429
        let src = canvas(100, 60, &[(10, 5, 8, 40), (50, 5, 12, 40)]);
        let candles = extract_default(&src);
        assert_eq!(candles.len(), 1);
        assert_eq!((candles[0].x, candles[0].width), (50, 12));
    }

    #[test]
    fn test_filter_boundaries() {
        let config = ExtractorConfig::default();
        assert!(config.accepts(&component(14, 25, 300.0)));
        assert!(!config.accepts(&component(14, 25, 299.5)));
        assert!(!config.accepts(&component(14, 24, 400.0)));
        assert!(config.accepts(&component(30, 30, 841.0)));
        assert!(!config.accepts(&component(31, 30, 870.0)));
    }

    #[test]
    fn test_wide_filter_can_be_disabled() {
        let config = ExtractorConfig { reject_wide: false, ..Default::default() };
        assert!(config.accepts(&component(31, 30, 870.0)));
    }

    #[test]
    fn test_geometry_fractions() {
        let config = ExtractorConfig::default();
        let candle = config.geometry(&Component { x: 7, y: 3, width: 10, height: 41, area: 360.0, pixels: 410 });
        assert_eq!(candle.x, 7);
        assert_eq!(candle.height, 41);
        assert_eq!(candle.body_size, 18);
        assert_eq!(candle.upper_wick_size, 10);
        assert_eq!(candle.lower_wick_size, 10);
    }

    #[test]
    fn test_extract_orders_left_to_right() {
        let src = canvas(200, 80, &[(120, 5, 10, 40), (10, 20, 10, 50), (60, 10, 12, 30)]);
        let candles = extract_default(&src);
        let xs: Vec<u32> = candles.iter().map(|c| c.x).collect();
        assert_eq!(xs, vec![10, 60, 120]);
        assert_eq!(candles[0].height, 50);
    }

    #[test]
    fn test_extract_drops_gridline_and_noise() {
        let src = canvas(
            200,
            80,
            &[
                (0, 70, 200, 3),  // horizontal gridline
                (20, 10, 10, 40), // candle
                (60, 10, 2, 2),   // speck
                (90, 10, 10, 20), // too short
                (130, 10, 5, 30), // too small: encloses 116
            ],
        );
        let candles = extract_default(&src);
        assert_eq!(candles.len(), 1);
        assert_eq!(candles[0].x, 20);
    }

    #[test]
    fn test_extract_empty_image() {
        let src = IntensityBuffer::filled(50, 50, 255).unwrap();
        assert!(extract_default(&src).is_empty());
    }

    #[test]
    fn test_with_params() {
        let mut params = HashMap::new();
        params.insert("min_area", 150.0);
        params.insert("body_fraction", 0.5);
        let config = ExtractorConfig::with_params(&params).unwrap();
        assert_eq!(config.min_area, 150);
        assert_eq!(config.body_fraction.get(), 0.5);
        assert_eq!(config.threshold, helpers::INK_THRESHOLD);

        params.insert("threshold", 300.0);
        assert!(ExtractorConfig::with_params(&params).is_err());
    }
}
