use std::ops::Range;

use crate::consts::MAX_STAT_SAMPLES;
use crate::image_data::Image;

/// Finite samples of `image` within the given pixel ranges, decimated by a
/// fixed stride when there are more than [`MAX_STAT_SAMPLES`] pixels.
pub fn finite_samples(image: &Image, cols: Range<usize>, rows: Range<usize>) -> Vec<f32> {
    let total = cols.len() * rows.len();
    if total == 0 {
        return Vec::new();
    }
    let step = total.div_ceil(MAX_STAT_SAMPLES).max(1);

    let data = image.data();
    let mut samples = Vec::with_capacity(total.min(MAX_STAT_SAMPLES));
    let mut i = 0usize;
    for row in rows {
        for col in cols.clone() {
            if i % step == 0 {
                let v = data[[row, col]];
                if v.is_finite() {
                    samples.push(v);
                }
            }
            i += 1;
        }
    }
    samples
}

/// Percentile `p` (0..=100) of ascending `sorted`, linearly interpolated
/// between neighbouring order statistics. `None` for an empty slice.
pub fn percentile_sorted(sorted: &[f32], p: f64) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    let pos = (p / 100.0).clamp(0.0, 1.0) * (n - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    let frac = pos - lo as f64;
    let a = sorted[lo] as f64;
    let b = sorted[hi] as f64;
    Some(a + (b - a) * frac)
}

/// Low/high percentiles of the finite values in `samples`. Sorts in place.
pub fn robust_range(samples: &mut [f32], low: f64, high: f64) -> Option<(f64, f64)> {
    samples.sort_unstable_by(f32::total_cmp);
    Some((percentile_sorted(samples, low)?, percentile_sorted(samples, high)?))
}

/// Summary statistics of the finite samples of a whole plane.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaneStats {
    pub total: usize,
    pub finite: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub low: f64,
    pub high: f64,
}

/// Statistics of every finite sample in `image`, with the `low`/`high`
/// percentiles. `None` when the plane has no finite sample.
pub fn plane_stats(image: &Image, low: f64, high: f64) -> Option<PlaneStats> {
    let mut samples: Vec<f32> = image.data().iter().copied().filter(|v| v.is_finite()).collect();
    if samples.is_empty() {
        return None;
    }
    let sum: f64 = samples.iter().map(|&v| v as f64).sum();
    let mean = sum / samples.len() as f64;
    let (lo, hi) = robust_range(&mut samples, low, high)?;

    Some(PlaneStats {
        total: image.width() * image.height(),
        finite: samples.len(),
        min: samples[0] as f64,
        max: samples[samples.len() - 1] as f64,
        mean,
        low: lo,
        high: hi,
    })
}
