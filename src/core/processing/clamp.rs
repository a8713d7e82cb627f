use ndarray::Array2;
use tracing::debug;

use crate::error::{Error, Result};

/// Percentile of the finite values in `data`, NaN and infinities excluded.
///
/// Uses linear interpolation between the two closest ranks, so `p = 0` is the
/// minimum and `p = 100` the maximum. Returns `None` when there is nothing to rank.
pub fn nan_percentile(data: &Array2<f64>, p: f64) -> Option<f64> {
    let mut values: Vec<f64> = data.iter().copied().filter(|v| v.is_finite()).collect();
    if values.is_empty() {
        return None;
    }
    values.sort_unstable_by(|a, b| a.total_cmp(b));

    let rank = (p / 100.0).clamp(0.0, 1.0) * (values.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    Some(values[lo] + (values[hi] - values[lo]) * frac)
}

/// Clamp outliers in place and return the ceiling that was applied.
///
/// The ceiling is the `percentile`-th percentile of the pre-clamp finite values.
/// Each cell then goes through, in order: `>= ceiling` becomes the ceiling,
/// `< zero_threshold` becomes 0, NaN becomes 0. Afterwards every cell is finite
/// and no cell exceeds the ceiling.
pub fn clamp_outliers(data: &mut Array2<f64>, percentile: f64, zero_threshold: f64) -> Result<f64> {
    let ceiling = nan_percentile(data, percentile)
        .ok_or(Error::EmptyDistribution { cells: data.len() })?;
    debug!("p{} ceiling: {}", percentile, ceiling);

    let mut clipped = 0usize;
    let mut zeroed = 0usize;
    let mut filled = 0usize;
    data.mapv_inplace(|mut v| {
        if v >= ceiling {
            v = ceiling;
            clipped += 1;
        }
        if v < zero_threshold {
            v = 0.0;
            zeroed += 1;
        }
        if v.is_nan() {
            v = 0.0;
            filled += 1;
        }
        v
    });
    debug!(
        "Clamped {} cells to ceiling, zeroed {} below {}, filled {} no-data",
        clipped, zeroed, zero_threshold, filled
    );

    Ok(ceiling)
}
