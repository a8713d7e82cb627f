use ndarray::Array2;
use tracing::debug;

use crate::error::{Error, Result};

/// Min and max over the finite values, or `None` if there are none
pub fn nan_min_max(data: &Array2<f64>) -> Option<(f64, f64)> {
    data.iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Linearly rescale `data` so its own min maps to 0 and its max to `scale_max`.
///
/// Returns the scaled grid together with the min and max it was scaled from.
/// Output stays floating point and is not rounded. A grid with no finite values
/// or with `max == min` is rejected instead of producing NaN or infinities.
pub fn normalize_linear(data: &Array2<f64>, scale_max: f64) -> Result<(Array2<f64>, f64, f64)> {
    let (min, max) = nan_min_max(data).ok_or(Error::EmptyDistribution { cells: data.len() })?;
    if max == min {
        return Err(Error::ConstantRaster { value: min });
    }
    debug!("Normalising from [{}, {}] to [0, {}]", min, max, scale_max);

    let span = max - min;
    let scaled = data.mapv(|x| ((x - min) / span) * scale_max);
    Ok((scaled, min, max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use assert_matches::assert_matches;
    use ndarray::array;

    #[test]
    fn min_and_max_hit_the_range_ends() {
        let data = array![[0.0, 10.0], [5.0, 20.0]];
        let (scaled, min, max) = normalize_linear(&data, 255.0).unwrap();
        assert_eq!((min, max), (0.0, 20.0));
        assert_eq!(scaled[[0, 0]], 0.0);
        assert_eq!(scaled[[1, 1]], 255.0);
        assert_relative_eq!(scaled[[0, 1]], 127.5);
        assert_relative_eq!(scaled[[1, 0]], 63.75);
    }

    #[test]
    fn scaling_is_monotonic_and_strictly_inside() {
        let data = Array2::from_shape_fn((8, 8), |(r, c)| ((r * 8 + c) as f64).powf(1.3) + 2.0);
        let (scaled, _, _) = normalize_linear(&data, 255.0).unwrap();

        let mut pairs: Vec<(f64, f64)> = data.iter().copied().zip(scaled.iter().copied()).collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
        for w in pairs.windows(2) {
            assert!(w[1].1 > w[0].1);
        }
        assert_eq!(pairs.first().unwrap().1, 0.0);
        assert_relative_eq!(pairs.last().unwrap().1, 255.0);
        for &(_, s) in &pairs[1..pairs.len() - 1] {
            assert!(s > 0.0 && s < 255.0);
        }
    }

    #[test]
    fn negative_offset_is_shifted_to_zero() {
        let data = array![[-4.0, 0.0, 4.0]];
        let (scaled, min, _) = normalize_linear(&data, 100.0).unwrap();
        assert_eq!(min, -4.0);
        assert_eq!(scaled, array![[0.0, 50.0, 100.0]]);
    }

    #[test]
    fn constant_grid_is_rejected() {
        let data = Array2::from_elem((3, 3), 5.0);
        assert_matches!(
            normalize_linear(&data, 255.0),
            Err(Error::ConstantRaster { value }) if value == 5.0
        );
    }

    #[test]
    fn nan_is_ignored_for_statistics() {
        let data = array![[f64::NAN, 1.0, 3.0]];
        assert_eq!(nan_min_max(&data), Some((1.0, 3.0)));
        assert_eq!(nan_min_max(&array![[f64::NAN]]), None);
    }
}
