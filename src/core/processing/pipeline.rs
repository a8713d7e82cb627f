use ndarray::Array2;
use tracing::info;

use crate::core::processing::clamp::clamp_outliers;
use crate::core::processing::normalize::normalize_linear;
use crate::error::{Error, Result};
use crate::types::{NormalizeStats, RasterGrid};

/// Clamp then normalize a grid, leaving the input untouched.
///
/// The normalization range comes from a second statistics pass over the
/// clamped grid, so the top of the scale is the clamped maximum rather than
/// the clip ceiling itself.
pub fn process_grid_pipeline(
    grid: &RasterGrid,
    clip_percentile: f64,
    zero_threshold: f64,
    scale_max: f64,
) -> Result<(RasterGrid, NormalizeStats)> {
    let valid_cells = grid.finite_count();
    let total_cells = grid.data.len();

    info!("-- Cleaning raster --");
    let mut clamped = grid.data.clone();
    let clip_value = clamp_outliers(&mut clamped, clip_percentile, zero_threshold)?;
    info!(
        "p{} = {} over {}/{} valid cells",
        clip_percentile, clip_value, valid_cells, total_cells
    );

    info!("-- Normalising raster --");
    let (scaled, min, max) = normalize_linear(&clamped, scale_max)?;
    ensure_finite(&scaled)?;

    Ok((
        grid.with_data(scaled),
        NormalizeStats {
            clip_value,
            min,
            max,
            valid_cells,
            total_cells,
        },
    ))
}

/// Reject grids that would write NaN or infinities to disk
pub fn ensure_finite(data: &Array2<f64>) -> Result<()> {
    match data.indexed_iter().find(|(_, v)| !v.is_finite()) {
        Some(((row, col), &value)) => Err(Error::NonFiniteOutput { row, col, value }),
        None => Ok(()),
    }
}
