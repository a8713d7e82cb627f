//! Shared types used across popnorm.
//! Includes the in-memory `RasterGrid`, the warp `ResampleMethod`, the
//! `NormalizeStats` reported by the clamp and normalize stages, and the
//! per-run `PreprocessReport`.
use clap::ValueEnum;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Single-band raster held in memory together with its georeferencing.
///
/// Rows run top to bottom, so `pixel_height` is normally negative. Missing cells are NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterGrid {
    /// Samples indexed `[row, col]`
    pub data: Array2<f64>,
    /// x-coordinate of the top-left corner
    pub origin_x: f64,
    /// y-coordinate of the top-left corner
    pub origin_y: f64,
    /// Resolution in the x direction
    pub pixel_width: f64,
    /// Resolution in the y direction (signed)
    pub pixel_height: f64,
    /// EPSG code of the coordinate reference system
    pub epsg: u32,
}

impl RasterGrid {
    /// Build a grid from samples and a GDAL-ordered geotransform
    /// (`[origin_x, pixel_width, rot_x, origin_y, rot_y, pixel_height]`).
    /// Rotation terms are not carried.
    pub fn from_geotransform(data: Array2<f64>, geotransform: [f64; 6], epsg: u32) -> Self {
        Self {
            data,
            origin_x: geotransform[0],
            origin_y: geotransform[3],
            pixel_width: geotransform[1],
            pixel_height: geotransform[5],
            epsg,
        }
    }

    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// Geotransform in GDAL order with zero rotation
    pub fn geotransform(&self) -> [f64; 6] {
        [
            self.origin_x,
            self.pixel_width,
            0.0,
            self.origin_y,
            0.0,
            self.pixel_height,
        ]
    }

    /// Same georeferencing, different samples
    pub fn with_data(&self, data: Array2<f64>) -> Self {
        Self {
            data,
            origin_x: self.origin_x,
            origin_y: self.origin_y,
            pixel_width: self.pixel_width,
            pixel_height: self.pixel_height,
            epsg: self.epsg,
        }
    }

    /// Number of cells that hold a finite value
    pub fn finite_count(&self) -> usize {
        self.data.iter().filter(|v| v.is_finite()).count()
    }
}

/// Resampling kernel passed to `gdalwarp -r`
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResampleMethod {
    #[default]
    Nearest,
    Bilinear,
    Cubic,
    Average,
}

impl ResampleMethod {
    pub fn as_gdal_str(&self) -> &'static str {
        match self {
            ResampleMethod::Nearest => "near",
            ResampleMethod::Bilinear => "bilinear",
            ResampleMethod::Cubic => "cubic",
            ResampleMethod::Average => "average",
        }
    }
}

impl std::fmt::Display for ResampleMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ResampleMethod::Nearest => "nearest",
            ResampleMethod::Bilinear => "bilinear",
            ResampleMethod::Cubic => "cubic",
            ResampleMethod::Average => "average",
        };
        write!(f, "{}", s)
    }
}

/// Statistics gathered while clamping and normalizing a grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizeStats {
    /// Clip ceiling computed from the pre-clamp distribution
    pub clip_value: f64,
    /// Post-clamp minimum
    pub min: f64,
    /// Post-clamp maximum
    pub max: f64,
    /// Cells that were finite before clamping
    pub valid_cells: usize,
    pub total_cells: usize,
}

/// Summary of one preprocessing run, suitable for a JSON sidecar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreprocessReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub rows: usize,
    pub cols: usize,
    pub geotransform: [f64; 6],
    pub epsg: u32,
    /// Percentile the clip ceiling was taken at
    pub clip_percentile: f64,
    /// Upper end of the normalized range
    pub scale_max: f64,
    pub stats: NormalizeStats,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn geotransform_roundtrips_through_grid() {
        let gt = [500_000.0, 30.0, 0.0, -1_200_000.0, 0.0, -30.0];
        let grid = RasterGrid::from_geotransform(array![[1.0, 2.0], [3.0, 4.0]], gt, 3857);
        assert_eq!(grid.geotransform(), gt);
        assert_eq!((grid.rows(), grid.cols()), (2, 2));
    }

    #[test]
    fn finite_count_skips_nan() {
        let grid = RasterGrid::from_geotransform(
            array![[1.0, f64::NAN], [f64::NAN, 0.0]],
            [0.0, 1.0, 0.0, 0.0, 0.0, -1.0],
            3857,
        );
        assert_eq!(grid.finite_count(), 2);
    }

    #[test]
    fn resample_method_maps_to_gdalwarp_names() {
        assert_eq!(ResampleMethod::Nearest.as_gdal_str(), "near");
        assert_eq!(ResampleMethod::Average.as_gdal_str(), "average");
        assert_eq!(ResampleMethod::default(), ResampleMethod::Nearest);
    }
}
