use gdal::{Dataset, Metadata, errors::GdalError as GdalCrateError};
use ndarray::Array2;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use crate::types::RasterGrid;

/// Errors encountered when reading, warping or writing through GDAL
#[derive(Debug, Error)]
pub enum GdalError {
    #[error("GDAL error: {0}")]
    Gdal(#[from] GdalCrateError),
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("Dimension mismatch: expected {0}x{1}, got {2} samples")]
    DimensionMismatch(usize, usize, usize),
    #[error("Warp failed: {0}")]
    Warp(String),
}

/// Metadata extracted from a GDAL-supported dataset
#[derive(Debug, Clone)]
pub struct GdalMetadata {
    /// Width (pixels) of the raster
    pub size_x: usize,
    /// Height (lines) of the raster
    pub size_y: usize,
    /// Number of raster bands
    pub bands: usize,
    /// Affine geotransform coefficients ([origin_x, pixel_width, rot_x, origin_y, rot_y, pixel_height])
    pub geotransform: [f64; 6],
    /// EPSG code parsed from the projection, if it carries one
    pub epsg: Option<u32>,
    /// Additional metadata key-value pairs
    pub metadata: HashMap<String, String>,
}

/// Reader for single-band rasters via GDAL
pub struct GdalRasterReader {
    pub dataset: Dataset,
    pub metadata: GdalMetadata,
}

// Helper to extract EPSG code from WKT authority tag
pub(crate) fn parse_epsg(wkt: &str) -> Option<u32> {
    if let Some(code) = wkt.strip_prefix("EPSG:") {
        return code.trim().parse().ok();
    }
    const KEY: &str = "AUTHORITY[\"EPSG\",\"";
    let start = wkt.rfind(KEY)? + KEY.len();
    let end = wkt[start..].find('"')?;
    wkt[start..start + end].parse().ok()
}

impl GdalRasterReader {
    /// Open a GDAL-supported raster (e.g., GeoTIFF, ENVI, HFA)
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, GdalError> {
        let dataset = Dataset::open(path.as_ref())?;
        let (size_x, size_y) = dataset.raster_size();
        let bands = dataset.raster_count() as usize;
        if bands == 0 {
            return Err(GdalError::UnsupportedFormat("No raster bands found".into()));
        }
        let geotransform = match dataset.geo_transform() {
            Ok(gt) => gt,
            Err(_) => [0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
        };
        let epsg = parse_epsg(&dataset.projection());
        // Collect metadata entries (domain "")
        let mut metadata_map = HashMap::new();
        if let Some(entries) = dataset.metadata_domain("") {
            for entry in entries {
                if let Some((key, val)) = entry.split_once('=') {
                    metadata_map.insert(key.to_string(), val.to_string());
                }
            }
        }
        Ok(GdalRasterReader {
            dataset,
            metadata: GdalMetadata {
                size_x: size_x as usize,
                size_y: size_y as usize,
                bands,
                geotransform,
                epsg,
                metadata: metadata_map,
            },
        })
    }

    /// Read a single band (1-based index) as an f64 ndarray of shape (height, width).
    /// Cells equal to the band's no-data value come back as NaN.
    pub fn read_band(&self, index: usize) -> Result<Array2<f64>, GdalError> {
        if index == 0 || index > self.metadata.bands {
            return Err(GdalError::UnsupportedFormat(format!(
                "Band index {} out of range",
                index
            )));
        }
        let band = self.dataset.rasterband(index)?;
        let no_data = band.no_data_value().filter(|v| !v.is_nan());
        let window = (self.metadata.size_x, self.metadata.size_y);
        let buf = band.read_as::<f64>((0, 0), window, window, None)?;

        let mut data_vec = buf.data().to_vec();
        if let Some(nd) = no_data {
            for v in data_vec.iter_mut().filter(|v| **v == nd) {
                *v = f64::NAN;
            }
        }
        let got = data_vec.len();
        Array2::from_shape_vec((self.metadata.size_y, self.metadata.size_x), data_vec).map_err(
            |_| GdalError::DimensionMismatch(self.metadata.size_x, self.metadata.size_y, got),
        )
    }

    /// Read band 1 with its georeferencing. `fallback_epsg` is used when the
    /// dataset's projection does not name an EPSG authority.
    pub fn read_grid(&self, fallback_epsg: u32) -> Result<RasterGrid, GdalError> {
        let data = self.read_band(1)?;
        Ok(RasterGrid::from_geotransform(
            data,
            self.metadata.geotransform,
            self.metadata.epsg.unwrap_or(fallback_epsg),
        ))
    }
}
