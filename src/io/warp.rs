use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

use gdal::Dataset;
use tracing::{debug, info};

use crate::io::gdal::{GdalError, GdalRasterReader};
use crate::types::{RasterGrid, ResampleMethod};

/// Target grid for a warp
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WarpTarget {
    pub pixel_size_x: f64,
    /// Signed; gdalwarp receives the magnitude and emits a north-up grid
    pub pixel_size_y: f64,
    pub epsg: u32,
    pub resample: ResampleMethod,
}

/// Build the gdalwarp argument list for a Float32 warp with NaN as destination no-data
fn gdalwarp_args(input: &Path, output: &Path, target: &WarpTarget, src_nodata: &str) -> Vec<OsString> {
    let mut args: Vec<OsString> = [
        "-of",
        "GTiff",
        "-overwrite",
        "-r",
        target.resample.as_gdal_str(),
        "-ot",
        "Float32",
    ]
    .iter()
    .map(OsString::from)
    .collect();
    args.push("-tr".into());
    args.push(target.pixel_size_x.abs().to_string().into());
    args.push(target.pixel_size_y.abs().to_string().into());
    args.push("-t_srs".into());
    args.push(format!("EPSG:{}", target.epsg).into());
    args.push("-srcnodata".into());
    args.push(src_nodata.into());
    args.push("-dstnodata".into());
    args.push("nan".into());
    args.push(input.as_os_str().to_os_string());
    args.push(output.as_os_str().to_os_string());
    args
}

/// Reproject `input` onto the target grid and read it back as a `RasterGrid`.
///
/// The warped raster is materialized at `intermediate`, or in a temporary file
/// that is removed once read when no path is given. Source no-data comes from
/// the input band when it declares one, NaN otherwise.
pub fn warp_to_grid(
    input: &Path,
    intermediate: Option<&Path>,
    target: &WarpTarget,
) -> Result<RasterGrid, GdalError> {
    info!("-- Reading in raster --");
    let src_nodata = {
        let src_ds = Dataset::open(input)?;
        if src_ds.raster_count() == 0 {
            return Err(GdalError::UnsupportedFormat("No raster bands found".into()));
        }
        let band = src_ds.rasterband(1)?;
        match band.no_data_value() {
            Some(v) if !v.is_nan() => v.to_string(),
            _ => "nan".to_string(),
        }
    };

    let tmp_file;
    let out_path = match intermediate {
        Some(p) => p.to_path_buf(),
        None => {
            let stem = input
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("warped");
            tmp_file = tempfile::Builder::new()
                .prefix(&format!("{}_", stem))
                .suffix("_warped.tif")
                .tempfile()
                .map_err(|e| GdalError::Warp(format!("tempfile error: {}", e)))?;
            tmp_file.path().to_path_buf()
        }
    };

    info!(
        "Warping {:?} to EPSG:{} at {}x{} ({})",
        input, target.epsg, target.pixel_size_x, target.pixel_size_y, target.resample
    );
    let args = gdalwarp_args(input, &out_path, target, &src_nodata);
    debug!("gdalwarp {:?}", args);
    let status = Command::new("gdalwarp")
        .args(&args)
        .status()
        .map_err(|e| GdalError::Warp(format!("gdalwarp exec error: {}", e)))?;
    if !status.success() {
        // Best-effort cleanup of a partial intermediate
        if intermediate.is_some() {
            let _ = std::fs::remove_file(&out_path);
        }
        return Err(GdalError::Warp(format!("gdalwarp exited with {}", status)));
    }

    let reader = GdalRasterReader::open(&out_path)?;
    let grid = reader.read_grid(target.epsg)?;
    if grid.rows() == 0 || grid.cols() == 0 {
        return Err(GdalError::Warp("warp produced an empty grid".into()));
    }
    info!(
        "Reprojected grid: {}x{} pixels, origin ({}, {})",
        grid.cols(),
        grid.rows(),
        grid.origin_x,
        grid.origin_y
    );
    Ok(grid)
}
