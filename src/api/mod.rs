//! High-level library API: run the whole preprocessing chain from file to file,
//! or any single stage on its own. Prefer these entrypoints over the low-level
//! processing modules when integrating popnorm.
use std::collections::BTreeMap;
use std::path::Path;

use tracing::info;

use crate::core::params::PreprocessParams;
use crate::core::processing::pipeline::process_grid_pipeline;
use crate::error::Result;
use crate::io::warp::{WarpTarget, warp_to_grid};
use crate::io::writers::metadata::extract_metadata_fields;
use crate::io::writers::tiff::write_tiff_f32;
use crate::types::{NormalizeStats, PreprocessReport, RasterGrid};

fn warp_target(params: &PreprocessParams) -> WarpTarget {
    WarpTarget {
        pixel_size_x: params.pixel_size_x,
        pixel_size_y: params.pixel_size_y,
        epsg: params.target_epsg,
        resample: params.resample,
    }
}

/// Load & reproject `params.input` onto the configured grid
pub fn load_grid(params: &PreprocessParams) -> Result<RasterGrid> {
    let grid = warp_to_grid(
        &params.input,
        params.intermediate.as_deref(),
        &warp_target(params),
    )?;
    Ok(grid)
}

/// Clamp and normalize in memory (no disk I/O). The input grid is not modified.
pub fn normalize_grid(
    grid: &RasterGrid,
    params: &PreprocessParams,
) -> Result<(RasterGrid, NormalizeStats)> {
    process_grid_pipeline(
        grid,
        params.clip_percentile,
        params.zero_threshold,
        params.scale_max,
    )
}

/// Write a normalized grid as a Float32 GeoTIFF with the given metadata items
pub fn write_grid(
    grid: &RasterGrid,
    output: &Path,
    epsg: u32,
    metadata: &BTreeMap<String, String>,
) -> Result<()> {
    write_tiff_f32(output, grid, epsg, metadata)?;
    Ok(())
}

/// Run load, clamp, normalize and write for one raster.
///
/// Nothing is written unless every earlier stage succeeded.
pub fn preprocess_to_path(params: &PreprocessParams) -> Result<PreprocessReport> {
    params.validate()?;

    let grid = load_grid(params)?;
    let (normalized, stats) = normalize_grid(&grid, params)?;
    drop(grid);

    let epsg = params.output_epsg();
    let report = PreprocessReport {
        input: params.input.clone(),
        output: params.output.clone(),
        rows: normalized.rows(),
        cols: normalized.cols(),
        geotransform: normalized.geotransform(),
        epsg,
        clip_percentile: params.clip_percentile,
        scale_max: params.scale_max,
        stats,
        timestamp: chrono::Utc::now(),
    };
    write_grid(
        &normalized,
        &params.output,
        epsg,
        &extract_metadata_fields(&report),
    )?;

    info!(
        "Population raster preprocessed: {:?} ({}x{}, p{} = {})",
        report.output, report.cols, report.rows, params.clip_percentile, stats.clip_value
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::io::gdal::GdalRasterReader;
    use crate::io::warp::test_support::{gdalwarp_available, write_wgs84_fixture};
    use approx::assert_relative_eq;
    use assert_matches::assert_matches;
    use ndarray::array;

    #[test]
    fn normalize_then_write_reads_back_in_range() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("pop_norm.tif");
        let params = PreprocessParams {
            output: output.clone(),
            ..Default::default()
        };
        let grid = RasterGrid::from_geotransform(
            array![[1.0, 2.0, f64::NAN], [0.05, 50.0, 60.0], [70.0, 80.0, 90.0]],
            [3_700_000.0, 30.0, 0.0, -1_100_000.0, 0.0, -30.0],
            3857,
        );

        let (normalized, stats) = normalize_grid(&grid, &params).unwrap();
        let mut meta = BTreeMap::new();
        meta.insert("POPNORM_MAX".to_string(), stats.max.to_string());
        write_grid(&normalized, &output, params.output_epsg(), &meta).unwrap();

        let reader = GdalRasterReader::open(&output).unwrap();
        assert_eq!(
            reader.metadata.metadata.get("POPNORM_MAX"),
            Some(&stats.max.to_string())
        );
        let back = reader.read_grid(0).unwrap();
        assert_eq!(back.geotransform(), grid.geotransform());
        assert!(back.data.iter().all(|v| (0.0..=255.0 + 1e-3).contains(v)));
        assert_eq!(back.data[[0, 2]], 0.0);
        assert_relative_eq!(back.data[[2, 2]], 255.0, epsilon = 1e-4);
    }

    #[test]
    fn missing_input_aborts_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let params = PreprocessParams {
            input: dir.path().join("absent.tif"),
            output: dir.path().join("out.tif"),
            ..Default::default()
        };
        assert_matches!(preprocess_to_path(&params), Err(Error::Gdal(_)));
        assert!(!params.output.exists());
    }

    #[test]
    fn invalid_params_are_rejected_first() {
        let params = PreprocessParams {
            scale_max: -1.0,
            ..Default::default()
        };
        assert_matches!(
            preprocess_to_path(&params),
            Err(Error::InvalidArgument { arg: "scale_max", .. })
        );
    }

    #[test]
    fn full_run_writes_one_normalized_raster() {
        if !gdalwarp_available() {
            eprintln!("gdalwarp not found; skipping");
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("pop_wgs84.tif");
        write_wgs84_fixture(&input);
        let params = PreprocessParams {
            input,
            output: dir.path().join("pop_norm.tif"),
            output_epsg: Some(32736),
            ..Default::default()
        };

        let report = preprocess_to_path(&params).unwrap();
        assert!(params.output.exists());
        assert_eq!(report.epsg, 32736);
        assert_eq!(report.scale_max, 255.0);
        assert_eq!(report.stats.min, 0.0);

        let reader = GdalRasterReader::open(&params.output).unwrap();
        assert_eq!(reader.metadata.epsg, Some(report.epsg));
        assert_eq!(
            reader.metadata.metadata.get("POPNORM_CLIP_VALUE"),
            Some(&report.stats.clip_value.to_string())
        );
        assert_eq!(
            reader.metadata.metadata.get("POPNORM_SCALE_MAX"),
            Some(&"255".to_string())
        );

        let back = reader.read_grid(0).unwrap();
        assert_eq!((back.rows(), back.cols()), (report.rows, report.cols));
        assert_eq!(back.geotransform(), report.geotransform);
        assert!(back.data.iter().all(|v| (0.0..=255.0).contains(v)));
        assert!(back.data.iter().any(|&v| v == 0.0));
        assert!(back.data.iter().any(|&v| v == 255.0));
    }
}
