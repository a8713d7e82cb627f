use std::collections::BTreeMap;
use std::path::Path;

use gdal::DriverManager;
use gdal::raster::Buffer;
use gdal::spatial_ref::SpatialRef;
use tracing::info;

use crate::io::gdal::GdalError;
use crate::io::writers::metadata::embed_tiff_metadata;
use crate::types::RasterGrid;

/// Write `grid` as a single-band Float32 GeoTIFF stamped with `epsg`.
///
/// NaN is registered as the band's no-data value. Any existing file at
/// `output` is replaced. The dataset is closed before returning, so the file
/// is complete on disk once this succeeds.
pub fn write_tiff_f32(
    output: &Path,
    grid: &RasterGrid,
    epsg: u32,
    metadata: &BTreeMap<String, String>,
) -> Result<(), GdalError> {
    let (rows, cols) = grid.data.dim();
    let driver = DriverManager::get_driver_by_name("GTiff")?;
    let mut ds = driver.create_with_band_type::<f32, _>(output, cols, rows, 1)?;

    ds.set_geo_transform(&grid.geotransform())?;
    let srs = SpatialRef::from_epsg(epsg)?;
    ds.set_spatial_ref(&srs)?;
    embed_tiff_metadata(&mut ds, metadata)?;

    {
        // Standard layout iteration is row-major, matching GDAL's buffer order
        let samples: Vec<f32> = grid.data.iter().map(|&v| v as f32).collect();
        let mut buf = Buffer::new((cols, rows), samples);
        let mut band = ds.rasterband(1)?;
        band.write((0, 0), (cols, rows), &mut buf)?;
        band.set_no_data_value(Some(f64::NAN))?;
    }

    ds.close()?;
    info!("Image written to {:?}", output);
    Ok(())
}
