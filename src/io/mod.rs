//! I/O layer: the GDAL-backed raster reader, the gdalwarp reprojection stage,
//! and `writers` for the Float32 GeoTIFF output, metadata embedding and the
//! JSON report sidecar.
pub mod gdal;
pub use gdal::{GdalError, GdalMetadata, GdalRasterReader};

pub mod warp;
pub use warp::{WarpTarget, warp_to_grid};

pub mod writers;
