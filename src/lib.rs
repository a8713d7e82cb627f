#![doc = r#"
popnorm — preprocess a single-band population raster for downstream models.

The chain has four stages:

1. **Load & reproject**: warp the source onto a fixed pixel size and CRS
   (30 m, EPSG:3857 by default) as Float32 with NaN no-data, via `gdalwarp`.
2. **Outlier clamp**: cap values at the 99th percentile of the finite cells,
   zero out values below 0.1 and every no-data cell.
3. **Linear normalize**: rescale the clamped grid from its own min/max to 0..255
   (floating point, not rounded).
4. **Write**: single-band Float32 GeoTIFF with geotransform, EPSG spatial
   reference, NaN no-data and provenance metadata items.

Degenerate inputs fail fast: a raster with no finite cells yields
[`Error::EmptyDistribution`], a raster that is constant after clamping yields
[`Error::ConstantRaster`]. Nothing is written in either case.

Requirements
------------
- GDAL development headers and runtime available on your system.
- `gdalwarp` on `PATH` for the reprojection stage.

Quick start
-----------
```rust,no_run
use std::path::PathBuf;
use popnorm::{preprocess_to_path, PreprocessParams};

fn main() -> popnorm::Result<()> {
    let params = PreprocessParams {
        input: PathBuf::from("/data/HRSL/malawi_hrsl.tif"),
        output: PathBuf::from("/out/malawi_pop_norm.tif"),
        ..Default::default()
    };
    let report = preprocess_to_path(&params)?;
    println!("p99 = {}, {}x{}", report.stats.clip_value, report.cols, report.rows);
    Ok(())
}
```

In-memory clamp and normalize
-----------------------------
```rust
use ndarray::array;
use popnorm::{normalize_grid, PreprocessParams, RasterGrid};

let grid = RasterGrid::from_geotransform(
    array![[1.0, 2.0, f64::NAN], [0.05, 50.0, 60.0], [70.0, 80.0, 90.0]],
    [0.0, 30.0, 0.0, 0.0, 0.0, -30.0],
    3857,
);
let (normalized, stats) = normalize_grid(&grid, &PreprocessParams::default()).unwrap();
assert_eq!(normalized.data[[0, 2]], 0.0);
assert_eq!(stats.min, 0.0);
```

Useful modules
--------------
- [`api`] — high-level entry points.
- [`core`] — parameters and the clamp/normalize stages.
- [`io`] — GDAL reader, gdalwarp stage, GeoTIFF writer.
- [`error`] — crate-level `Error` and `Result`.
"#]

pub mod api;
pub mod core;
pub mod error;
pub mod io;
pub mod types;

// Curated public API surface
pub use crate::core::params::PreprocessParams;
pub use error::{Error, Result};
pub use types::{NormalizeStats, PreprocessReport, RasterGrid, ResampleMethod};

// Readers
pub use crate::io::gdal::{GdalError, GdalMetadata, GdalRasterReader};

pub use api::{load_grid, normalize_grid, preprocess_to_path, write_grid};
