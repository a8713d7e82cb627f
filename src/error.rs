//! Crate-level error type and `Result` alias for stable, structured error handling.
//! Converts underlying I/O, GDAL and JSON errors, and provides semantic variants
//! for argument validation and the degenerate numeric cases of the pipeline.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("GDAL error: {0}")]
    Gdal(#[from] crate::io::GdalError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument: {arg}={value}")]
    InvalidArgument { arg: &'static str, value: String },

    #[error("Cannot compute percentile: raster has no finite values ({cells} cells, all no-data)")]
    EmptyDistribution { cells: usize },

    #[error("Cannot normalize a constant raster (every cell is {value})")]
    ConstantRaster { value: f64 },

    #[error("Refusing to write non-finite value {value} at row {row}, col {col}")]
    NonFiniteOutput { row: usize, col: usize, value: f64 },
}

impl Error {
    pub fn invalid<V: std::fmt::Display>(arg: &'static str, value: V) -> Self {
        Error::InvalidArgument {
            arg,
            value: value.to_string(),
        }
    }
}
