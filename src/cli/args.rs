use clap::Parser;
use std::path::PathBuf;

use popnorm::ResampleMethod;

#[derive(Parser, Debug)]
#[command(
    name = "popnorm",
    version,
    about = "Reproject, clamp and normalize a population raster to 0-255"
)]
pub struct CliArgs {
    /// JSON preset with any subset of the preprocessing parameters
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Input raster (overrides the preset)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output GeoTIFF (overrides the preset)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Keep the reprojected raster at this path instead of a temporary file
    #[arg(long)]
    pub intermediate: Option<PathBuf>,

    /// Target pixel width
    #[arg(long)]
    pub pixel_size_x: Option<f64>,

    /// Target pixel height, signed (e.g. -30)
    #[arg(long, allow_hyphen_values = true)]
    pub pixel_size_y: Option<f64>,

    /// EPSG code to reproject into
    #[arg(long)]
    pub target_epsg: Option<u32>,

    /// EPSG code stamped on the output (defaults to the target EPSG)
    #[arg(long)]
    pub output_epsg: Option<u32>,

    /// Resampling algorithm used while warping
    #[arg(long, value_enum)]
    pub resample: Option<ResampleMethod>,

    /// Percentile used as the outlier ceiling
    #[arg(long)]
    pub clip_percentile: Option<f64>,

    /// Values below this become 0
    #[arg(long, allow_hyphen_values = true)]
    pub zero_threshold: Option<f64>,

    /// Upper end of the normalized range
    #[arg(long)]
    pub scale_max: Option<f64>,

    /// Write a JSON run report to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Enable logging
    #[arg(long, default_value_t = false)]
    pub log: bool,

    /// Log at debug level (implies --log)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}
