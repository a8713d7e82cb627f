use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::ResampleMethod;

/// Preprocessing parameters suitable for config files and CLI overrides.
///
/// Defaults reproduce the Malawi HRSL population run: 30 m pixels in EPSG:3857,
/// 99th percentile ceiling, values under 0.1 zeroed, scaled to 0..255.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessParams {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Where the reprojected raster is materialized; None uses a temporary file
    pub intermediate: Option<PathBuf>,
    pub pixel_size_x: f64,
    /// Signed; negative means rows increase downward
    pub pixel_size_y: f64,
    pub target_epsg: u32,
    /// CRS stamped on the output; None reuses `target_epsg`
    pub output_epsg: Option<u32>,
    pub resample: ResampleMethod,
    pub clip_percentile: f64,
    pub zero_threshold: f64,
    pub scale_max: f64,
}

impl Default for PreprocessParams {
    fn default() -> Self {
        Self {
            input: PathBuf::from("../../HRSL/MALAWI/malawi_hrsl_no_anom.tif"),
            output: PathBuf::from("../../HRSL/malawi_pop_4fill.tif"),
            intermediate: None,
            pixel_size_x: 30.0,
            pixel_size_y: -30.0,
            target_epsg: 3857,
            output_epsg: None,
            resample: ResampleMethod::Nearest,
            clip_percentile: 99.0,
            zero_threshold: 0.1,
            scale_max: 255.0,
        }
    }
}

impl PreprocessParams {
    /// Load a JSON preset; fields missing from the file keep their defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let params: PreprocessParams = serde_json::from_str(&json)?;
        Ok(params)
    }

    pub fn output_epsg(&self) -> u32 {
        self.output_epsg.unwrap_or(self.target_epsg)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.clip_percentile > 0.0 && self.clip_percentile <= 100.0) {
            return Err(Error::invalid("clip_percentile", self.clip_percentile));
        }
        if !self.pixel_size_x.is_finite() || self.pixel_size_x == 0.0 {
            return Err(Error::invalid("pixel_size_x", self.pixel_size_x));
        }
        if !self.pixel_size_y.is_finite() || self.pixel_size_y == 0.0 {
            return Err(Error::invalid("pixel_size_y", self.pixel_size_y));
        }
        if !self.zero_threshold.is_finite() {
            return Err(Error::invalid("zero_threshold", self.zero_threshold));
        }
        if !(self.scale_max.is_finite() && self.scale_max > 0.0) {
            return Err(Error::invalid("scale_max", self.scale_max));
        }
        if self.input == self.output {
            return Err(Error::invalid("output", self.output.display()));
        }
        // gdalwarp runs with -overwrite, so this would clobber the source
        if self.intermediate.as_ref() == Some(&self.input) {
            return Err(Error::invalid("intermediate", self.input.display()));
        }
        Ok(())
    }
}
