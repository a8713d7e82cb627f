//! Raster arithmetic stages: percentile clamp, linear normalization,
//! and the pipeline that chains them.
pub mod clamp;
pub mod normalize;
pub mod pipeline;
