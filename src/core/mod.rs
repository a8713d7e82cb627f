//! Core building blocks: the preprocessing parameters and the clamp/normalize
//! processing stages. These are internal primitives consumed by the high-level
//! `api` module.
pub mod params;
pub mod processing;
