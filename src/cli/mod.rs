//! Command Line Interface (CLI) layer for popnorm.
//!
//! This module defines argument parsing (`args`) and the orchestration
//! logic (`runner`): resolve parameters from defaults, an optional JSON
//! preset and flags, then run the preprocessing chain.
//!
//! If you are embedding popnorm into another application, prefer using
//! the high-level `popnorm::api` module instead of calling the CLI code.
pub mod args;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;
