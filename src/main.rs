//! popnorm CLI entrypoint.
//!
//! Thin wrapper over the `cli` module: parse args, run the preprocessing
//! chain, and exit with appropriate status.
//! For programmatic use, prefer the library API (`popnorm::api`).

use clap::Parser;

mod cli;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = cli::CliArgs::parse();
    cli::run(args)
}
