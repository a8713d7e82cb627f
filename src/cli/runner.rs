use tracing::info;
use tracing_subscriber::EnvFilter;

use popnorm::io::writers::metadata::write_report_sidecar;
use popnorm::{PreprocessParams, preprocess_to_path};

use super::args::CliArgs;

/// Layer CLI flags over the preset (or the defaults when no preset is given)
pub fn resolve_params(args: &CliArgs) -> popnorm::Result<PreprocessParams> {
    let mut params = match &args.config {
        Some(path) => {
            info!("Loading preset from {:?}", path);
            PreprocessParams::from_json_file(path)?
        }
        None => PreprocessParams::default(),
    };

    if let Some(v) = &args.input {
        params.input = v.clone();
    }
    if let Some(v) = &args.output {
        params.output = v.clone();
    }
    if let Some(v) = &args.intermediate {
        params.intermediate = Some(v.clone());
    }
    if let Some(v) = args.pixel_size_x {
        params.pixel_size_x = v;
    }
    if let Some(v) = args.pixel_size_y {
        params.pixel_size_y = v;
    }
    if let Some(v) = args.target_epsg {
        params.target_epsg = v;
    }
    if let Some(v) = args.output_epsg {
        params.output_epsg = Some(v);
    }
    if let Some(v) = args.resample {
        params.resample = v;
    }
    if let Some(v) = args.clip_percentile {
        params.clip_percentile = v;
    }
    if let Some(v) = args.zero_threshold {
        params.zero_threshold = v;
    }
    if let Some(v) = args.scale_max {
        params.scale_max = v;
    }
    Ok(params)
}

pub fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.log || args.verbose {
        let level = if args.verbose { "debug" } else { "info" };
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
            )
            .init();
    }

    let params = resolve_params(&args)?;
    info!("Input: {:?}", params.input);
    info!("Output: {:?}", params.output);

    let report = preprocess_to_path(&params)?;
    if let Some(path) = &args.report {
        write_report_sidecar(path, &report)?;
    }

    info!("Population preprocessed image written.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;
    use std::path::PathBuf;

    #[test]
    fn flags_override_preset_which_overrides_defaults() {
        let mut preset = tempfile::NamedTempFile::new().unwrap();
        write!(
            preset,
            r#"{{"input": "preset_in.tif", "clip_percentile": 98.0, "target_epsg": 32736}}"#
        )
        .unwrap();
        let config = preset.path().to_string_lossy().into_owned();

        let args = CliArgs::parse_from([
            "popnorm",
            "--config",
            config.as_str(),
            "--target-epsg",
            "3857",
            "--pixel-size-y",
            "-100",
            "--resample",
            "bilinear",
        ]);
        let params = resolve_params(&args).unwrap();

        assert_eq!(params.input, PathBuf::from("preset_in.tif"));
        assert_eq!(params.clip_percentile, 98.0);
        assert_eq!(params.target_epsg, 3857);
        assert_eq!(params.pixel_size_y, -100.0);
        assert_eq!(params.resample, popnorm::ResampleMethod::Bilinear);
        assert_eq!(params.scale_max, 255.0);
    }

    #[test]
    fn no_flags_gives_defaults() {
        let args = CliArgs::parse_from(["popnorm"]);
        assert_eq!(resolve_params(&args).unwrap(), PreprocessParams::default());
    }
}
