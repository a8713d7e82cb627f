use gdal::Dataset;
use gdal::Metadata;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

use crate::io::gdal::GdalError;
use crate::types::PreprocessReport;

/// Provenance items embedded in the output GeoTIFF (domain "")
pub fn extract_metadata_fields(report: &PreprocessReport) -> BTreeMap<String, String> {
    let mut metadata = BTreeMap::new();
    metadata.insert(
        "POPNORM_SOURCE".to_string(),
        report.input.display().to_string(),
    );
    metadata.insert(
        "POPNORM_CLIP_PERCENTILE".to_string(),
        report.clip_percentile.to_string(),
    );
    metadata.insert(
        "POPNORM_CLIP_VALUE".to_string(),
        report.stats.clip_value.to_string(),
    );
    metadata.insert(
        "POPNORM_SCALE_MAX".to_string(),
        report.scale_max.to_string(),
    );
    metadata.insert("POPNORM_MIN".to_string(), report.stats.min.to_string());
    metadata.insert("POPNORM_MAX".to_string(), report.stats.max.to_string());
    metadata.insert(
        "POPNORM_VALID_CELLS".to_string(),
        format!("{}/{}", report.stats.valid_cells, report.stats.total_cells),
    );
    metadata.insert(
        "POPNORM_TIMESTAMP".to_string(),
        report.timestamp.to_rfc3339(),
    );
    metadata.insert(
        "POPNORM_VERSION".to_string(),
        env!("CARGO_PKG_VERSION").to_string(),
    );
    metadata
}

/// Set every entry as a dataset metadata item
pub fn embed_tiff_metadata(
    ds: &mut Dataset,
    metadata: &BTreeMap<String, String>,
) -> Result<(), GdalError> {
    for (key, value) in metadata {
        ds.set_metadata_item(key, value, "")?;
    }
    Ok(())
}

/// Write the run report as pretty JSON next to (or anywhere besides) the raster
pub fn write_report_sidecar(path: &Path, report: &PreprocessReport) -> crate::Result<()> {
    let json_string = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json_string)?;
    info!("Created report sidecar: {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NormalizeStats;
    use chrono::TimeZone;
    use std::path::PathBuf;

    fn report() -> PreprocessReport {
        PreprocessReport {
            input: PathBuf::from("malawi.tif"),
            output: PathBuf::from("malawi_norm.tif"),
            rows: 4,
            cols: 5,
            geotransform: [0.0, 30.0, 0.0, 0.0, 0.0, -30.0],
            epsg: 3857,
            clip_percentile: 99.0,
            scale_max: 255.0,
            stats: NormalizeStats {
                clip_value: 42.5,
                min: 0.0,
                max: 42.5,
                valid_cells: 18,
                total_cells: 20,
            },
            timestamp: chrono::Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn fields_carry_stats_and_source() {
        let fields = extract_metadata_fields(&report());
        assert_eq!(fields["POPNORM_SOURCE"], "malawi.tif");
        assert_eq!(fields["POPNORM_CLIP_PERCENTILE"], "99");
        assert_eq!(fields["POPNORM_CLIP_VALUE"], "42.5");
        assert_eq!(fields["POPNORM_SCALE_MAX"], "255");
        assert_eq!(fields["POPNORM_VALID_CELLS"], "18/20");
        assert!(fields["POPNORM_TIMESTAMP"].starts_with("2024-03-01T12:00:00"));
    }

    #[test]
    fn sidecar_is_readable_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        write_report_sidecar(&path, &report()).unwrap();

        let back: PreprocessReport =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back, report());
    }
}
