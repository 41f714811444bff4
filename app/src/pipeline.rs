use std::{
    path::{Path, PathBuf},
    sync::atomic::AtomicBool,
};

use pcd_core::{
    crs::{check_coordinate_system, EpsgCode},
    Warning,
};
use pcd_exporter::{summary::write_summary, table::write_results, ExportError};
use pcd_matcher::{compare_until, Comparison, MaxDistance};
use pcd_parser::parsers::{
    csv::CsvParser,
    extension_of,
    las::{load_ground_points, LasParser},
    Parser as _,
};
use tempfile::NamedTempFile;

use crate::error::AppError;

/// Everything one comparison run needs; built from the command line.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub las: Option<PathBuf>,
    pub csv: Option<PathBuf>,
    pub max_distance: MaxDistance,
    pub expected_epsg: EpsgCode,
    pub classification: u8,
    pub delimiter: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    Warning,
    Failure,
}

#[derive(Debug)]
pub struct Report {
    pub comparison: Comparison,
    /// Loader and matcher warnings, in the order they were raised.
    pub warnings: Vec<Warning>,
}

impl Report {
    pub fn status(&self) -> RunStatus {
        if self.warnings.is_empty() {
            RunStatus::Success
        } else {
            RunStatus::Warning
        }
    }
}

fn require_input<'a>(
    path: Option<&'a PathBuf>,
    name: &str,
    missing: &mut Vec<String>,
) -> Option<&'a Path> {
    match path {
        Some(path) if path.is_file() => Some(path.as_path()),
        Some(path) => {
            missing.push(format!("{} ({})", name, path.display()));
            None
        }
        None => {
            missing.push(name.to_string());
            None
        }
    }
}

/// Loads both inputs and compares them; matching stops early once `cancel` is set.
pub fn run(config: &RunConfig, cancel: &AtomicBool) -> Result<Report, AppError> {
    let mut missing = Vec::new();
    let las_path = require_input(config.las.as_ref(), "LAS", &mut missing);
    let csv_path = require_input(config.csv.as_ref(), "CSV", &mut missing);
    let (Some(las_path), Some(csv_path)) = (las_path, csv_path) else {
        return Err(AppError::InputMissing(missing));
    };

    if !extension_of(las_path)?.is_point_cloud() {
        return Err(AppError::Format(pcd_parser::ParseError::UnsupportedExtension(
            las_path.display().to_string(),
        )));
    }
    if !extension_of(csv_path)?.is_table() {
        return Err(AppError::Format(pcd_parser::ParseError::UnsupportedExtension(
            csv_path.display().to_string(),
        )));
    }

    log::info!("start parsing CSV...");
    let csv_parser = CsvParser {
        filename: csv_path.to_path_buf(),
        delimiter: config.delimiter,
    };
    let reference_points = csv_parser.parse()?;

    log::info!("start parsing LAS...");
    let las_parser = LasParser {
        filename: las_path.to_path_buf(),
    };
    let point_cloud = las_parser.parse()?;

    let mut warnings = Vec::new();
    let declared = point_cloud.metadata.epsg;
    if let Some(warning) = check_coordinate_system(declared, config.expected_epsg) {
        log::warn!("{}", warning);
        warnings.push(warning);
    }

    let ground_points = load_ground_points(&point_cloud, config.classification);
    log::info!(
        "Found {} points with classification {} out of {}",
        ground_points.len(),
        config.classification,
        point_cloud.metadata.point_count
    );
    drop(point_cloud);

    let comparison = compare_until(ground_points, &reference_points, config.max_distance, cancel)?;
    warnings.extend(comparison.warnings.iter().cloned());

    Ok(Report {
        comparison,
        warnings,
    })
}

/// Temporary file next to `path`, so the final rename stays on one filesystem.
fn staging_file(path: &Path) -> Result<NamedTempFile, ExportError> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    Ok(NamedTempFile::new_in(dir)?)
}

/// Writes the result table and summary; the table is skipped when nothing matched.
///
/// Both files are staged first and only moved into place once every write
/// has succeeded, so a failed export leaves neither behind.
pub fn export(
    report: &Report,
    output: Option<&Path>,
    summary: Option<&Path>,
) -> Result<(), AppError> {
    let mut staged = Vec::new();

    if let Some(path) = output {
        if report.comparison.results.is_empty() {
            log::warn!("no matches, result table not written");
        } else {
            let mut file = staging_file(path)?;
            write_results(file.as_file_mut(), &report.comparison.results)?;
            staged.push((file, path));
        }
    }
    if let Some(path) = summary {
        let mut file = staging_file(path)?;
        write_summary(file.as_file_mut(), &report.comparison, &report.warnings)?;
        staged.push((file, path));
    }

    for (file, path) in staged {
        file.persist(path).map_err(|e| ExportError::from(e.error))?;
        log::info!("written {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use las::{point::Classification, Builder, Point, Vlr, Writer};
    use pcd_core::crs::{EPSG_LKS92_LATVIA_TM, GROUND_CLASSIFICATION};

    use super::*;

    fn run_to_end(config: &RunConfig) -> Result<Report, AppError> {
        run(config, &AtomicBool::new(false))
    }

    fn write_las(path: &Path, epsg: u16, points: &[(f64, f64, f64, Classification)]) {
        let words: [u16; 8] = [1, 1, 0, 1, 3072, 0, 1, epsg];
        let mut builder = Builder::default();
        builder.vlrs.push(Vlr {
            user_id: "LASF_Projection".to_string(),
            record_id: 34735,
            description: String::new(),
            data: words.iter().flat_map(|w| w.to_le_bytes()).collect(),
        });

        let mut writer = Writer::from_path(path, builder.into_header().unwrap()).unwrap();
        for &(x, y, z, classification) in points {
            writer
                .write_point(Point {
                    x,
                    y,
                    z,
                    classification,
                    ..Default::default()
                })
                .unwrap();
        }
        writer.close().unwrap();
    }

    fn config(dir: &Path) -> RunConfig {
        RunConfig {
            las: Some(dir.join("cloud.las")),
            csv: Some(dir.join("points.csv")),
            max_distance: MaxDistance::default(),
            expected_epsg: EPSG_LKS92_LATVIA_TM,
            classification: GROUND_CLASSIFICATION,
            delimiter: b',',
        }
    }

    fn scenario_files(dir: &Path, epsg: u16) {
        write_las(
            &dir.join("cloud.las"),
            epsg,
            &[
                (0.0, 0.0, 10.0, Classification::Ground),
                (5.0, 5.0, 3.0, Classification::Building),
            ],
        );
        std::fs::write(dir.join("points.csv"), "X,Y,Z\n0,0,10.5\n5,5,3\n").unwrap();
    }

    #[test]
    fn test_missing_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(dir.path());
        config.csv = None;

        match run_to_end(&config) {
            Err(AppError::InputMissing(missing)) => assert_eq!(missing.len(), 2),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_scenario_run() {
        let dir = tempfile::tempdir().unwrap();
        scenario_files(dir.path(), EPSG_LKS92_LATVIA_TM);

        let report = run_to_end(&config(dir.path())).unwrap();

        assert_eq!(report.status(), RunStatus::Success);
        assert_eq!(report.comparison.results.len(), 1);
        assert_eq!(report.comparison.ground_count, 1);
        assert_eq!(report.comparison.results[0].tier.label(), "sarkana");

        let output = dir.path().join("rezultati.csv");
        let summary = dir.path().join("summary.json");
        export(&report, Some(&output), Some(&summary)).unwrap();
        assert_eq!(std::fs::read_to_string(output).unwrap().lines().count(), 2);
        assert!(summary.is_file());
    }

    #[test]
    fn test_crs_mismatch_is_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        scenario_files(dir.path(), 4326);

        let report = run_to_end(&config(dir.path())).unwrap();

        assert_eq!(report.status(), RunStatus::Warning);
        assert_eq!(
            report.warnings,
            vec![Warning::CoordinateSystem {
                expected: 3059,
                found: 4326
            }]
        );
        assert_eq!(report.comparison.results.len(), 1);

        let summary = dir.path().join("summary.json");
        export(&report, None, Some(&summary)).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(summary).unwrap()).unwrap();
        let warnings = json["warnings"].as_array().unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].as_str().unwrap().contains("EPSG:4326"));
    }

    #[test]
    fn test_failed_export_leaves_no_files() {
        let dir = tempfile::tempdir().unwrap();
        scenario_files(dir.path(), EPSG_LKS92_LATVIA_TM);
        let report = run_to_end(&config(dir.path())).unwrap();

        let output = dir.path().join("rezultati.csv");
        let summary = dir.path().join("missing").join("summary.json");

        assert!(matches!(
            export(&report, Some(&output), Some(&summary)),
            Err(AppError::Export(_))
        ));
        assert!(!output.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_cancelled_run() {
        let dir = tempfile::tempdir().unwrap();
        scenario_files(dir.path(), EPSG_LKS92_LATVIA_TM);

        let result = run(&config(dir.path()), &AtomicBool::new(true));
        assert!(matches!(result, Err(AppError::Interrupted(_))));
    }

    #[test]
    fn test_schema_error_aborts() {
        let dir = tempfile::tempdir().unwrap();
        scenario_files(dir.path(), EPSG_LKS92_LATVIA_TM);
        std::fs::write(dir.path().join("points.csv"), "x,y\n0,0\n").unwrap();

        assert!(matches!(run_to_end(&config(dir.path())), Err(AppError::Schema(_))));
    }

    #[test]
    fn test_no_matches_skips_table() {
        let dir = tempfile::tempdir().unwrap();
        scenario_files(dir.path(), EPSG_LKS92_LATVIA_TM);
        std::fs::write(dir.path().join("points.csv"), "x,y,z\n100,100,1\n").unwrap();

        let report = run_to_end(&config(dir.path())).unwrap();
        assert_eq!(report.warnings, vec![Warning::NoMatches]);

        let output = dir.path().join("rezultati.csv");
        export(&report, Some(&output), None).unwrap();
        assert!(!output.exists());
    }

    #[test]
    fn test_wrong_extension_is_a_format_error() {
        let dir = tempfile::tempdir().unwrap();
        scenario_files(dir.path(), EPSG_LKS92_LATVIA_TM);
        let mut config = config(dir.path());
        config.las = config.csv.clone();

        assert!(matches!(run_to_end(&config), Err(AppError::Format(_))));
    }
}
