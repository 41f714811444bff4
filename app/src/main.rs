mod error;
mod pipeline;

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use chrono::Local;
use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;

use pcd_core::crs::{EpsgCode, EPSG_LKS92_LATVIA_TM, GROUND_CLASSIFICATION};
use pcd_exporter::summary::summary_lines;
use pcd_matcher::MaxDistance;

use crate::pipeline::{export, run, RunConfig, RunStatus};

#[derive(Parser, Debug)]
#[command(
    name = "LAS Checker",
    about = "Compares ground points of a LAS/LAZ file with surveyed CSV points",
    author = "MIERUNE Inc.",
    version = "0.0.1"
)]
struct Cli {
    /// Point cloud with classified ground points (.las or .laz)
    #[arg(short, long, value_name = "FILE")]
    las: Option<PathBuf>,

    /// Reference points with x, y, z columns (.csv or .txt)
    #[arg(short, long, value_name = "FILE")]
    csv: Option<PathBuf>,

    /// Horizontal search distance in meters
    #[arg(short = 'd', long, default_value_t = MaxDistance::default(), value_name = "METERS")]
    max_distance: MaxDistance,

    /// EPSG code both inputs are expected to use
    #[arg(short, long, default_value_t = EPSG_LKS92_LATVIA_TM)]
    epsg: EpsgCode,

    #[arg(long, default_value_t = GROUND_CLASSIFICATION)]
    classification: u8,

    #[arg(long, default_value_t = ',', value_parser = parse_delimiter)]
    delimiter: char,

    /// Where to write the result table
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Where to write the statistics summary as JSON
    #[arg(short, long, value_name = "FILE")]
    summary: Option<PathBuf>,

    #[arg(long, default_value_t = LevelFilter::Info, value_parser = parse_level)]
    log_level: LevelFilter,
}

fn parse_delimiter(s: &str) -> Result<char, String> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Ok(c),
        _ => Err(format!("delimiter must be a single ASCII character, got {s:?}")),
    }
}

fn parse_level(s: &str) -> Result<LevelFilter, String> {
    s.parse()
        .map_err(|_| format!("unknown log level {s:?}, expected off/error/warn/info/debug/trace"))
}

fn main() -> ExitCode {
    let args = Cli::parse();

    Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter(None, args.log_level)
        .init();

    log::info!("LAS file: {:?}", args.las);
    log::info!("CSV file: {:?}", args.csv);
    log::info!("search distance: {} m", args.max_distance);
    log::info!("expected EPSG: {}", args.epsg);

    let cancel = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&cancel);
    if let Err(e) = ctrlc::set_handler(move || {
        log::warn!("interrupt received, stopping after the current point");
        handler_flag.store(true, Ordering::Relaxed);
    }) {
        log::warn!("failed to install Ctrl-C handler: {}", e);
    }

    let start = std::time::Instant::now();
    let config = RunConfig {
        las: args.las,
        csv: args.csv,
        max_distance: args.max_distance,
        expected_epsg: args.epsg,
        classification: args.classification,
        delimiter: args.delimiter as u8,
    };

    let status = match run(&config, &cancel).and_then(|report| {
        for line in summary_lines(&report.comparison) {
            log::info!("{}", line);
        }
        export(&report, args.output.as_deref(), args.summary.as_deref())?;
        Ok(report.status())
    }) {
        Ok(status) => status,
        Err(e) => {
            log::error!("{}", e);
            RunStatus::Failure
        }
    };

    log::info!("finished in {:?} ({:?})", start.elapsed(), status);
    match status {
        RunStatus::Success | RunStatus::Warning => ExitCode::SUCCESS,
        RunStatus::Failure => ExitCode::FAILURE,
    }
}
