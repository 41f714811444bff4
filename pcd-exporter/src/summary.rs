use std::io;

use serde::Serialize;

use pcd_core::Warning;
use pcd_matcher::{ClassificationTier, Comparison, Statistics};

use crate::error::ExportError;

#[derive(Debug, Serialize)]
pub struct TierRow {
    pub interval: &'static str,
    pub label: ClassificationTier,
    pub color: &'static str,
    pub count: usize,
}

/// Serializable view of a comparison without the per-point rows.
#[derive(Debug, Serialize)]
pub struct SummaryReport {
    pub reference_points: usize,
    pub ground_points: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub max_distance: f64,
    /// `None` when nothing matched.
    pub statistics: Option<Statistics>,
    pub tiers: Vec<TierRow>,
    pub warnings: Vec<String>,
}

impl SummaryReport {
    /// `warnings` is every warning raised during the run, loader warnings included.
    pub fn new(comparison: &Comparison, warnings: &[Warning]) -> Self {
        Self {
            reference_points: comparison.reference_count,
            ground_points: comparison.ground_count,
            matched: comparison.results.len(),
            unmatched: comparison.unmatched_count(),
            max_distance: comparison.max_distance.meters(),
            statistics: comparison.summary.statistics().copied(),
            tiers: comparison
                .tier_counts
                .iter()
                .map(|(tier, count)| TierRow {
                    interval: tier.interval(),
                    label: tier,
                    color: tier.color(),
                    count,
                })
                .collect(),
            warnings: warnings.iter().map(|w| w.to_string()).collect(),
        }
    }
}

pub fn write_summary<W: io::Write>(
    writer: W,
    comparison: &Comparison,
    warnings: &[Warning],
) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(writer, &SummaryReport::new(comparison, warnings))?;
    Ok(())
}

/// Human-readable statistics and tier table, one line per entry.
pub fn summary_lines(comparison: &Comparison) -> Vec<String> {
    let mut lines = Vec::new();
    match comparison.summary.statistics() {
        Some(statistics) => lines.extend(statistics_lines(statistics)),
        None => {
            lines.push("No reference point is close to a ground point".to_string());
            return lines;
        }
    }

    lines.push("Error classification (|ΔZ|):".to_string());
    for (tier, count) in comparison.tier_counts.iter() {
        lines.push(tier_line(tier, count));
    }
    lines
}

fn statistics_lines(statistics: &Statistics) -> [String; 5] {
    [
        format!("Compared points: {}", statistics.count),
        format!("Min ΔZ: {:.3} m", statistics.min),
        format!("Max ΔZ: {:.3} m", statistics.max),
        format!("Mean ΔZ: {:.3} m", statistics.mean),
        format!("RMSE: {:.3} m", statistics.rmse),
    ]
}

fn tier_line(tier: ClassificationTier, count: usize) -> String {
    format!("  {:<12} {:<8} {}", tier.interval(), tier.label(), count)
}
