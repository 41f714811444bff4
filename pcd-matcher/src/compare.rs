use std::{sync::atomic::AtomicBool, time::Instant};

use pcd_core::{
    pointcloud::point::{GroundPoint, ReferencePoint},
    Warning,
};

use crate::{
    classify::TierCounts,
    config::MaxDistance,
    index::build_index,
    matcher::{match_all, match_all_until, Interrupted, MatchResult},
    statistics::{summarize, StatisticsSummary},
};

/// Outcome of one comparison pass.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub results: Vec<MatchResult>,
    pub summary: StatisticsSummary,
    pub tier_counts: TierCounts,
    pub reference_count: usize,
    pub ground_count: usize,
    pub max_distance: MaxDistance,
    pub warnings: Vec<Warning>,
}

impl Comparison {
    pub fn unmatched_count(&self) -> usize {
        self.reference_count - self.results.len()
    }
}

pub fn compare(
    ground_points: Vec<GroundPoint>,
    reference_points: &[ReferencePoint],
    max_distance: MaxDistance,
) -> Comparison {
    let ground_count = ground_points.len();
    let index = build_index(ground_points);

    let start = Instant::now();
    let results = match_all(reference_points, &index, max_distance);
    assemble(results, reference_points.len(), ground_count, max_distance, start)
}

/// Like [`compare`], but gives up between queries once `cancel` is set.
pub fn compare_until(
    ground_points: Vec<GroundPoint>,
    reference_points: &[ReferencePoint],
    max_distance: MaxDistance,
    cancel: &AtomicBool,
) -> Result<Comparison, Interrupted> {
    let ground_count = ground_points.len();
    let index = build_index(ground_points);

    let start = Instant::now();
    let results = match_all_until(reference_points, &index, max_distance, cancel)?;
    Ok(assemble(
        results,
        reference_points.len(),
        ground_count,
        max_distance,
        start,
    ))
}

fn assemble(
    results: Vec<MatchResult>,
    reference_count: usize,
    ground_count: usize,
    max_distance: MaxDistance,
    start: Instant,
) -> Comparison {
    log::info!(
        "Matched {} of {} reference points within {} m in {:?}",
        results.len(),
        reference_count,
        max_distance,
        start.elapsed()
    );

    let mut warnings = Vec::new();
    if reference_count == 0 {
        warnings.push(Warning::NoReferencePoints);
    } else if results.is_empty() {
        warnings.push(Warning::NoMatches);
    }

    Comparison {
        summary: summarize(&results),
        tier_counts: TierCounts::from_tiers(results.iter().map(|r| r.tier)),
        reference_count,
        ground_count,
        max_distance,
        warnings,
        results,
    }
}
