use serde::Serialize;

use crate::matcher::MatchResult;

/// Aggregate ΔZ statistics over a non-empty set of matches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Statistics {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub rmse: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatisticsSummary {
    /// No reference point found a ground neighbor.
    Empty,
    Computed(Statistics),
}

impl StatisticsSummary {
    pub fn is_empty(&self) -> bool {
        matches!(self, StatisticsSummary::Empty)
    }

    pub fn statistics(&self) -> Option<&Statistics> {
        match self {
            StatisticsSummary::Empty => None,
            StatisticsSummary::Computed(statistics) => Some(statistics),
        }
    }
}

/// Statistics over the unrounded ΔZ of every result.
pub fn summarize(match_results: &[MatchResult]) -> StatisticsSummary {
    if match_results.is_empty() {
        return StatisticsSummary::Empty;
    }

    let count = match_results.len();
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0;
    let mut sum_of_squares = 0.0;
    for result in match_results {
        let dz = result.delta_z;
        min = min.min(dz);
        max = max.max(dz);
        sum += dz;
        sum_of_squares += dz * dz;
    }

    StatisticsSummary::Computed(Statistics {
        count,
        min,
        max,
        mean: sum / count as f64,
        rmse: (sum_of_squares / count as f64).sqrt(),
    })
}
