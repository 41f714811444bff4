use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;

use pcd_core::pointcloud::point::{GroundPoint, ReferencePoint};

use crate::{
    classify::{classify, ClassificationTier},
    config::MaxDistance,
    index::{query_nearest, SpatialIndex},
};

/// Decimal places used for displayed distances and height differences.
pub const DISPLAY_DECIMALS: i32 = 3;

pub fn round_for_display(value: f64) -> f64 {
    let factor = 10f64.powi(DISPLAY_DECIMALS);
    (value * factor).round() / factor
}

/// A reference point paired with its nearest ground point.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    /// Row of the reference point among the loaded reference points.
    pub reference_index: usize,
    pub reference: ReferencePoint,
    pub ground: GroundPoint,
    pub distance: f64,
    /// reference.z - ground.z; positive when the reference point is higher.
    pub delta_z: f64,
    pub tier: ClassificationTier,
}

impl MatchResult {
    fn new(
        reference_index: usize,
        reference: ReferencePoint,
        ground: GroundPoint,
        distance: f64,
    ) -> Self {
        let delta_z = reference.z - ground.z;
        Self {
            reference_index,
            reference,
            ground,
            distance,
            delta_z,
            tier: classify(round_for_display(delta_z).abs()),
        }
    }

    pub fn display_distance(&self) -> f64 {
        round_for_display(self.distance)
    }

    pub fn display_delta_z(&self) -> f64 {
        round_for_display(self.delta_z)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("matching interrupted after {processed} reference points")]
pub struct Interrupted {
    pub processed: usize,
}

/// Match every reference point, in input order, against the index.
///
/// Reference points without a ground point inside `max_distance` produce no result.
pub fn match_all(
    reference_points: &[ReferencePoint],
    index: &SpatialIndex,
    max_distance: MaxDistance,
) -> Vec<MatchResult> {
    reference_points
        .iter()
        .enumerate()
        .filter_map(|(i, reference)| {
            query_nearest(index, reference, max_distance)
                .map(|neighbor| MatchResult::new(i, *reference, neighbor.point, neighbor.distance))
        })
        .collect()
}

/// Like [`match_all`], but checks `cancel` before every query.
pub fn match_all_until(
    reference_points: &[ReferencePoint],
    index: &SpatialIndex,
    max_distance: MaxDistance,
    cancel: &AtomicBool,
) -> Result<Vec<MatchResult>, Interrupted> {
    let mut results = Vec::new();
    for (i, reference) in reference_points.iter().enumerate() {
        if cancel.load(Ordering::Relaxed) {
            return Err(Interrupted { processed: i });
        }
        if let Some(neighbor) = query_nearest(index, reference, max_distance) {
            results.push(MatchResult::new(i, *reference, neighbor.point, neighbor.distance));
        }
    }
    Ok(results)
}
