//! Horizontal spatial index over ground points.
//!
//! Uses an R-tree over the (x, y) projection; heights are carried alongside
//! and never take part in the search.

use rstar::{primitives::GeomWithData, RTree};

use pcd_core::pointcloud::point::{GroundPoint, ReferencePoint};

use crate::config::MaxDistance;

/// Planar position tagged with its position in the ground point list.
type IndexedPoint = GeomWithData<[f64; 2], usize>;

/// The closest ground point to a query location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Position of the ground point in construction order.
    pub index: usize,
    pub point: GroundPoint,
    /// Planar (x, y) distance to the query location.
    pub distance: f64,
}

pub struct SpatialIndex {
    tree: RTree<IndexedPoint>,
    points: Vec<GroundPoint>,
}

impl SpatialIndex {
    pub fn new(points: Vec<GroundPoint>) -> Self {
        let indexed: Vec<IndexedPoint> = points
            .iter()
            .enumerate()
            .map(|(i, p)| GeomWithData::new([p.x, p.y], i))
            .collect();

        Self {
            tree: RTree::bulk_load(indexed),
            points,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Find the closest indexed point to `(x, y)`.
    ///
    /// Among equidistant points the one inserted first wins, so repeated runs
    /// over the same input pick the same neighbor. Returns `None` on an empty index.
    pub fn nearest(&self, x: f64, y: f64) -> Option<Neighbor> {
        let mut candidates = self.tree.nearest_neighbor_iter_with_distance_2(&[x, y]);
        let (first, best_distance_2) = candidates.next()?;

        let index = candidates
            .take_while(|(_, distance_2)| *distance_2 == best_distance_2)
            .map(|(candidate, _)| candidate.data)
            .fold(first.data, usize::min);

        Some(Neighbor {
            index,
            point: self.points[index],
            distance: best_distance_2.sqrt(),
        })
    }
}

pub fn build_index(ground_points: Vec<GroundPoint>) -> SpatialIndex {
    let start = std::time::Instant::now();
    let index = SpatialIndex::new(ground_points);
    log::info!(
        "Built spatial index over {} ground points in {:?}",
        index.len(),
        start.elapsed()
    );
    index
}

/// Nearest ground point to `point`, if it lies within `max_distance`.
pub fn query_nearest(
    index: &SpatialIndex,
    point: &ReferencePoint,
    max_distance: MaxDistance,
) -> Option<Neighbor> {
    index
        .nearest(point.x, point.y)
        .filter(|neighbor| neighbor.distance <= max_distance.meters())
}
