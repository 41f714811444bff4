use crate::crs::EpsgCode;

/// A point-cloud record reduced to what the comparison needs.
// Coordinates are already in real-world units:
// x = (X * scale[0]) + offset[0]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifiedPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub classification: u8,
}

/// A bare-earth point taken from the point cloud.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl GroundPoint {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// A surveyed point read from the reference table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferencePoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl ReferencePoint {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

#[derive(Debug, Clone)]
pub struct PointCloud {
    pub points: Vec<ClassifiedPoint>,
    pub metadata: Metadata,
}

impl PointCloud {
    pub fn new(points: Vec<ClassifiedPoint>) -> Self {
        let metadata = Metadata {
            point_count: points.len(),
            epsg: None,
        };

        PointCloud { points, metadata }
    }

    pub fn with_epsg(mut self, epsg: Option<EpsgCode>) -> Self {
        self.metadata.epsg = epsg;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct Metadata {
    pub point_count: usize,
    /// Declared CRS, if the file carries one.
    pub epsg: Option<EpsgCode>,
}
