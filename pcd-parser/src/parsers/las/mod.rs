use std::path::PathBuf;

use las::Reader;

use pcd_core::pointcloud::point::{ClassifiedPoint, GroundPoint, PointCloud};

use super::Parser;
use crate::error::ParseError;

pub mod crs;

pub struct LasParser {
    pub filename: PathBuf,
}

impl Parser for LasParser {
    type Output = PointCloud;

    fn parse(&self) -> Result<PointCloud, ParseError> {
        let start = std::time::Instant::now();
        let mut reader = Reader::from_path(&self.filename)?;

        let header = reader.header();
        let epsg = crs::read_epsg(header.vlrs().iter().chain(header.evlrs()));
        let capacity = usize::try_from(header.number_of_points()).unwrap_or(0);
        log::debug!("LAS CRS: {:?}", epsg);

        let mut points = Vec::with_capacity(capacity);
        // The reader applies the header scale/offset to the stored integer coordinates.
        for las_point in reader.points() {
            let las_point = las_point?;
            points.push(ClassifiedPoint {
                x: las_point.x,
                y: las_point.y,
                z: las_point.z,
                classification: u8::from(las_point.classification),
            });
        }
        log::info!("Read {} LAS points in {:?}", points.len(), start.elapsed());

        Ok(PointCloud::new(points).with_epsg(epsg))
    }
}

/// Keeps the points whose classification equals `classification_code`,
/// in the order they appear in the cloud.
pub fn load_ground_points(cloud: &PointCloud, classification_code: u8) -> Vec<GroundPoint> {
    cloud
        .points
        .iter()
        .filter(|p| p.classification == classification_code)
        .map(|p| GroundPoint::new(p.x, p.y, p.z))
        .collect()
}
