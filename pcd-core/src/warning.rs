use thiserror::Error;

use crate::crs::EpsgCode;

/// Non-fatal conditions surfaced to the caller while the run continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Warning {
    #[error("point cloud CRS is EPSG:{found}, expected EPSG:{expected}; check the coordinates are in the expected system")]
    CoordinateSystem {
        expected: EpsgCode,
        found: EpsgCode,
    },
    #[error("point cloud declares no CRS, expected EPSG:{expected}")]
    CoordinateSystemMissing { expected: EpsgCode },
    #[error("no reference points to compare")]
    NoReferencePoints,
    #[error("no reference point has a ground point within the search distance")]
    NoMatches,
}
