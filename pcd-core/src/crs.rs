use crate::warning::Warning;

/// EPSG code type alias
pub type EpsgCode = u16;

/// LKS-92 / Latvia TM (EPSG:3059)
pub const EPSG_LKS92_LATVIA_TM: EpsgCode = 3059;

/// ASPRS classification code for bare-earth ground points.
pub const GROUND_CLASSIFICATION: u8 = 2;

/// Compares the declared CRS of a point cloud with the one the reference points use.
pub fn check_coordinate_system(declared: Option<EpsgCode>, expected: EpsgCode) -> Option<Warning> {
    match declared {
        Some(found) if found == expected => None,
        Some(found) => Some(Warning::CoordinateSystem { expected, found }),
        None => Some(Warning::CoordinateSystemMissing { expected }),
    }
}
